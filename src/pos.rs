use serde::Serialize;

/// Half-open byte range into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Range(pub usize, pub usize);

impl Range {
    pub fn empty_at(pos: usize) -> Self {
        Range(pos, pos)
    }

    pub fn len(&self) -> usize {
        self.1 - self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == self.1
    }
}

/// Zero-based line and byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Maps byte offsets to line/column positions.
///
/// `\n`, `\r\n`, and a lone `\r` all end a line.
#[derive(Debug, Clone)]
pub struct SourceLocator {
    line_starts: Vec<usize>,
}

impl SourceLocator {
    pub fn new(source: &[u8]) -> Self {
        let mut line_starts = vec![0];
        for (i, &ch) in source.iter().enumerate() {
            if ch == b'\n' || (ch == b'\r' && source.get(i + 1) != Some(&b'\n')) {
                line_starts.push(i + 1);
            }
        }
        SourceLocator { line_starts }
    }

    pub fn position(&self, offset: usize) -> Position {
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Position {
            line: line as u32,
            column: (offset - self.line_starts[line]) as u32,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
