use bstr::ByteSlice;
use std::env;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

macro_rules! impl_conversions {
    ($T:ty) => {
        impl<P: Into<PathBuf>> From<P> for $T {
            fn from(path: P) -> Self {
                Self { path: path.into() }
            }
        }

        impl AsRef<Path> for $T {
            fn as_ref(&self) -> &Path {
                &self.path
            }
        }
    };
}

#[derive(Debug, Clone)]
pub struct InputFile {
    pub path: PathBuf,
}

impl_conversions!(InputFile);

impl InputFile {
    pub fn read_bytes(&self) -> Vec<u8> {
        std::fs::read(self)
            .unwrap_or_else(|e| panic!("Error reading {}: {}", self.path.display(), e))
    }
}

/// Expected output of a test case, compared as a snapshot.
#[derive(Debug, Clone)]
pub struct OutputFile {
    pub path: PathBuf,
}

impl_conversions!(OutputFile);

impl OutputFile {
    /// Compares `actual` with the snapshot; `None` asserts that the snapshot
    /// file does not exist.
    pub fn compare_opt<T: Snapshot>(&self, actual: Option<&T>) {
        self.compare_opt_with_mode(actual, SnapshotMode::current());
    }

    pub fn compare_opt_with_mode<T: Snapshot>(&self, actual: Option<&T>, mode: SnapshotMode) {
        match (actual, self.read_bytes_opt()) {
            (Some(actual), Some(expected)) => {
                if actual.compare_with(&expected) {
                    return;
                }
                if mode == SnapshotMode::All {
                    self.write(&actual.to_snapshot());
                } else {
                    actual.on_diff(&expected);
                }
            }
            (Some(actual), None) => {
                if mode >= SnapshotMode::New {
                    self.write(&actual.to_snapshot());
                } else {
                    panic!(
                        "Snapshot {} not found\n\nUse UPDATE_SNAPSHOTS=true to generate the snapshot",
                        self.path.display()
                    );
                }
            }
            (None, Some(_)) => {
                if mode == SnapshotMode::All {
                    std::fs::remove_file(&self.path).unwrap_or_else(|e| {
                        panic!("Error removing {}: {}", self.path.display(), e)
                    });
                } else {
                    panic!(
                        "Snapshot {} should not exist\n\nUse UPDATE_SNAPSHOTS=true to remove the unnecessary snapshot",
                        self.path.display()
                    );
                }
            }
            (None, None) => {}
        }
    }

    fn write(&self, contents: &[u8]) {
        std::fs::write(self, contents)
            .unwrap_or_else(|e| panic!("Error writing {}: {}", self.path.display(), e));
    }

    fn read_bytes_opt(&self) -> Option<Vec<u8>> {
        match std::fs::read(self) {
            Ok(expected) => Some(expected),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => panic!("Error reading {}: {}", self.path.display(), e),
        }
    }
}

/// Files in one directory sharing the stem `name`.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub dir: PathBuf,
    pub name: String,
}

impl TestCase {
    pub fn input(&self, suffix: &str) -> InputFile {
        self.dir.join(format!("{}{}", self.name, suffix)).into()
    }

    pub fn output(&self, suffix: &str) -> OutputFile {
        self.dir.join(format!("{}{}", self.name, suffix)).into()
    }
}

/// Every file under `dir` ending with `suffix`, as test cases sorted by name.
pub fn test_cases(dir: impl AsRef<Path>, suffix: &str) -> Vec<TestCase> {
    let dir = dir.as_ref();
    let mut cases = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.unwrap_or_else(|e| panic!("Error walking {}: {}", dir.display(), e));
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or_else(|_| panic!("{} is not in {}", entry.path().display(), dir.display()));
        let file_name = file_name
            .to_str()
            .unwrap_or_else(|| panic!("invalid file name: {}", entry.path().display()));
        if let Some(name) = file_name.strip_suffix(suffix) {
            cases.push(TestCase {
                dir: dir.to_owned(),
                name: name.to_owned(),
            });
        }
    }
    cases
}

/// Runs `f` on every test case under `dir`, then fails with the list of
/// cases that panicked.
pub fn run_test_cases<F>(dir: impl AsRef<Path>, suffix: &str, f: F)
where
    F: Fn(&TestCase),
{
    let dir = dir.as_ref();
    let cases = test_cases(dir, suffix);
    assert!(
        !cases.is_empty(),
        "No *{} test cases in {}",
        suffix,
        dir.display()
    );
    let mut failures = Vec::new();
    for case in &cases {
        if let Err(e) = catch_unwind(AssertUnwindSafe(|| f(case))) {
            let message = if let Some(&e) = e.downcast_ref::<&'static str>() {
                e.to_owned()
            } else if let Some(e) = e.downcast_ref::<String>() {
                e.clone()
            } else {
                String::from("Box<dyn Any>")
            };
            failures.push(format!("{}: {}", case.name, message));
        }
    }
    if !failures.is_empty() {
        panic!(
            "{} of {} test cases failed:\n{}",
            failures.len(),
            cases.len(),
            failures.join("\n")
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SnapshotMode {
    None,
    New,
    All,
}

impl SnapshotMode {
    pub fn current() -> SnapshotMode {
        let update_snapshots = env::var("UPDATE_SNAPSHOTS").unwrap_or_else(|_| String::from(""));
        let ci = env::var("CI").unwrap_or_else(|_| String::from(""));
        match &update_snapshots[..] {
            "all" | "true" | "1" => return SnapshotMode::All,
            "new" => return SnapshotMode::New,
            "none" | "false" | "0" => return SnapshotMode::None,
            _ => {}
        }
        if ci == "true" || ci == "1" {
            return SnapshotMode::None;
        }
        SnapshotMode::New
    }
}

pub trait Snapshot {
    fn to_snapshot(&self) -> Vec<u8>;
    fn compare_with(&self, snapshot: &[u8]) -> bool;
    fn on_diff(&self, snapshot: &[u8]) -> !;
}

impl Snapshot for String {
    fn to_snapshot(&self) -> Vec<u8> {
        self.as_bytes().to_owned()
    }
    fn compare_with(&self, snapshot: &[u8]) -> bool {
        self.as_bytes() == snapshot
    }
    fn on_diff(&self, snapshot: &[u8]) -> ! {
        assert_eq!(self.as_bytes().as_bstr(), snapshot.as_bstr());
        unreachable!();
    }
}
