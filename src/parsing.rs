use bstr::{BString, ByteSlice};
use tracing::{debug, trace};

use crate::ast::{AstBuilder, Node};
use crate::builder::Builder;
use crate::keywords::KeywordSet;
use crate::lexing::{Cursor, Fragment, FragmentKind};
use crate::parser_diagnostics::{Construct, ParseError};
use crate::pos::Range;
use crate::sexp::{to_sexp, SExp};
use crate::symbol::{Interner, Symbol};

/// Parses a whole program into an [`ast::Node`](crate::ast::Node) tree with
/// the standard keyword set.
pub fn parse(source: &[u8]) -> Result<Parsed, ParseError> {
    let mut session = Session::new();
    let root = session.parse(source)?;
    Ok(Parsed {
        root,
        interner: session.interner,
    })
}

/// Tree returned by [`parse`] together with the interner its symbols live in.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub root: Node,
    pub interner: Interner,
}

impl Parsed {
    pub fn to_sexp(&self) -> SExp {
        to_sexp(&self.root, &self.interner)
    }
}

/// Vocabulary shared by consecutive parses: the interner symbols are handed
/// out from and the keyword set used for classification.
#[derive(Debug, Clone)]
pub struct Session {
    interner: Interner,
    keywords: KeywordSet,
}

impl Session {
    pub fn new() -> Self {
        Self::with_keywords(Interner::new(), KeywordSet::standard())
    }

    /// Pairs `keywords` with the interner its symbols were interned in.
    ///
    /// # Panics
    ///
    /// Panics if a keyword symbol was never handed out by `interner`.
    pub fn with_keywords(interner: Interner, keywords: KeywordSet) -> Self {
        if let Some(symbol) = keywords.iter().find(|s| s.index() >= interner.len()) {
            panic!(
                "keyword symbol #{} does not belong to the given interner",
                symbol.index()
            );
        }
        Session { interner, keywords }
    }

    /// Standard keywords plus `words`.
    pub fn with_extra_keywords<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[u8]>,
    {
        let mut interner = Interner::new();
        let keywords = KeywordSet::standard().with_words(&mut interner, words);
        Self::with_keywords(interner, keywords)
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn interner_mut(&mut self) -> &mut Interner {
        &mut self.interner
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn parse(&mut self, source: &[u8]) -> Result<Node, ParseError> {
        self.parse_with(&mut AstBuilder, source)
    }

    /// Parses `source` as a program, building nodes with `builder`.
    pub fn parse_with<B: Builder>(
        &mut self,
        builder: &mut B,
        source: &[u8],
    ) -> Result<B::Node, ParseError> {
        debug!(len = source.len(), "parsing toplevel");
        let result = self.parser(builder, source).parse_toplevel();
        if let Err(e) = &result {
            debug!(error = %e, range = ?e.range(), "parse failed");
        }
        result
    }

    /// Parses `source` as a sequence of statements into a fresh block node.
    pub fn parse_block_with<B: Builder>(
        &mut self,
        builder: &mut B,
        source: &[u8],
    ) -> Result<B::Node, ParseError> {
        debug!(len = source.len(), "parsing block");
        self.parser(builder, source).parse_block(None)
    }

    fn parser<'s, 'a, B: Builder>(
        &'a mut self,
        builder: &'a mut B,
        source: &'s [u8],
    ) -> Parser<'s, 'a, B> {
        Parser::new(source, &mut self.interner, &self.keywords, builder)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// What ends the element being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `;` between statements
    Statement,
    /// `,` between call arguments; `)` closes the list
    Argument,
}

impl Separator {
    pub fn byte(self) -> u8 {
        match self {
            Separator::Statement => b';',
            Separator::Argument => b',',
        }
    }

    fn closer(self) -> Option<u8> {
        match self {
            Separator::Statement => None,
            Separator::Argument => Some(b')'),
        }
    }

    fn terminates(self, ch: u8) -> bool {
        ch == self.byte() || Some(ch) == self.closer()
    }
}

/// Recursive-descent parser over one source buffer.
///
/// Every node is created through the [`Builder`]; the parser only passes the
/// builder's values around.
pub struct Parser<'s, 'a, B: Builder> {
    cursor: Cursor<'s>,
    interner: &'a mut Interner,
    keywords: &'a KeywordSet,
    builder: &'a mut B,
}

impl<'s, 'a, B: Builder> Parser<'s, 'a, B> {
    pub fn new(
        source: &'s [u8],
        interner: &'a mut Interner,
        keywords: &'a KeywordSet,
        builder: &'a mut B,
    ) -> Self {
        Parser {
            cursor: Cursor::new(source),
            interner,
            keywords,
            builder,
        }
    }

    pub fn parse_toplevel(&mut self) -> Result<B::Node, ParseError> {
        let toplevel = self.builder.make_toplevel();
        self.parse_block(Some(toplevel))
    }

    /// Parses statements until the end of input and appends them to `block`,
    /// or to a new block if none is given.
    pub fn parse_block(&mut self, block: Option<B::Node>) -> Result<B::Node, ParseError> {
        let mut block = match block {
            Some(block) => block,
            None => self.builder.make_block(),
        };
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                None => break,
                Some(b';') => {
                    // empty statement
                    self.cursor.bump();
                    continue;
                }
                Some(_) => {}
            }
            let element = self.parse_element(Separator::Statement)?;
            self.builder.append_to_block(&mut block, element);
            if self.cursor.peek() == Some(b';') {
                self.cursor.bump();
            }
        }
        Ok(block)
    }

    /// Parses one element ending at `sep`.
    ///
    /// On success the cursor is on the separator, on the closer of the
    /// enclosing list, or at the end of input.
    pub fn parse_element(&mut self, sep: Separator) -> Result<B::Node, ParseError> {
        let frag = self.cursor.next_fragment(self.interner, self.keywords)?;
        trace!(kind = %frag.kind, text = %frag.text, offset = frag.range.0, "fragment");
        match frag.kind {
            FragmentKind::Keyword => self.parse_after_keyword(frag, sep),
            FragmentKind::Identifier => self.parse_after_ident(frag, sep),
            FragmentKind::QuotedString => Err(ParseError::UnimplementedConstruct {
                construct: Construct::StringLiteral,
                range: frag.range,
            }),
            FragmentKind::Operator if frag.is_closing_punct() => Err(unexpected(&frag)),
            FragmentKind::Operator => Err(ParseError::UnimplementedConstruct {
                construct: Construct::OperatorExpression(BString::from(frag.text.as_bytes())),
                range: frag.range,
            }),
        }
    }

    fn parse_after_keyword(
        &mut self,
        frag: Fragment<'s>,
        _sep: Separator,
    ) -> Result<B::Node, ParseError> {
        // TODO: dispatch on the keyword symbol once statement rules exist
        Err(ParseError::UnimplementedConstruct {
            construct: Construct::Keyword(BString::from(frag.text.as_bytes())),
            range: frag.range,
        })
    }

    fn parse_after_ident(
        &mut self,
        frag: Fragment<'s>,
        sep: Separator,
    ) -> Result<B::Node, ParseError> {
        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            None => Ok(self.make_name(&frag)),
            Some(ch) if sep.terminates(ch) => Ok(self.make_name(&frag)),
            Some(b'(') => {
                let target = self.interner.intern(frag.text);
                self.parse_call(target, sep)
            }
            Some(_) => Err(self.unsupported_continuation()),
        }
    }

    fn parse_call(&mut self, target: Symbol, sep: Separator) -> Result<B::Node, ParseError> {
        debug_assert_eq!(self.cursor.peek(), Some(b'('));
        trace!(offset = self.cursor.pos(), "call");
        self.cursor.bump();
        let mut args = self.builder.make_list();
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                None => {
                    return Err(ParseError::UnexpectedEof {
                        range: Range::empty_at(self.cursor.pos()),
                    })
                }
                Some(b')') => {
                    self.cursor.bump();
                    break;
                }
                Some(_) => {}
            }
            let arg = self.parse_element(Separator::Argument)?;
            self.builder.append_to_list(&mut args, arg);
            if self.cursor.peek() == Some(b',') {
                self.cursor.bump();
            }
        }
        let call = self.builder.make_call(target, args);
        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            None => Ok(call),
            Some(ch) if sep.terminates(ch) => Ok(call),
            Some(_) => Err(self.unsupported_continuation()),
        }
    }

    fn make_name(&mut self, frag: &Fragment<'s>) -> B::Node {
        let name = self.interner.intern(frag.text);
        self.builder.make_name(name)
    }

    /// Error for whatever follows a complete operand where the parser expected
    /// the end of the element.
    fn unsupported_continuation(&self) -> ParseError {
        let mut lookahead = self.cursor.clone();
        match lookahead.next_fragment(self.interner, self.keywords) {
            Err(e) => e,
            Ok(frag) if frag.is_closing_punct() => unexpected(&frag),
            Ok(frag) => ParseError::UnimplementedConstruct {
                construct: Construct::Continuation(BString::from(frag.text.as_bytes())),
                range: frag.range,
            },
        }
    }
}

fn unexpected(frag: &Fragment<'_>) -> ParseError {
    ParseError::UnexpectedFragment {
        kind: frag.kind,
        text: BString::from(frag.text.as_bytes()),
        range: frag.range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sexp(source: &str) -> String {
        parse(source.as_bytes()).unwrap().to_sexp().to_string()
    }

    fn error(source: &str) -> ParseError {
        parse(source.as_bytes()).unwrap_err()
    }

    #[test]
    fn test_names() {
        assert_eq!(sexp("x;"), "s(:toplevel,\n  s(:name, :x))");
        assert_eq!(sexp("x"), "s(:toplevel,\n  s(:name, :x))");
        assert_eq!(
            sexp(" x ;\n;; y"),
            "s(:toplevel,\n  s(:name, :x),\n  s(:name, :y))"
        );
    }

    #[test]
    fn test_calls() {
        assert_eq!(sexp("f()"), "s(:toplevel,\n  s(:call, :f,\n    s(:list)))");
        assert_eq!(sexp("f( )"), "s(:toplevel,\n  s(:call, :f,\n    s(:list)))");
        assert_eq!(
            sexp("f(a,)"),
            "s(:toplevel,\n  s(:call, :f,\n    s(:list,\n      s(:name, :a))))"
        );
    }

    #[test]
    fn test_separator_is_contextual() {
        // `,` does not end a statement and `;` does not end an argument
        assert_eq!(
            error("a, b"),
            ParseError::UnexpectedFragment {
                kind: FragmentKind::Operator,
                text: BString::from(","),
                range: Range(1, 2),
            }
        );
        assert_eq!(
            error("f(a; b)"),
            ParseError::UnexpectedFragment {
                kind: FragmentKind::Operator,
                text: BString::from(";"),
                range: Range(3, 4),
            }
        );
    }

    #[test]
    fn test_unimplemented() {
        let testcases = vec![
            ("return x;", Construct::Keyword(BString::from("return")), Range(0, 6)),
            ("f(while)", Construct::Keyword(BString::from("while")), Range(2, 7)),
            ("'s';", Construct::StringLiteral, Range(0, 3)),
            ("f(\"s\")", Construct::StringLiteral, Range(2, 5)),
            ("!x", Construct::OperatorExpression(BString::from("!")), Range(0, 1)),
            ("{ x }", Construct::OperatorExpression(BString::from("{")), Range(0, 1)),
            ("a = b", Construct::Continuation(BString::from("=")), Range(2, 3)),
            ("a.b", Construct::Continuation(BString::from(".")), Range(1, 2)),
            ("f() + g()", Construct::Continuation(BString::from("+")), Range(4, 5)),
            ("f()()", Construct::Continuation(BString::from("(")), Range(3, 4)),
            ("a\nb", Construct::Continuation(BString::from("b")), Range(2, 3)),
        ];
        for (source, construct, range) in testcases {
            let e = error(source);
            assert!(e.is_unimplemented(), "source: {:?}", source);
            assert_eq!(
                e,
                ParseError::UnimplementedConstruct { construct, range },
                "source: {:?}",
                source
            );
        }
    }

    #[test]
    fn test_eof_in_call() {
        assert_eq!(
            error("f(a,"),
            ParseError::UnexpectedEof {
                range: Range(4, 4),
            }
        );
        assert_eq!(
            error("f(g("),
            ParseError::UnexpectedEof {
                range: Range(4, 4),
            }
        );
    }

    #[test]
    fn test_parse_block_with() {
        let mut session = Session::new();
        let block = session.parse_block_with(&mut AstBuilder, b"a; b").unwrap();
        let a = session.interner().get(b"a").unwrap();
        let b = session.interner().get(b"b").unwrap();
        assert_eq!(
            block,
            Node::Block {
                stmts: vec![Node::Name { name: a }, Node::Name { name: b }],
            }
        );
    }

    #[test]
    fn test_extra_keywords() {
        let mut session = Session::with_extra_keywords(["let"]);
        assert!(session.keywords().contains_text(session.interner(), b"var"));
        assert_eq!(
            session.parse(b"let;"),
            Err(ParseError::UnimplementedConstruct {
                construct: Construct::Keyword(BString::from("let")),
                range: Range(0, 3),
            })
        );
        assert!(Session::new().parse(b"let;").is_ok());
    }
}
