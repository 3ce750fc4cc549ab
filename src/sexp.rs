use std::fmt::{self, Display};

use bstr::ByteSlice;
use serde::Serialize;

use crate::ast::Node;
use crate::symbol::{Interner, Symbol};

/// S-expression view of an [`ast::Node`](crate::ast::Node) tree.
///
/// `Display` renders `s(:tag, ...)` with every nested tagged expression on its
/// own line; `Serialize` gives the same tree as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SExp {
    Tagged { tag: String, args: Vec<SExp> },
    Symbol { name: String },
}

impl Display for SExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            SExpIndent {
                sexp: self,
                nest: 0,
            }
        )
    }
}

#[derive(Debug)]
struct SExpIndent<'a> {
    sexp: &'a SExp,
    nest: u32,
}

impl<'a> Display for SExpIndent<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sexp {
            SExp::Tagged { tag, args } => {
                write!(f, "s(:{}", tag)?;
                for arg in args {
                    if matches!(arg, SExp::Tagged { .. }) {
                        write!(f, ",\n{}", Indent(self.nest + 1))?;
                    } else {
                        f.write_str(", ")?;
                    }
                    write!(
                        f,
                        "{}",
                        SExpIndent {
                            sexp: arg,
                            nest: self.nest + 1,
                        }
                    )?;
                }
                f.write_str(")")
            }
            SExp::Symbol { name } => write!(f, ":{}", name),
        }
    }
}

struct Indent(u32);

impl Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.0 {
            f.write_str("  ")?;
        }
        Ok(())
    }
}

pub fn to_sexp(node: &Node, interner: &Interner) -> SExp {
    let symbol = |name: Symbol| SExp::Symbol {
        name: interner.resolve(name).to_str_lossy().into_owned(),
    };
    let args = match node {
        Node::Toplevel { stmts } | Node::Block { stmts } => stmts
            .iter()
            .map(|stmt| to_sexp(stmt, interner))
            .collect::<Vec<_>>(),
        Node::Name { name } => vec![symbol(*name)],
        Node::List { items } => items
            .iter()
            .map(|item| to_sexp(item, interner))
            .collect::<Vec<_>>(),
        Node::Call { target, args } => vec![symbol(*target), to_sexp(args, interner)],
    };
    SExp::Tagged {
        tag: interner.resolve(node.tag()).to_str_lossy().into_owned(),
        args,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AstBuilder;
    use crate::builder::Builder;

    fn sample() -> (Node, Interner) {
        let mut interner = Interner::new();
        let mut builder = AstBuilder;
        let mut args = builder.make_list();
        for name in ["a", "b"] {
            let name = builder.make_name(interner.intern(name.as_bytes()));
            builder.append_to_list(&mut args, name);
        }
        let call = builder.make_call(interner.intern(b"f"), args);
        let mut toplevel = builder.make_toplevel();
        builder.append_to_block(&mut toplevel, call);
        (toplevel, interner)
    }

    #[test]
    fn test_display() {
        let (node, interner) = sample();
        assert_eq!(
            to_sexp(&node, &interner).to_string(),
            "s(:toplevel,\n  s(:call, :f,\n    s(:list,\n      s(:name, :a),\n      s(:name, :b))))"
        );
        assert_eq!(
            to_sexp(&AstBuilder.make_block(), &interner).to_string(),
            "s(:block)"
        );
    }

    #[test]
    fn test_json() {
        let (node, interner) = sample();
        let json = serde_json::to_string(&to_sexp(&node, &interner)).unwrap();
        assert_eq!(
            json,
            r#"{"tag":"toplevel","args":[{"tag":"call","args":[{"name":"f"},{"tag":"list","args":[{"tag":"name","args":[{"name":"a"}]},{"tag":"name","args":[{"name":"b"}]}]}]}]}"#
        );
    }
}
