/// The bounded XPath subset this crate parses (spec §4.11).
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Expr {
    Or(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Cmp(Box<Expr>, CmpOp, Box<Expr>),
    Value,
    Attribute(String),
    Number(String),
    StringLit(String),
    Path(Vec<String>),
    Call(Func, Vec<Expr>),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum CmpOp {
    Ge,
    Le,
    Ne,
    Gt,
    Lt,
    Eq,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Func {
    Count,
    StringLength,
    Contains,
    StartsWith,
    True,
    False,
}
