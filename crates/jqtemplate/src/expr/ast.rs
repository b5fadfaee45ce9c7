//! Expression syntax tree

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `!x`
    Not,
    /// `-x`
    Neg,
    /// `+x`
    Plus,
}

/// Binary operators, including the short-circuiting logical ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `==` / `===`
    Eq,
    /// `!=` / `!==`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl BinaryOp {
    /// Source spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Numeric literal
    Number(f64),
    /// Quoted string
    String(String),
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value
    Literal(Literal),

    /// `$this`
    This,

    /// Bare identifier
    Ident(String),

    /// `object.property`
    Member {
        /// Base expression
        object: Box<Expr>,
        /// Property name
        property: String,
    },

    /// `object[index]`
    Index {
        /// Base expression
        object: Box<Expr>,
        /// Key expression
        index: Box<Expr>,
    },

    /// `callee(args...)`
    Call {
        /// Function expression
        callee: Box<Expr>,
        /// Arguments in order
        args: Vec<Expr>,
    },

    /// `[a, b, c]`
    Array(Vec<Expr>),

    /// `{key: value, ...}`
    Object(Vec<(String, Expr)>),

    /// Prefix operator
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },

    /// Infix operator
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },

    /// `test ? consequent : alternate`
    Conditional {
        /// Condition
        test: Box<Expr>,
        /// Value when truthy
        consequent: Box<Expr>,
        /// Value when falsy
        alternate: Box<Expr>,
    },
}
