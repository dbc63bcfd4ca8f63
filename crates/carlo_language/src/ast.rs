//! Abstract syntax tree for Carlo.
//!
//! Statements and expressions own their children through `Box` and `Vec`;
//! dropping a node drops its whole subtree. Tuple handlers are the one
//! exception: actors hold them as [`Shared`] so that every instance cloned
//! from a template runs the same parsed handler. The handler's
//! `Rc::strong_count` is its user count.

use std::rc::Rc;

use carlo_foundation::Tuple;

use crate::span::Span;

/// Shared ownership of a tuple handler across template clones.
pub type Shared<T> = Rc<T>;

/// A parsed program: the actors defined in one source file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    /// Actors in source order. The first is the program's own identity.
    pub actors: Vec<ActorDef>,
}

/// One `actor ... end` definition.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorDef {
    /// Declared name; empty for an unnamed first actor.
    pub name: String,
    /// Handlers in source order.
    pub handlers: Vec<Shared<TupleHandler>>,
    /// The `actor` keyword.
    pub span: Span,
}

/// A `receives` rule: tuple type, optional source filter, alias, and
/// condition, plus the block to run.
#[derive(Debug, PartialEq)]
pub struct TupleHandler {
    /// Tuple type to match.
    pub tuple_type: String,
    /// Required source actor; empty matches any sender.
    pub source_actor: String,
    /// Name the received tuple is bound to; empty means the tuple type.
    pub alias: String,
    /// Optional `where` condition.
    pub condition: Option<Expression>,
    /// Body.
    pub block: Block,
    /// The `receives` keyword.
    pub span: Span,
}

impl TupleHandler {
    /// Returns true if `tuple` has this handler's type and, when a source
    /// filter is set, comes from that actor.
    #[must_use]
    pub fn matches(&self, tuple: &Tuple) -> bool {
        (self.source_actor.is_empty() || tuple.source_actor() == self.source_actor)
            && tuple.tuple_type() == self.tuple_type
    }

    /// Returns the name the received tuple is bound to.
    #[must_use]
    pub fn binding(&self) -> &str {
        if self.alias.is_empty() {
            &self.tuple_type
        } else {
            &self.alias
        }
    }
}

/// An ordered statement sequence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Block {
    /// Statements in source order.
    pub statements: Vec<Statement>,
    /// The first token of the block.
    pub span: Span,
}

/// A statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    /// `sends [to expr] [on expr] (tuple name | type (key expr)*)`
    Sends {
        /// Destination actor override.
        destination_actor: Option<Expression>,
        /// Destination machine override.
        destination_id: Option<Expression>,
        /// What to send.
        payload: SendPayload,
        /// The `sends` keyword.
        span: Span,
    },
    /// `if cond ... [else ...] end`
    If {
        /// Condition; the block runs when it evaluates to 1.
        condition: Expression,
        /// Block run when the condition holds.
        then_block: Block,
        /// Block run otherwise.
        else_block: Option<Block>,
        /// The `if` keyword.
        span: Span,
    },
    /// `makes name expr`
    Makes {
        /// Assignment target.
        target: Identifier,
        /// Assigned expression.
        value: Expression,
        /// The `makes` keyword.
        span: Span,
    },
    /// `creates tuple ...` or `creates value ...`
    Creates {
        /// What to create.
        target: CreateTarget,
        /// The `creates` keyword.
        span: Span,
    },
    /// `each element in collection ... end`
    Each {
        /// Loop variable name.
        element: String,
        /// The list to iterate.
        collection: Identifier,
        /// Body.
        block: Block,
        /// The `each` keyword.
        span: Span,
    },
    /// `while cond ... end`
    While {
        /// Condition; the loop runs while it evaluates to 1.
        condition: Expression,
        /// Body.
        block: Block,
        /// The `while` keyword.
        span: Span,
    },
    /// `stop`
    Stop {
        /// The `stop` keyword.
        span: Span,
    },
}

impl Statement {
    /// Returns the source span of this statement's keyword.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Sends { span, .. }
            | Self::If { span, .. }
            | Self::Makes { span, .. }
            | Self::Creates { span, .. }
            | Self::Each { span, .. }
            | Self::While { span, .. }
            | Self::Stop { span } => *span,
        }
    }
}

/// The tuple a `sends` statement sends.
#[derive(Clone, Debug, PartialEq)]
pub enum SendPayload {
    /// `tuple name`: a tuple previously made with `creates tuple`.
    Named(String),
    /// `type key expr ...`: a tuple built on the spot.
    Literal {
        /// Tuple type.
        tuple_type: String,
        /// Payload fields; a repeated key keeps the last expression.
        fields: Vec<(String, Expression)>,
    },
}

/// The object a `creates` statement makes.
#[derive(Clone, Debug, PartialEq)]
pub enum CreateTarget {
    /// `creates tuple name type key expr ...`
    Tuple {
        /// Context name for the new tuple.
        name: String,
        /// Tuple type.
        tuple_type: String,
        /// Payload fields.
        fields: Vec<(String, Expression)>,
    },
    /// `creates value name [expr]`
    Value {
        /// Context name for the new value.
        name: String,
        /// Optional initial value.
        initialiser: Option<Expression>,
    },
}

/// A (possibly dotted) name or string literal.
#[derive(Clone, Debug, PartialEq)]
pub struct Identifier {
    /// The text, without quotes.
    pub name: String,
    /// True if written as a quoted string.
    pub quoted: bool,
    /// Source location.
    pub span: Span,
}

impl Identifier {
    /// Creates an unquoted identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            quoted: false,
            span,
        }
    }

    /// Returns true if the name has more than one dotted segment.
    #[must_use]
    pub fn is_path(&self) -> bool {
        self.name.contains('.')
    }
}

/// An expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// A name, path, or string literal.
    Identifier(Identifier),
    /// A numeric literal.
    Number(f64, Span),
    /// `lhs (+ - * / %) rhs`
    Arithmetic {
        /// Operator.
        op: ArithmeticOp,
        /// Left operand.
        lhs: Box<Expression>,
        /// Right operand.
        rhs: Box<Expression>,
        /// Span of the left operand's first token.
        span: Span,
    },
    /// `lhs (is | is not | more than | less than) rhs`
    Comparison {
        /// Operator.
        op: ComparisonOp,
        /// Left operand.
        lhs: Box<Expression>,
        /// Right operand.
        rhs: Box<Expression>,
        /// Span of the left operand's first token.
        span: Span,
    },
    /// `lhs (and | or) rhs`
    Logical {
        /// Operator.
        op: LogicalOp,
        /// Left operand.
        lhs: Box<Expression>,
        /// Right operand.
        rhs: Box<Expression>,
        /// Span of the left operand's first token.
        span: Span,
    },
    /// `name with arg expr ...`; `actor.function` addresses a native actor.
    Function {
        /// Function name, optionally `actor.function`.
        name: String,
        /// Named arguments in source order.
        args: Vec<(String, Expression)>,
        /// Span of the function name.
        span: Span,
    },
}

impl Expression {
    /// Returns the source span of this expression.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Identifier(identifier) => identifier.span,
            Self::Number(_, span)
            | Self::Arithmetic { span, .. }
            | Self::Comparison { span, .. }
            | Self::Logical { span, .. }
            | Self::Function { span, .. } => *span,
        }
    }
}

/// Arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithmeticOp {
    /// `+` (concatenates when either side is a word)
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%` on rounded operands
    Modulo,
}

impl ArithmeticOp {
    /// Returns the operator as written.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
        }
    }
}

/// Comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonOp {
    /// `is`
    Equal,
    /// `is not`
    NotEqual,
    /// `more than`
    MoreThan,
    /// `less than`
    LessThan,
}

impl ComparisonOp {
    /// Returns the operator as written.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "is",
            Self::NotEqual => "is not",
            Self::MoreThan => "more than",
            Self::LessThan => "less than",
        }
    }
}

/// Logical operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalOp {
    /// `and`
    And,
    /// `or`
    Or,
}

impl LogicalOp {
    /// Returns the operator as written.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}
