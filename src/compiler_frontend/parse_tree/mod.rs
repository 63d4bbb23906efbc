//! Expression parse tree
//!
//! The shape the parser hands to the code generator. Each precedence layer keeps its
//! immediate children in source order along with the operator tokens that sat between them:
//!
//! logical-or -> logical-and -> equality -> relational -> additive
//! -> multiplicative -> power -> unary -> postfix -> primary
//!
//! Required children are `Option`s because the parser can recover from syntax errors
//! and still produce a node. The code generator reports a missing child as a structural error.

pub mod operators;


use crate::compiler_frontend::tokenizer::literals::NumericLiteralKind;
use crate::compiler_frontend::tokenizer::tokens::TextLocation;
pub use operators::{BinaryOperator, OperatorToken};

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub logical_or: Option<LogicalOrExpression>,
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalOrExpression {
    pub operands: Vec<LogicalAndExpression>,
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalAndExpression {
    pub operands: Vec<EqualityExpression>,
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EqualityExpression {
    pub operands: Vec<RelationalExpression>,
    pub operators: Vec<OperatorToken>,
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationalExpression {
    pub operands: Vec<AdditiveExpression>,
    pub operators: Vec<OperatorToken>,
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdditiveExpression {
    pub operands: Vec<MultiplicativeExpression>,
    pub operators: Vec<OperatorToken>,
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiplicativeExpression {
    pub operands: Vec<PowerExpression>,
    pub operators: Vec<OperatorToken>,
    pub location: TextLocation,
}

/// `base ^ exponent`, right associative so the exponent is itself a power expression
#[derive(Debug, Clone, PartialEq)]
pub struct PowerExpression {
    pub base: Option<UnaryExpression>,
    pub exponent: Option<Box<PowerExpression>>,
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnaryExpression {
    Negate {
        operand: Option<Box<UnaryExpression>>,
        location: TextLocation,
    },
    Not {
        operand: Option<Box<UnaryExpression>>,
        location: TextLocation,
    },
    // `<-channel`
    BlockingRead {
        channel: String,
        location: TextLocation,
    },
    Postfix(PostfixExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostfixExpression {
    pub primary: Option<PrimaryExpression>,
    pub suffixes: Vec<PostfixSuffix>,
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostfixSuffix {
    Index {
        index: Box<Expression>,
        location: TextLocation,
    },
    Slice {
        start: Option<Box<Expression>>,
        end: Option<Box<Expression>>,
        location: TextLocation,
    },
    Call {
        arguments: Vec<Expression>,
        location: TextLocation,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryExpression {
    Literal(Literal),
    Identifier {
        name: String,
        location: TextLocation,
    },
    Parenthesized {
        inner: Option<Box<Expression>>,
        location: TextLocation,
    },
    // `i32(x)`, the target is the type keyword as written
    TypeCast {
        target_type: String,
        expression: Option<Box<Expression>>,
        location: TextLocation,
    },
    Builtin(BuiltinCall),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BuiltinCall {
    Now {
        location: TextLocation,
    },
    Len {
        argument: Option<Box<Expression>>,
        location: TextLocation,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Numeric {
        kind: NumericLiteralKind,
        text: String,
        location: TextLocation,
    },
    Temporal {
        text: String,
        location: TextLocation,
    },
    String {
        text: String,
        location: TextLocation,
    },
    Series {
        elements: Vec<Expression>,
        location: TextLocation,
    },
}

impl UnaryExpression {
    pub fn location(&self) -> TextLocation {
        match self {
            UnaryExpression::Negate { location, .. }
            | UnaryExpression::Not { location, .. }
            | UnaryExpression::BlockingRead { location, .. } => *location,
            UnaryExpression::Postfix(postfix) => postfix.location,
        }
    }
}

impl PostfixSuffix {
    pub fn location(&self) -> TextLocation {
        match self {
            PostfixSuffix::Index { location, .. }
            | PostfixSuffix::Slice { location, .. }
            | PostfixSuffix::Call { location, .. } => *location,
        }
    }
}

impl PrimaryExpression {
    pub fn location(&self) -> TextLocation {
        match self {
            PrimaryExpression::Literal(literal) => literal.location(),
            PrimaryExpression::Identifier { location, .. }
            | PrimaryExpression::Parenthesized { location, .. }
            | PrimaryExpression::TypeCast { location, .. } => *location,
            PrimaryExpression::Builtin(builtin) => builtin.location(),
        }
    }
}

impl BuiltinCall {
    pub fn location(&self) -> TextLocation {
        match self {
            BuiltinCall::Now { location } | BuiltinCall::Len { location, .. } => *location,
        }
    }
}

impl Literal {
    pub fn location(&self) -> TextLocation {
        match self {
            Literal::Numeric { location, .. }
            | Literal::Temporal { location, .. }
            | Literal::String { location, .. }
            | Literal::Series { location, .. } => *location,
        }
    }
}

// ----------------------------
//        LAYER LIFTING
// ----------------------------
// A node from any layer can stand in for a single-operand node of the layer above it,
// which is exactly what the parser produces when a layer has no operator.

impl From<Literal> for PrimaryExpression {
    fn from(literal: Literal) -> Self {
        PrimaryExpression::Literal(literal)
    }
}

/// A full expression nested at the primary layer is a parenthesized expression
impl From<Expression> for PrimaryExpression {
    fn from(expression: Expression) -> Self {
        let location = expression.location;
        PrimaryExpression::Parenthesized {
            inner: Some(Box::new(expression)),
            location,
        }
    }
}

impl From<PrimaryExpression> for PostfixExpression {
    fn from(primary: PrimaryExpression) -> Self {
        let location = primary.location();
        PostfixExpression {
            primary: Some(primary),
            suffixes: Vec::new(),
            location,
        }
    }
}

impl From<PostfixExpression> for UnaryExpression {
    fn from(postfix: PostfixExpression) -> Self {
        UnaryExpression::Postfix(postfix)
    }
}

impl From<UnaryExpression> for PowerExpression {
    fn from(unary: UnaryExpression) -> Self {
        let location = unary.location();
        PowerExpression {
            base: Some(unary),
            exponent: None,
            location,
        }
    }
}

macro_rules! lift_into_operator_layer {
    ($from:ty => $to:ident) => {
        impl From<$from> for $to {
            fn from(node: $from) -> Self {
                let location = node.location;
                $to {
                    operands: vec![node],
                    operators: Vec::new(),
                    location,
                }
            }
        }
    };
}

lift_into_operator_layer!(PowerExpression => MultiplicativeExpression);
lift_into_operator_layer!(MultiplicativeExpression => AdditiveExpression);
lift_into_operator_layer!(AdditiveExpression => RelationalExpression);
lift_into_operator_layer!(RelationalExpression => EqualityExpression);

impl From<EqualityExpression> for LogicalAndExpression {
    fn from(equality: EqualityExpression) -> Self {
        let location = equality.location;
        LogicalAndExpression {
            operands: vec![equality],
            location,
        }
    }
}

impl From<LogicalAndExpression> for LogicalOrExpression {
    fn from(and: LogicalAndExpression) -> Self {
        let location = and.location;
        LogicalOrExpression {
            operands: vec![and],
            location,
        }
    }
}

impl From<LogicalOrExpression> for Expression {
    fn from(or: LogicalOrExpression) -> Self {
        let location = or.location;
        Expression {
            logical_or: Some(or),
            location,
        }
    }
}

macro_rules! lift_into_expression {
    ($from:ty => $via:ty) => {
        impl From<$from> for Expression {
            fn from(node: $from) -> Self {
                Expression::from(<$via>::from(node))
            }
        }
    };
}

lift_into_expression!(LogicalAndExpression => LogicalOrExpression);
lift_into_expression!(EqualityExpression => LogicalAndExpression);
lift_into_expression!(RelationalExpression => EqualityExpression);
lift_into_expression!(AdditiveExpression => RelationalExpression);
lift_into_expression!(MultiplicativeExpression => AdditiveExpression);
lift_into_expression!(PowerExpression => MultiplicativeExpression);
lift_into_expression!(UnaryExpression => PowerExpression);
lift_into_expression!(PostfixExpression => UnaryExpression);
lift_into_expression!(PrimaryExpression => PostfixExpression);
lift_into_expression!(Literal => PrimaryExpression);
