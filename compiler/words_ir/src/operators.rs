//! Binary operators.
//!
//! Arithmetic operators coerce their operands to numbers, relational
//! operators compare two numbers or two strings, and logical operators
//! combine predicate results.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Exponentiate,

    // Equality and relational
    Equals,
    Less,
    LessEq,
    Greater,
    GreaterEq,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    /// Returns the source-level symbol for this operator.
    ///
    /// Used in error messages to show the exact operator that failed.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Exponentiate => "^",
            Self::Equals => "=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
            Self::And => "and",
            Self::Or => "or",
        }
    }

    /// Whether the operator is `+ - * / ^`.
    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide | Self::Exponentiate
        )
    }

    /// Whether the operator is one of `< <= > >=`.
    pub const fn is_relational(self) -> bool {
        matches!(
            self,
            Self::Less | Self::LessEq | Self::Greater | Self::GreaterEq
        )
    }

    /// Whether the operator is `and` or `or`.
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_categories_are_disjoint() {
        let all = [
            BinaryOp::Add,
            BinaryOp::Subtract,
            BinaryOp::Multiply,
            BinaryOp::Divide,
            BinaryOp::Exponentiate,
            BinaryOp::Equals,
            BinaryOp::Less,
            BinaryOp::LessEq,
            BinaryOp::Greater,
            BinaryOp::GreaterEq,
            BinaryOp::And,
            BinaryOp::Or,
        ];
        for op in all {
            let categories = [op.is_arithmetic(), op.is_relational(), op.is_logical()];
            let count = categories.iter().filter(|c| **c).count();
            if op == BinaryOp::Equals {
                assert_eq!(count, 0, "{op:?} is its own category");
            } else {
                assert_eq!(count, 1, "{op:?} belongs to exactly one category");
            }
        }
    }

    #[test]
    fn symbols_match_source_syntax() {
        assert_eq!(BinaryOp::Exponentiate.as_symbol(), "^");
        assert_eq!(BinaryOp::LessEq.as_symbol(), "<=");
        assert_eq!(BinaryOp::Or.as_symbol(), "or");
    }
}
