use std::{error::Error, fmt};



#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    /// Structural violation: unbalanced or misplaced parentheses, a missing
    /// delimiter, an unknown keyword, or a wrong operand count. Carries a
    /// fixed message describing the violation.
    MalformedSyntax(&'static str),
    /// An identifier was referenced with no active `let` binding.
    UnboundVariable(String),
    DivisionByZero,
    /// An integer literal or an intermediate result fell outside `i64`.
    Overflow,
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedSyntax(detail) => write!(f, "malformed expression: {}", detail),
            Self::UnboundVariable(name) => {
                write!(f, "the variable '{}' is not bound by any let", name)
            }
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::Overflow => write!(f, "arithmetic overflow"),
        }
    }
}

impl Error for CalcError {}
