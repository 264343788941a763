use tracing::debug;

use crate::error::CalcError;
use crate::ops::BinaryOp;
use crate::scanner::{self, expect_open_paren, matched_parens, next_delimiter};

pub(crate) const LET: &str = "let";

pub(crate) const UNKNOWN_OPERATION: &str = "unknown operation provided, need add/sub/mult/div/let";
pub(crate) const TRAILING_INPUT: &str = "unexpected input after closing parenthesis";

/// A bare identifier: one or more ASCII letters.
pub(crate) fn is_identifier(expr: &str) -> bool {
    !expr.is_empty() && expr.bytes().all(|byte| byte.is_ascii_alphabetic())
}

/// A signed integer literal: optional leading `-`, then at least one
/// digit. A bare sign is not numeric and falls through to keyword
/// dispatch.
pub(crate) fn is_numeric(expr: &str) -> bool {
    let digits = expr.strip_prefix('-').unwrap_or(expr);
    !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
}

/// Checks a whole expression against the grammar without evaluating it.
///
/// Surrounding whitespace is trimmed before dispatch; a keyword must
/// still touch its `(`. Whether an identifier is actually bound is a
/// question for evaluation, not for syntax.
pub fn validate(expr: &str) -> Result<(), CalcError> {
    let expr = expr.trim();

    if is_identifier(expr) || is_numeric(expr) {
        // leaf forms carry no structure to check
    } else if let Some(op) = BinaryOp::from_prefix(expr) {
        validate_binary(expr, op)?;
    } else if expr.starts_with(LET) {
        validate_let(expr)?;
    } else {
        return Err(CalcError::MalformedSyntax(UNKNOWN_OPERATION));
    }

    // Consistency guard over the whole substring, independent of the
    // structural dispatch above.
    if !matched_parens(expr) {
        return Err(CalcError::MalformedSyntax(scanner::UNBALANCED));
    }
    Ok(())
}

/// `op(expr, expr)` with exactly two top-level operands, the closing
/// parenthesis being the final byte.
fn validate_binary(expr: &str, op: BinaryOp) -> Result<(), CalcError> {
    let keyword = op.keyword();
    expect_open_paren(expr, keyword.len())?;

    let comma = next_delimiter(expr, keyword.len() + 1, b',')?;
    validate(&expr[keyword.len() + 1..comma])?;

    let close = next_delimiter(expr, comma + 1, b')')?;
    if close != expr.len() - 1 {
        return Err(CalcError::MalformedSyntax(TRAILING_INPUT));
    }
    validate(&expr[comma + 1..close])
}

/// `let(name, value, body)`. The name slot is validated generically, so
/// any well-formed expression passes here; only identifiers are ever
/// looked up again.
fn validate_let(expr: &str) -> Result<(), CalcError> {
    expect_open_paren(expr, LET.len())?;

    let first = next_delimiter(expr, LET.len() + 1, b',')?;
    let name = &expr[LET.len() + 1..first];
    debug!(name, "checking let binding");
    validate(name)?;

    let second = next_delimiter(expr, first + 1, b',')?;
    validate(&expr[first + 1..second])?;

    let close = next_delimiter(expr, second + 1, b')')?;
    if close != expr.len() - 1 {
        return Err(CalcError::MalformedSyntax(TRAILING_INPUT));
    }
    validate(&expr[second + 1..close])
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use crate::test_utils::{load_test_cases, ExpectedError};

    use super::*;

    #[test]
    fn leaf_classification() {
        assert!(is_identifier("x"));
        assert!(is_identifier("spam"));
        assert!(!is_identifier("spam1"));
        assert!(!is_identifier(""));

        assert!(is_numeric("42"));
        assert!(is_numeric("-17"));
        assert!(is_numeric("007"));
        assert!(!is_numeric("-"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("1 2"));
    }

    #[test]
    fn accepts_well_formed_expressions() {
        for expr in [
            "x",
            "42",
            "-17",
            "add(1, 2)",
            "sub(sub(10, 4), 2)",
            "mult(add(1, 2), div(9, 3))",
            "let(x, 5, add(x, let(x, 2, x)))",
            "let(5, 1, 2)",
            "  add(1, 2)  ",
        ] {
            assert!(validate(expr).is_ok(), "rejected {:?}", expr);
        }
    }

    #[test]
    fn rejects_malformed_expressions() {
        for expr in [
            "",
            "-",
            "mod(1, 2)",
            "add(1, 2",
            "add(1, 2))",
            "add (1, 2)",
            "addx(1, 2)",
            "add(1)",
            "add(1, 2, 3)",
            "let(x, 1)",
            "12a",
            "add(1, 2)x",
        ] {
            assert!(
                matches!(validate(expr), Err(CalcError::MalformedSyntax(_))),
                "accepted {:?}",
                expr
            );
        }
    }

    #[test]
    fn validation_is_idempotent() {
        for expr in ["add(1, 2)", "add(1, 2"] {
            assert_eq!(validate(expr), validate(expr));
        }
    }

    // Syntax-only sweep over the shared test pairs: everything that is
    // expected to fail with MalformedSyntax must be rejected here, and
    // everything else must already be valid syntax.
    #[test]
    fn validate_testcases() -> anyhow::Result<()> {
        for (lineno, case) in load_test_cases()?.into_iter().enumerate() {
            let verdict = validate(&case.input);
            match case.expected {
                Err(ExpectedError::MalformedSyntax) if verdict.is_ok() => {
                    bail!("case {}: expected a syntax error for {:?}", lineno, case.input)
                }
                Err(ExpectedError::MalformedSyntax) => {}
                _ if verdict.is_err() => {
                    bail!("case {}: {:?} failed validation: {:?}", lineno, case.input, verdict)
                }
                _ => {}
            }
        }

        Ok(())
    }
}
