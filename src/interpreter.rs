use std::collections::HashMap;

use tracing::debug;

use crate::error::CalcError;
use crate::ops::BinaryOp;
use crate::scanner::{expect_open_paren, next_delimiter};
use crate::validator::{is_identifier, is_numeric, LET, TRAILING_INPUT, UNKNOWN_OPERATION};

/// The set of active `let` bindings, owned by the caller and threaded
/// through evaluation by mutable reference.
///
/// Each name maps to a stack of values whose top is the innermost
/// visible binding. An entry is removed once its stack empties, so
/// sibling `let`s of the same name never observe each other.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: HashMap<String, Vec<i64>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// The innermost binding of `name`.
    pub fn lookup(&self, name: &str) -> Result<i64, CalcError> {
        self.bindings
            .get(name)
            .and_then(|stack| stack.last().copied())
            .ok_or_else(|| CalcError::UnboundVariable(name.to_owned()))
    }

    fn push(&mut self, name: &str, value: i64) {
        self.bindings.entry(name.to_owned()).or_default().push(value);
    }

    fn pop(&mut self, name: &str) {
        if let Some(stack) = self.bindings.get_mut(name) {
            stack.pop();
            if stack.is_empty() {
                self.bindings.remove(name);
            }
        }
    }

    /// True when no binding is active. A finished top-level evaluation
    /// always leaves the environment in this state, even after an error.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Evaluates an expression against `env`.
///
/// Dispatch mirrors [`validate`](crate::validate): identifier, number,
/// binary operation, `let`. Operands evaluate left to right; the order
/// is observable because `let` pushes and pops bindings around its body.
pub fn evaluate(expr: &str, env: &mut Environment) -> Result<i64, CalcError> {
    let expr = expr.trim();

    if is_identifier(expr) {
        env.lookup(expr)
    } else if is_numeric(expr) {
        expr.parse().map_err(|_| CalcError::Overflow)
    } else if let Some(op) = BinaryOp::from_prefix(expr) {
        let (lhs, rhs) = split_binary(expr, op)?;
        debug!(?op, lhs, rhs, "evaluating binary operation");
        let left = evaluate(lhs, env)?;
        let right = evaluate(rhs, env)?;
        op.apply(left, right)
    } else if expr.starts_with(LET) {
        evaluate_let(expr, env)
    } else {
        Err(CalcError::MalformedSyntax(UNKNOWN_OPERATION))
    }
}

fn evaluate_let(expr: &str, env: &mut Environment) -> Result<i64, CalcError> {
    let (name, value_expr, body_expr) = split_let(expr)?;
    let name = name.trim();
    debug!(name, value_expr, body_expr, "evaluating let");

    // The new binding is not visible while its own value evaluates.
    let value = evaluate(value_expr, env)?;

    env.push(name, value);
    let result = evaluate(body_expr, env);
    // Release the binding on the failure path too, so a reused
    // environment never carries a stale binding into the next input.
    env.pop(name);
    result
}

/// Slices `op(expr1, expr2)` into its two operands.
fn split_binary(expr: &str, op: BinaryOp) -> Result<(&str, &str), CalcError> {
    let keyword = op.keyword();
    expect_open_paren(expr, keyword.len())?;

    let comma = next_delimiter(expr, keyword.len() + 1, b',')?;
    let close = next_delimiter(expr, comma + 1, b')')?;
    if close != expr.len() - 1 {
        return Err(CalcError::MalformedSyntax(TRAILING_INPUT));
    }

    Ok((&expr[keyword.len() + 1..comma], &expr[comma + 1..close]))
}

/// Slices `let(name, expr1, expr2)` into name, value and body.
fn split_let(expr: &str) -> Result<(&str, &str, &str), CalcError> {
    expect_open_paren(expr, LET.len())?;

    let first = next_delimiter(expr, LET.len() + 1, b',')?;
    let second = next_delimiter(expr, first + 1, b',')?;
    let close = next_delimiter(expr, second + 1, b')')?;
    if close != expr.len() - 1 {
        return Err(CalcError::MalformedSyntax(TRAILING_INPUT));
    }

    Ok((
        &expr[LET.len() + 1..first],
        &expr[first + 1..second],
        &expr[second + 1..close],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str) -> Result<i64, CalcError> {
        evaluate(expr, &mut Environment::new())
    }

    #[test]
    fn literal_arithmetic() {
        assert_eq!(eval("add(1, 2)"), Ok(3));
        assert_eq!(eval("sub(5, 3)"), Ok(2));
        assert_eq!(eval("mult(4, 3)"), Ok(12));
        assert_eq!(eval("div(7, 2)"), Ok(3));
        assert_eq!(eval("-17"), Ok(-17));
    }

    #[test]
    fn inner_binding_shadows_outer() {
        assert_eq!(eval("let(x, 5, let(x, 2, x))"), Ok(2));
        assert_eq!(eval("let(x, 5, add(x, let(x, 2, x)))"), Ok(7));
    }

    #[test]
    fn outer_binding_restored_after_inner_pops() {
        assert_eq!(eval("add(let(x, 1, x), let(x, 2, x))"), Ok(3));
        assert_eq!(
            eval("let(x, 5, add(let(x, 2, x), x))"),
            Ok(7),
        );
    }

    #[test]
    fn binding_value_uses_enclosing_scope() {
        // The binding being introduced is not visible in its own value.
        assert_eq!(eval("let(x, 5, let(x, add(x, 1), x))"), Ok(6));
        assert_eq!(eval("let(x, x, x)"), Err(CalcError::UnboundVariable("x".to_owned())));
    }

    #[test]
    fn binding_gone_outside_its_let() {
        assert_eq!(
            eval("add(let(x, 1, x), x)"),
            Err(CalcError::UnboundVariable("x".to_owned()))
        );
    }

    #[test]
    fn operands_evaluate_left_to_right() {
        assert_eq!(
            eval("add(x, let(x, 1, x))"),
            Err(CalcError::UnboundVariable("x".to_owned()))
        );
    }

    #[test]
    fn binding_released_when_body_fails() {
        let mut env = Environment::new();
        assert_eq!(
            evaluate("let(x, 1, div(x, 0))", &mut env),
            Err(CalcError::DivisionByZero)
        );
        assert!(env.is_empty());
        // The environment is still usable after the failure.
        assert_eq!(evaluate("add(1, 2)", &mut env), Ok(3));
    }

    #[test]
    fn non_identifier_name_slot_is_inert() {
        assert_eq!(eval("let(5, 1, 2)"), Ok(2));
    }

    #[test]
    fn keywords_can_be_shadowed_as_names() {
        // "add" alone is an identifier, so it can be bound like any other.
        assert_eq!(eval("let(add, 4, add)"), Ok(4));
    }

    #[test]
    fn huge_literal_overflows() {
        assert_eq!(eval("9223372036854775808"), Err(CalcError::Overflow));
        assert_eq!(eval("9223372036854775807"), Ok(i64::MAX));
    }

    #[test]
    fn environment_stacks_pop_cleanly() {
        let mut env = Environment::new();
        env.push("x", 1);
        env.push("x", 2);
        assert_eq!(env.lookup("x"), Ok(2));
        env.pop("x");
        assert_eq!(env.lookup("x"), Ok(1));
        env.pop("x");
        assert!(env.is_empty());
        assert_eq!(env.lookup("x"), Err(CalcError::UnboundVariable("x".to_owned())));
    }
}
