#![no_main]

use core::fmt;

use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};

// Structured expressions rendered back to source text, so the generated
// inputs reach deep into evaluation instead of dying at the grammar.
#[derive(Arbitrary, Debug)]
enum CalcExpr {
    Number(i64),
    Identifier(String),
    Add(Box<CalcExpr>, Box<CalcExpr>),
    Sub(Box<CalcExpr>, Box<CalcExpr>),
    Mult(Box<CalcExpr>, Box<CalcExpr>),
    Div(Box<CalcExpr>, Box<CalcExpr>),
    Let(String, Box<CalcExpr>, Box<CalcExpr>),
}

impl fmt::Display for CalcExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalcExpr::Number(value) => write!(f, "{}", value),
            CalcExpr::Identifier(name) => write!(f, "{}", name),
            CalcExpr::Add(lhs, rhs) => write!(f, "add({}, {})", lhs, rhs),
            CalcExpr::Sub(lhs, rhs) => write!(f, "sub({}, {})", lhs, rhs),
            CalcExpr::Mult(lhs, rhs) => write!(f, "mult({}, {})", lhs, rhs),
            CalcExpr::Div(lhs, rhs) => write!(f, "div({}, {})", lhs, rhs),
            CalcExpr::Let(name, value, body) => write!(f, "let({}, {}, {})", name, value, body),
        }
    }
}

fuzz_target!(|exprs: Vec<CalcExpr>| {
    let mut context = calclet::EvaluationContext::new();

    for expr in exprs {
        let source = expr.to_string();
        let _ = context.evaluate_str(&source);
    }
});
