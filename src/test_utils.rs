use std::path::PathBuf;

use anyhow::bail;
use itertools::Itertools;
use serde::de::{Error, Visitor};
use serde::Deserialize;

use crate::error::CalcError;

/// Error kinds as named in the expectation file, without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedError {
    MalformedSyntax,
    UnboundVariable,
    DivisionByZero,
    Overflow,
}

pub fn expected_kind(error: &CalcError) -> ExpectedError {
    match error {
        CalcError::MalformedSyntax(_) => ExpectedError::MalformedSyntax,
        CalcError::UnboundVariable(_) => ExpectedError::UnboundVariable,
        CalcError::DivisionByZero => ExpectedError::DivisionByZero,
        CalcError::Overflow => ExpectedError::Overflow,
    }
}

pub struct TestCase {
    pub input: String,
    pub expected: Result<i64, ExpectedError>,
}

pub struct Expectation(Result<i64, ExpectedError>);

struct ExpectationVisitor {}

impl<'de> Deserialize<'de> for Expectation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(ExpectationVisitor {})
    }
}

impl<'de> Visitor<'de> for ExpectationVisitor {
    type Value = Expectation;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "A structure containing the boolean key 'ok'. If it's okay, contains the key 'output', otherwise the key 'error'")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        if map.next_key::<String>()? != Some("ok".to_owned()) {
            return Err(A::Error::custom("First key should be 'ok'"));
        }

        let ok: bool = map.next_value()?;
        let result = if ok {
            if map
                .next_key::<String>()?
                .ok_or(A::Error::custom("Must have two keys"))?
                != "output"
            {
                return Err(A::Error::custom("Second ok key should be 'output'"));
            }

            let value: i64 = map.next_value()?;
            Expectation(Ok(value))
        } else {
            if map
                .next_key::<String>()?
                .ok_or(A::Error::custom("Must have two keys"))?
                != "error"
            {
                return Err(A::Error::custom("Second error key should be 'error'"));
            }

            let error = match map.next_value::<String>()?.as_ref() {
                "MalformedSyntax" => ExpectedError::MalformedSyntax,
                "UnboundVariable" => ExpectedError::UnboundVariable,
                "DivisionByZero" => ExpectedError::DivisionByZero,
                "Overflow" => ExpectedError::Overflow,
                other => return Err(A::Error::custom(format!("Unrecognized error kind: {}", other))),
            };
            Expectation(Err(error))
        };

        if map.next_key::<String>()?.is_some() {
            return Err(A::Error::custom("Only two keys should be present"));
        }

        Ok(result)
    }
}

fn load_input_file(path: PathBuf) -> anyhow::Result<Vec<String>> {
    let source = std::fs::read_to_string(path)?;
    Ok(source.lines().map(str::to_owned).collect_vec())
}

fn load_expectation_file(path: PathBuf) -> anyhow::Result<Vec<Expectation>> {
    let source = std::fs::read(path)?;
    let result: Vec<Expectation> = serde_json::from_slice(&source)?;
    Ok(result)
}

/// Loads the shared expression/expectation pair from `testdata/`. The
/// two files correspond line by line.
pub fn load_test_cases() -> anyhow::Result<Vec<TestCase>> {
    let base_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata");
    let inputs = load_input_file(base_path.join("cases.txt"))?;
    let expectations = load_expectation_file(base_path.join("cases.json"))?;

    if inputs.len() != expectations.len() {
        bail!("Input and expectation files do not match");
    }

    Ok(inputs
        .into_iter()
        .zip(expectations.into_iter())
        .map(|(input, expectation)| TestCase {
            input,
            expected: expectation.0,
        })
        .collect_vec())
}
