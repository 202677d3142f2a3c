use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use clap::ValueEnum;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SYSTEM_PREAMBLE: &str = "You are a programmatic country information API used by software applications.
All input messages provided MUST adhere to the CountryRequest schema: validate them and throw an error if not.
Your responses MUST adhere to the CountryResponse schema ONLY with no additional narrative or markup, backquotes or anything.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Int32,
    Int64,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub kind: FieldType,
}

const fn field(name: &'static str, kind: FieldType) -> SchemaField {
    SchemaField { name, kind }
}

pub const COUNTRY_REQUEST_FIELDS: &[SchemaField] = &[field("country", FieldType::String)];

// Declaration order; must stay in step with `CountryResponse`.
pub const COUNTRY_RESPONSE_FIELDS: &[SchemaField] = &[
    field("country", FieldType::String),
    field("country_population", FieldType::Int32),
    field("capital", FieldType::String),
    field("capital_population", FieldType::Int32),
    field("gdp_usd", FieldType::Int64),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountryRequest {
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountryResponse {
    pub country: String,
    #[serde(alias = "countryPopulation", deserialize_with = "integer")]
    pub country_population: i32,
    pub capital: String,
    #[serde(alias = "capitalPopulation", deserialize_with = "integer")]
    pub capital_population: i32,
    #[serde(alias = "gdpUsd", deserialize_with = "integer")]
    pub gdp_usd: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReplyPolicy {
    /// The reply must be exactly the JSON value.
    #[default]
    Strict,
    /// Remove one surrounding Markdown code fence before the strict parse.
    StripFences,
}

impl ReplyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::StripFences => "strip-fences",
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("model reply is empty")]
    Empty,
    #[error("model reply does not match the CountryResponse schema: {0}")]
    Schema(#[from] serde_json::Error),
}

pub fn encode_request(country: &str) -> serde_json::Result<String> {
    serde_json::to_string(&CountryRequest {
        country: country.to_string(),
    })
}

pub fn decode_response(text: &str, policy: ReplyPolicy) -> Result<CountryResponse, DecodeError> {
    let payload = match policy {
        ReplyPolicy::Strict => text,
        ReplyPolicy::StripFences => strip_code_fence(text),
    };
    if payload.trim().is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(serde_json::from_str(payload)?)
}

pub fn system_prompt() -> String {
    let mut prompt = String::from(SYSTEM_PREAMBLE);
    prompt.push_str("\n\n");
    render_message(&mut prompt, "CountryRequest", COUNTRY_REQUEST_FIELDS);
    prompt.push('\n');
    render_message(&mut prompt, "CountryResponse", COUNTRY_RESPONSE_FIELDS);
    prompt
}

fn render_message(out: &mut String, name: &str, fields: &[SchemaField]) {
    out.push_str(&format!("message {name} {{\n"));
    for (idx, field) in fields.iter().enumerate() {
        out.push_str(&format!(
            "  {} {} = {};\n",
            field.kind.as_str(),
            field.name,
            idx + 1
        ));
    }
    out.push_str("}\n");
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };

    // Opening line may carry a language tag such as `json`.
    match body.split_once('\n') {
        Some((tag, inner)) if !tag.contains(['{', '[']) => inner.trim(),
        _ => body.trim(),
    }
}

// Protobuf JSON carries integers as numbers or strings, and accepts integral
// floats and exponent forms for either.
fn integer<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + TryFrom<u64> + FromStr,
{
    deserializer.deserialize_any(IntegerVisitor(PhantomData))
}

struct IntegerVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for IntegerVisitor<T>
where
    T: TryFrom<i64> + TryFrom<u64> + FromStr,
{
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an {} integer or decimal string", type_name::<T>())
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<T, E> {
        <T as TryFrom<i64>>::try_from(value)
            .map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<T, E> {
        <T as TryFrom<u64>>::try_from(value)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<T, E> {
        integral_float::<T>(value)
            .ok_or_else(|| E::invalid_value(Unexpected::Float(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<T, E> {
        if let Ok(parsed) = value.parse::<T>() {
            return Ok(parsed);
        }
        value
            .parse::<f64>()
            .ok()
            .and_then(integral_float::<T>)
            .ok_or_else(|| E::invalid_value(Unexpected::Str(value), &self))
    }
}

fn integral_float<T: TryFrom<i64>>(value: f64) -> Option<T> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if !value.is_finite()
        || value.fract() != 0.0
        || value < i64::MIN as f64
        || value >= i64::MAX as f64
    {
        return None;
    }
    T::try_from(value as i64).ok()
}
