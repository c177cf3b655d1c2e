//! Request parameter normalization.
//!
//! # Responsibilities
//! - Decode the query string (first occurrence of a key wins)
//! - Collect path placeholders and fixed query keys for retrieval routes
//! - Read and decode the JSON object body of mutation routes
//! - Merge the caller key from the authorization gate
//!
//! # Design Decisions
//! - One `ParamMap` per request, never shared
//! - Unset optional keys are present as `ParamValue::Absent`
//! - The body is read once; it is dropped on every exit path

use std::collections::BTreeMap;

use axum::body::Body;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::routing::RouteMatch;

/// Well-known parameter keys.
pub mod keys {
    pub const HEIGHT: &str = "Height";
    pub const HASH: &str = "Hash";
    pub const CA_KEY: &str = "CAkey";
    pub const RAW: &str = "Raw";
    pub const ADDR: &str = "Addr";
    pub const ASSET_ID: &str = "Assetid";
    pub const USER_ID: &str = "Userid";
}

/// Single parameter value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ParamValue {
    #[default]
    Absent,
    Str(String),
    Number(f64),
    Bool(bool),
    /// Nested object or array from a JSON body.
    Json(Value),
}

impl ParamValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, ParamValue::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ParamValue::Absent,
            Value::Bool(b) => ParamValue::Bool(b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => ParamValue::Number(f),
                None => ParamValue::Json(Value::Number(n)),
            },
            Value::String(s) => ParamValue::Str(s),
            other => ParamValue::Json(other),
        }
    }
}

impl From<Option<&str>> for ParamValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(ParamValue::Absent, |s| ParamValue::Str(s.to_string()))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

/// Parameters handed to a handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamMap {
    values: BTreeMap<String, ParamValue>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the top-level keys of a JSON object.
    pub fn from_json_object(object: Map<String, Value>) -> Self {
        Self {
            values: object
                .into_iter()
                .map(|(k, v)| (k, ParamValue::from(v)))
                .collect(),
        }
    }

    /// Insert or overwrite `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style insert, handy for tests and adapters.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Raw value; `None` only when the key was never set.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// String value, treating absent and empty the same.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(ParamValue::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ParamValue::as_bool)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(ParamValue::as_f64)
    }

    /// Caller identity attached by the authorization gate.
    pub fn caller_key(&self) -> Option<&str> {
        self.str(keys::CA_KEY)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Decoded query string.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Decode `raw` (the part after `?`), if any.
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        Self { pairs }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First value for `key`, or the empty string.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }
}

/// Why a mutation body could not be turned into parameters.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("failed to read request body: {0}")]
    Read(String),

    #[error("request body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request body is not a JSON object")]
    NotObject,
}

/// Parameters for a retrieval (GET) action.
pub fn retrieval_params(route: &RouteMatch, query: &QueryParams, caller_key: &str) -> ParamMap {
    let mut params = ParamMap::new();
    params.insert(keys::HEIGHT, route.param("height"));
    params.insert(keys::HASH, route.param("hash"));
    params.insert(keys::CA_KEY, caller_key);
    params.insert(keys::RAW, query.get("raw"));
    params.insert(keys::ADDR, query.get("addr"));
    params.insert(keys::ASSET_ID, query.get("assetid"));
    params
}

/// Read `body` fully and build parameters for a mutation (POST) action.
pub async fn mutation_params(
    body: Body,
    limit: usize,
    query: &QueryParams,
    caller_key: &str,
) -> Result<ParamMap, BodyError> {
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| BodyError::Read(e.to_string()))?;

    let object = match serde_json::from_slice::<Value>(&bytes)? {
        Value::Object(object) => object,
        _ => return Err(BodyError::NotObject),
    };

    let mut params = ParamMap::from_json_object(object);
    params.insert(keys::CA_KEY, caller_key);
    params.insert(keys::RAW, query.value("raw"));
    params.insert(keys::USER_ID, query.value("userid"));
    Ok(params)
}
