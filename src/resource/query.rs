//! Query-string construction
//!
//! Queries are ordered `key -> value` pairs where a value is either a single
//! string or a list of strings. Lists render comma-joined:
//! `{"fields": ["name", "type"], "omit": "objects"}` becomes
//! `?fields=name,type&omit=objects`.

use crate::error::{Error, Result};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<&[&str]> for QueryValue {
    fn from(values: &[&str]) -> Self {
        Self::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for QueryValue {
    fn from(values: [&str; N]) -> Self {
        Self::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

/// Ordered set of query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, QueryValue)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, keeping insertion order
    pub fn with(mut self, key: &str, value: impl Into<QueryValue>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    /// Build a query from a JSON object whose values are strings or arrays
    /// of strings. Anything else is an `InvalidQuery` error.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Some(map) = value.as_object() else {
            return Err(Error::InvalidQuery(
                "query must be an object of string or list values".to_string(),
            ));
        };

        let mut query = Self::new();
        for (key, value) in map {
            let value = match value {
                Value::String(s) => QueryValue::One(s.clone()),
                Value::Array(items) => {
                    let values = items
                        .iter()
                        .map(|item| {
                            item.as_str().map(String::from).ok_or_else(|| {
                                Error::InvalidQuery(format!(
                                    "query list values must be strings but key {} holds {}",
                                    key,
                                    json_type_name(item)
                                ))
                            })
                        })
                        .collect::<Result<Vec<_>>>()?;
                    QueryValue::Many(values)
                },
                other => {
                    return Err(Error::InvalidQuery(format!(
                        "query dict values must be list or string but key {} is of type {}",
                        key,
                        json_type_name(other)
                    )))
                },
            };
            query.params.push((key.clone(), value));
        }
        Ok(query)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Render as `?k=v&k2=a,b`, or an empty string when there are no parameters
    pub fn to_query_string(&self) -> String {
        if self.params.is_empty() {
            return String::new();
        }

        let rendered: Vec<String> = self
            .params
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    QueryValue::One(v) => urlencoding::encode(v).into_owned(),
                    QueryValue::Many(vs) => vs
                        .iter()
                        .map(|v| urlencoding::encode(v).into_owned())
                        .collect::<Vec<_>>()
                        .join(","),
                };
                format!("{}={}", urlencoding::encode(key), value)
            })
            .collect();

        format!("?{}", rendered.join("&"))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
