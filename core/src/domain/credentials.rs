//! Credential lookup over request body and query surfaces

use serde_json::{Map, Value};

use crate::services::strategy::CredentialSource;

/// Owned request carrying a body and a query mapping.
///
/// Hosts that already hold parsed JSON can use this directly; hosts with
/// their own request type implement [`CredentialSource`] instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CredentialRequest {
    body: Option<Value>,
    query: Option<Value>,
}

impl CredentialRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(body: Option<Value>, query: Option<Value>) -> Self {
        Self { body, query }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    /// Set a single body field, turning the body into an object if needed
    pub fn with_body_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        insert_field(&mut self.body, key.into(), value.into());
        self
    }

    /// Set a single query field, turning the query into an object if needed
    pub fn with_query_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        insert_field(&mut self.query, key.into(), value.into());
        self
    }
}

impl CredentialSource for CredentialRequest {
    fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    fn query(&self) -> Option<&Value> {
        self.query.as_ref()
    }
}

fn insert_field(surface: &mut Option<Value>, key: String, value: Value) {
    let slot = surface.get_or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(map) = slot {
        map.insert(key, value);
    }
}

/// Look up `field` in a key-value surface.
///
/// An exact key match is tried first. Otherwise the name is read as a
/// bracket path, so `user[phone]` resolves `{"user": {"phone": ...}}`.
/// Only non-empty strings and numbers count as present; a numeric `0`
/// reads as `"0"`, the same as a form-encoded zero.
pub fn lookup(fields: &Value, field: &str) -> Option<String> {
    if let Some(found) = fields.get(field) {
        return scalar_text(found);
    }

    let path = field.replace(']', "");
    let mut keys = path.split('[').peekable();
    let mut current = fields;
    while let Some(key) = keys.next() {
        current = current.get(key)?;
        if keys.peek().is_none() {
            return scalar_text(current);
        }
        if !current.is_object() {
            return None;
        }
    }
    None
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
