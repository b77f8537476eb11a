use serde_json::{Map, Value as Json, json};

/// A vendor request object: one operation on one service, built up field by field.
///
/// Scalar settings use [`Request::set`], list-valued ones [`Request::append`].
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    service: String,
    operation: String,
    body: Map<String, Json>,
}

impl Request {
    pub fn new(service: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            operation: operation.into(),
            body: Map::new(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Sets a scalar element, replacing any previous value.
    pub fn set(&mut self, name: &str, value: impl Into<Json>) -> &mut Self {
        self.body.insert(name.to_string(), value.into());
        self
    }

    /// Appends to a list element, creating it on first use.
    pub fn append(&mut self, name: &str, value: impl Into<Json>) -> &mut Self {
        let slot = self
            .body
            .entry(name.to_string())
            .or_insert_with(|| Json::Array(Vec::new()));
        match slot {
            Json::Array(items) => items.push(value.into()),
            other => *other = Json::Array(vec![other.take(), value.into()]),
        }
        self
    }

    /// Appends one `{fieldId, value}` entry to the request's `overrides`.
    pub fn append_override(&mut self, field_id: &str, value: &str) -> &mut Self {
        self.append("overrides", json!({ "fieldId": field_id, "value": value }))
    }

    /// Appends one entry to the request's `eventTypes`.
    pub fn append_event_type(&mut self, event_type: &str) -> &mut Self {
        self.append("eventTypes", event_type)
    }

    pub fn get(&self, name: &str) -> Option<&Json> {
        self.body.get(name)
    }

    /// The request body as sent on the wire.
    pub fn to_json(&self) -> Json {
        Json::Object(self.body.clone())
    }
}
