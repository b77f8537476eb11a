//! The vendor's self-describing element tree.
//!
//! Every node carries its name and declared [`DataType`]. Composite nodes are either
//! sequences (named children), choices (exactly one chosen child) or arrays (ordered
//! items sharing the array's datatype). Leaves keep their raw wire value and are only
//! interpreted when [`Element::get_value`] is called.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::value::Value;

/// An element or message name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Declared datatype of an element, as published in the service schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Bool,
    Char,
    Byte,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    #[serde(rename = "BYTEARRAY")]
    ByteArray,
    Date,
    Time,
    Decimal,
    Datetime,
    Enumeration,
    Sequence,
    Choice,
    CorrelationId,
}

impl DataType {
    pub const fn is_complex(self) -> bool {
        matches!(self, DataType::Sequence | DataType::Choice)
    }
}

/// Reasons a leaf value could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementError {
    /// The element is null.
    #[error("element {0} is null")]
    Null(Name),
    /// `get_value` was called on a sequence, choice or array.
    #[error("element {0} is not a scalar")]
    NotAScalar(Name),
    /// The raw wire value does not fit the declared datatype.
    #[error("element {name}: cannot read {raw} as {datatype:?}")]
    TypeMismatch {
        name: Name,
        datatype: DataType,
        raw: String,
    },
    /// No child with the requested name exists.
    #[error("element {parent} has no child {child}")]
    NotFound { parent: Name, child: Name },
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Null,
    Scalar(serde_json::Value),
    Array(Vec<Element>),
    Sequence(Vec<Element>),
    Choice(Box<Element>),
}

/// One node of a self-describing message.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: Name,
    datatype: DataType,
    node: Node,
}

impl Element {
    /// A leaf holding a raw wire value, interpreted lazily according to `datatype`.
    pub fn scalar(
        name: impl Into<Name>,
        datatype: DataType,
        raw: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            name: name.into(),
            datatype,
            node: Node::Scalar(raw.into()),
        }
    }

    pub fn null(name: impl Into<Name>, datatype: DataType) -> Self {
        Self {
            name: name.into(),
            datatype,
            node: Node::Null,
        }
    }

    pub fn sequence(name: impl Into<Name>, children: Vec<Element>) -> Self {
        Self {
            name: name.into(),
            datatype: DataType::Sequence,
            node: Node::Sequence(children),
        }
    }

    /// An array whose items share `datatype`.
    pub fn array(name: impl Into<Name>, datatype: DataType, items: Vec<Element>) -> Self {
        Self {
            name: name.into(),
            datatype,
            node: Node::Array(items),
        }
    }

    pub fn choice(name: impl Into<Name>, chosen: Element) -> Self {
        Self {
            name: name.into(),
            datatype: DataType::Choice,
            node: Node::Choice(Box::new(chosen)),
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    pub fn is_array(&self) -> bool {
        matches!(self.node, Node::Array(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self.node, Node::Null)
    }

    /// The chosen variant, if this is a choice element.
    pub fn choice_element(&self) -> Option<&Element> {
        match &self.node {
            Node::Choice(chosen) => Some(chosen),
            _ => None,
        }
    }

    /// Children of a sequence. Empty for every other kind.
    pub fn elements(&self) -> &[Element] {
        match &self.node {
            Node::Sequence(children) => children,
            _ => &[],
        }
    }

    /// Items of an array. Empty for every other kind.
    pub fn values(&self) -> &[Element] {
        match &self.node {
            Node::Array(items) => items,
            _ => &[],
        }
    }

    pub fn num_values(&self) -> usize {
        self.values().len()
    }

    pub fn has_element(&self, name: &str) -> bool {
        self.elements().iter().any(|e| e.name == name)
    }

    /// Named child of a sequence, or the chosen variant of a choice when the names match.
    pub fn get_element(&self, name: &str) -> Result<&Element, ElementError> {
        let found = match &self.node {
            Node::Sequence(children) => children.iter().find(|e| e.name == name),
            Node::Choice(chosen) if chosen.name == name => Some(chosen.as_ref()),
            _ => None,
        };
        found.ok_or_else(|| ElementError::NotFound {
            parent: self.name.clone(),
            child: Name::from(name),
        })
    }

    /// Extracts the typed value of a leaf.
    pub fn get_value(&self) -> Result<Value, ElementError> {
        match &self.node {
            Node::Null => Err(ElementError::Null(self.name.clone())),
            Node::Scalar(raw) => self.extract(raw),
            _ => Err(ElementError::NotAScalar(self.name.clone())),
        }
    }

    fn extract(&self, raw: &serde_json::Value) -> Result<Value, ElementError> {
        use serde_json::Value as J;

        let out = match (self.datatype, raw) {
            (DataType::Bool, J::Bool(b)) => Some(Value::Bool(*b)),
            (DataType::Bool, J::String(s)) => s.parse::<bool>().ok().map(Value::Bool),
            (DataType::Byte | DataType::Int32 | DataType::Int64 | DataType::CorrelationId, J::Number(n)) => {
                n.as_i64().map(Value::Int)
            }
            (DataType::Byte | DataType::Int32 | DataType::Int64, J::String(s)) => {
                s.trim().parse::<i64>().ok().map(Value::Int)
            }
            (DataType::Float32 | DataType::Float64, J::Number(n)) => n.as_f64().map(Value::Float),
            (DataType::Float32 | DataType::Float64, J::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float),
            (DataType::Decimal, J::String(s)) => Decimal::from_str(s.trim()).ok().map(Value::Decimal),
            (DataType::Decimal, J::Number(n)) => Decimal::from_str(&n.to_string()).ok().map(Value::Decimal),
            (DataType::String | DataType::Char | DataType::Enumeration | DataType::ByteArray, J::String(s)) => {
                Some(Value::String(s.clone()))
            }
            (DataType::Date, J::String(s)) => parse_date(s).map(Value::Date),
            (DataType::Time, J::String(s)) => parse_time(s).map(Value::Time),
            (DataType::Datetime, J::String(s)) => parse_datetime(s).map(Value::Datetime),
            _ => None,
        };

        out.ok_or_else(|| ElementError::TypeMismatch {
            name: self.name.clone(),
            datatype: self.datatype,
            raw: raw.to_string(),
        })
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
        .ok()
        // Dates sometimes arrive with a trailing offset, e.g. `2020-01-06+00:00`.
        .or_else(|| s.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M:%S%.f").ok()
}

/// Datetimes without an offset are UTC on the wire.
pub(crate) fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn float_leaf_rejects_non_numeric_text() {
        let ok = Element::scalar("PX_LAST", DataType::Float64, json!("143.73"));
        assert_eq!(ok.get_value(), Ok(Value::Float(143.73)));

        let bad = Element::scalar("PX_LAST", DataType::Float64, json!("N.A."));
        assert!(matches!(bad.get_value(), Err(ElementError::TypeMismatch { .. })));
    }

    #[test]
    fn dates_accept_both_wire_forms() {
        let dashed = Element::scalar("date", DataType::Date, json!("2020-01-06"));
        let compact = Element::scalar("date", DataType::Date, json!("20200106"));
        let expected = NaiveDate::from_ymd_opt(2020, 1, 6).map(Value::Date);
        assert_eq!(dashed.get_value().ok(), expected);
        assert_eq!(compact.get_value().ok(), expected);
    }

    #[test]
    fn naive_datetime_is_utc() {
        let e = Element::scalar("time", DataType::Datetime, json!("2020-03-02T14:30:00.000"));
        let v = e.get_value().unwrap();
        assert_eq!(v.as_datetime().unwrap().to_rfc3339(), "2020-03-02T14:30:00+00:00");
    }

    #[test]
    fn get_element_finds_children_and_chosen_variant() {
        let seq = Element::sequence(
            "securityData",
            vec![Element::scalar("security", DataType::String, json!("IBM US Equity"))],
        );
        assert!(seq.get_element("security").is_ok());
        assert!(matches!(
            seq.get_element("fieldData"),
            Err(ElementError::NotFound { .. })
        ));

        let ch = Element::choice("ReferenceDataResponse", seq.clone());
        assert_eq!(ch.get_element("securityData").unwrap(), &seq);
    }

    #[test]
    fn composite_nodes_are_not_scalars() {
        let seq = Element::sequence("fieldData", vec![]);
        assert!(matches!(seq.get_value(), Err(ElementError::NotAScalar(_))));
        let null = Element::null("PX_LAST", DataType::Float64);
        assert!(matches!(null.get_value(), Err(ElementError::Null(_))));
    }
}
