use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::decode::decode;
use crate::core::element::Element;
use crate::core::value::Value;

/// Correlates a sent request with the messages answering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(pub u64);

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of an event delivered by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    SessionStatus,
    ServiceStatus,
    Response,
    PartialResponse,
    Timeout,
    Request,
    Admin,
    #[serde(other)]
    Other,
}

impl EventType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SessionStatus => "SESSION_STATUS",
            Self::ServiceStatus => "SERVICE_STATUS",
            Self::Response => "RESPONSE",
            Self::PartialResponse => "PARTIAL_RESPONSE",
            Self::Timeout => "TIMEOUT",
            Self::Request => "REQUEST",
            Self::Admin => "ADMIN",
            Self::Other => "OTHER",
        }
    }

    /// `true` for events that carry request answers.
    pub const fn is_response(self) -> bool {
        matches!(self, Self::Response | Self::PartialResponse)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message inside an event.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub message_type: String,
    pub correlation_ids: Vec<CorrelationId>,
    pub topic_name: Option<String>,
    pub element: Element,
}

impl Message {
    /// A status message with no payload beyond its type.
    pub fn status(message_type: impl Into<String>) -> Self {
        let message_type = message_type.into();
        Self {
            element: Element::sequence(message_type.as_str(), vec![]),
            message_type,
            correlation_ids: Vec::new(),
            topic_name: None,
        }
    }

    /// A response message answering `cid`; its root element is `element`.
    pub fn response(cid: CorrelationId, element: Element) -> Self {
        Self {
            message_type: element.name().to_string(),
            correlation_ids: vec![cid],
            topic_name: None,
            element,
        }
    }

    pub fn as_element(&self) -> &Element {
        &self.element
    }
}

/// A batch of messages of one [`EventType`].
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub messages: Vec<Message>,
}

impl Event {
    pub fn new(event_type: EventType, messages: Vec<Message>) -> Self {
        Self {
            event_type,
            messages,
        }
    }

    pub fn timeout() -> Self {
        Self::new(EventType::Timeout, Vec::new())
    }

    /// A status event made of plain status messages.
    pub fn status(event_type: EventType, message_types: &[&str]) -> Self {
        Self::new(
            event_type,
            message_types.iter().map(|t| Message::status(*t)).collect(),
        )
    }

    /// Type of the last message in the event, which is the one status checks look at.
    pub fn last_message_type(&self) -> Option<&str> {
        self.messages.last().map(|m| m.message_type.as_str())
    }
}

/// A response message decoded into plain values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseMessage {
    pub message_type: String,
    pub correlation_ids: Vec<CorrelationId>,
    pub topic_name: Option<String>,
    pub content: Value,
}

impl From<&Message> for ResponseMessage {
    fn from(msg: &Message) -> Self {
        Self {
            message_type: msg.message_type.clone(),
            correlation_ids: msg.correlation_ids.clone(),
            topic_name: msg.topic_name.clone(),
            content: decode(&msg.element),
        }
    }
}
