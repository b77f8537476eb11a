//! Gateway JSON bodies and their conversion into events and element trees.

use serde::Deserialize;

use crate::core::element::{DataType, Element};
use crate::session::event::{CorrelationId, Event, EventType, Message};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionEnvelope {
    pub(crate) session_id: String,
    #[serde(default)]
    pub(crate) events: Vec<WireEvent>,
}

#[derive(Deserialize, Default)]
pub(crate) struct EventsEnvelope {
    #[serde(default)]
    pub(crate) events: Vec<WireEvent>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireEvent {
    pub(crate) event_type: EventType,
    #[serde(default)]
    pub(crate) messages: Vec<WireMessage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireMessage {
    pub(crate) message_type: String,
    #[serde(default)]
    pub(crate) correlation_ids: Vec<CorrelationId>,
    pub(crate) topic_name: Option<String>,
    pub(crate) element: Option<WireElement>,
}

/// Tagged element form: `{name, datatype, isArray, isNull, value, elements, values, choice}`.
///
/// Array items may omit `name`; they inherit the array's.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireElement {
    #[serde(default)]
    name: Option<String>,
    datatype: DataType,
    #[serde(default)]
    is_array: bool,
    #[serde(default)]
    is_null: bool,
    #[serde(default)]
    value: Option<serde_json::Value>,
    #[serde(default)]
    elements: Vec<WireElement>,
    #[serde(default)]
    values: Vec<WireElement>,
    #[serde(default)]
    choice: Option<Box<WireElement>>,
}

impl WireElement {
    pub(crate) fn into_element(self, inherited: &str) -> Element {
        let name = self.name.unwrap_or_else(|| inherited.to_string());

        if self.is_null {
            return Element::null(name, self.datatype);
        }
        if self.is_array {
            let items = self
                .values
                .into_iter()
                .map(|v| v.into_element(&name))
                .collect();
            return Element::array(name, self.datatype, items);
        }

        match self.datatype {
            DataType::Choice => match self.choice {
                Some(chosen) => Element::choice(name.as_str(), chosen.into_element("")),
                None => Element::null(name, DataType::Choice),
            },
            DataType::Sequence => {
                let children = self
                    .elements
                    .into_iter()
                    .map(|c| c.into_element(""))
                    .collect();
                Element::sequence(name, children)
            }
            other => match self.value {
                Some(raw) => Element::scalar(name, other, raw),
                None => Element::null(name, other),
            },
        }
    }
}

impl From<WireMessage> for Message {
    fn from(w: WireMessage) -> Self {
        let element = match w.element {
            Some(e) => e.into_element(&w.message_type),
            None => Element::sequence(w.message_type.as_str(), vec![]),
        };
        Self {
            message_type: w.message_type,
            correlation_ids: w.correlation_ids,
            topic_name: w.topic_name,
            element,
        }
    }
}

impl From<WireEvent> for Event {
    fn from(w: WireEvent) -> Self {
        Event::new(
            w.event_type,
            w.messages.into_iter().map(Message::from).collect(),
        )
    }
}
