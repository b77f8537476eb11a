//! Generic decoder from an [`Element`] tree into plain [`Value`] containers.

use std::collections::BTreeMap;

use crate::core::element::{DataType, Element};
use crate::core::value::Value;

/// Decodes any element tree into a [`Value`].
///
/// Case analysis runs in a fixed order:
/// 1. choice: `{chosen variant name: decode(chosen)}`
/// 2. array: list of decoded items
/// 3. sequence: `{child name: decode(child)}`, empty when the sequence is null
/// 4. null: [`Value::Null`]
/// 5. leaf: the extracted primitive, or [`Value::Null`] when extraction fails
///
/// The walk is total. It never fails and never looks at anything but the node shape.
pub fn decode(element: &Element) -> Value {
    if let Some(chosen) = element.choice_element() {
        #[cfg(feature = "tracing")]
        tracing::trace!(element = %element.name(), variant = %chosen.name(), "decoding CHOICE");
        let mut out = BTreeMap::new();
        out.insert(chosen.name().to_string(), decode(chosen));
        return Value::Map(out);
    }

    if element.is_array() {
        #[cfg(feature = "tracing")]
        tracing::trace!(element = %element.name(), len = element.num_values(), "decoding ARRAY");
        return Value::List(element.values().iter().map(decode).collect());
    }

    if element.datatype() == DataType::Sequence {
        #[cfg(feature = "tracing")]
        tracing::trace!(element = %element.name(), "decoding SEQUENCE");
        return Value::Map(
            element
                .elements()
                .iter()
                .map(|child| (child.name().to_string(), decode(child)))
                .collect(),
        );
    }

    if element.is_null() {
        return Value::Null;
    }

    match element.get_value() {
        Ok(v) => v,
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %_e, "leaf extraction failed, using empty value");
            Value::Null
        }
    }
}
