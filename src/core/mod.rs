//! Core components of the `bbgdata-rs` client.
//!
//! This module contains the foundational building blocks of the library, including:
//! - The [`BbgClient`] and its builder.
//! - The primary [`BbgError`] type.
//! - The element tree, its generic decoder and the decoded [`Value`].
//! - The [`Table`] every query reshapes its answers into.

/// The client (`BbgClient`), builder, and configuration.
pub mod client;
/// Generic decoder from element trees to plain values.
pub mod decode;
/// The vendor's self-describing element tree.
pub mod element;
/// The primary error type (`BbgError`) for the crate.
pub mod error;
/// Output tables shared by every query shape.
pub mod table;
/// Plain decoded values.
pub mod value;

pub(crate) mod net;
pub(crate) mod refdata;

#[cfg(feature = "test-mode")]
pub(crate) mod fixtures;

#[cfg(feature = "dataframe")]
pub mod dataframe;

// convenient re-exports so most code can just `use crate::core::BbgClient`
pub use client::{BbgClient, BbgClientBuilder, REFDATA_SERVICE};
pub use decode::decode;
pub use element::{DataType, Element, ElementError, Name};
pub use error::BbgError;
pub use table::{FieldException, Row, SecurityError, Table, TableKey};
pub use value::Value;
