//! Bulk reference data: fields whose value is itself a table (index members, dividend
//! history, curve points, ...).

mod assemble;

use serde::Serialize;

use crate::core::refdata::{self, Overrides};
use crate::core::{BbgClient, BbgError, Table, TableKey, Value};

use assemble::assemble_bulk;

/// Identifies one sub-record of one bulk field of one security.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BulkKey {
    pub security: String,
    pub field: String,
    /// Position of the sub-record within the field, starting at 0.
    pub position: usize,
}

impl TableKey for BulkKey {
    fn index_names() -> &'static [&'static str] {
        &["security", "field", "position"]
    }

    fn index_values(&self) -> Vec<Value> {
        vec![
            Value::String(self.security.clone()),
            Value::String(self.field.clone()),
            Value::Int(i64::try_from(self.position).unwrap_or(i64::MAX)),
        ]
    }
}

/// A bulk reference data query. Issues the same request as
/// [`DataPoint`](crate::DataPoint) but keeps every sub-record as its own row.
#[derive(Debug, Clone)]
pub struct BulkData {
    client: BbgClient,
    securities: Vec<String>,
    fields: Vec<String>,
    overrides: Overrides,
}

impl BulkData {
    pub fn new<S, F>(
        client: &BbgClient,
        securities: impl IntoIterator<Item = S>,
        fields: impl IntoIterator<Item = F>,
    ) -> Self
    where
        S: Into<String>,
        F: Into<String>,
    {
        Self {
            client: client.clone(),
            securities: securities.into_iter().map(Into::into).collect(),
            fields: fields.into_iter().map(Into::into).collect(),
            overrides: Vec::new(),
        }
    }

    /// Overrides `field` with `value` for the duration of this request.
    #[must_use]
    pub fn with_override(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        self.overrides.push((field.into(), value.to_string()));
        self
    }

    /// Executes the query and returns one row per bulk sub-record.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be established, the request is rejected,
    /// or the answer is not shaped like reference data.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err, fields(securities = self.securities.len())))]
    pub async fn fetch(self) -> Result<Table<BulkKey>, BbgError> {
        let req = refdata::securities_fields_request(
            "ReferenceDataRequest",
            &self.securities,
            &self.fields,
            &self.overrides,
        );
        let mut answers = refdata::execute(&self.client, &[req]).await?;
        assemble_bulk(&answers.pop().unwrap_or_default())
    }
}
