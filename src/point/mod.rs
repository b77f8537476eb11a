//! Single-point reference data: current values of fields for a basket of securities.

mod assemble;

pub(crate) use assemble::security_data_list;

use crate::core::refdata::{self, Overrides};
use crate::core::{BbgClient, BbgError, Table};
use crate::session::{Request, ResponseMessage};

use assemble::assemble_points;

/// A reference data query: a set of securities, a set of fields and optional overrides.
///
/// ```no_run
/// # async fn run() -> Result<(), bbgdata_rs::BbgError> {
/// let client = bbgdata_rs::BbgClient::builder().build()?;
/// let table = bbgdata_rs::DataPoint::new(
///     &client,
///     ["MSFT US Equity", "IBM US Equity"],
///     ["PX_LAST", "PX_HIGH", "PX_LOW"],
/// )
/// .fetch()
/// .await?;
/// for row in table.rows() {
///     println!("{} {:?}", row.key, row.get("PX_LAST"));
/// }
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct DataPoint {
    client: BbgClient,
    securities: Vec<String>,
    fields: Vec<String>,
    overrides: Overrides,
}

impl DataPoint {
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

    /// Adds several overrides at once, keeping their order.
    #[must_use]
    pub fn overrides<K, V>(mut self, overrides: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        self.overrides
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    pub(crate) fn request(&self) -> Request {
        refdata::securities_fields_request(
            "ReferenceDataRequest",
            &self.securities,
            &self.fields,
            &self.overrides,
        )
    }

    /// Executes the query and pivots the answer into a security x field table.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be established, the request is rejected,
    /// or the answer is not shaped like reference data.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err, fields(securities = self.securities.len(), fields = self.fields.len())))]
    pub async fn fetch(self) -> Result<Table<String>, BbgError> {
        let messages = self.inspect().await?;
        assemble_points(&messages)
    }

    /// Executes the query and returns the decoded messages without reshaping them.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be established or the request is rejected.
    pub async fn inspect(self) -> Result<Vec<ResponseMessage>, BbgError> {
        let mut answers = refdata::execute(&self.client, &[self.request()]).await?;
        Ok(answers.pop().unwrap_or_default())
    }
}
