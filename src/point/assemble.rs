use crate::core::refdata::{collect_issues, security_of};
use crate::core::{BbgError, Table, Value};
use crate::session::ResponseMessage;

/// Pivots `ReferenceDataResponse` messages into one row per security and one column
/// per returned field.
///
/// Securities carrying a `securityError` (e.g. unknown tickers) get no row; their error
/// is kept in [`Table::security_errors`].
pub(crate) fn assemble_points(messages: &[ResponseMessage]) -> Result<Table<String>, BbgError> {
    let mut table = Table::new();
    for msg in messages {
        for sd in security_data_list(msg)? {
            let security = security_of(sd)?;
            if collect_issues(
                &security,
                sd,
                &mut table.field_exceptions,
                &mut table.security_errors,
            ) {
                continue;
            }
            if let Some(fields) = sd.get("fieldData").and_then(Value::as_map) {
                table.upsert(
                    security,
                    fields.iter().map(|(k, v)| (k.clone(), v.clone())),
                );
            }
        }
    }
    Ok(table)
}

/// The `securityData` list of a reference data message.
pub(crate) fn security_data_list(msg: &ResponseMessage) -> Result<&[Value], BbgError> {
    msg.content
        .get("securityData")
        .and_then(Value::as_list)
        .ok_or_else(|| {
            BbgError::Data(format!(
                "{} message without securityData list",
                msg.message_type
            ))
        })
}
