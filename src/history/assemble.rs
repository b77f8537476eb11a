use crate::core::refdata::{collect_issues, security_of};
use crate::core::{BbgError, Table, Value};
use crate::history::HistoryKey;
use crate::session::ResponseMessage;

/// One row per (security, date); every member of a `fieldData` entry except `date`
/// becomes a cell. Entries without a readable date are dropped.
pub(crate) fn assemble_history(
    messages: &[ResponseMessage],
) -> Result<Table<HistoryKey>, BbgError> {
    let mut table = Table::new();
    for msg in messages {
        let sd = msg.content.get("securityData").ok_or_else(|| {
            BbgError::Data(format!("{} message without securityData", msg.message_type))
        })?;
        let security = security_of(sd)?;
        if collect_issues(
            &security,
            sd,
            &mut table.field_exceptions,
            &mut table.security_errors,
        ) {
            continue;
        }

        let Some(points) = sd.get("fieldData").and_then(Value::as_list) else {
            continue;
        };
        for point in points {
            let Some(fields) = point.as_map() else {
                continue;
            };
            let Some(date) = fields.get("date").and_then(Value::as_date) else {
                #[cfg(feature = "tracing")]
                tracing::debug!(%security, "dropping history point without date");
                continue;
            };
            let key = HistoryKey {
                security: security.clone(),
                date,
            };
            table.upsert(
                key,
                fields
                    .iter()
                    .filter(|(k, _)| k.as_str() != "date")
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }
    }
    Ok(table)
}
