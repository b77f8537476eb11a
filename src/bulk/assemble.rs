use std::collections::BTreeMap;

use crate::bulk::BulkKey;
use crate::core::refdata::{collect_issues, security_of};
use crate::core::{BbgError, Table, Value};
use crate::point::security_data_list;
use crate::session::ResponseMessage;

/// Flattens every bulk field into one row per sub-record.
///
/// Scalar fields are ignored. A sub-record that is not a sequence becomes a single
/// `value` cell.
pub(crate) fn assemble_bulk(messages: &[ResponseMessage]) -> Result<Table<BulkKey>, BbgError> {
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
            let Some(fields) = sd.get("fieldData").and_then(Value::as_map) else {
                continue;
            };
            for (field, value) in fields {
                let Some(records) = value.as_list() else {
                    continue;
                };
                for (position, record) in records.iter().enumerate() {
                    let key = BulkKey {
                        security: security.clone(),
                        field: field.clone(),
                        position,
                    };
                    table.upsert(key, record_cells(record));
                }
            }
        }
    }
    Ok(table)
}

fn record_cells(record: &Value) -> BTreeMap<String, Value> {
    match record.as_map() {
        Some(m) => m.clone(),
        None => BTreeMap::from([("value".to_string(), record.clone())]),
    }
}
