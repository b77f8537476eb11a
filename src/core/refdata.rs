//! Pieces shared by every query shape: request building, one-session execution and
//! extraction of field exceptions and security errors.

use crate::core::client::REFDATA_SERVICE;
use crate::core::table::{FieldException, SecurityError};
use crate::core::value::Value;
use crate::core::{BbgClient, BbgError};
use crate::session::{Request, ResponseMessage, Session, Transport};

/// Per-request field overrides, in the order they were given.
pub type Overrides = Vec<(String, String)>;

/// A `securities[]` + `fields[]` request for `operation`, with overrides appended.
pub(crate) fn securities_fields_request(
    operation: &str,
    securities: &[String],
    fields: &[String],
    overrides: &Overrides,
) -> Request {
    let mut req = Request::new(REFDATA_SERVICE, operation);
    for security in securities {
        req.append("securities", security.as_str());
    }
    for field in fields {
        req.append("fields", field.as_str());
    }
    append_overrides(&mut req, overrides);
    req
}

pub(crate) fn append_overrides(req: &mut Request, overrides: &Overrides) {
    for (field_id, value) in overrides {
        req.append_override(field_id, value);
    }
}

/// Runs `requests` one after another on a single fresh session and returns the
/// decoded answers of each. The session is stopped whether or not the run succeeded.
pub(crate) async fn execute(
    client: &BbgClient,
    requests: &[Request],
) -> Result<Vec<Vec<ResponseMessage>>, BbgError> {
    let mut session = client.new_session();
    let outcome = run(&mut session, requests).await;
    session.close().await;
    outcome
}

pub(crate) async fn run<T: Transport>(
    session: &mut Session<T>,
    requests: &[Request],
) -> Result<Vec<Vec<ResponseMessage>>, BbgError> {
    session.start().await?;
    session.open_service(REFDATA_SERVICE).await?;
    let mut out = Vec::with_capacity(requests.len());
    for req in requests {
        out.push(session.request(req).await?);
    }
    Ok(out)
}

/// Ticker of one `securityData` entry.
pub(crate) fn security_of(security_data: &Value) -> Result<String, BbgError> {
    security_data
        .get("security")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| BbgError::Data("securityData entry without security".into()))
}

/// Records `fieldExceptions` and `securityError` of one `securityData` entry.
///
/// Returns `true` when the security itself was rejected; its `fieldData` is then
/// empty and must not produce a row.
pub(crate) fn collect_issues(
    security: &str,
    security_data: &Value,
    exceptions: &mut Vec<FieldException>,
    errors: &mut Vec<SecurityError>,
) -> bool {
    if let Some(list) = security_data.get("fieldExceptions").and_then(Value::as_list) {
        for exc in list {
            let Some(field_id) = exc.get("fieldId").and_then(Value::as_str) else {
                continue;
            };
            let info = exc.get("errorInfo");
            exceptions.push(FieldException {
                security: security.to_string(),
                field_id: field_id.to_string(),
                category: text(info, "category"),
                message: text(info, "message"),
            });
        }
    }

    let rejected = security_data
        .get("securityError")
        .filter(|v| v.as_map().is_some_and(|m| !m.is_empty()));
    if let Some(err) = rejected {
        errors.push(SecurityError {
            security: security.to_string(),
            category: text(Some(err), "category"),
            message: text(Some(err), "message"),
        });
    }
    rejected.is_some()
}

fn text(v: Option<&Value>, key: &str) -> Option<String> {
    v.and_then(|v| v.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
}
