#[cfg(feature = "test-mode")]
use std::env;

/// Read a gateway response body as text.
/// In `test-mode`, if `BBG_RECORD=1`, the body is saved as a fixture via `core::fixtures`.
pub(crate) async fn get_text(
    resp: reqwest::Response,
    _endpoint: &str,
    _tag: &str,
    _ext: &str,
) -> Result<String, reqwest::Error> {
    let text = resp.text().await?;

    #[cfg(feature = "test-mode")]
    {
        if env::var("BBG_RECORD").ok().as_deref() == Some("1")
            && let Err(e) = crate::core::fixtures::record_fixture(_endpoint, _tag, _ext, &text)
        {
            eprintln!("BBG_RECORD: failed to write fixture for {_tag}: {e}");
        }
    }

    Ok(text)
}
