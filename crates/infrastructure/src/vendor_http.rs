//! Shared request plumbing for vendor HTTP adapters.

use galley_core::{AppError, AppResult};
use serde_json::{Map, Value};
use tracing::warn;
use url::Url;

/// Parses a configured base URL.
pub(crate) fn parse_base_url(name: &str, value: &str) -> AppResult<Url> {
    Url::parse(value.trim())
        .map_err(|error| AppError::Configuration(format!("{name} is not a valid URL: {error}")))
}

/// Appends path segments to `base`, percent-encoding each one.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> AppResult<Url> {
    let mut url = base.clone();
    {
        let mut path = url.path_segments_mut().map_err(|()| {
            AppError::Configuration(format!("'{base}' cannot be used as a base URL"))
        })?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}

/// Decodes a vendor body: empty becomes `{}`, non-JSON text is kept as a string.
pub(crate) fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Object(Map::new());
    }

    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_owned()))
}

/// Sends a vendor request and maps the outcome into the shared error model.
pub(crate) async fn send_vendor_request(
    vendor: &str,
    request: reqwest::RequestBuilder,
) -> AppResult<Value> {
    let response = request.send().await.map_err(|error| {
        warn!(vendor, error = %error, "vendor request failed");
        AppError::upstream(format!("{vendor} request failed: {error}"))
    })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<response body unavailable>".to_owned());

    if status.is_success() {
        return Ok(decode_body(body.as_str()));
    }

    warn!(vendor, status = status.as_u16(), "vendor returned an error status");
    Err(AppError::Upstream {
        message: format!("{vendor} returned status {status}"),
        details: Some(decode_body(body.as_str())),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{decode_body, endpoint, parse_base_url};

    #[test]
    fn endpoint_encodes_segments_and_ignores_trailing_slash() {
        let base = match parse_base_url("AIRTABLE_API_URL", "https://api.airtable.com/") {
            Ok(base) => base,
            Err(error) => panic!("invalid base url: {error}"),
        };

        let url = endpoint(&base, &["v0", "appBase", "Waste Log"]).map(|url| url.to_string());

        assert_eq!(
            url.ok().as_deref(),
            Some("https://api.airtable.com/v0/appBase/Waste%20Log")
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let base = match parse_base_url("N8N_WEBHOOK_BASE_URL", "https://flows.example.com/webhook") {
            Ok(base) => base,
            Err(error) => panic!("invalid base url: {error}"),
        };

        let url = endpoint(&base, &["daily-close"]).map(|url| url.to_string());

        assert_eq!(
            url.ok().as_deref(),
            Some("https://flows.example.com/webhook/daily-close")
        );
    }

    #[test]
    fn parse_base_url_rejects_garbage() {
        assert!(parse_base_url("SUPABASE_URL", "not a url").is_err());
    }

    #[test]
    fn decode_body_handles_empty_and_text() {
        assert_eq!(decode_body(""), json!({}));
        assert_eq!(decode_body("{\"ok\":true}"), json!({"ok": true}));
        assert_eq!(decode_body("Workflow started"), Value::String("Workflow started".to_owned()));
    }
}
