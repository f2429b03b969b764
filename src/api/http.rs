//! HTTP backend for the REST API

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use url::Url;

use super::backend::Backend;
use crate::error::{Error, ErrorKind, Result};
use crate::list::Query;

/// Production API root
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com/v1";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(80);

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// [`Backend`] over blocking reqwest
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    /// Backend against the production API root
    pub fn new() -> Result<Self> {
        Self::with_base(DEFAULT_API_BASE, DEFAULT_TIMEOUT)
    }

    /// Backend against an arbitrary API root, e.g. a local mock server
    pub fn with_base(base: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base.trim_end_matches('/'))
            .map_err(|e| Error::config(format!("invalid API base {base:?}: {e}")))?;

        let client = Client::builder()
            .user_agent(concat!("stripe-client/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Backend for HttpBackend {
    fn call(&self, method: Method, path: &str, key: &str, form: Option<&Query>) -> Result<String> {
        let mut url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let sends_body = method != Method::GET && method != Method::DELETE;
        let mut request = if sends_body {
            let body = form.map(Query::encode).unwrap_or_default();
            self.client
                .request(method, url.as_str())
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body)
        } else {
            if let Some(form) = form.filter(|f| !f.is_empty()) {
                url.push('?');
                url.push_str(&form.encode());
            }
            self.client.request(method, url.as_str())
        };
        request = request.basic_auth(key, Some(""));

        let response = request.send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(Error::from_response(status.as_u16(), &body));
        }

        Ok(body)
    }
}

/// Format an API error for display
/// Security: Sanitizes error messages to avoid leaking request details
pub fn format_api_error(error: &Error) -> String {
    match error {
        Error::Api { kind, message, .. } => match kind {
            ErrorKind::Authentication => {
                "Authentication failed. Check your API key.".to_string()
            }
            ErrorKind::RateLimit => "Rate limit exceeded. Please try again later.".to_string(),
            ErrorKind::Api => "API temporarily unavailable. Please try again.".to_string(),
            ErrorKind::InvalidRequest | ErrorKind::Card | ErrorKind::Unknown(_) => {
                let mut printable = message
                    .chars()
                    .filter(|c| c.is_ascii_graphic() || *c == ' ');
                let sanitized = printable.by_ref().take(120).collect::<String>();
                if printable.next().is_some() {
                    format!("{}...", sanitized)
                } else {
                    sanitized
                }
            }
        },
        Error::Transport { .. } => {
            "Request failed. Check your network connection and try again.".to_string()
        }
        Error::Decode { .. } => "Unexpected response from the API.".to_string(),
        Error::Config { message } => message.clone(),
    }
}
