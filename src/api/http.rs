//! HTTP transport for Speckle REST calls

use crate::error::{Error, Result};
use crate::resource::envelope::rejection_message;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

const USER_AGENT: &str = concat!("speckle-client/", env!("CARGO_PKG_VERSION"));

/// Sanitize response body for logging
/// Truncates long responses and drops control characters
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

    truncated.replace(|c: char| c.is_control(), "")
}

/// A parsed response: HTTP status plus JSON body (`Null` when empty)
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

/// HTTP client wrapper shared by the facade and every resource it hands out
#[derive(Clone)]
pub struct SpeckleHttpClient {
    client: Client,
}

impl SpeckleHttpClient {
    /// Create a new HTTP client; `timeout` bounds each whole request
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client })
    }

    /// Send one request and parse the JSON body.
    ///
    /// `token` is sent verbatim as the `Authorization` header. Non-success
    /// statuses become `ServerRejected`; an unparseable body on a success
    /// status is a `Decode` error.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<HttpResponse> {
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if text.trim().is_empty() {
            if !status.is_success() {
                tracing::error!("API error: {} - empty body", status);
                return Err(Error::ServerRejected {
                    status: status.as_u16(),
                    message: status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string(),
                });
            }
            return Ok(HttpResponse {
                status: status.as_u16(),
                body: Value::Null,
            });
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(body) if status.is_success() => Ok(HttpResponse {
                status: status.as_u16(),
                body,
            }),
            Ok(body) => {
                // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
                tracing::error!("API error: {} - {}", status, sanitize_for_log(&text));
                Err(Error::ServerRejected {
                    status: status.as_u16(),
                    message: rejection_message(&body),
                })
            },
            Err(e) if status.is_success() => {
                tracing::error!("Malformed response body: {}", sanitize_for_log(&text));
                Err(Error::Decode(format!("response is not JSON: {}", e)))
            },
            Err(_) => {
                tracing::error!("API error: {} - {}", status, sanitize_for_log(&text));
                Err(Error::ServerRejected {
                    status: status.as_u16(),
                    message: sanitize_for_log(&text),
                })
            },
        }
    }
}

/// Format a client error for display on a terminal
pub fn format_error(error: &Error) -> String {
    match error {
        Error::Transport(e) if e.is_timeout() => {
            "Request timed out. Check the server address and try again.".to_string()
        },
        Error::Transport(e) if e.is_connect() => {
            "Could not connect to the Speckle server.".to_string()
        },
        Error::ServerRejected { status: 401, .. } => {
            "Authentication required. Run 'speckle login' first.".to_string()
        },
        Error::ServerRejected { status: 403, message } => format!("Permission denied: {}", message),
        Error::ServerRejected { status: 404, .. } => "Resource not found.".to_string(),
        Error::ServerRejected {
            status: 500..=599, ..
        } => "Speckle server error. Please try again later.".to_string(),
        other => {
            let text = other.to_string();
            let sanitized: String = text.chars().filter(|c| !c.is_control()).take(160).collect();
            if sanitized.len() < text.len() {
                format!("{}...", sanitized)
            } else {
                sanitized
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(sanitized.contains("[truncated, 500 bytes total]"));
    }

    #[test]
    fn test_sanitize_strips_control_chars() {
        assert_eq!(sanitize_for_log("bad\nbody\t!"), "badbody!");
    }

    #[test]
    fn test_format_error_messages() {
        let err = Error::ServerRejected {
            status: 404,
            message: "nope".to_string(),
        };
        assert_eq!(format_error(&err), "Resource not found.");

        let err = Error::ServerRejected {
            status: 400,
            message: "Invalid password.".to_string(),
        };
        assert_eq!(
            format_error(&err),
            "Server rejected request (400): Invalid password."
        );
    }
}
