//! Blocking HTTP facade over a shared async client.
//!
//! Uses async reqwest internally on a shared tokio runtime, but presents a
//! sync interface: every pipeline stage issues one request at a time and
//! blocks on the result.

use std::sync::LazyLock;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error types for HTTP operations
#[derive(Debug)]
pub enum HttpError {
    /// Transport failure or non-success status
    Http {
        status: Option<u16>,
        message: String,
    },
    /// Response body was not the expected JSON
    Decode(serde_json::Error),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Decode(e) => write!(f, "invalid JSON: {e}"),
        }
    }
}

impl std::error::Error for HttpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            Self::Http { .. } => None,
        }
    }
}

impl HttpError {
    /// Create HTTP error from reqwest error
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }

    /// Status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => *status,
            Self::Decode(_) => None,
        }
    }
}

/// Status and body of a completed request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_str(&self.body).map_err(HttpError::Decode)
    }
}

/// Shared async HTTP client with connection pooling.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .expect("failed to build HTTP client")
});

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// HTTP GET → JSON value. Any non-2xx status is an error.
pub fn get_json(url: &str, headers: &[(&str, &str)]) -> Result<Value, HttpError> {
    let text = SHARED_RUNTIME
        .handle()
        .block_on(async {
            let mut request = SHARED_CLIENT.get(url);
            for &(name, value) in headers {
                request = request.header(name, value);
            }
            request.send().await?.error_for_status()?.text().await
        })
        .map_err(|e| HttpError::from_reqwest(&e))?;

    serde_json::from_str(&text).map_err(HttpError::Decode)
}

/// HTTP POST with a JSON body.
///
/// Returns the response whatever its status; callers decide what a
/// non-200 answer means. Only transport failures are errors.
pub fn post_json(url: &str, body: &Value) -> Result<HttpResponse, HttpError> {
    let payload = serde_json::to_string(body).map_err(HttpError::Decode)?;
    SHARED_RUNTIME
        .handle()
        .block_on(async {
            let response = SHARED_CLIENT
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(payload)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(HttpResponse { status, body })
        })
        .map_err(|e| HttpError::from_reqwest(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_http_with_status() {
        let err = HttpError::Http {
            status: Some(404),
            message: "test".to_string(),
        };
        assert_eq!(format!("{err}"), "HTTP 404: test");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn display_http_without_status() {
        let err = HttpError::Http {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(format!("{err}"), "HTTP error: connection refused");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn display_decode_error() {
        let e = serde_json::from_str::<Value>("not json").unwrap_err();
        let err = HttpError::Decode(e);
        assert!(format!("{err}").starts_with("invalid JSON"));
    }

    #[test]
    fn get_json_sends_headers_and_parses_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/works/W1")
            .match_header("user-agent", "mailto=test@example.org")
            .with_status(200)
            .with_body(r#"{"id": "https://openalex.org/W1"}"#)
            .create();

        let url = format!("{}/works/W1", server.url());
        let value = get_json(&url, &[("User-Agent", "mailto=test@example.org")]).unwrap();

        mock.assert();
        assert_eq!(value["id"], "https://openalex.org/W1");
    }

    #[test]
    fn get_json_rejects_error_status() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/works/missing").with_status(404).create();

        let url = format!("{}/works/missing", server.url());
        let err = get_json(&url, &[]).unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn get_json_rejects_non_json_body() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/works/W2")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create();

        let url = format!("{}/works/W2", server.url());
        let err = get_json(&url, &[]).unwrap_err();
        assert!(matches!(err, HttpError::Decode(_)));
    }

    #[test]
    fn post_json_returns_non_success_status() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/classify")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::PartialJson(json!({"level": 5})))
            .with_status(503)
            .with_body("unavailable")
            .create();

        let url = format!("{}/classify", server.url());
        let response = post_json(&url, &json!({"level": 5, "title": "x"})).unwrap();

        mock.assert();
        assert_eq!(response.status, 503);
        assert!(!response.is_ok());
        assert_eq!(response.body, "unavailable");
    }
}
