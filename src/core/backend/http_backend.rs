// src/core/backend/http_backend.rs

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};
use url::Url;

use super::{
    AssessmentBackend, AssessmentError, AssessmentStarted, AssessmentState, AssessmentStatus,
    CheckRequest, SmtpCheckResponse,
};

const USER_AGENT: &str = concat!("VanguardMail/", env!("CARGO_PKG_VERSION"));

/// `AssessmentBackend` over HTTPS with `reqwest`.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base: Url) -> Result<Self, AssessmentError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                error!(error = %e, "Failed to build HTTP client.");
                AssessmentError::Unreachable(format!("Failed to build HTTP client: {}", e))
            })?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AssessmentError> {
        self.base
            .join(path)
            .map_err(|e| AssessmentError::Unreachable(format!("Invalid API URL: {}", e)))
    }

    fn assessment_url(&self, assessment_id: &str) -> Result<Url, AssessmentError> {
        let mut url = self.endpoint("api/assessment")?;
        url.path_segments_mut()
            .map_err(|_| AssessmentError::Unreachable("Invalid API URL".to_string()))?
            .pop_if_empty()
            .push(assessment_id);
        Ok(url)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        request: &CheckRequest,
    ) -> Result<(StatusCode, T), AssessmentError> {
        debug!(url = %url, "POST to backend.");
        let body = serde_json::to_string(request)
            .map_err(|e| AssessmentError::Unreachable(format!("Failed to encode request: {}", e)))?;
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "Backend request failed.");
                AssessmentError::Unreachable(e.to_string())
            })?;
        read_json(response).await
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<(StatusCode, T), AssessmentError> {
        debug!(url = %url, "GET from backend.");
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            error!(url = %url, error = %e, "Backend request failed.");
            AssessmentError::Unreachable(e.to_string())
        })?;
        read_json(response).await
    }
}

/// Reads the body and parses it as JSON, whatever the HTTP status.
async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<(StatusCode, T), AssessmentError> {
    let status = response.status();
    let text = response.text().await.map_err(|e| {
        warn!(status = %status, error = %e, "Failed to read backend response body.");
        AssessmentError::InvalidJson { status: status.as_u16() }
    })?;
    parse_json(status, &text)
}

fn parse_json<T: DeserializeOwned>(
    status: StatusCode,
    text: &str,
) -> Result<(StatusCode, T), AssessmentError> {
    match serde_json::from_str(text) {
        Ok(parsed) => Ok((status, parsed)),
        Err(e) => {
            warn!(status = %status, error = %e, "Backend returned invalid JSON.");
            Err(AssessmentError::InvalidJson { status: status.as_u16() })
        }
    }
}

/// Decides whether a parsed response is a success.
///
/// A backend error message wins over the HTTP status so that it reaches the
/// user verbatim. A 2xx without `ok` and without a message is still a rejection.
fn ensure_ok(status: StatusCode, ok: bool, error: Option<String>) -> Result<(), AssessmentError> {
    if ok && status.is_success() {
        return Ok(());
    }
    match error.filter(|e| !e.is_empty()) {
        Some(message) => Err(AssessmentError::Rejected(message)),
        None if !status.is_success() => Err(AssessmentError::Http { status: status.as_u16() }),
        None => Err(AssessmentError::Rejected("Unknown error".to_string())),
    }
}

/// Checks a poll answer. A `timeout` status ends the attempt as such, whatever `ok` says.
fn check_state(status: StatusCode, body: AssessmentState) -> Result<AssessmentState, AssessmentError> {
    if body.status == AssessmentStatus::Timeout {
        return Err(AssessmentError::TimedOut);
    }
    ensure_ok(status, body.ok, body.error.clone())?;
    Ok(body)
}

impl AssessmentBackend for HttpBackend {
    async fn check_smtp(&self, request: &CheckRequest) -> Result<SmtpCheckResponse, AssessmentError> {
        let url = self.endpoint("api/smtp/check")?;
        let (status, body): (_, SmtpCheckResponse) = self.post(url, request).await?;
        ensure_ok(status, body.ok, body.error.clone())?;
        info!("Synchronous SMTP check answered.");
        Ok(body)
    }

    async fn start_assessment(
        &self,
        request: &CheckRequest,
    ) -> Result<AssessmentStarted, AssessmentError> {
        let url = self.endpoint("api/assessment")?;
        let (status, body): (_, AssessmentStarted) = self.post(url, request).await?;
        ensure_ok(status, body.ok, body.error.clone())?;
        info!(domain = ?body.domain, "Assessment started.");
        Ok(body)
    }

    async fn assessment_state(&self, assessment_id: &str) -> Result<AssessmentState, AssessmentError> {
        let url = self.assessment_url(assessment_id)?;
        let (status, body): (_, AssessmentState) = self.get(url).await?;
        let body = check_state(status, body)?;
        debug!(status = ?body.status, "Assessment status polled.");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base: &str) -> HttpBackend {
        HttpBackend::new(Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoints() {
        let backend = backend("https://api.example.com/");
        assert_eq!(
            backend.endpoint("api/smtp/check").unwrap().as_str(),
            "https://api.example.com/api/smtp/check"
        );
        assert_eq!(
            backend.assessment_url("abc-123").unwrap().as_str(),
            "https://api.example.com/api/assessment/abc-123"
        );
    }

    #[test]
    fn test_assessment_id_is_encoded_as_one_segment() {
        let backend = backend("https://api.example.com/v2/");
        assert_eq!(
            backend.assessment_url("../admin?x=1").unwrap().as_str(),
            "https://api.example.com/v2/api/assessment/..%2Fadmin%3Fx=1"
        );
    }

    #[test]
    fn test_ensure_ok() {
        assert_eq!(ensure_ok(StatusCode::OK, true, None), Ok(()));
        assert_eq!(
            ensure_ok(StatusCode::BAD_REQUEST, false, Some("bad domain".into())),
            Err(AssessmentError::Rejected("bad domain".into()))
        );
        assert_eq!(
            ensure_ok(StatusCode::BAD_GATEWAY, true, None),
            Err(AssessmentError::Http { status: 502 })
        );
        assert_eq!(
            ensure_ok(StatusCode::OK, false, Some(String::new())),
            Err(AssessmentError::Rejected("Unknown error".into()))
        );
    }

    fn poll_answer(status: StatusCode, text: &str) -> Result<AssessmentState, AssessmentError> {
        let (status, body) = parse_json::<AssessmentState>(status, text)?;
        check_state(status, body)
    }

    #[test]
    fn test_poll_error_body_without_status_is_surfaced() {
        assert_eq!(
            poll_answer(StatusCode::NOT_FOUND, r#"{"ok": false, "error": "Assessment not found"}"#),
            Err(AssessmentError::Rejected("Assessment not found".into()))
        );
        assert_eq!(
            poll_answer(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            Err(AssessmentError::InvalidJson { status: 502 })
        );
    }

    #[test]
    fn test_poll_timeout_wins_over_ok_flag() {
        assert_eq!(
            poll_answer(StatusCode::OK, r#"{"ok": false, "status": "timeout"}"#),
            Err(AssessmentError::TimedOut)
        );
        let state = poll_answer(StatusCode::OK, r#"{"ok": true, "status": "waiting_email"}"#).unwrap();
        assert_eq!(state.status, AssessmentStatus::WaitingEmail);
    }
}
