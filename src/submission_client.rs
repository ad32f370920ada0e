use crate::domain::SubmissionRequest;
use reqwest::Client;
use secrecy::ExposeSecret;
use std::time::Duration;

/// Why a submission did not go through.
///
/// None of this is ever shown to the visitor: the page only says that something went wrong. The
/// variants are for the logs.
#[derive(thiserror::Error, Debug)]
pub enum SubmissionError {
    /// Network failure, timeout, non-2xx status or a body that is not the expected JSON.
    #[error("Failed to reach the form submission service.")]
    Transport(#[from] reqwest::Error),
    /// The service answered, but with `success: false`.
    #[error("The form submission service rejected the message: {}", rejection_reason(.message))]
    RemoteRejection { message: Option<String> },
}

fn rejection_reason(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or("no reason given")
}

/// What the service says about an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub message: Option<String>,
}

/// HTTP client for the remote form-submission service.
///
/// `reqwest::Client` keeps a connection pool under the hood; we build it once and reuse it for
/// every submission rather than creating a fresh client per click.
#[derive(Debug)]
pub struct SubmissionClient {
    http_client: Client,
    base_url: String,
}

impl SubmissionClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Sends one message. Exactly one POST is issued; there is no retry.
    #[tracing::instrument(
        name = "Submitting contact form",
        skip(self, request),
        fields(sender_email = %request.email)
    )]
    pub async fn submit(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let url = format!("{}/submit", self.base_url.trim_end_matches('/'));
        let body = SubmitRequestBody {
            access_key: request.access_key.expose_secret(),
            name: &request.name,
            email: &request.email,
            message: &request.message,
            subject: &request.subject,
        };

        let response: SubmitResponseBody = self
            .http_client
            .post(&url)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.success {
            Ok(SubmissionReceipt {
                message: response.message,
            })
        } else {
            Err(SubmissionError::RemoteRejection {
                message: response.message,
            })
        }
    }
}

/// Wire format of the request. It borrows from `SubmissionRequest` so nothing is copied, and the
/// exposed access key only lives for the duration of the call.
#[derive(serde::Serialize)]
struct SubmitRequestBody<'a> {
    access_key: &'a str,
    name: &'a str,
    email: &'a str,
    message: &'a str,
    subject: &'a str,
}

#[derive(serde::Deserialize)]
struct SubmitResponseBody {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}
