//! Outbound adapters for the search flow.
//!
//! Each external provider sits behind a trait so the orchestrator can be
//! driven by stubs in tests.

use async_trait::async_trait;
use thiserror::Error;

pub mod detect_language;
pub mod openai;
pub mod translate;
pub mod wikipedia;

pub use detect_language::DetectLanguageClient;
pub use openai::ChatClient;
pub use translate::TranslateClient;
pub use wikipedia::WikipediaClient;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} returned an unexpected response: {message}")]
    Malformed {
        service: &'static str,
        message: String,
    },

    #[error("Invalid language code: {0}")]
    InvalidLanguage(String),
}

impl ClientError {
    #[must_use]
    pub const fn service(&self) -> &'static str {
        match self {
            Self::Http { service, .. }
            | Self::Status { service, .. }
            | Self::Malformed { service, .. } => service,
            Self::InvalidLanguage(_) => wikipedia::SERVICE,
        }
    }

    pub(crate) fn http(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Http { service, source }
    }

    pub(crate) fn malformed(service: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            service,
            message: message.into(),
        }
    }
}

/// Turns a non-2xx response into [`ClientError::Status`].
pub(crate) async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        service,
        status,
        body,
    })
}

#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Returns the primary language subtag of `text`, e.g. `fa` or `en`.
    async fn detect_language(&self, text: &str) -> Result<String, ClientError>;
}

#[async_trait]
pub trait WikipediaSource: Send + Sync {
    /// Plain-text intro of the page, `None` when the page or extract is missing.
    async fn extract(&self, language: &str, title: &str) -> Result<Option<String>, ClientError>;

    /// URL of the page's lead image, `None` when the page has none.
    async fn lead_image(&self, language: &str, title: &str)
    -> Result<Option<String>, ClientError>;
}

#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Single-turn completion; returns the first choice's message text.
    async fn complete(&self, prompt: &str) -> Result<String, ClientError>;
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ClientError>;
}
