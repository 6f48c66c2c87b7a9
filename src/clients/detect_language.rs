use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{ClientError, LanguageDetector, ensure_success};

pub const SERVICE: &str = "Language detection";

#[derive(Debug, Deserialize)]
struct DetectResponse {
    data: DetectData,
}

#[derive(Debug, Deserialize)]
struct DetectData {
    #[serde(default)]
    detections: Vec<Detection>,
}

#[derive(Debug, Deserialize)]
struct Detection {
    language: String,
    #[serde(rename = "isReliable", default)]
    is_reliable: bool,
    #[serde(default)]
    confidence: f64,
}

/// Client for a detectlanguage.com-compatible endpoint.
#[derive(Clone)]
pub struct DetectLanguageClient {
    client: Client,
    url: String,
    api_key: String,
}

impl DetectLanguageClient {
    #[must_use]
    pub const fn with_shared_client(client: Client, url: String, api_key: String) -> Self {
        Self {
            client,
            url,
            api_key,
        }
    }
}

#[async_trait]
impl LanguageDetector for DetectLanguageClient {
    async fn detect_language(&self, text: &str) -> Result<String, ClientError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .form(&[("q", text)])
            .send()
            .await
            .map_err(ClientError::http(SERVICE))?;

        let response: DetectResponse = ensure_success(SERVICE, response)
            .await?
            .json()
            .await
            .map_err(ClientError::http(SERVICE))?;

        pick_language(response)
    }
}

/// Takes the most confident detection, reliable ones first.
fn pick_language(response: DetectResponse) -> Result<String, ClientError> {
    let best = response.data.detections.into_iter().max_by(|a, b| {
        a.is_reliable
            .cmp(&b.is_reliable)
            .then(a.confidence.total_cmp(&b.confidence))
    });

    let Some(best) = best else {
        return Err(ClientError::malformed(SERVICE, "no language detected"));
    };

    let primary = best
        .language
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    if primary.is_empty() {
        return Err(ClientError::malformed(SERVICE, "empty language code"));
    }

    Ok(primary)
}
