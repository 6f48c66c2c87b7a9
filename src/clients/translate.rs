use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{ClientError, Translator, ensure_success};

pub const SERVICE: &str = "Translation";

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Client for a Google Translate v2-compatible endpoint.
#[derive(Clone)]
pub struct TranslateClient {
    client: Client,
    url: String,
    api_key: String,
}

impl TranslateClient {
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
impl Translator for TranslateClient {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ClientError> {
        let url = Url::parse_with_params(&self.url, &[("key", self.api_key.as_str())])
            .map_err(|e| ClientError::malformed(SERVICE, format!("invalid endpoint: {e}")))?;

        let response = self
            .client
            .post(url)
            .json(&TranslateRequest {
                q: text,
                target: target_language,
                format: "text",
            })
            .send()
            .await
            .map_err(ClientError::http(SERVICE))?;

        let response: TranslateResponse = ensure_success(SERVICE, response)
            .await?
            .json()
            .await
            .map_err(ClientError::http(SERVICE))?;

        response
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| ClientError::malformed(SERVICE, "no translation returned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_translation_payload() {
        let json = r#"{"data":{"translations":[{"translatedText":"سلام","detectedSourceLanguage":"en"}]}}"#;
        let response: TranslateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.translations[0].translated_text, "سلام");
    }
}
