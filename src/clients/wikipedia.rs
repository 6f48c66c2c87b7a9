use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{ClientError, WikipediaSource, ensure_success};

pub const SERVICE: &str = "Wikipedia";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryPages>,
}

#[derive(Debug, Deserialize)]
struct QueryPages {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    missing: bool,
    extract: Option<String>,
    original: Option<PageImage>,
    thumbnail: Option<PageImage>,
}

#[derive(Debug, Deserialize)]
struct PageImage {
    source: String,
}

/// Reads extracts and lead images from the MediaWiki action API.
#[derive(Clone)]
pub struct WikipediaClient {
    client: Client,
    /// Endpoint template containing `{lang}`.
    url_template: String,
}

impl WikipediaClient {
    #[must_use]
    pub const fn with_shared_client(client: Client, url_template: String) -> Self {
        Self {
            client,
            url_template,
        }
    }

    fn endpoint(&self, language: &str, params: &[(&str, &str)]) -> Result<Url, ClientError> {
        if !is_valid_language_code(language) {
            return Err(ClientError::InvalidLanguage(language.to_string()));
        }

        let base = self.url_template.replace("{lang}", language);
        Url::parse_with_params(&base, params)
            .map_err(|e| ClientError::malformed(SERVICE, format!("invalid endpoint {base}: {e}")))
    }

    async fn first_page(&self, url: Url) -> Result<Option<Page>, ClientError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ClientError::http(SERVICE))?;

        let response: QueryResponse = ensure_success(SERVICE, response)
            .await?
            .json()
            .await
            .map_err(ClientError::http(SERVICE))?;

        Ok(first_existing_page(response))
    }
}

#[async_trait]
impl WikipediaSource for WikipediaClient {
    async fn extract(&self, language: &str, title: &str) -> Result<Option<String>, ClientError> {
        let url = self.endpoint(
            language,
            &[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
            ],
        )?;

        let page = self.first_page(url).await?;

        Ok(page
            .and_then(|p| p.extract)
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty()))
    }

    async fn lead_image(
        &self,
        language: &str,
        title: &str,
    ) -> Result<Option<String>, ClientError> {
        let url = self.endpoint(
            language,
            &[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("prop", "pageimages"),
                ("piprop", "original|thumbnail"),
                ("pithumbsize", "640"),
                ("redirects", "1"),
                ("titles", title),
            ],
        )?;

        let page = self.first_page(url).await?;

        Ok(page.and_then(|p| p.original.or(p.thumbnail).map(|img| img.source)))
    }
}

fn first_existing_page(response: QueryResponse) -> Option<Page> {
    response
        .query?
        .pages
        .into_iter()
        .find(|page| !page.missing)
}

/// Wikipedia language editions are named by lowercase ASCII codes such as
/// `en`, `fa` or `zh-yue`.
#[must_use]
pub fn is_valid_language_code(code: &str) -> bool {
    (2..=12).contains(&code.len())
        && code
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '-')
        && !code.starts_with('-')
        && !code.ends_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_code_validation() {
        assert!(is_valid_language_code("en"));
        assert!(is_valid_language_code("fa"));
        assert!(is_valid_language_code("zh-yue"));
        assert!(!is_valid_language_code("e"));
        assert!(!is_valid_language_code("EN"));
        assert!(!is_valid_language_code("en.evil.com/"));
        assert!(!is_valid_language_code("-en"));
    }

    #[test]
    fn missing_page_yields_none() {
        let json = r#"{"batchcomplete":true,"query":{"pages":[{"ns":0,"title":"Qwxz","missing":true}]}}"#;
        let response: QueryResponse = serde_json::from_str(json).unwrap();
        assert!(first_existing_page(response).is_none());
    }

    #[test]
    fn extract_and_image_are_read() {
        let json = r#"{"query":{"pages":[{"pageid":1,"title":"Rust","extract":"Rust is a language.",
            "thumbnail":{"source":"https://upload.example/thumb.png","width":640,"height":480}}]}}"#;
        let response: QueryResponse = serde_json::from_str(json).unwrap();
        let page = first_existing_page(response).unwrap();
        assert_eq!(page.extract.as_deref(), Some("Rust is a language."));
        assert!(page.original.is_none());
        assert_eq!(page.thumbnail.unwrap().source, "https://upload.example/thumb.png");
    }

    #[test]
    fn endpoint_rejects_bad_language() {
        let client = WikipediaClient::with_shared_client(
            Client::new(),
            "https://{lang}.wikipedia.org/w/api.php".to_string(),
        );
        assert!(matches!(
            client.endpoint("x/../", &[]),
            Err(ClientError::InvalidLanguage(_))
        ));
        let url = client.endpoint("fa", &[("titles", "تهران")]).unwrap();
        assert_eq!(url.host_str(), Some("fa.wikipedia.org"));
    }
}
