//! Keyword search: Wikipedia content plus generated summary and article,
//! cached per keyword with popularity tracking.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::clients::{ChatCompleter, ClientError, LanguageDetector, WikipediaSource};
use crate::config::SearchConfig;
use crate::db::Store;
use crate::models::search::SearchResult;
use crate::services::prompts::build_prompts;
use crate::services::text::{first_words, truncate_extract};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Keyword cannot be empty")]
    EmptyKeyword,

    #[error(transparent)]
    Upstream(#[from] ClientError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<anyhow::Error> for SearchError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Which source supplied a piece of the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Wikipedia,
    Fallback,
}

/// Wikipedia material gathered for one keyword after fallbacks are applied.
#[derive(Debug, Clone)]
pub struct SourceMaterial {
    pub language: String,
    pub extract: String,
    pub extract_origin: Origin,
    pub image_source: String,
    pub image_origin: Origin,
}

pub struct SearchService {
    store: Store,
    detector: Arc<dyn LanguageDetector>,
    wikipedia: Arc<dyn WikipediaSource>,
    chat: Arc<dyn ChatCompleter>,
    settings: SearchConfig,
}

impl SearchService {
    #[must_use]
    pub fn new(
        store: Store,
        detector: Arc<dyn LanguageDetector>,
        wikipedia: Arc<dyn WikipediaSource>,
        chat: Arc<dyn ChatCompleter>,
        settings: SearchConfig,
    ) -> Self {
        Self {
            store,
            detector,
            wikipedia,
            chat,
            settings,
        }
    }

    /// Returns the composed result for `keyword`, from cache when possible.
    ///
    /// Every call counts as one view of the keyword. When `user_id` is given the
    /// keyword is added to that user's history.
    #[instrument(skip(self), fields(cache_hit = tracing::field::Empty))]
    pub async fn search(
        &self,
        keyword: &str,
        user_id: Option<i32>,
    ) -> Result<SearchResult, SearchError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(SearchError::EmptyKeyword);
        }

        let (result, fresh) = if let Some(cached) = self.store.get_cached_search(keyword).await? {
            tracing::Span::current().record("cache_hit", true);
            metrics::counter!("search_cache_hits_total").increment(1);
            debug!("Serving '{}' from cache", keyword);
            (cached, false)
        } else {
            tracing::Span::current().record("cache_hit", false);
            metrics::counter!("search_cache_misses_total").increment(1);
            (self.generate(keyword).await?, true)
        };

        let summary = first_words(&result.summary, self.settings.summary_words);
        let ttl = chrono::Duration::hours(self.settings.cache_ttl_hours);
        self.store
            .record_search(
                keyword,
                &summary,
                &result.image_source,
                fresh.then_some((&result, ttl)),
                user_id,
            )
            .await?;

        Ok(result)
    }

    /// Runs the external call sequence for a cache miss.
    async fn generate(&self, keyword: &str) -> Result<SearchResult, SearchError> {
        let material = self.gather(keyword).await?;
        let prompts = build_prompts(&material.language, &material.extract);

        let summary = self.chat.complete(&prompts.summary).await?;
        let article = self.chat.complete(&prompts.article).await?;

        info!(
            keyword = %keyword,
            language = %material.language,
            extract_origin = ?material.extract_origin,
            image_origin = ?material.image_origin,
            "Generated search result"
        );

        Ok(SearchResult {
            keyword: keyword.to_string(),
            summary,
            article,
            image_source: material.image_source,
        })
    }

    /// Detects the keyword language and collects its Wikipedia extract and
    /// lead image, substituting the keyword and the placeholder image when
    /// Wikipedia has nothing.
    pub async fn gather(&self, keyword: &str) -> Result<SourceMaterial, SearchError> {
        let language = self.detector.detect_language(keyword).await?;

        let (extract, extract_origin) = match self.wikipedia.extract(&language, keyword).await? {
            Some(extract) => (
                truncate_extract(
                    &extract,
                    self.settings.extract_max_chars,
                    self.settings.hard_truncate_chars,
                ),
                Origin::Wikipedia,
            ),
            None => (keyword.to_string(), Origin::Fallback),
        };

        let (image_source, image_origin) = match self.wikipedia.lead_image(&language, keyword).await?
        {
            Some(url) => (url, Origin::Wikipedia),
            None => (self.settings.placeholder_image.clone(), Origin::Fallback),
        };

        Ok(SourceMaterial {
            language,
            extract,
            extract_origin,
            image_source,
            image_origin,
        })
    }
}
