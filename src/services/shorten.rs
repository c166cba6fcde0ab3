//! Batch shortening service
//!
//! Accepts up to five URLs per request, assigns each a unique shortcode and
//! collects per-item failures instead of aborting the batch.

use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{Config, MAX_BATCH_SIZE, MAX_VALIDITY_MINUTES};
use crate::errors::{BatchlinkError, Result};
use crate::storages::{SerializableShortUrl, ShortUrl, Storage};
use crate::utils::url_validator::validate_url;
use crate::utils::{generate_random_code, validate_custom_code};

/// Retry budget for auto-generated codes before giving up.
const MAX_GENERATION_ATTEMPTS: usize = 5;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ShortenRequest {
    pub urls: Vec<String>,
    pub validity: Option<i64>,
    pub shortcode: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FailedItem {
    pub url: String,
    pub error: BatchlinkError,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub created: Vec<ShortUrl>,
    pub failed: Vec<FailedItem>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FailedItemBody {
    pub url: String,
    pub code: String,
    pub error: String,
}

impl From<&FailedItem> for FailedItemBody {
    fn from(item: &FailedItem) -> Self {
        FailedItemBody {
            url: item.url.clone(),
            code: item.error.code().to_string(),
            error: item.error.format_simple(),
        }
    }
}

pub struct ShortenService;

impl ShortenService {
    /// POST /shorten
    pub async fn post_shorten(
        payload: web::Json<ShortenRequest>,
        storage: web::Data<Arc<dyn Storage>>,
        config: web::Data<Config>,
    ) -> impl Responder {
        info!("Shorten API: batch request with {} URLs", payload.urls.len());

        let outcome =
            match Self::create_batch(storage.get_ref().as_ref(), &config, payload.into_inner())
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    info!("Shorten API: batch rejected - {}", e);
                    return HttpResponse::build(e.http_status())
                        .append_header(("Content-Type", "application/json; charset=utf-8"))
                        .json(serde_json::json!({ "error": e.format_simple() }));
                }
            };

        let failed: Vec<FailedItemBody> = outcome.failed.iter().map(FailedItemBody::from).collect();

        if outcome.created.is_empty() {
            info!("Shorten API: all {} items failed", failed.len());
            return HttpResponse::BadRequest()
                .append_header(("Content-Type", "application/json; charset=utf-8"))
                .json(serde_json::json!({
                    "error": format!("All {} URLs in the batch failed", failed.len()),
                    "failed": failed,
                }));
        }

        let urls: Vec<SerializableShortUrl> = outcome
            .created
            .iter()
            .map(SerializableShortUrl::from)
            .collect();

        info!(
            "Shorten API: created {} URLs, {} failed",
            urls.len(),
            failed.len()
        );

        HttpResponse::Created()
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(serde_json::json!({ "urls": urls, "failed": failed }))
    }

    /// GET /urls — all mappings in creation order, for the statistics view.
    pub async fn get_all_urls(storage: web::Data<Arc<dyn Storage>>) -> impl Responder {
        let urls: Vec<SerializableShortUrl> = storage
            .load_all()
            .await
            .iter()
            .map(SerializableShortUrl::from)
            .collect();

        debug!("Shorten API: listing {} URLs", urls.len());

        HttpResponse::Ok()
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(serde_json::json!({ "urls": urls }))
    }

    /// Shorten every URL in the batch, one mapping per item.
    ///
    /// Request-level violations (empty batch, oversized batch, validity out
    /// of range) fail the whole call; anything per-item is collected in the
    /// outcome and siblings keep processing. A custom shortcode applies to
    /// the first item only, matching the contract the UI exercises.
    pub async fn create_batch(
        storage: &dyn Storage,
        config: &Config,
        req: ShortenRequest,
    ) -> Result<BatchOutcome> {
        let urls: Vec<String> = req
            .urls
            .iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();

        if urls.is_empty() {
            return Err(BatchlinkError::no_urls_provided(
                "At least one URL is required",
            ));
        }

        if urls.len() > MAX_BATCH_SIZE {
            return Err(BatchlinkError::validation(format!(
                "A batch may contain at most {} URLs, got {}",
                MAX_BATCH_SIZE,
                urls.len()
            )));
        }

        let validity = req.validity.unwrap_or(config.default_validity_minutes);
        if !(1..=MAX_VALIDITY_MINUTES).contains(&validity) {
            return Err(BatchlinkError::validation(format!(
                "Validity must be between 1 and {} minutes, got {}",
                MAX_VALIDITY_MINUTES, validity
            )));
        }

        let shortcode = req
            .shortcode
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let mut outcome = BatchOutcome::default();

        for (i, url) in urls.into_iter().enumerate() {
            if let Err(e) = validate_url(&url) {
                debug!("Shorten: rejecting '{}': {}", url, e);
                outcome.failed.push(FailedItem { url, error: e });
                continue;
            }

            let result = match (i, shortcode) {
                (0, Some(code)) => {
                    Self::create_with_custom_code(storage, code, &url, validity).await
                }
                _ => {
                    Self::create_with_generated_code(
                        storage,
                        config.random_code_length,
                        &url,
                        validity,
                    )
                    .await
                }
            };

            match result {
                Ok(created) => {
                    info!("Shorten: '{}' -> '{}'", created.code, created.target);
                    outcome.created.push(created);
                }
                Err(e) => {
                    info!("Shorten: failed for '{}': {}", url, e);
                    outcome.failed.push(FailedItem { url, error: e });
                }
            }
        }

        Ok(outcome)
    }

    /// A collision on a user-supplied code is terminal, never retried.
    async fn create_with_custom_code(
        storage: &dyn Storage,
        code: &str,
        target: &str,
        validity: i64,
    ) -> Result<ShortUrl> {
        validate_custom_code(code)?;

        let url = ShortUrl::new(code.to_string(), target.to_string(), validity);
        storage.insert(url.clone()).await?;
        Ok(url)
    }

    /// Auto-generated codes retry on collision within a fixed budget. The
    /// insert is the reservation: first writer wins, losers regenerate.
    async fn create_with_generated_code(
        storage: &dyn Storage,
        code_length: usize,
        target: &str,
        validity: i64,
    ) -> Result<ShortUrl> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let code = generate_random_code(code_length);
            let url = ShortUrl::new(code, target.to_string(), validity);

            match storage.insert(url.clone()).await {
                Ok(()) => return Ok(url),
                Err(BatchlinkError::CodeTaken(_)) => {
                    debug!(
                        "Shorten: generated code '{}' collided (attempt {}/{})",
                        url.code, attempt, MAX_GENERATION_ATTEMPTS
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(BatchlinkError::generation_exhausted(format!(
            "Could not find a free code in {} attempts",
            MAX_GENERATION_ATTEMPTS
        )))
    }
}
