//! Outbound HTTP fetch collaborator.

use crate::error::{AppError, Result};
use crate::web::scrape::is_allowed_url;
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Url;
use std::time::Duration;

const USER_AGENT: &str = concat!("gamified-rag/", env!("CARGO_PKG_VERSION"));

/// Redirect hops followed before the request fails.
const MAX_REDIRECTS: usize = 5;

/// Status and body of a completed fetch.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// A 3xx that the client declined to follow.
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }
}

/// Whether a redirect to `target` is followed after `hops` earlier hops.
///
/// Only hops onto the scrape allow-list are followed. Anything else stops the
/// request and hands the 3xx back to the caller.
fn should_follow(target: &Url, hops: usize) -> bool {
    hops < MAX_REDIRECTS && is_allowed_url(target)
}

fn redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        let hops = attempt.previous().len();
        if should_follow(attempt.url(), hops) {
            attempt.follow()
        } else if hops >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else {
            tracing::warn!(target_url = %attempt.url(), "Redirect outside allow-list not followed");
            attempt.stop()
        }
    })
}

/// Fetches a URL with optional extra headers.
///
/// Transport errors are reported as [`AppError::CollaboratorFailure`];
/// non-2xx statuses are returned as responses for the caller to judge.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<FetchResponse>;
}

/// [`HttpFetcher`] backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(redirect_policy())
            .build()
            .map_err(|e| AppError::InternalError(format!("HTTP client error: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<FetchResponse> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::CollaboratorFailure(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            AppError::CollaboratorFailure(format!("Failed to read response body: {}", e))
        })?;

        tracing::debug!(status, bytes = body.len(), "Fetch completed");

        Ok(FetchResponse { status, body })
    }
}
