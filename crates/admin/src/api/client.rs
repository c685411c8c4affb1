//! HTTP implementation of [`EntityApi`] on top of `reqwest`.

use std::sync::Arc;

use async_trait::async_trait;
use emporium_core::Entity;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{ApiError, EntityApi, QueryParams};
use crate::config::ApiConfig;

/// Content type for PATCH requests.
const MERGE_PATCH_JSON: &str = "application/merge-patch+json";

/// REST client for the catalogue backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a new REST client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| ApiError::Parse(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(RestClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// The base URL all resource paths are joined to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn collection_url<E: Entity>(&self) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(&format!("api/{}", E::RESOURCE))?)
    }

    fn item_url<E: Entity>(&self, id: E::Id) -> Result<Url, ApiError> {
        Ok(self
            .inner
            .base_url
            .join(&format!("api/{}/{id}", E::RESOURCE))?)
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Turn a non-success response into an error.
    async fn parse_error(response: reqwest::Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return ApiError::Unauthorized(format!("{status}"));
        }

        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        } else {
            body
        };

        warn!(status = status.as_u16(), %message, "Backend returned an error");
        ApiError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl<E: Entity> EntityApi<E> for RestClient {
    #[instrument(skip(self), fields(resource = E::RESOURCE))]
    async fn find(&self, id: E::Id) -> Result<Option<E>, ApiError> {
        let url = self.item_url::<E>(id)?;
        let response = self.inner.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Entity not found");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        // An empty body is the backend's other way of saying "no such entity".
        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            debug!("Entity not found (empty body)");
            return Ok(None);
        }

        serde_json::from_slice::<Option<E>>(&body)
            .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")))
    }

    #[instrument(skip(self), fields(resource = E::RESOURCE))]
    async fn query(&self, params: &QueryParams) -> Result<Vec<E>, ApiError> {
        let mut url = self.collection_url::<E>()?;
        let pairs = params.pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        let response = self.inner.client.get(url).send().await?;
        let entities: Vec<E> = Self::handle_response(response).await?;
        debug!(count = entities.len(), "Entities listed");
        Ok(entities)
    }

    #[instrument(skip(self, entity), fields(resource = E::RESOURCE))]
    async fn create(&self, entity: &E::New) -> Result<E, ApiError> {
        let url = self.collection_url::<E>()?;
        let response = self.inner.client.post(url).json(entity).send().await?;
        let created: E = Self::handle_response(response).await?;
        debug!(id = %created.id(), "Entity created");
        Ok(created)
    }

    #[instrument(skip(self, entity), fields(resource = E::RESOURCE, id = %entity.id()))]
    async fn update(&self, entity: &E) -> Result<E, ApiError> {
        let url = self.item_url::<E>(entity.id())?;
        let response = self.inner.client.put(url).json(entity).send().await?;
        Self::handle_response(response).await
    }

    #[instrument(skip(self, patch), fields(resource = E::RESOURCE))]
    async fn partial_update(&self, id: E::Id, patch: &serde_json::Value) -> Result<E, ApiError> {
        let url = self.item_url::<E>(id)?;
        let body = serde_json::to_vec(patch)
            .map_err(|e| ApiError::Parse(format!("Failed to encode patch: {e}")))?;
        let response = self
            .inner
            .client
            .patch(url)
            .header(CONTENT_TYPE, MERGE_PATCH_JSON)
            .body(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    #[instrument(skip(self), fields(resource = E::RESOURCE))]
    async fn delete(&self, id: E::Id) -> Result<(), ApiError> {
        let url = self.item_url::<E>(id)?;
        let response = self.inner.client.delete(url).send().await?;

        if response.status().is_success() {
            debug!("Entity deleted");
            return Ok(());
        }

        Err(Self::parse_error(response).await)
    }
}
