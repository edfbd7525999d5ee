use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shelf_types::{CollectionKind, Deleted, ErrorBody, Health, ItemEnvelope, ItemList};
use tracing::debug;
use url::Url;

use crate::error::{BridgeError, Result};

/// HTTP client for one collection, items are kept as raw JSON.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    collection: CollectionKind,
}

impl ApiClient {
    pub fn new(base_url: Url, collection: CollectionKind, timeout: Duration) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(BridgeError::InvalidBaseUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(ApiClient {
            http,
            base_url,
            collection,
        })
    }

    pub fn collection(&self) -> CollectionKind {
        self.collection
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn collection_url(&self, id: Option<u64>) -> Url {
        match id {
            Some(id) => {
                let id = id.to_string();
                self.endpoint(&[self.collection.as_str(), id.as_str()])
            }
            None => self.endpoint(&[self.collection.as_str()]),
        }
    }

    pub async fn health(&self) -> Result<Health> {
        let response = self.http.get(self.endpoint(&["health"])).send().await?;
        parse(response).await
    }

    pub async fn list(&self) -> Result<ItemList<Value>> {
        let response = self.http.get(self.collection_url(None)).send().await?;
        parse(response).await
    }

    pub async fn get(&self, id: u64) -> Result<ItemEnvelope<Value>> {
        let response = self.http.get(self.collection_url(Some(id))).send().await?;
        parse(response).await
    }

    pub async fn create(&self, fields: &Value) -> Result<ItemEnvelope<Value>> {
        let response = self
            .http
            .post(self.collection_url(None))
            .json(fields)
            .send()
            .await?;
        parse(response).await
    }

    pub async fn update(&self, id: u64, fields: &Value) -> Result<ItemEnvelope<Value>> {
        let response = self
            .http
            .put(self.collection_url(Some(id)))
            .json(fields)
            .send()
            .await?;
        parse(response).await
    }

    pub async fn delete(&self, id: u64) -> Result<Deleted> {
        let response = self
            .http
            .delete(self.collection_url(Some(id)))
            .send()
            .await?;
        parse(response).await
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    debug!("{} {}", status, response.url());
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let text = response.text().await?;
    Err(api_error(status, &text))
}

fn api_error(status: StatusCode, text: &str) -> BridgeError {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => BridgeError::Api {
            status: status.as_u16(),
            error: body.error,
            message: body.message,
        },
        Err(_) => BridgeError::Api {
            status: status.as_u16(),
            error: status
                .canonical_reason()
                .unwrap_or("Unexpected response")
                .to_string(),
            message: text.trim().to_string(),
        },
    }
}
