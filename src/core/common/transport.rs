use async_trait::async_trait;
use mockall::automock;
use reqwest::{header::HeaderMap, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::NextcloudError;

/// Form encoded request body, as ordered key/value pairs
pub type FormData = Vec<(String, String)>;

/// Capability every operation of this crate is built upon.
///
/// `request` is a raw call against an absolute url, `ocs_query` targets a
/// path relative to the configured endpoint and unwraps the OCS envelope.
/// Implementations are shared between concurrent calls.
#[automock]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        url: String,
        headers: HeaderMap,
        data: Option<FormData>,
    ) -> Result<TransportResponse, NextcloudError>;

    async fn ocs_query(
        &self,
        method: Method,
        sub: String,
        data: Option<FormData>,
    ) -> Result<OcsResponse<Value>, NextcloudError>;
}

#[derive(Clone, Debug)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, NextcloudError> {
        Ok(serde_json::from_str::<T>(&self.body)?)
    }

    pub fn error_for_status(self) -> Result<Self, NextcloudError> {
        if !self.status.is_success() {
            return Err(NextcloudError::from_status(self.status, &self.body));
        }

        Ok(self)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct OcsEnvelope<T> {
    pub ocs: OcsResponse<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct OcsResponse<T> {
    pub meta: OcsMeta,
    #[serde(default)]
    pub data: T,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OcsMeta {
    pub status: String,
    pub statuscode: u16,
    pub message: Option<String>,
    pub totalitems: Option<String>,
    pub itemsperpage: Option<String>,
}

impl OcsMeta {
    /// OCS v1 reports success as 100, v2 as 200
    pub fn is_ok(&self) -> bool {
        self.statuscode == 100 || self.statuscode == 200
    }
}

impl OcsResponse<Value> {
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, NextcloudError> {
        Ok(serde_json::from_value::<T>(self.data.clone())?)
    }
}

/// Builds a [`FormData`] from borrowed pairs
pub fn form<K: ToString, V: ToString>(pairs: &[(K, V)]) -> FormData {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
