use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client, Method,
};
use serde_json::Value;

use crate::core::error::NextcloudError;

use super::transport::{FormData, OcsEnvelope, OcsResponse, Transport, TransportResponse};

const OCS_API_REQUEST_HEADER: &str = "OCS-APIRequest";

/// Identifies this library to the server, resolved at build time
pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn http_client_factory(timeout: Duration) -> Result<Client, NextcloudError> {
    debug!("creating HTTP client");

    let client = reqwest::ClientBuilder::new()
        .user_agent(APP_USER_AGENT)
        .timeout(timeout)
        .build()?;

    Ok(client)
}

#[derive(Clone)]
struct Credentials {
    user: String,
    password: String,
}

/// reqwest backed [`Transport`] bound to one Nextcloud endpoint.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone)]
pub struct NextcloudClient {
    endpoint: String,
    client: Client,
    credentials: Option<Credentials>,
}

impl NextcloudClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, NextcloudError> {
        Self::with_timeout(endpoint, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NextcloudError> {
        let endpoint: String = endpoint.into();

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client: http_client_factory(timeout)?,
            credentials: None,
        })
    }

    /// Same endpoint and pool, authenticating as `user` from now on.
    /// `password` may be the user's password or an app password.
    pub fn with_credentials(&self, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            client: self.client.clone(),
            credentials: Some(Credentials {
                user: user.into(),
                password: password.into(),
            }),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn user(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.user.as_str())
    }
}

#[async_trait]
impl Transport for NextcloudClient {
    async fn request(
        &self,
        method: Method,
        url: String,
        headers: HeaderMap,
        data: Option<FormData>,
    ) -> Result<TransportResponse, NextcloudError> {
        debug!("{method} {url}");

        let mut builder = self.client.request(method, url).headers(headers);

        if let Some(form) = data {
            builder = builder.form(&form);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        debug!("received status {status}");

        Ok(TransportResponse::new(status, body))
    }

    async fn ocs_query(
        &self,
        method: Method,
        sub: String,
        data: Option<FormData>,
    ) -> Result<OcsResponse<Value>, NextcloudError> {
        let url = format!("{}{}", self.endpoint, sub);

        debug!("ocs query {method} {url}");

        let mut builder = self
            .client
            .request(method, url)
            .header(OCS_API_REQUEST_HEADER, HeaderValue::from_static("true"))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .query(&[("format", "json")]);

        if let Some(c) = &self.credentials {
            builder = builder.basic_auth(&c.user, Some(&c.password));
        }

        if let Some(form) = data {
            builder = builder.form(&form);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(NextcloudError::from_status(status, &body));
        }

        let envelope = serde_json::from_str::<OcsEnvelope<Value>>(&body)?;

        if !envelope.ocs.meta.is_ok() {
            return Err(NextcloudError::RemoteService {
                status: envelope.ocs.meta.statuscode,
                body: envelope.ocs.meta.message.unwrap_or_default(),
            });
        }

        Ok(envelope.ocs)
    }
}
