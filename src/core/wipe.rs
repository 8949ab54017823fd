//! Remote wipe signalling for app passwords obtained through Login Flow v2.
//!
//! An administrator (or the user) may flag an app password for wiping. The
//! client checks with its own app password, erases its local data and then
//! acknowledges, which deletes the app password server side.

use std::sync::Arc;

use log::{debug, info, warn};
use reqwest::{header::HeaderMap, Method, StatusCode};
use serde::Deserialize;

use super::{
    common::{
        http_client_factory::NextcloudClient,
        transport::{form, Transport},
    },
    error::NextcloudError,
};

const WIPE_CHECK_PATH: &str = "/index.php/core/wipe/check";
const WIPE_SUCCESS_PATH: &str = "/index.php/core/wipe/success";

#[derive(Deserialize, Clone, Debug)]
struct WipeStatus {
    #[serde(default)]
    wipe: bool,
}

pub struct RemoteWipe {
    endpoint: String,
    transport: Arc<dyn Transport>,
}

impl RemoteWipe {
    pub fn new(endpoint: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let endpoint: String = endpoint.into();

        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn from_client(client: &NextcloudClient) -> Self {
        Self::new(client.endpoint(), Arc::new(client.clone()))
    }

    /// Whether the app password `token` has been flagged for wiping.
    ///
    /// The server answers 404 for tokens that are not flagged.
    pub async fn check_remote_wipe(&self, token: &str) -> Result<bool, NextcloudError> {
        debug!("checking remote wipe status");

        let response = self
            .transport
            .request(
                Method::POST,
                format!("{}{}", self.endpoint, WIPE_CHECK_PATH),
                HeaderMap::new(),
                Some(form(&[("token", token)])),
            )
            .await?;

        if response.status == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        let status = response.error_for_status()?.json::<WipeStatus>()?;

        if status.wipe {
            warn!("remote wipe requested for this application");
        }

        Ok(status.wipe)
    }

    /// Acknowledges a completed wipe; the server deletes the app password.
    pub async fn notify_remote_wipe_success(&self, token: &str) -> Result<(), NextcloudError> {
        debug!("acknowledging remote wipe");

        self.transport
            .request(
                Method::POST,
                format!("{}{}", self.endpoint, WIPE_SUCCESS_PATH),
                HeaderMap::new(),
                Some(form(&[("token", token)])),
            )
            .await?
            .error_for_status()?;

        info!("remote wipe acknowledged");

        Ok(())
    }
}
