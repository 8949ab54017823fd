//! Nextcloud Login Flow v2.
//!
//! Lets an application obtain an app password once the user authorized it
//! in a browser, instead of handling the user's own password:
//!
//! 1. [`LoginFlow::initiate`] returns the url to show to the user and a poll token,
//! 2. [`LoginFlow::await_confirmation`] polls until the user granted access,
//! 3. [`LoginFlow::revoke`] deletes the app password the transport is logged in with.
//!
//! The user keeps the ability to revoke (or remote wipe) the application from
//! the server's security settings.

use std::{sync::Arc, time::Duration};

use log::{debug, info, warn};
use reqwest::{
    header::{HeaderMap, HeaderValue, USER_AGENT},
    Method, StatusCode,
};
use serde_json::Value;
use tokio::time::{sleep, Instant};

use super::{
    common::{
        http_client_factory::{NextcloudClient, APP_USER_AGENT},
        transport::{form, OcsResponse, Transport, TransportResponse},
    },
    error::NextcloudError,
};

pub mod common;
pub use common::{AppCredential, PendingLoginSession, PollEndpoint};


/// Seconds `await_confirmation` keeps polling by default
pub const DEFAULT_TIMEOUT: u64 = 60;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

const LOGIN_PATH: &str = "/index.php/login/v2";
const POLL_PATH: &str = "/index.php/login/v2/poll";
const APP_PASSWORD_PATH: &str = "/ocs/v2.php/core/apppassword";

pub struct LoginFlow {
    endpoint: String,
    transport: Arc<dyn Transport>,
}

impl LoginFlow {
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

    /// Starts a fresh login attempt.
    ///
    /// `user_agent` is shown as the application name in the user's security
    /// settings; the library name and version are sent when omitted.
    pub async fn initiate(
        &self,
        user_agent: Option<&str>,
    ) -> Result<PendingLoginSession, NextcloudError> {
        debug!("initiating login flow");

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent.unwrap_or(APP_USER_AGENT))?,
        );

        let response = self
            .transport
            .request(
                Method::POST,
                format!("{}{}", self.endpoint, LOGIN_PATH),
                headers,
                None,
            )
            .await?
            .error_for_status()?;

        let session = response.json::<PendingLoginSession>()?;

        info!("login flow initiated, waiting for user at {}", session.login);

        Ok(session)
    }

    /// Polls once a second until the user confirmed the login.
    ///
    /// A 404 means the login is still pending; any other status ends the
    /// wait. Elapsed time is counted in whole seconds from the first poll, so
    /// the call may return up to about two seconds after `timeout`.
    /// Dropping the returned future stops the polling.
    pub async fn await_confirmation(
        &self,
        token: &str,
        timeout: u64,
    ) -> Result<AppCredential, NextcloudError> {
        debug!("waiting for login confirmation");

        let start = Instant::now();
        let mut running_time = 0;

        let mut response = self.poll(token).await?;

        while response.status == StatusCode::NOT_FOUND && running_time < timeout {
            response = self.poll(token).await?;
            running_time = start.elapsed().as_secs();
            sleep(POLL_INTERVAL).await;
        }

        if response.status == StatusCode::NOT_FOUND {
            warn!("login flow timed out after {running_time}s");
            return Err(NextcloudError::LoginFlowTimeout(
                "Login flow timed out. You can try again.".to_string(),
            ));
        }

        let credential = response.error_for_status()?.json::<AppCredential>()?;

        info!("login confirmed for {}", credential.login_name);

        Ok(credential)
    }

    /// Deletes the app password the transport currently authenticates with.
    ///
    /// Any copy of that credential kept by the caller becomes useless.
    pub async fn revoke(&self) -> Result<OcsResponse<Value>, NextcloudError> {
        debug!("revoking app password");

        self.transport
            .ocs_query(Method::DELETE, APP_PASSWORD_PATH.to_string(), None)
            .await
    }

    async fn poll(&self, token: &str) -> Result<TransportResponse, NextcloudError> {
        debug!("polling login flow status");

        self.transport
            .request(
                Method::POST,
                format!("{}{}", self.endpoint, POLL_PATH),
                HeaderMap::new(),
                Some(form(&[("token", token)])),
            )
            .await
    }
}
