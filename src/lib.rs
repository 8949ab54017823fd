//! Async client for a Nextcloud server.
//!
//! Covers the Login Flow v2 handshake (browser based login minting an app
//! password), remote wipe signalling and group folders administration.
//!
//! ```no_run
//! use nextcloud_aio::core::{common::http_client_factory::NextcloudClient, login_flow::LoginFlow};
//!
//! # async fn run() -> Result<(), nextcloud_aio::core::error::NextcloudError> {
//! let client = NextcloudClient::new("https://cloud.example.com")?;
//! let flow = LoginFlow::from_client(&client);
//!
//! let pending = flow.initiate(None).await?;
//! println!("open {} to grant access", pending.login);
//!
//! let credential = flow.await_confirmation(&pending.poll.token, 60).await?;
//! println!("app password: {}", credential.app_password);
//! # Ok(())
//! # }
//! ```

pub mod core;

pub use crate::core::{
    common::{
        http_client_factory::NextcloudClient,
        permission::Permissions,
        transport::{OcsResponse, Transport, TransportResponse},
    },
    error::NextcloudError,
    group_folders::GroupFolderManager,
    login_flow::{AppCredential, LoginFlow, PendingLoginSession},
    wipe::RemoteWipe,
};
