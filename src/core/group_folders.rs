//! Group folders administration.
//!
//! Every call is a single OCS request under `/apps/groupfolders`, see
//! <https://github.com/nextcloud/groupfolders#api>.

use std::sync::Arc;

use log::debug;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Method;
use serde_json::Value;

use super::{
    common::{
        http_client_factory::NextcloudClient,
        permission::Permissions,
        transport::{form, FormData, OcsResponse, Transport},
    },
    error::NextcloudError,
};

pub mod models;
pub use models::{decode_folder_list, AclManager, AclMappingType, GroupFolder, UNLIMITED_QUOTA};

const FOLDERS_PATH: &str = "/apps/groupfolders/folders";

fn group_path(folder_id: u64, group_id: &str) -> String {
    format!(
        "{FOLDERS_PATH}/{folder_id}/groups/{}",
        utf8_percent_encode(group_id, NON_ALPHANUMERIC)
    )
}

pub struct GroupFolderManager {
    transport: Arc<dyn Transport>,
}

impl GroupFolderManager {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn from_client(client: &NextcloudClient) -> Self {
        Self::new(Arc::new(client.clone()))
    }

    async fn query(
        &self,
        method: Method,
        sub: String,
        data: Option<FormData>,
    ) -> Result<OcsResponse<Value>, NextcloudError> {
        debug!("group folders: {method} {sub}");
        self.transport.ocs_query(method, sub, data).await
    }

    /// Lists all group folders, see [`decode_folder_list`] for typed access
    pub async fn get_all_group_folders(&self) -> Result<OcsResponse<Value>, NextcloudError> {
        self.query(Method::GET, FOLDERS_PATH.to_string(), None)
            .await
    }

    /// Creates a group folder mounted at `path`; `data.id` holds the new id
    pub async fn create_group_folder(&self, path: &str) -> Result<OcsResponse<Value>, NextcloudError> {
        self.query(
            Method::POST,
            FOLDERS_PATH.to_string(),
            Some(form(&[("mountpoint", path)])),
        )
        .await
    }

    pub async fn get_group_folder(&self, folder_id: u64) -> Result<OcsResponse<Value>, NextcloudError> {
        self.query(Method::GET, format!("{FOLDERS_PATH}/{folder_id}"), None)
            .await
    }

    pub async fn remove_group_folder(
        &self,
        folder_id: u64,
    ) -> Result<OcsResponse<Value>, NextcloudError> {
        self.query(Method::DELETE, format!("{FOLDERS_PATH}/{folder_id}"), None)
            .await
    }

    /// Gives `group_id` access to `folder_id`
    pub async fn add_group_to_group_folder(
        &self,
        group_id: &str,
        folder_id: u64,
    ) -> Result<OcsResponse<Value>, NextcloudError> {
        self.query(
            Method::POST,
            format!("{FOLDERS_PATH}/{folder_id}/groups"),
            Some(form(&[("group", group_id)])),
        )
        .await
    }

    pub async fn remove_group_from_group_folder(
        &self,
        group_id: &str,
        folder_id: u64,
    ) -> Result<OcsResponse<Value>, NextcloudError> {
        self.query(
            Method::DELETE,
            group_path(folder_id, group_id),
            None,
        )
        .await
    }

    pub async fn enable_group_folder_advanced_permissions(
        &self,
        folder_id: u64,
    ) -> Result<OcsResponse<Value>, NextcloudError> {
        self.advanced_permissions(folder_id, true).await
    }

    pub async fn disable_group_folder_advanced_permissions(
        &self,
        folder_id: u64,
    ) -> Result<OcsResponse<Value>, NextcloudError> {
        self.advanced_permissions(folder_id, false).await
    }

    async fn advanced_permissions(
        &self,
        folder_id: u64,
        enable: bool,
    ) -> Result<OcsResponse<Value>, NextcloudError> {
        self.query(
            Method::POST,
            format!("{FOLDERS_PATH}/{folder_id}/acl"),
            Some(form(&[("acl", if enable { 1 } else { 0 })])),
        )
        .await
    }

    /// Lets `object_id` manage the advanced permissions of `folder_id`
    pub async fn add_group_folder_advanced_permissions(
        &self,
        folder_id: u64,
        object_id: &str,
        object_type: AclMappingType,
    ) -> Result<OcsResponse<Value>, NextcloudError> {
        self.advanced_permissions_admin(folder_id, object_id, object_type, true)
            .await
    }

    pub async fn remove_group_folder_advanced_permissions(
        &self,
        folder_id: u64,
        object_id: &str,
        object_type: AclMappingType,
    ) -> Result<OcsResponse<Value>, NextcloudError> {
        self.advanced_permissions_admin(folder_id, object_id, object_type, false)
            .await
    }

    async fn advanced_permissions_admin(
        &self,
        folder_id: u64,
        object_id: &str,
        object_type: AclMappingType,
        manage_acl: bool,
    ) -> Result<OcsResponse<Value>, NextcloudError> {
        self.query(
            Method::POST,
            format!("{FOLDERS_PATH}/{folder_id}/manageACL"),
            Some(form(&[
                ("mappingId", object_id.to_string()),
                ("mappingType", object_type.to_string()),
                ("manageAcl", manage_acl.to_string()),
            ])),
        )
        .await
    }

    /// Sets what `group_id` may do inside `folder_id`
    pub async fn set_group_folder_permissions(
        &self,
        folder_id: u64,
        group_id: &str,
        permissions: Permissions,
    ) -> Result<OcsResponse<Value>, NextcloudError> {
        self.query(
            Method::POST,
            group_path(folder_id, group_id),
            Some(form(&[("permissions", permissions.bits())])),
        )
        .await
    }

    /// `quota` is in bytes, [`UNLIMITED_QUOTA`] lifts the limit
    pub async fn set_group_folder_quota(
        &self,
        folder_id: u64,
        quota: i64,
    ) -> Result<OcsResponse<Value>, NextcloudError> {
        self.query(
            Method::POST,
            format!("{FOLDERS_PATH}/{folder_id}/quota"),
            Some(form(&[("quota", quota)])),
        )
        .await
    }

    pub async fn rename_group_folder(
        &self,
        folder_id: u64,
        mountpoint: &str,
    ) -> Result<OcsResponse<Value>, NextcloudError> {
        self.query(
            Method::POST,
            format!("{FOLDERS_PATH}/{folder_id}/mountpoint"),
            Some(form(&[("mountpoint", mountpoint)])),
        )
        .await
    }
}

#[cfg(test)]
mod tests;
