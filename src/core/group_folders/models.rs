use std::{collections::HashMap, fmt::Display};

use serde::{
    de::{DeserializeOwned, Error as _},
    Deserialize, Deserializer, Serialize,
};
use serde_json::Value;

use crate::core::{common::permission::Permissions, error::NextcloudError};

/// Quota value meaning "no limit"
pub const UNLIMITED_QUOTA: i64 = -3;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AclMappingType {
    User,
    Group,
    /// Teams, formerly circles
    Circle,
    #[serde(other)]
    Other,
}

impl AclMappingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AclMappingType::User => "user",
            AclMappingType::Group => "group",
            AclMappingType::Circle => "circle",
            AclMappingType::Other => "other",
        }
    }
}

impl Display for AclMappingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User or group allowed to edit a folder's advanced permissions
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct AclManager {
    #[serde(rename = "type")]
    pub mapping_type: AclMappingType,
    pub id: String,
    pub displayname: Option<String>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct GroupFolder {
    pub id: u64,
    pub mount_point: String,
    #[serde(default, deserialize_with = "deserialize_groups")]
    pub groups: HashMap<String, Permissions>,
    #[serde(default = "default_quota", deserialize_with = "deserialize_quota")]
    pub quota: i64,
    pub size: Option<i64>,
    #[serde(default)]
    pub acl: bool,
    #[serde(default, deserialize_with = "deserialize_managers")]
    pub manage: Vec<AclManager>,
}

impl GroupFolder {
    pub fn is_unlimited(&self) -> bool {
        self.quota == UNLIMITED_QUOTA
    }
}

fn default_quota() -> i64 {
    UNLIMITED_QUOTA
}

/// Grants are either the bare mask or, on newer servers, an object
#[derive(Deserialize)]
#[serde(untagged)]
enum GroupGrant {
    Mask(Permissions),
    Detailed { permissions: Permissions },
}

impl From<GroupGrant> for Permissions {
    fn from(grant: GroupGrant) -> Self {
        match grant {
            GroupGrant::Mask(p) => p,
            GroupGrant::Detailed { permissions } => permissions,
        }
    }
}

/// Entries keyed by name, or a plain list since PHP encodes an empty map as `[]`
fn map_or_list<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: DeserializeOwned,
{
    let entries = match Value::deserialize(deserializer)? {
        Value::Object(m) => m.into_iter().collect::<Vec<_>>(),
        Value::Array(l) => l
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        other => {
            return Err(D::Error::custom(format!(
                "expected a map or a list, got {other}"
            )))
        }
    };

    entries
        .into_iter()
        .map(|(k, v)| {
            serde_json::from_value::<V>(v)
                .map(|v| (k.clone(), v))
                .map_err(|e| D::Error::custom(format!("entry {k}: {e}")))
        })
        .collect()
}

fn deserialize_groups<'de, D>(deserializer: D) -> Result<HashMap<String, Permissions>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(map_or_list::<D, GroupGrant>(deserializer)?
        .into_iter()
        .map(|(k, v)| (k, v.into()))
        .collect())
}

fn deserialize_managers<'de, D>(deserializer: D) -> Result<Vec<AclManager>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(map_or_list::<D, AclManager>(deserializer)?
        .into_iter()
        .map(|(_, v)| v)
        .collect())
}

/// Some server versions send the quota as a numeric string
fn deserialize_quota<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Quota {
        Int(i64),
        Text(String),
    }

    match Quota::deserialize(deserializer)? {
        Quota::Int(q) => Ok(q),
        Quota::Text(t) => t.trim().parse::<i64>().map_err(serde::de::Error::custom),
    }
}

/// Decodes the `data` of a folder listing, keyed by id or as a plain list
pub fn decode_folder_list(data: &Value) -> Result<Vec<GroupFolder>, NextcloudError> {
    let mut folders = map_or_list::<_, GroupFolder>(data)?
        .into_iter()
        .map(|(_, f)| f)
        .collect::<Vec<_>>();

    folders.sort_by_key(|f| f.id);

    Ok(folders)
}
