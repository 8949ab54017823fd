use std::sync::Arc;

use mockall::predicate::eq;
use reqwest::Method;
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_string, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use super::{decode_folder_list, AclMappingType, GroupFolder, GroupFolderManager};
use crate::core::common::{
    http_client_factory::NextcloudClient,
    permission::Permissions,
    transport::{form, FormData, MockTransport, OcsMeta, OcsResponse},
};

fn ok(data: Value) -> OcsResponse<Value> {
    OcsResponse {
        meta: OcsMeta {
            status: "ok".to_string(),
            statuscode: 200,
            message: Some("OK".to_string()),
            totalitems: None,
            itemsperpage: None,
        },
        data,
    }
}

fn expecting(m: Method, sub: &str, data: Option<FormData>) -> GroupFolderManager {
    let mut transport = MockTransport::new();

    transport
        .expect_ocs_query()
        .with(eq(m), eq(sub.to_string()), eq(data))
        .times(1)
        .returning(|_, _, _| Ok(ok(json!([]))));

    GroupFolderManager::new(Arc::new(transport))
}

#[tokio::test]
async fn lists_and_creates_folders() {
    expecting(Method::GET, "/apps/groupfolders/folders", None)
        .get_all_group_folders()
        .await
        .unwrap();

    expecting(
        Method::POST,
        "/apps/groupfolders/folders",
        Some(form(&[("mountpoint", "Team")])),
    )
    .create_group_folder("Team")
    .await
    .unwrap();
}

#[tokio::test]
async fn gets_and_removes_folder() {
    expecting(Method::GET, "/apps/groupfolders/folders/5", None)
        .get_group_folder(5)
        .await
        .unwrap();

    expecting(Method::DELETE, "/apps/groupfolders/folders/5", None)
        .remove_group_folder(5)
        .await
        .unwrap();
}

#[tokio::test]
async fn grants_and_revokes_groups() {
    expecting(
        Method::POST,
        "/apps/groupfolders/folders/5/groups",
        Some(form(&[("group", "staff")])),
    )
    .add_group_to_group_folder("staff", 5)
    .await
    .unwrap();

    expecting(
        Method::DELETE,
        "/apps/groupfolders/folders/5/groups/staff",
        None,
    )
    .remove_group_from_group_folder("staff", 5)
    .await
    .unwrap();
}

#[tokio::test]
async fn group_names_are_escaped_in_path() {
    expecting(
        Method::DELETE,
        "/apps/groupfolders/folders/5/groups/R%26D%20%231",
        None,
    )
    .remove_group_from_group_folder("R&D #1", 5)
    .await
    .unwrap();

    expecting(
        Method::POST,
        "/apps/groupfolders/folders/5/groups/sales%2Feu%3Fx",
        Some(form(&[("permissions", "1")])),
    )
    .set_group_folder_permissions(5, "sales/eu?x", Permissions::READ)
    .await
    .unwrap();
}

#[tokio::test]
async fn remove_group_with_special_characters_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/apps/groupfolders/folders/5/groups/R%26D%20%231"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ocs": { "meta": { "status": "ok", "statuscode": 200, "message": "OK" }, "data": { "success": true } }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = NextcloudClient::new(mock_server.uri())
        .unwrap()
        .with_credentials("admin", "secret");
    let res = GroupFolderManager::from_client(&client)
        .remove_group_from_group_folder("R&D #1", 5)
        .await
        .unwrap();

    assert_eq!(json!({ "success": true }), res.data);
}

#[tokio::test]
async fn toggles_advanced_permissions() {
    expecting(
        Method::POST,
        "/apps/groupfolders/folders/5/acl",
        Some(form(&[("acl", "1")])),
    )
    .enable_group_folder_advanced_permissions(5)
    .await
    .unwrap();

    expecting(
        Method::POST,
        "/apps/groupfolders/folders/5/acl",
        Some(form(&[("acl", "0")])),
    )
    .disable_group_folder_advanced_permissions(5)
    .await
    .unwrap();
}

#[tokio::test]
async fn grants_and_revokes_acl_managers() {
    expecting(
        Method::POST,
        "/apps/groupfolders/folders/5/manageACL",
        Some(form(&[
            ("mappingId", "bob"),
            ("mappingType", "user"),
            ("manageAcl", "true"),
        ])),
    )
    .add_group_folder_advanced_permissions(5, "bob", AclMappingType::User)
    .await
    .unwrap();

    expecting(
        Method::POST,
        "/apps/groupfolders/folders/5/manageACL",
        Some(form(&[
            ("mappingId", "staff"),
            ("mappingType", "group"),
            ("manageAcl", "false"),
        ])),
    )
    .remove_group_folder_advanced_permissions(5, "staff", AclMappingType::Group)
    .await
    .unwrap();
}

#[tokio::test]
async fn sets_permissions_quota_and_mountpoint() {
    expecting(
        Method::POST,
        "/apps/groupfolders/folders/5/groups/staff",
        Some(form(&[("permissions", "3")])),
    )
    .set_group_folder_permissions(5, "staff", Permissions::READ | Permissions::UPDATE)
    .await
    .unwrap();

    expecting(
        Method::POST,
        "/apps/groupfolders/folders/5/quota",
        Some(form(&[("quota", "-3")])),
    )
    .set_group_folder_quota(5, -3)
    .await
    .unwrap();

    expecting(
        Method::POST,
        "/apps/groupfolders/folders/5/mountpoint",
        Some(form(&[("mountpoint", "Archive")])),
    )
    .rename_group_folder(5, "Archive")
    .await
    .unwrap();
}

#[tokio::test]
async fn set_quota_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/apps/groupfolders/folders/5/quota"))
        .and(header("OCS-APIRequest", "true"))
        .and(body_string("quota=-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ocs": { "meta": { "status": "ok", "statuscode": 100, "message": "OK" }, "data": { "success": true } }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = NextcloudClient::new(mock_server.uri())
        .unwrap()
        .with_credentials("admin", "secret");
    let res = GroupFolderManager::from_client(&client)
        .set_group_folder_quota(5, -3)
        .await
        .unwrap();

    assert_eq!(json!({ "success": true }), res.data);
}

#[tokio::test]
async fn get_folder_decodes_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apps/groupfolders/folders/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ocs": {
                "meta": { "status": "ok", "statuscode": 200, "message": "OK" },
                "data": {
                    "id": 1, "mount_point": "Team", "groups": { "staff": 31 },
                    "quota": -3, "size": 0, "acl": false, "manage": []
                }
            }
        })))
        .mount(&mock_server)
        .await;

    let client = NextcloudClient::new(mock_server.uri()).unwrap();
    let folder = GroupFolderManager::from_client(&client)
        .get_group_folder(1)
        .await
        .unwrap()
        .data_as::<GroupFolder>()
        .unwrap();

    assert_eq!("Team", folder.mount_point);
    assert_eq!(Some(&Permissions::ALL), folder.groups.get("staff"));
    assert!(folder.is_unlimited());
    assert!(!folder.acl);
}

#[test]
fn decodes_folder_listing_keyed_by_id() {
    let data = json!({
        "2": {
            "id": 2, "mount_point": "Projects",
            "groups": { "dev": { "displayName": "Developers", "permissions": 7, "type": "group" } },
            "quota": "1073741824", "size": 42, "acl": true,
            "manage": [ { "type": "user", "id": "bob", "displayname": "Bob" } ]
        },
        "1": {
            "id": 1, "mount_point": "Team", "groups": [], "quota": -3, "size": 0, "acl": false, "manage": []
        }
    });

    let folders = decode_folder_list(&data).unwrap();

    assert_eq!(2, folders.len());
    assert_eq!(1, folders[0].id);
    assert!(folders[0].groups.is_empty());

    let projects = &folders[1];
    assert_eq!(1_073_741_824, projects.quota);
    assert_eq!(Some(42), projects.size);
    assert_eq!(Some(&Permissions::from_bits(7)), projects.groups.get("dev"));
    assert!(projects.acl);
    assert_eq!(AclMappingType::User, projects.manage[0].mapping_type);
    assert_eq!("bob", projects.manage[0].id);
}

#[test]
fn decodes_empty_listing() {
    assert!(decode_folder_list(&json!([])).unwrap().is_empty());
}

#[test]
fn decodes_listing_with_team_and_unknown_managers() {
    let data = json!({
        "1": {
            "id": 1, "mount_point": "Team", "groups": { "staff": 31 }, "quota": -3, "acl": true,
            "manage": [
                { "type": "circle", "id": "c1", "displayname": "Board" },
                { "type": "federated", "id": "x@remote" }
            ]
        },
        "2": {
            "id": 2, "mount_point": "Projects", "groups": [], "quota": -3, "acl": true,
            "manage": { "bob": { "type": "user", "id": "bob", "displayname": "Bob" } }
        }
    });

    let folders = decode_folder_list(&data).unwrap();

    assert_eq!(2, folders.len());
    assert_eq!(AclMappingType::Circle, folders[0].manage[0].mapping_type);
    assert_eq!(AclMappingType::Other, folders[0].manage[1].mapping_type);
    assert_eq!(None, folders[0].manage[1].displayname);
    assert_eq!(AclMappingType::User, folders[1].manage[0].mapping_type);
}

#[test]
fn listing_errors_name_the_faulty_folder() {
    let data = json!({
        "1": { "id": 1, "mount_point": "Team", "groups": [], "quota": -3 },
        "7": { "id": 7, "groups": [], "quota": -3 }
    });

    let err = decode_folder_list(&data).unwrap_err().to_string();

    assert!(err.contains("entry 7"), "{err}");
    assert!(err.contains("mount_point"), "{err}");
}
