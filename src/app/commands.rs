use std::time::Duration;

use log::info;
use nextcloud_aio::core::{
    common::http_client_factory::{NextcloudClient, DEFAULT_REQUEST_TIMEOUT},
    group_folders::{decode_folder_list, GroupFolderManager},
    login_flow::{LoginFlow, DEFAULT_TIMEOUT},
    wipe::RemoteWipe,
};
use serde_json::Value;

use super::{cli::FolderCommand, configuration::Configuration};

type CommandResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

fn create_client(
    conf: &Configuration,
) -> Result<NextcloudClient, Box<dyn std::error::Error + Send + Sync>> {
    conf.assert_endpoint_is_valid()?;

    let endpoint = conf.server.endpoint.clone().unwrap_or_default();
    let timeout = conf
        .server
        .request_timeout
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

    Ok(NextcloudClient::with_timeout(endpoint.trim(), timeout)?)
}

fn create_authenticated_client(
    conf: &Configuration,
) -> Result<NextcloudClient, Box<dyn std::error::Error + Send + Sync>> {
    conf.assert_credentials_are_present()?;

    let client = create_client(conf)?;

    Ok(client.with_credentials(
        conf.server.user.clone().unwrap_or_default(),
        conf.server.password.clone().unwrap_or_default(),
    ))
}

/// ### Login
/// Runs Login Flow v2 and prints the resulting app password.
/// The password is never written anywhere by this command.
/// ## Arguments
/// * `conf` - The configuration object
/// * `user_agent` - Application name shown to the user, overrides `[login] user_agent`
/// * `timeout` - Seconds to wait for the user, overrides `[login] timeout`
pub async fn login(
    conf: &Configuration,
    user_agent: Option<String>,
    timeout: Option<u64>,
) -> CommandResult {
    let client = create_client(conf)?;
    let flow = LoginFlow::from_client(&client);

    let user_agent = user_agent.or_else(|| conf.login.user_agent.clone());
    let pending = flow.initiate(user_agent.as_deref()).await?;

    println!("Open the following url in a browser and grant access:");
    println!("{}", pending.login);

    let timeout = timeout.or(conf.login.timeout).unwrap_or(DEFAULT_TIMEOUT);
    let credential = flow.await_confirmation(&pending.poll.token, timeout).await?;

    println!(
        "server: {}",
        credential.server.as_deref().unwrap_or(client.endpoint())
    );
    println!("login name: {}", credential.login_name);
    println!("app password: {}", credential.app_password);

    Ok(())
}

/// ### Revoke
/// Deletes the app password configured in `[server] password`.
pub async fn revoke(conf: &Configuration) -> CommandResult {
    let client = create_authenticated_client(conf)?;

    LoginFlow::from_client(&client).revoke().await?;

    info!("app password revoked");
    println!("app password revoked, remove it from your configuration");

    Ok(())
}

/// ### Wipe check
/// Tells whether the configured app password has been flagged for remote wipe.
pub async fn wipe_check(conf: &Configuration) -> CommandResult {
    let client = create_authenticated_client(conf)?;
    let token = conf.server.password.clone().unwrap_or_default();

    let wipe = RemoteWipe::from_client(&client)
        .check_remote_wipe(&token)
        .await?;

    println!("remote wipe requested: {wipe}");

    Ok(())
}

/// ### Wipe confirm
/// Acknowledges a remote wipe once local data has been erased.
pub async fn wipe_confirm(conf: &Configuration) -> CommandResult {
    let client = create_authenticated_client(conf)?;
    let token = conf.server.password.clone().unwrap_or_default();

    RemoteWipe::from_client(&client)
        .notify_remote_wipe_success(&token)
        .await?;

    println!("remote wipe acknowledged");

    Ok(())
}

/// ### Folders
/// Runs one group folders operation and prints the returned data.
pub async fn folders(conf: &Configuration, command: FolderCommand) -> CommandResult {
    let client = create_authenticated_client(conf)?;
    let manager = GroupFolderManager::from_client(&client);

    let response = match command {
        FolderCommand::List => {
            let response = manager.get_all_group_folders().await?;

            for folder in decode_folder_list(&response.data)? {
                let mut groups = folder
                    .groups
                    .iter()
                    .map(|(g, p)| format!("{g}:{}", p.names().join("+")))
                    .collect::<Vec<_>>();
                groups.sort();

                println!(
                    "{}\t{}\tquota={}\tacl={}\t{}",
                    folder.id,
                    folder.mount_point,
                    folder.quota,
                    folder.acl,
                    groups.join(",")
                );
            }

            return Ok(());
        }
        FolderCommand::Create { mountpoint } => manager.create_group_folder(&mountpoint).await?,
        FolderCommand::Get { folder_id } => manager.get_group_folder(folder_id).await?,
        FolderCommand::Remove { folder_id } => manager.remove_group_folder(folder_id).await?,
        FolderCommand::AddGroup { folder_id, group } => {
            manager.add_group_to_group_folder(&group, folder_id).await?
        }
        FolderCommand::RemoveGroup { folder_id, group } => {
            manager
                .remove_group_from_group_folder(&group, folder_id)
                .await?
        }
        FolderCommand::EnableAcl { folder_id } => {
            manager
                .enable_group_folder_advanced_permissions(folder_id)
                .await?
        }
        FolderCommand::DisableAcl { folder_id } => {
            manager
                .disable_group_folder_advanced_permissions(folder_id)
                .await?
        }
        FolderCommand::AddManager {
            folder_id,
            object_id,
            object_type,
        } => {
            manager
                .add_group_folder_advanced_permissions(folder_id, &object_id, object_type.into())
                .await?
        }
        FolderCommand::RemoveManager {
            folder_id,
            object_id,
            object_type,
        } => {
            manager
                .remove_group_folder_advanced_permissions(folder_id, &object_id, object_type.into())
                .await?
        }
        FolderCommand::SetPermissions {
            folder_id,
            group,
            permissions,
        } => {
            manager
                .set_group_folder_permissions(folder_id, &group, permissions)
                .await?
        }
        FolderCommand::SetQuota { folder_id, quota } => {
            manager.set_group_folder_quota(folder_id, quota).await?
        }
        FolderCommand::Rename {
            folder_id,
            mountpoint,
        } => manager.rename_group_folder(folder_id, &mountpoint).await?,
    };

    print_data(&response.data)
}

fn print_data(data: &Value) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}
