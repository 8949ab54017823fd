use clap::{Parser, Subcommand, ValueEnum};
use nextcloud_aio::core::{common::permission::Permissions, group_folders::AclMappingType};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    #[arg(short, long)]
    pub configuration_file: Option<String>,
    #[arg(short, long)]
    pub verbosity: Option<log::LevelFilter>,
}

#[derive(Subcommand)]
pub enum Command {
    /// runs the browser login flow and prints the new app password
    Login {
        /// the application name shown to the user, defaults to the library name
        #[arg(short, long)]
        user_agent: Option<String>,
        /// seconds to wait for the user to grant access
        #[arg(short, long)]
        timeout: Option<u64>,
    },
    /// revokes the app password of the configured user
    Revoke,
    /// checks whether the configured app password was flagged for remote wipe
    WipeCheck,
    /// acknowledges a remote wipe, the server deletes the app password
    WipeConfirm,
    /// manages group folders
    #[command(subcommand)]
    Folders(FolderCommand),
}

#[derive(Subcommand)]
pub enum FolderCommand {
    /// lists all group folders
    List,
    /// creates a group folder
    Create { mountpoint: String },
    /// shows one group folder
    Get { folder_id: u64 },
    /// deletes a group folder
    Remove { folder_id: u64 },
    /// gives a group access to a folder
    AddGroup { folder_id: u64, group: String },
    /// removes a group's access to a folder
    RemoveGroup { folder_id: u64, group: String },
    /// enables advanced permissions
    EnableAcl { folder_id: u64 },
    /// disables advanced permissions
    DisableAcl { folder_id: u64 },
    /// lets a user or group manage advanced permissions
    AddManager {
        folder_id: u64,
        object_id: String,
        #[arg(value_enum)]
        object_type: ManagerType,
    },
    /// stops a user or group from managing advanced permissions
    RemoveManager {
        folder_id: u64,
        object_id: String,
        #[arg(value_enum)]
        object_type: ManagerType,
    },
    /// sets a group's permissions, as a mask or names (read,update,create,delete,share,all)
    SetPermissions {
        folder_id: u64,
        group: String,
        permissions: Permissions,
    },
    /// sets the quota in bytes, -3 for unlimited
    SetQuota {
        folder_id: u64,
        #[arg(allow_hyphen_values = true)]
        quota: i64,
    },
    /// renames a group folder
    Rename { folder_id: u64, mountpoint: String },
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum ManagerType {
    User,
    Group,
    Circle,
}

impl From<ManagerType> for AclMappingType {
    fn from(t: ManagerType) -> Self {
        match t {
            ManagerType::User => AclMappingType::User,
            ManagerType::Group => AclMappingType::Group,
            ManagerType::Circle => AclMappingType::Circle,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use nextcloud_aio::core::common::permission::Permissions;

    use super::{Cli, Command, FolderCommand, ManagerType};

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_quota() {
        let cli = Cli::try_parse_from(["nextcloud-aio", "folders", "set-quota", "5", "-3"]).unwrap();

        assert!(matches!(
            cli.command,
            Command::Folders(FolderCommand::SetQuota {
                folder_id: 5,
                quota: -3
            })
        ));
    }

    #[test]
    fn parses_permission_names() {
        let cli = Cli::try_parse_from([
            "nextcloud-aio",
            "-c",
            "conf.toml",
            "folders",
            "set-permissions",
            "5",
            "staff",
            "read,update",
        ])
        .unwrap();

        assert_eq!(Some("conf.toml".to_string()), cli.configuration_file);

        match cli.command {
            Command::Folders(FolderCommand::SetPermissions {
                folder_id,
                group,
                permissions,
            }) => {
                assert_eq!(5, folder_id);
                assert_eq!("staff", group);
                assert_eq!(Permissions::READ | Permissions::UPDATE, permissions);
            }
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn parses_manager_type() {
        let cli = Cli::try_parse_from([
            "nextcloud-aio",
            "folders",
            "add-manager",
            "5",
            "bob",
            "user",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Command::Folders(FolderCommand::AddManager {
                object_type: ManagerType::User,
                ..
            })
        ));
    }

    #[test]
    fn parses_login_options() {
        let cli = Cli::try_parse_from([
            "nextcloud-aio",
            "-v",
            "debug",
            "login",
            "--user-agent",
            "Backup Robot",
            "--timeout",
            "30",
        ])
        .unwrap();

        assert_eq!(Some(log::LevelFilter::Debug), cli.verbosity);
        assert!(matches!(
            cli.command,
            Command::Login {
                timeout: Some(30),
                ..
            }
        ));
    }
}
