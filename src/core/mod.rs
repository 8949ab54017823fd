pub mod common;
pub mod error;
pub mod group_folders;
pub mod login_flow;
pub mod wipe;
