pub mod cli;
pub mod commands;
pub mod configuration;
pub mod logger;
