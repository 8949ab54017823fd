pub mod http_client_factory;
pub mod permission;
pub mod transport;
