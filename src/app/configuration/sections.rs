use serde::Deserialize;

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ServerConfiguration {
    pub endpoint: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// seconds before an HTTP request is abandoned
    pub request_timeout: Option<u64>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct LoginConfiguration {
    pub user_agent: Option<String>,
    /// seconds to wait for the user to grant access
    pub timeout: Option<u64>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct LogConfiguration {
    pub level: Option<String>,
    pub directory: Option<String>,
    pub retention: Option<usize>,
}
