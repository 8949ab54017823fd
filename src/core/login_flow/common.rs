use serde::{Deserialize, Serialize};

/// Poll coordinates handed out by `index.php/login/v2`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PollEndpoint {
    pub token: String,
    pub endpoint: String,
}

/// A login attempt waiting for the user to confirm it in a browser.
///
/// `login` is the url the user must open; `poll.token` is what
/// `LoginFlow::await_confirmation` expects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PendingLoginSession {
    pub poll: PollEndpoint,
    pub login: String,
}

/// Credential minted once the user granted access.
///
/// Never stored by this crate, keeping it safe is up to the caller.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppCredential {
    #[serde(default)]
    pub server: Option<String>,
    pub login_name: String,
    pub app_password: String,
}
