use serde::{Deserialize, Serialize};

/// Token pair returned by the SSO token endpoint.
///
/// `access_token` authorizes Owner API calls; `refresh_token` can be traded
/// for a new pair once the access token expires. Neither is persisted by
/// this crate: the login command prints them and exits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub id_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
}
