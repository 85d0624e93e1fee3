//! The login dance against the Tesla SSO service.
//!
//! Strictly linear: authorize GET, credential POST, token exchange. Each
//! step requires full success of the previous one; there is no branching,
//! retry, or recovery path.

use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::header::LOCATION;
use reqwest::{redirect, Url};
use serde::Deserialize;
use tracing::debug;

use crate::auth::error::AuthError;
use crate::auth::pkce::PkcePair;
use crate::auth::token::Token;

const DEFAULT_AUTHORIZE_URL: &str = "https://auth.tesla.com/oauth2/v3/authorize";
const DEFAULT_TOKEN_URL: &str = "https://auth.tesla.com/oauth2/v3/token";
const CLIENT_ID: &str = "ownerapi";
const REDIRECT_URI: &str = "https://auth.tesla.com/void/callback";
const SCOPES: &str = "openid email offline_access";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tesla SSO client performing the scripted password login.
///
/// Cookies persist across the three calls and redirects are never
/// followed, so the callback `Location` header can be inspected for the
/// authorization code.
///
/// The credential form is scraped from the login page's hidden `<input>`
/// tags with a narrow text pattern. That ties the flow to the exact markup
/// Tesla serves today; markup drift on their side breaks the login.
///
/// # Example
/// ```no_run
/// use solarcharge::auth::SsoClient;
///
/// # async fn example() -> Result<(), solarcharge::auth::AuthError> {
/// let token = SsoClient::new()?.login("owner@example.com", "hunter2").await?;
/// # Ok(())
/// # }
/// ```
pub struct SsoClient {
    client: reqwest::Client,
    authorize_url: String,
    token_url: String,
}

impl SsoClient {
    pub fn new() -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        })
    }

    pub fn with_authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize_url = url.into();
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Run the whole login flow and return the token pair.
    pub async fn login(&self, identity: &str, credential: &str) -> Result<Token, AuthError> {
        let pkce = PkcePair::generate();
        let params = authorize_params(&pkce);
        let form = self.fetch_login_form(&params).await?;
        let code = self
            .submit_credentials(&params, form, identity, credential, &pkce.state)
            .await?;
        self.exchange_code(&code, &pkce.code_verifier).await
    }

    /// Authorize GET: load the login page and collect its hidden fields.
    async fn fetch_login_form(
        &self,
        params: &[(&str, &str)],
    ) -> Result<HashMap<String, String>, AuthError> {
        let resp = self
            .client
            .get(&self.authorize_url)
            .query(params)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AuthError::Status(status.as_u16()));
        }
        let body = resp.text().await?;
        let form = scrape_hidden_inputs(&body);
        if form.is_empty() {
            return Err(AuthError::MissingLoginForm);
        }
        debug!(fields = form.len(), "scraped login form");
        Ok(form)
    }

    /// Credential POST: resubmit the scraped form with credentials merged
    /// in and pull the authorization code out of the redirect.
    async fn submit_credentials(
        &self,
        params: &[(&str, &str)],
        mut form: HashMap<String, String>,
        identity: &str,
        credential: &str,
        expected_state: &str,
    ) -> Result<String, AuthError> {
        form.insert("identity".to_string(), identity.to_string());
        form.insert("credential".to_string(), credential.to_string());

        let resp = self
            .client
            .post(&self.authorize_url)
            .query(params)
            .form(&form)
            .send()
            .await?;
        let status = resp.status();
        // The expected reply is a 302 to the void callback, so only error
        // statuses are fatal here.
        if status.is_client_error() || status.is_server_error() {
            return Err(AuthError::Status(status.as_u16()));
        }
        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingLocation)?;
        debug!(%location, "credential submission redirected");
        callback_code(location, expected_state)
    }

    /// Token POST: trade the authorization code for the token pair.
    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<Token, AuthError> {
        let resp = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("client_id", CLIENT_ID),
                ("code", code),
                ("code_verifier", code_verifier),
                ("redirect_uri", REDIRECT_URI),
            ])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AuthError::Status(status.as_u16()));
        }
        let payload: TokenExchangeResponse = resp
            .json()
            .await
            .map_err(|err| AuthError::InvalidResponse(format!("malformed token response: {err}")))?;
        let access_token = payload.access_token.ok_or_else(|| {
            AuthError::InvalidResponse("token response missing access_token".to_string())
        })?;
        let refresh_token = payload.refresh_token.ok_or_else(|| {
            AuthError::InvalidResponse("token response missing refresh_token".to_string())
        })?;
        Ok(Token {
            access_token,
            refresh_token,
            id_token: payload.id_token,
            token_type: payload.token_type,
            expires_in: payload.expires_in,
        })
    }
}

fn authorize_params(pkce: &PkcePair) -> Vec<(&'static str, &str)> {
    vec![
        ("client_id", CLIENT_ID),
        ("code_challenge", pkce.code_challenge.as_str()),
        ("code_challenge_method", "S256"),
        ("redirect_uri", REDIRECT_URI),
        ("response_type", "code"),
        ("scope", SCOPES),
        ("state", pkce.state.as_str()),
    ]
}

fn hidden_input_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"input[^>]*type="hidden"[^>]*name="([^"]*)"[^>]*value="([^"]*)""#)
            .expect("hidden input pattern must compile")
    })
}

/// Collect `(name, value)` pairs from the page's hidden `<input>` tags.
fn scrape_hidden_inputs(html: &str) -> HashMap<String, String> {
    hidden_input_pattern()
        .captures_iter(html)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// Pull the authorization code out of the redirect `Location`, verifying
/// the round-tripped `state` when the provider sends one back.
fn callback_code(location: &str, expected_state: &str) -> Result<String, AuthError> {
    let url = Url::parse(location)?;
    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }
    if let Some(returned) = state {
        if returned != expected_state {
            return Err(AuthError::StateMismatch {
                expected: expected_state.to_string(),
                returned,
            });
        }
    }
    code.ok_or_else(|| AuthError::MissingCode(location.to_string()))
}

#[derive(Debug, Deserialize)]
struct TokenExchangeResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    id_token: Option<String>,
    token_type: Option<String>,
    expires_in: Option<u64>,
}
