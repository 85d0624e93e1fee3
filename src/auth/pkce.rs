use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the opaque `state` round-tripped through the redirect.
const STATE_LEN: usize = 20;
/// Length of the PKCE verifier sent in the token exchange.
const CODE_VERIFIER_LEN: usize = 86;

/// PKCE values for a single authorization attempt.
///
/// The challenge goes into the authorize request; the verifier is later
/// sent verbatim in the token exchange, where the provider recomputes the
/// digest and compares.
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub state: String,
    pub code_verifier: String,
    pub code_challenge: String,
}

impl PkcePair {
    /// Generate a fresh `state` and verifier/challenge pair.
    pub fn generate() -> Self {
        let state = random_alphanumeric(STATE_LEN);
        let code_verifier = random_alphanumeric(CODE_VERIFIER_LEN);
        let code_challenge = compute_code_challenge(&code_verifier);
        Self {
            state,
            code_verifier,
            code_challenge,
        }
    }
}

fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn compute_code_challenge(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}
