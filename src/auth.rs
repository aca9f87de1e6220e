use crate::error::{Error, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Produces an authentication token for a request and an auxiliary
/// identifier.
///
/// The dispatch layer never inspects the token; it hands the provider to
/// the endpoint unchanged on every attempt.
pub trait AuthProvider: Send + Sync {
    fn token(&self, request: &[u8], identifier: &[u8]) -> Result<Vec<u8>>;
}

/// Keyed HMAC-SHA256 token provider.
///
/// The token covers the request bytes followed by the identifier, so a
/// token minted for one request cannot be replayed for another.
pub struct HmacTokenProvider {
    key: Vec<u8>,
}

impl HmacTokenProvider {
    /// Create a provider from a shared key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty.
    pub fn new(key: impl Into<Vec<u8>>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(Error::Auth("HMAC key must not be empty".to_string()));
        }
        Ok(Self { key })
    }
}

impl AuthProvider for HmacTokenProvider {
    fn token(&self, request: &[u8], identifier: &[u8]) -> Result<Vec<u8>> {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).map_err(|e| Error::Auth(e.to_string()))?;
        mac.update(request);
        mac.update(identifier);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}
