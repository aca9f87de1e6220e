use crate::auth::AuthProvider;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single remote signing service reachable at one address.
///
/// Each call is independent; whatever connection reuse or locking a
/// transport needs is its own concern. The dispatch layer only invokes
/// these operations and never interprets the payload bytes.
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// Sign a request that must carry an authentication token.
    ///
    /// The token is computed by `provider` from the request and the
    /// auxiliary identifier.
    async fn auth_sign(
        &self,
        request: &[u8],
        identifier: &[u8],
        provider: &dyn AuthProvider,
    ) -> Result<Vec<u8>>;

    /// Sign a raw JSON request.
    async fn sign(&self, request_json: &[u8]) -> Result<Vec<u8>>;

    /// Fetch capability and certificate metadata from the remote.
    async fn info(&self, request_json: &[u8]) -> Result<InfoResponse>;
}

/// Capability and certificate metadata reported by a remote signer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoResponse {
    /// PEM-encoded signing certificate.
    #[serde(default)]
    pub certificate: String,

    /// Key usages the remote will sign for.
    #[serde(default)]
    pub usages: Vec<String>,

    /// Default expiry the remote applies to signed certificates.
    #[serde(default)]
    pub expiry: String,
}
