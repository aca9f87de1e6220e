use crate::auth::AuthProvider;
use crate::endpoint::{Endpoint, InfoResponse};
use crate::error::{Error, Result};
use crate::transport::HttpEndpoint;
use futures_util::future::BoxFuture;
use std::fmt;
use std::str::FromStr;
use tokio_util::sync::CancellationToken;

/// Policy a [`Group`] uses to resolve a call across its endpoints.
///
/// A value of this type is always valid; unrecognized selectors are
/// rejected where they enter the process, by [`Strategy::from_str`] for
/// configuration names and by `TryFrom<u32>` for numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Strategy {
    /// Try endpoints strictly in the order supplied at construction
    /// time, stopping at the first success.
    OrderedList,
}

impl Strategy {
    /// Returns the configuration name for this strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderedList => "ordered_list",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ordered_list" => Ok(Self::OrderedList),
            other => Err(Error::UnrecognizedStrategy(other.to_string())),
        }
    }
}

impl TryFrom<u32> for Strategy {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            1 => Ok(Self::OrderedList),
            other => Err(Error::UnrecognizedStrategy(other.to_string())),
        }
    }
}

/// A client-side aggregate of signing endpoints presenting the same
/// operation surface as a single [`Endpoint`], with failover.
///
/// The endpoint sequence is fixed at construction and never changes.
/// A group keeps no per-call state, so it is safe to share across
/// concurrent callers without locking; every call starts its attempt
/// order fresh from the first endpoint.
pub struct Group {
    endpoints: Vec<Box<dyn Endpoint>>,
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("endpoints", &self.endpoints.len())
            .finish()
    }
}

impl Group {
    /// Create a group of HTTP endpoints, one per remote address, in the
    /// order given.
    ///
    /// Addresses are not validated or deduplicated; a malformed address
    /// fails at call time like any other endpoint failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnrecognizedStrategy`] when the strategy is not
    /// implemented.
    pub fn new(remotes: &[String], strategy: Strategy) -> Result<Self> {
        let endpoints = remotes
            .iter()
            .map(|address| Box::new(HttpEndpoint::new(address)) as Box<dyn Endpoint>)
            .collect();
        Self::from_endpoints(endpoints, strategy)
    }

    /// Create a group over caller-supplied endpoints.
    pub fn from_endpoints(endpoints: Vec<Box<dyn Endpoint>>, strategy: Strategy) -> Result<Self> {
        match strategy {
            Strategy::OrderedList => Ok(Self { endpoints }),
        }
    }

    /// Number of endpoints in the group.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Returns true if the group has no endpoints.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Sign an authenticated request, failing over across endpoints.
    pub async fn auth_sign(
        &self,
        request: &[u8],
        identifier: &[u8],
        provider: &dyn AuthProvider,
    ) -> Result<Vec<u8>> {
        self.auth_sign_with_cancel(request, identifier, provider, &CancellationToken::new())
            .await
    }

    /// [`Group::auth_sign`] with caller-controlled cancellation.
    ///
    /// Cancelling the token drops the in-flight attempt and skips all
    /// remaining endpoints.
    pub async fn auth_sign_with_cancel(
        &self,
        request: &[u8],
        identifier: &[u8],
        provider: &dyn AuthProvider,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>> {
        self.failover("auth_sign", cancel, |endpoint| {
            endpoint.auth_sign(request, identifier, provider)
        })
        .await
    }

    /// Sign a raw JSON request, failing over across endpoints.
    pub async fn sign(&self, request_json: &[u8]) -> Result<Vec<u8>> {
        self.sign_with_cancel(request_json, &CancellationToken::new())
            .await
    }

    /// [`Group::sign`] with caller-controlled cancellation.
    pub async fn sign_with_cancel(
        &self,
        request_json: &[u8],
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>> {
        self.failover("sign", cancel, |endpoint| endpoint.sign(request_json))
            .await
    }

    /// Fetch remote metadata, failing over across endpoints.
    pub async fn info(&self, request_json: &[u8]) -> Result<InfoResponse> {
        self.info_with_cancel(request_json, &CancellationToken::new())
            .await
    }

    /// [`Group::info`] with caller-controlled cancellation.
    pub async fn info_with_cancel(
        &self,
        request_json: &[u8],
        cancel: &CancellationToken,
    ) -> Result<InfoResponse> {
        self.failover("info", cancel, |endpoint| endpoint.info(request_json))
            .await
    }

    /// Try `call` against each endpoint in construction order, returning
    /// the first success or the error from the last attempt.
    ///
    /// The caller's arguments reach every endpoint unchanged; earlier
    /// failures are logged and discarded in favor of the last one. A
    /// group with no endpoints reports success with a default value.
    async fn failover<'g, T, F>(
        &'g self,
        op: &'static str,
        cancel: &CancellationToken,
        call: F,
    ) -> Result<T>
    where
        T: Default,
        F: Fn(&'g dyn Endpoint) -> BoxFuture<'g, Result<T>>,
    {
        let mut last_err = None;
        for (index, endpoint) in self.endpoints.iter().enumerate() {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(op, index, "dispatch cancelled");
                    return Err(Error::Cancelled);
                }
                result = call(endpoint.as_ref()) => match result {
                    Ok(value) => return Ok(value),
                    Err(err) => {
                        tracing::debug!(op, index, error = %err, "endpoint attempt failed");
                        last_err = Some(err);
                    }
                }
            }
        }

        match last_err {
            Some(err) => Err(err),
            None => Ok(T::default()),
        }
    }
}
