// Ordered-list failover behavior, driven through mock endpoints that
// record how often the group invokes them.

use async_trait::async_trait;
use signer_group::{
    AuthProvider, Endpoint, Error, Group, HmacTokenProvider, InfoResponse, Result, Strategy,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

enum Behavior {
    /// Succeed with this payload.
    Succeed(&'static [u8]),
    /// Fail with this message.
    Fail(&'static str),
    /// Panic if invoked at all.
    Unreachable,
    /// Never complete (for cancellation tests).
    Hang,
}

struct MockEndpoint {
    name: &'static str,
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
}

impl MockEndpoint {
    fn new(name: &'static str, behavior: Behavior) -> (Box<dyn Endpoint>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let endpoint = Box::new(Self {
            name,
            behavior,
            calls: calls.clone(),
        });
        (endpoint, calls)
    }

    /// Count the call and resolve every behavior except success.
    async fn attempt(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Succeed(_) => Ok(()),
            Behavior::Fail(message) => Err(Error::Remote((*message).to_string())),
            Behavior::Unreachable => panic!("endpoint {} must not be invoked", self.name),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(Error::Remote("hang elapsed".to_string()))
            }
        }
    }

    fn payload(&self) -> Vec<u8> {
        match &self.behavior {
            Behavior::Succeed(payload) => payload.to_vec(),
            _ => unreachable!(),
        }
    }
}

#[async_trait]
impl Endpoint for MockEndpoint {
    async fn auth_sign(
        &self,
        request: &[u8],
        identifier: &[u8],
        provider: &dyn AuthProvider,
    ) -> Result<Vec<u8>> {
        self.attempt().await?;
        // Echo the token so the test can verify the group handed the
        // provider and arguments through unchanged.
        provider.token(request, identifier)
    }

    async fn sign(&self, _request_json: &[u8]) -> Result<Vec<u8>> {
        self.attempt().await?;
        Ok(self.payload())
    }

    async fn info(&self, _request_json: &[u8]) -> Result<InfoResponse> {
        self.attempt().await?;
        Ok(InfoResponse {
            certificate: String::from_utf8(self.payload()).unwrap(),
            ..InfoResponse::default()
        })
    }
}

fn group_of(endpoints: Vec<Box<dyn Endpoint>>) -> Group {
    Group::from_endpoints(endpoints, Strategy::OrderedList).unwrap()
}

#[tokio::test]
async fn test_first_endpoint_success_skips_rest() {
    let (a, a_calls) = MockEndpoint::new("a", Behavior::Succeed(b"signed-by-a"));
    let (b, b_calls) = MockEndpoint::new("b", Behavior::Unreachable);
    let (c, c_calls) = MockEndpoint::new("c", Behavior::Unreachable);
    let group = group_of(vec![a, b, c]);

    let signed = group.sign(b"{}").await.unwrap();

    assert_eq!(signed, b"signed-by-a");
    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    assert_eq!(c_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failover_stops_at_first_success() {
    let (a, a_calls) = MockEndpoint::new("a", Behavior::Fail("signer a: connection refused"));
    let (b, b_calls) = MockEndpoint::new("b", Behavior::Succeed(b"signed-by-b"));
    let (c, c_calls) = MockEndpoint::new("c", Behavior::Unreachable);
    let group = group_of(vec![a, b, c]);

    let signed = group.sign(b"{}").await.unwrap();

    assert_eq!(signed, b"signed-by-b");
    assert_eq!(a_calls.load(Ordering::SeqCst), 1, "a is tried first");
    assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    assert_eq!(c_calls.load(Ordering::SeqCst), 0, "c must never be reached");
}

#[tokio::test]
async fn test_all_failures_surface_last_error() {
    let (a, _) = MockEndpoint::new("a", Behavior::Fail("signer a: connection refused"));
    let (b, _) = MockEndpoint::new("b", Behavior::Fail("signer b: certificate rejected"));
    let group = group_of(vec![a, b]);

    let err = group.sign(b"{}").await.unwrap_err();

    match err {
        Error::Remote(message) => assert_eq!(message, "signer b: certificate rejected"),
        other => panic!("expected the last endpoint's error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_group_reports_success() {
    // A group with zero endpoints never assigns an error, so every
    // operation reports success with an empty result. Inherited
    // behavior; asserted here so a change is deliberate.
    let group = group_of(Vec::new());
    let provider = HmacTokenProvider::new(b"key".to_vec()).unwrap();

    assert_eq!(group.sign(b"{}").await.unwrap(), Vec::<u8>::new());
    assert_eq!(
        group.auth_sign(b"{}", b"id", &provider).await.unwrap(),
        Vec::<u8>::new()
    );
    assert_eq!(group.info(b"{}").await.unwrap(), InfoResponse::default());
}

#[tokio::test]
async fn test_attempt_order_restarts_every_call() {
    let (a, a_calls) = MockEndpoint::new("a", Behavior::Fail("signer a: down"));
    let (b, b_calls) = MockEndpoint::new("b", Behavior::Succeed(b"signed-by-b"));
    let (c, c_calls) = MockEndpoint::new("c", Behavior::Unreachable);
    let group = group_of(vec![a, b, c]);

    group.sign(b"{}").await.unwrap();
    group.sign(b"{}").await.unwrap();

    // No stickiness: the second call starts over from a even though b
    // succeeded last time.
    assert_eq!(a_calls.load(Ordering::SeqCst), 2);
    assert_eq!(b_calls.load(Ordering::SeqCst), 2);
    assert_eq!(c_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unrecognized_strategy_builds_no_group() {
    fn build(remotes: &[String], code: u32) -> Result<Group> {
        Group::new(remotes, Strategy::try_from(code)?)
    }

    let remotes = vec!["http://signer-a.internal".to_string()];
    let err = build(&remotes, 999).unwrap_err();
    assert!(matches!(err, Error::UnrecognizedStrategy(ref code) if code == "999"));
}

#[tokio::test]
async fn test_auth_sign_passes_arguments_through() {
    let (a, _) = MockEndpoint::new("a", Behavior::Succeed(b""));
    let group = group_of(vec![a]);
    let provider = HmacTokenProvider::new(b"shared-key".to_vec()).unwrap();

    let token = group
        .auth_sign(b"{\"payload\":\"x\"}", b"profile-1", &provider)
        .await
        .unwrap();

    let expected = provider.token(b"{\"payload\":\"x\"}", b"profile-1").unwrap();
    assert_eq!(token, expected);
}

#[tokio::test]
async fn test_info_fails_over_like_sign() {
    let (a, _) = MockEndpoint::new("a", Behavior::Fail("signer a: down"));
    let (b, _) = MockEndpoint::new("b", Behavior::Succeed(b"PEM-B"));
    let (c, c_calls) = MockEndpoint::new("c", Behavior::Unreachable);
    let group = group_of(vec![a, b, c]);

    let info = group.info(b"{}").await.unwrap();

    assert_eq!(info.certificate, "PEM-B");
    assert_eq!(c_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cancel_aborts_in_flight_attempt() {
    let (a, a_calls) = MockEndpoint::new("a", Behavior::Hang);
    let (b, b_calls) = MockEndpoint::new("b", Behavior::Unreachable);
    let group = group_of(vec![a, b]);

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let err = group.sign_with_cancel(b"{}", &cancel).await.unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert_eq!(a_calls.load(Ordering::SeqCst), 1, "a was attempted");
    assert_eq!(b_calls.load(Ordering::SeqCst), 0, "b is skipped after cancellation");
}
