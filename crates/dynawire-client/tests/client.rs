//! End-to-end client behavior against an in-process mock of the
//! HTTP-send collaborator: retry timing, cancellation, classification
//! and typed round trips.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dynawire_client::{
    Client, ClientError, Endpoint, HttpSend, RetryPolicy, TransportError,
};
use dynawire_codec::wire_record;
use dynawire_sign::Credentials;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

const THROUGHPUT_EXCEEDED: &[u8] =
    br#"{"__type":"com.amazonaws.dynamodb.v20120810#ProvisionedThroughputExceededException","message":"slow down"}"#;
const VALIDATION_ERROR: &[u8] =
    br#"{"__type":"com.amazon.coral.validate#ValidationException","message":"bad input"}"#;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct Person {
    name: String,
    weight: i64,
}

wire_record!(Person, keys = ["Name"]);

/// Records every request and replays a scripted queue of responses.
/// The last response is repeated once the queue drains; `cancel_after`
/// fires the token when the given request number is reached.
#[derive(Debug)]
struct MockSend {
    responses: Mutex<VecDeque<(u16, Vec<u8>)>>,
    requests: Mutex<Vec<http::Request<Bytes>>>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl MockSend {
    fn new(responses: Vec<(u16, &[u8])>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(
                responses
                    .into_iter()
                    .map(|(status, body)| (status, body.to_vec()))
                    .collect(),
            ),
            requests: Mutex::new(Vec::new()),
            cancel_after: None,
        })
    }

    fn cancelling_after(
        responses: Vec<(u16, &[u8])>,
        count: usize,
        cancel: CancellationToken,
    ) -> Arc<Self> {
        let mut mock = Self::new(responses);
        Arc::get_mut(&mut mock).expect("fresh arc").cancel_after = Some((count, cancel));
        mock
    }

    fn request_count(&self) -> usize {
        self.requests.lock().expect("lock").len()
    }

    fn request_bodies(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("lock")
            .iter()
            .map(|req| String::from_utf8(req.body().to_vec()).expect("utf8 body"))
            .collect()
    }

    fn request_header(&self, index: usize, name: &str) -> Option<String> {
        self.requests.lock().expect("lock")[index]
            .headers()
            .get(name)
            .map(|v| v.to_str().expect("header value").to_owned())
    }
}

#[async_trait]
impl HttpSend for MockSend {
    async fn send(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>, TransportError> {
        let count = {
            let mut requests = self.requests.lock().expect("lock");
            requests.push(request);
            requests.len()
        };
        if let Some((after, cancel)) = &self.cancel_after {
            if count >= *after {
                cancel.cancel();
            }
        }
        let (status, body) = {
            let mut responses = self.responses.lock().expect("lock");
            if responses.len() > 1 {
                responses.pop_front().expect("nonempty")
            } else {
                responses.front().cloned().expect("scripted response")
            }
        };
        Ok(http::Response::builder()
            .status(status)
            .body(Bytes::from(body))
            .expect("response"))
    }
}

fn test_client(sender: Arc<MockSend>, policy: RetryPolicy) -> Client {
    Client::builder(
        Endpoint::custom("test", "us-east-1", "localhost:8000", false),
        Credentials::new("access-key", "secret-key"),
    )
    .sender(sender)
    .policy(policy)
    .build()
}

#[tokio::test(start_paused = true)]
async fn test_should_surface_retryable_error_immediately_with_zero_budget() {
    let mock = MockSend::new(vec![(400, THROUGHPUT_EXCEEDED)]);
    let client = test_client(Arc::clone(&mock), RetryPolicy::none());
    let cancel = CancellationToken::new();

    let started = tokio::time::Instant::now();
    let err = client
        .invoke(dynawire_model::Operation::GetItem, b"{}", &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Remote(ref remote)
        if remote.kind.as_deref() == Some("ProvisionedThroughputExceededException")));
    assert_eq!(mock.request_count(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_should_back_off_three_times_then_report_exhaustion() {
    let mock = MockSend::new(vec![(500, br#"{"__type":"InternalServerError","message":"x"}"#)]);
    let client = test_client(Arc::clone(&mock), RetryPolicy::default());
    let cancel = CancellationToken::new();

    let started = tokio::time::Instant::now();
    let err = client
        .invoke(dynawire_model::Operation::PutItem, b"{}", &cancel)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::RetryExhausted { attempts: 3, ref source }
            if source.kind.as_deref() == Some("InternalServerError")
    ));
    // Initial attempt plus three retries, with 50/100/200ms sleeps.
    assert_eq!(mock.request_count(), 4);
    assert_eq!(started.elapsed(), Duration::from_millis(350));
}

#[tokio::test(start_paused = true)]
async fn test_should_not_retry_terminal_remote_errors() {
    let mock = MockSend::new(vec![(400, VALIDATION_ERROR)]);
    let client = test_client(Arc::clone(&mock), RetryPolicy::default());
    let cancel = CancellationToken::new();

    let started = tokio::time::Instant::now();
    let err = client
        .invoke(dynawire_model::Operation::PutItem, b"{}", &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Remote(ref remote)
        if remote.kind.as_deref() == Some("ValidationException")));
    assert_eq!(mock.request_count(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_should_recover_after_transient_throughput_error() {
    let mock = MockSend::new(vec![(400, THROUGHPUT_EXCEEDED), (200, b"{}")]);
    let client = test_client(Arc::clone(&mock), RetryPolicy::default());
    let cancel = CancellationToken::new();

    let started = tokio::time::Instant::now();
    let body = client
        .invoke(dynawire_model::Operation::PutItem, b"{}", &cancel)
        .await
        .expect("second attempt succeeds");

    assert_eq!(body.as_ref(), b"{}");
    assert_eq!(mock.request_count(), 2);
    assert_eq!(started.elapsed(), Duration::from_millis(50));
}

#[tokio::test(start_paused = true)]
async fn test_should_keep_retrying_with_unlimited_budget() {
    let mut responses: Vec<(u16, &[u8])> = vec![(500, br#"{"__type":"InternalServerError"}"#); 6];
    responses.push((200, b"{}"));
    let mock = MockSend::new(responses);
    let client = test_client(Arc::clone(&mock), RetryPolicy::unlimited());
    let cancel = CancellationToken::new();

    client
        .invoke(dynawire_model::Operation::PutItem, b"{}", &cancel)
        .await
        .expect("eventually succeeds");
    assert_eq!(mock.request_count(), 7);
}

#[tokio::test(start_paused = true)]
async fn test_should_report_cancellation_instead_of_backing_off() {
    let cancel = CancellationToken::new();
    let mock = MockSend::cancelling_after(
        vec![(400, THROUGHPUT_EXCEEDED)],
        1,
        cancel.clone(),
    );
    let client = test_client(Arc::clone(&mock), RetryPolicy::default());

    let err = client
        .invoke(dynawire_model::Operation::GetItem, b"{}", &cancel)
        .await
        .unwrap_err();

    // The token fired while the first attempt was concluding, so the
    // backoff sleep never runs and no further attempt is made.
    assert!(matches!(err, ClientError::Cancelled));
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_should_report_cancellation_before_first_attempt() {
    let mock = MockSend::new(vec![(200, b"{}")]);
    let client = test_client(Arc::clone(&mock), RetryPolicy::default());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client
        .invoke(dynawire_model::Operation::GetItem, b"{}", &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Cancelled));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_should_sign_every_attempt() {
    let mock = MockSend::new(vec![(400, THROUGHPUT_EXCEEDED), (200, b"{}")]);
    let client = test_client(Arc::clone(&mock), RetryPolicy::default());
    let cancel = CancellationToken::new();

    client
        .invoke(dynawire_model::Operation::GetItem, b"{}", &cancel)
        .await
        .expect("succeeds");

    for index in 0..mock.request_count() {
        let authorization = mock
            .request_header(index, "authorization")
            .expect("authorization header");
        assert!(authorization.starts_with(
            "AWS4-HMAC-SHA256 Credential=access-key/"
        ));
        assert!(authorization.contains(
            "SignedHeaders=content-type;host;x-amz-date;x-amz-target"
        ));
        assert!(mock.request_header(index, "x-amz-date").is_some());
        assert_eq!(
            mock.request_header(index, "x-amz-target").as_deref(),
            Some("DynamoDB_20120810.GetItem")
        );
        assert_eq!(
            mock.request_header(index, "content-type").as_deref(),
            Some("application/x-amz-json-1.0")
        );
    }
}

#[tokio::test]
async fn test_should_put_record_with_exact_wire_payload() {
    let mock = MockSend::new(vec![(200, b"{}")]);
    let client = test_client(Arc::clone(&mock), RetryPolicy::default());
    let cancel = CancellationToken::new();

    let person = Person {
        name: "Tom".to_owned(),
        weight: 80,
    };
    client
        .table("Test")
        .put(&person, &cancel)
        .await
        .expect("put succeeds");

    assert_eq!(
        mock.request_bodies(),
        vec![r#"{"TableName":"Test","Item":{"Name":{"S":"Tom"},"Weight":{"N":"80"}}}"#.to_owned()]
    );
}

#[tokio::test]
async fn test_should_get_and_decode_record() {
    let mock = MockSend::new(vec![(
        200,
        br#"{"Item":{"Name":{"S":"Tom"},"Weight":{"N":"80"}}}"#,
    )]);
    let client = test_client(Arc::clone(&mock), RetryPolicy::default());
    let cancel = CancellationToken::new();

    let key = Person {
        name: "Tom".to_owned(),
        ..Person::default()
    };
    let person = client
        .table("Test")
        .get(&key, true, &cancel)
        .await
        .expect("get succeeds");

    assert_eq!(
        person,
        Person {
            name: "Tom".to_owned(),
            weight: 80,
        }
    );
    assert_eq!(
        mock.request_bodies(),
        vec![
            r#"{"TableName":"Test","Key":{"Name":{"S":"Tom"}},"ConsistentRead":true}"#.to_owned()
        ]
    );
}

#[tokio::test]
async fn test_should_report_missing_item_on_get() {
    let mock = MockSend::new(vec![(200, b"{}")]);
    let client = test_client(Arc::clone(&mock), RetryPolicy::default());
    let cancel = CancellationToken::new();

    let key = Person {
        name: "Tom".to_owned(),
        ..Person::default()
    };
    let err = client
        .table("Test")
        .get(&key, false, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::MissingItem));
}

#[tokio::test]
async fn test_should_describe_table_from_wrapped_response() {
    let mock = MockSend::new(vec![(
        200,
        br#"{"Table":{"TableName":"Test","TableStatus":"ACTIVE"}}"#,
    )]);
    let client = test_client(Arc::clone(&mock), RetryPolicy::default());
    let cancel = CancellationToken::new();

    let description = client
        .describe_table("Test", &cancel)
        .await
        .expect("describe succeeds");
    assert_eq!(description.table_name, "Test");
    assert_eq!(description.table_status, "ACTIVE");
    assert_eq!(
        mock.request_bodies(),
        vec![r#"{"TableName":"Test"}"#.to_owned()]
    );
}
