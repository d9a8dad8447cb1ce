//! Contract tests for NodeClient against the ledger node's HTTP surface.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/chain` | `fetch_ledger_*` |
//! | GET    | `/last_block` | `fetch_last_block_*` |
//! | POST   | `/transactions/new` | `submit_*` |

use chain_wallet::config::NodeConfig;
use chain_wallet::interfaces::{LedgerFetcher, PaymentSubmitter, TransferRequest};
use chain_wallet::node::{NodeClient, RetryPolicy};
use chain_wallet::{AccountId, Amount, Error, Transaction};
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> NodeClient {
    let config = NodeConfig {
        base_url: mock_server.uri(),
        timeout_secs: 5,
    };
    NodeClient::new(&config, RetryPolicy::none()).unwrap()
}

fn slow_client(mock_server: &MockServer, max_retries: u32) -> NodeClient {
    let config = NodeConfig {
        base_url: mock_server.uri(),
        timeout_secs: 1,
    };
    let retry = RetryPolicy {
        max_retries,
        base_delay: Duration::from_millis(1),
    };
    NodeClient::new(&config, retry).unwrap()
}

fn transfer(sender: &str, recipient: &str, amount: i64) -> TransferRequest {
    TransferRequest {
        sender: AccountId::from(sender),
        recipient: AccountId::from(recipient),
        amount: Amount::from_i64(amount),
    }
}

// ── GET /chain ───────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_ledger_returns_blocks_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "length": 2,
            "chain": [
                {
                    "index": 1,
                    "timestamp": 1580000000.0,
                    "transactions": [],
                    "proof": 100,
                    "previous_hash": 1
                },
                {
                    "index": 2,
                    "timestamp": 1580000042.0,
                    "transactions": [
                        { "sender": "0", "recipient": "alice", "amount": 50 },
                        { "sender": "alice", "recipient": "bob", "amount": 20 }
                    ],
                    "proof": 8841,
                    "previous_hash": "0000c1"
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let snapshot = test_client(&mock_server).fetch_ledger().await.unwrap();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.height(), 2);
    assert_eq!(
        snapshot.transactions().cloned().collect::<Vec<_>>(),
        vec![
            Transaction::new("0", "alice", 50),
            Transaction::new("alice", "bob", 20),
        ]
    );
}

#[tokio::test]
async fn fetch_ledger_skips_malformed_entries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "chain": [
                { "index": 1, "transactions": [
                    { "sender": "0", "recipient": "alice", "amount": 1 },
                    { "recipient": "alice", "amount": 1 }
                ]},
                { "index": 2 }
            ]
        })))
        .mount(&mock_server)
        .await;

    let report = test_client(&mock_server).fetch_chain_report().await.unwrap();
    assert_eq!(report.snapshot.len(), 1);
    assert_eq!(report.snapshot.transaction_count(), 1);
    assert_eq!(report.skipped.len(), 2);
    assert!(report
        .skipped
        .iter()
        .all(|e| matches!(e, Error::MalformedLedgerEntry { .. })));
}

#[tokio::test]
async fn fetch_ledger_server_error_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chain"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server).fetch_ledger().await.unwrap_err();
    match err {
        Error::FetchUnavailable { reason } => assert!(reason.contains("500"), "{}", reason),
        other => panic!("expected FetchUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn fetch_ledger_non_json_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chain"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server).fetch_ledger().await.unwrap_err();
    assert!(matches!(err, Error::FetchUnavailable { .. }));
}

#[tokio::test]
async fn fetch_ledger_unreachable_node_is_unavailable() {
    let config = NodeConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 1,
    };
    let client = NodeClient::new(&config, RetryPolicy::none()).unwrap();

    let err = client.fetch_ledger().await.unwrap_err();
    assert!(matches!(err, Error::FetchUnavailable { .. }));
}

#[tokio::test]
async fn fetch_ledger_retries_timeouts_per_policy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chain"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "chain": [] }))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&mock_server)
        .await;

    let err = slow_client(&mock_server, 2).fetch_ledger().await.unwrap_err();
    assert!(matches!(err, Error::FetchUnavailable { .. }));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

// ── GET /last_block ──────────────────────────────────────────────────

#[tokio::test]
async fn fetch_last_block_returns_tip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/last_block"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "last_block": {
                "index": 5,
                "timestamp": 1580000500.0,
                "transactions": [{ "sender": "0", "recipient": "miner", "amount": 1 }],
                "proof": 1234,
                "previous_hash": "0000ff"
            }
        })))
        .mount(&mock_server)
        .await;

    let tip = test_client(&mock_server).fetch_last_block().await.unwrap();
    assert_eq!(tip.index, Some(5));
    assert_eq!(tip.transactions, vec![Transaction::new("0", "miner", 1)]);
}

// ── POST /transactions/new ───────────────────────────────────────────

#[tokio::test]
async fn submit_posts_transfer_and_parses_receipt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transactions/new"))
        .and(body_json(serde_json::json!({
            "sender": "alice",
            "recipient": "bob",
            "amount": 1
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "message": "Transaction will be added to block 3"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let receipt = test_client(&mock_server)
        .submit(&transfer("alice", "bob", 1))
        .await
        .unwrap();
    assert_eq!(receipt.message, "Transaction will be added to block 3");
    assert_eq!(receipt.expected_block, Some(3));
}

#[tokio::test]
async fn submit_rejection_is_submission_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transactions/new"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "message": "Missing values. Must provide id and proof in req"
        })))
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server)
        .submit(&transfer("alice", "", 1))
        .await
        .unwrap_err();

    match err {
        Error::SubmissionFailed { status, reason } => {
            assert_eq!(status, Some(400));
            assert!(reason.starts_with("Missing values"));
        }
        other => panic!("expected SubmissionFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn submit_to_unreachable_node_has_no_status() {
    let config = NodeConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 1,
    };
    let client = NodeClient::new(&config, RetryPolicy::none()).unwrap();

    let err = client.submit(&transfer("alice", "bob", 1)).await.unwrap_err();
    assert!(matches!(err, Error::SubmissionFailed { status: None, .. }));
}

#[tokio::test]
async fn submit_is_never_repeated_after_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transactions/new"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(serde_json::json!({
                    "message": "Transaction will be added to block 3"
                }))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&mock_server)
        .await;

    let err = slow_client(&mock_server, 2)
        .submit(&transfer("alice", "bob", 1))
        .await
        .unwrap_err();

    match err {
        Error::SubmissionFailed { status, reason } => {
            assert_eq!(status, None);
            assert!(reason.contains("may still be accepted"), "{}", reason);
        }
        other => panic!("expected SubmissionFailed, got {:?}", other),
    }

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn submit_retries_when_node_unreachable() {
    let config = NodeConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 1,
    };
    let retry = RetryPolicy {
        max_retries: 1,
        base_delay: Duration::from_millis(1),
    };
    let client = NodeClient::new(&config, retry).unwrap();

    let err = client.submit(&transfer("alice", "bob", 1)).await.unwrap_err();
    match err {
        Error::SubmissionFailed { status, reason } => {
            assert_eq!(status, None);
            assert!(reason.starts_with("node unreachable"), "{}", reason);
        }
        other => panic!("expected SubmissionFailed, got {:?}", other),
    }
}
