mod common;

use common::{codes, codes_with, configured_client, wrapped};
use paysafecard::PaysafecardError;
use paysafecard::domain::fields::Field;
use paysafecard::domain::ports::Operation;
use paysafecard::infrastructure::canned::CannedTransport;
use serde_json::json;

#[tokio::test]
async fn test_status_returns_full_record() {
    let transport = CannedTransport::new();
    transport
        .respond(
            Operation::GetSerialNumbers,
            wrapped(
                Operation::GetSerialNumbers,
                codes_with(
                    0,
                    0,
                    &[
                        ("mid", json!("M123")),
                        ("serialNumbers", json!("0000000001;EUR;9.50;")),
                        ("dispositionState", json!("S")),
                    ],
                ),
            ),
        )
        .await;

    let tx = configured_client(&transport);
    let status = tx.status().await.unwrap();

    assert!(status.codes.is_success());
    assert_eq!(status.mid(), Some("M123"));
    assert_eq!(status.serial_numbers(), Some("0000000001;EUR;9.50;"));
    assert_eq!(status.disposition_state(), Some("S"));
    assert_eq!(status.get("resultCode"), Some(&json!(0)));
}

#[tokio::test]
async fn test_status_sends_minimal_payload() {
    let transport = CannedTransport::new();
    transport
        .respond(
            Operation::GetSerialNumbers,
            wrapped(Operation::GetSerialNumbers, codes(0, 0)),
        )
        .await;

    let mut tx = configured_client(&transport);
    tx.sub_id = Some("sub-9".into());
    tx.status().await.unwrap();

    let calls = transport.calls().await;
    let payload = &calls[0].payload;
    let keys: Vec<&str> = payload.keys().map(String::as_str).collect();
    assert_eq!(keys, ["username", "password", "mtid", "subId", "currency"]);
    assert_eq!(payload["subId"], "sub-9");
}

#[tokio::test]
async fn test_status_failure() {
    let transport = CannedTransport::new();
    transport
        .respond(
            Operation::GetSerialNumbers,
            wrapped(Operation::GetSerialNumbers, codes(0, 10)),
        )
        .await;

    let tx = configured_client(&transport);
    let err = tx.status().await.unwrap_err();

    assert_eq!(err.to_string(), "status failed with 0, error 10");
    assert_eq!(err.codes(), Some((0, 10)));
}

#[tokio::test]
async fn test_status_does_not_need_amount() {
    let transport = CannedTransport::new();
    transport
        .respond(
            Operation::GetSerialNumbers,
            wrapped(Operation::GetSerialNumbers, codes(0, 0)),
        )
        .await;

    let mut tx = configured_client(&transport);
    tx.amount = None;
    assert!(tx.status().await.is_ok());

    tx.password = None;
    let err = tx.status().await.unwrap_err();
    let PaysafecardError::Configuration(missing) = err else {
        panic!("expected configuration error");
    };
    assert_eq!(missing.fields(), &[Field::Password]);
}

#[tokio::test]
async fn test_status_names_every_missing_field() {
    let transport = CannedTransport::new();
    let mut tx = configured_client(&transport);
    tx.username = None;
    tx.transaction_id = None;
    tx.currency = None;

    let err = tx.status().await.unwrap_err();
    let PaysafecardError::Configuration(missing) = &err else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(
        missing.fields(),
        &[Field::Username, Field::TransactionId, Field::Currency]
    );
    assert_eq!(
        err.to_string(),
        "required options missing: username, transaction_id, currency"
    );
    assert!(transport.calls().await.is_empty());
}

#[tokio::test]
async fn test_status_without_response_wrapper_names_it() {
    let transport = CannedTransport::new();
    transport
        .respond(Operation::GetSerialNumbers, json!({"unexpected": {}}))
        .await;

    let tx = configured_client(&transport);
    let err = tx.status().await.unwrap_err();

    assert!(
        matches!(err, PaysafecardError::Unpack { ref key, .. } if key == "getSerialNumbersResponse")
    );
}

#[tokio::test]
async fn test_status_without_return_record_names_it() {
    let transport = CannedTransport::new();
    transport
        .respond(
            Operation::GetSerialNumbers,
            json!({"getSerialNumbersResponse": {"other": 1}}),
        )
        .await;

    let tx = configured_client(&transport);
    let err = tx.status().await.unwrap_err();

    assert!(
        matches!(err, PaysafecardError::Unpack { ref key, .. } if key == "getSerialNumbersReturn")
    );
    assert_eq!(
        err.to_string(),
        "could not unpack getSerialNumbersReturn from response"
    );
}
