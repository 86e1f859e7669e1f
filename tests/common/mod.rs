#![allow(dead_code)]

use paysafecard::domain::ports::Operation;
use paysafecard::infrastructure::canned::CannedTransport;
use paysafecard::{Environment, TransactionClient};
use rust_decimal_macros::dec;
use serde_json::{Map, Value, json};

/// A client with every field authorize needs, backed by `transport`.
pub fn configured_client(transport: &CannedTransport) -> TransactionClient {
    TransactionClient::with(Environment::Test, Box::new(transport.clone()), |t| {
        t.username = Some("soap_user".into());
        t.password = Some("soap_password".into());
        t.transaction_id = Some("order-1".into());
        t.amount = Some(dec!(9.5));
        t.ok_url = Some("https://shop.example/ok?order=1".into());
        t.nok_url = Some("https://shop.example/nok".into());
        t.pn_url = Some("https://shop.example/notify".into());
        t.client_id = Some("customer-42".into());
        t.shop_id = Some("shop-1".into());
        t.shop_label = Some("Example Shop".into());
    })
}

/// Wraps a result record the way the service nests it for `operation`.
pub fn wrapped(operation: Operation, record: Value) -> Value {
    let [response, ret] = operation.response_path();
    json!({ response: { ret: record } })
}

pub fn codes(result_code: i64, error_code: i64) -> Value {
    json!({"resultCode": result_code, "errorCode": error_code})
}

pub fn codes_with(result_code: i64, error_code: i64, extra: &[(&str, Value)]) -> Value {
    let mut record = Map::new();
    record.insert("resultCode".into(), json!(result_code));
    record.insert("errorCode".into(), json!(error_code));
    for (key, value) in extra {
        record.insert((*key).to_string(), value.clone());
    }
    Value::Object(record)
}
