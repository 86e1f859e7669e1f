use paysafecard::domain::ports::{Operation, Payload, PscTransport};
use paysafecard::infrastructure::soap::{SoapError, SoapTransport};
use paysafecard::{Environment, PaysafecardError, TransactionClient};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DISPOSITION_OK: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
  <soapenv:Body>
    <ns1:createDispositionResponse xmlns:ns1="urn:pscservice">
      <createDispositionReturn>
        <errorCode>0</errorCode>
        <mid>1000000123</mid>
        <mtid>order-1</mtid>
        <resultCode>0</resultCode>
      </createDispositionReturn>
    </ns1:createDispositionResponse>
  </soapenv:Body>
</soapenv:Envelope>"#;

const FAULT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
  <soapenv:Body>
    <soapenv:Fault>
      <faultcode>soapenv:Server.userException</faultcode>
      <faultstring>invalid credentials</faultstring>
    </soapenv:Fault>
  </soapenv:Body>
</soapenv:Envelope>"#;

fn transport_for(server: &MockServer) -> SoapTransport {
    SoapTransport::new(format!("{}/psc/services/PscService", server.uri()))
}

#[tokio::test]
async fn test_authorize_over_soap() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/psc/services/PscService"))
        .and(header("content-type", "text/xml; charset=utf-8"))
        .and(body_string_contains("<psc:createDisposition>"))
        .and(body_string_contains("<psc:amount>12.30</psc:amount>"))
        .and(body_string_contains(
            "<psc:okUrl>https%3A%2F%2Fshop.example%2Fok</psc:okUrl>",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(DISPOSITION_OK))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let mut tx = TransactionClient::with(Environment::Test, Box::new(transport), |t| {
        t.username = Some("user".into());
        t.password = Some("pass".into());
        t.transaction_id = Some("order-1".into());
        t.amount = Some(dec!(12.3));
        t.ok_url = Some("https://shop.example/ok".into());
        t.nok_url = Some("https://shop.example/nok".into());
        t.pn_url = Some("https://shop.example/pn".into());
        t.client_id = Some("c-1".into());
        t.shop_id = Some("s-1".into());
        t.shop_label = Some("Shop".into());
    });

    tx.authorize(true).await.unwrap();
    assert_eq!(tx.mid.as_deref(), Some("1000000123"));
}

#[tokio::test]
async fn test_soap_fault_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string(FAULT))
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let mut tx = TransactionClient::with(Environment::Test, Box::new(transport), |t| {
        t.username = Some("user".into());
        t.password = Some("wrong".into());
        t.transaction_id = Some("order-1".into());
        t.amount = Some(dec!(1));
    });

    let err = tx.capture(true).await.unwrap_err();
    let PaysafecardError::Transport(inner) = &err else {
        panic!("unexpected error: {err:?}");
    };
    let soap = inner.downcast_ref::<SoapError>().expect("soap error");
    assert!(matches!(
        soap,
        SoapError::Fault { code, message }
            if code == "soapenv:Server.userException" && message == "invalid credentials"
    ));
}

#[tokio::test]
async fn test_non_xml_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<<unavailable"))
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let err = transport
        .call(Operation::GetSerialNumbers, Payload::new())
        .await
        .unwrap_err();

    let soap = err.downcast_ref::<SoapError>().expect("soap error");
    assert!(matches!(soap, SoapError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_response_body_is_returned_as_nested_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("<psc:getSerialNumbers>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            DISPOSITION_OK.replace("createDisposition", "getSerialNumbers"),
        ))
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let response = transport
        .call(Operation::GetSerialNumbers, Payload::new())
        .await
        .unwrap();

    assert_eq!(
        response["getSerialNumbersResponse"]["getSerialNumbersReturn"]["mid"],
        json!("1000000123")
    );
}
