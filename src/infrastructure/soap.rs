use crate::domain::ports::{Operation, Payload, PscTransport, TransportError};
use async_trait::async_trait;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const PSC_NS: &str = "urn:pscservice";

#[derive(Error, Debug)]
pub enum SoapError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("SOAP fault {code}: {message}")]
    Fault { code: String, message: String },
    #[error("unexpected HTTP status {status}")]
    Status { status: u16, body: String },
    #[error("response has no SOAP body")]
    MissingBody,
}

/// Talks to the provider's SOAP service over HTTP.
///
/// Request and response bodies are never logged; they carry credentials.
#[derive(Debug, Clone)]
pub struct SoapTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl SoapTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Uses a preconfigured HTTP client, e.g. one with timeouts set.
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, operation: Operation, payload: &Payload) -> Result<Value, SoapError> {
        let envelope = envelope(operation, payload)?;
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", "\"\"")
            .body(envelope)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(%operation, status = status.as_u16(), bytes = text.len(), "soap response");

        match parse_document(&text).and_then(soap_body) {
            Ok(body) => {
                if let Some(fault) = body.get("Fault") {
                    return Err(fault_error(fault));
                }
                if !status.is_success() {
                    return Err(SoapError::Status {
                        status: status.as_u16(),
                        body: text,
                    });
                }
                Ok(Value::Object(body))
            }
            Err(_) if !status.is_success() => Err(SoapError::Status {
                status: status.as_u16(),
                body: text,
            }),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl PscTransport for SoapTransport {
    async fn call(&self, operation: Operation, payload: Payload) -> Result<Value, TransportError> {
        debug!(%operation, endpoint = %self.endpoint, "soap request");
        self.post(operation, &payload)
            .await
            .map_err(|e| Box::new(e) as TransportError)
    }
}

/// Renders the SOAP 1.1 request for `operation`, one child element per
/// payload entry in payload order.
pub fn envelope(operation: Operation, payload: &Payload) -> Result<String, SoapError> {
    let body = operation_element(operation, payload)?;
    Ok(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="{SOAP_ENVELOPE_NS}" xmlns:psc="{PSC_NS}">
<soapenv:Header/>
<soapenv:Body>
{body}
</soapenv:Body>
</soapenv:Envelope>"#
    ))
}

fn operation_element(operation: Operation, payload: &Payload) -> Result<String, SoapError> {
    let mut writer = Writer::new(Vec::new());
    let name = format!("psc:{}", operation.name());
    writer.write_event(Event::Start(BytesStart::new(name.as_str())))?;

    for (key, value) in payload {
        let tag = format!("psc:{key}");
        let text = match value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if text.is_empty() {
            writer.write_event(Event::Empty(BytesStart::new(tag.as_str())))?;
        } else {
            writer.write_event(Event::Start(BytesStart::new(tag.as_str())))?;
            writer.write_event(Event::Text(BytesText::new(&text)))?;
            writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/// Parses an XML document into nested mappings keyed by local element name.
///
/// Leaf elements become strings (or null when empty), repeated siblings
/// become lists, and attributes are dropped.
pub fn parse_document(xml: &str) -> Result<Value, SoapError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<(String, Map<String, Value>, String)> = Vec::new();
    let mut root = Map::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                stack.push((name, Map::new(), String::new()));
            }
            Event::End(_) => {
                if let Some((name, children, text)) = stack.pop() {
                    let value = if !children.is_empty() {
                        Value::Object(children)
                    } else if text.trim().is_empty() {
                        Value::Null
                    } else {
                        Value::String(text.trim().to_string())
                    };
                    let parent = stack.last_mut().map_or(&mut root, |(_, map, _)| map);
                    insert(parent, name, value);
                }
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                let parent = stack.last_mut().map_or(&mut root, |(_, map, _)| map);
                insert(parent, name, Value::Null);
            }
            Event::Text(e) => {
                if let Some((_, _, text)) = stack.last_mut() {
                    text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some((_, _, text)) = stack.last_mut() {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(Value::Object(root))
}

fn insert(map: &mut Map<String, Value>, key: String, value: Value) {
    match map.get_mut(&key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(key, value);
        }
    }
}

fn soap_body(document: Value) -> Result<Map<String, Value>, SoapError> {
    let Value::Object(mut root) = document else {
        return Err(SoapError::MissingBody);
    };
    let Some(Value::Object(mut envelope)) = root.remove("Envelope") else {
        return Err(SoapError::MissingBody);
    };
    match envelope.remove("Body") {
        Some(Value::Object(body)) => Ok(body),
        Some(Value::Null) => Ok(Map::new()),
        _ => Err(SoapError::MissingBody),
    }
}

fn fault_error(fault: &Value) -> SoapError {
    let field = |key: &str| {
        fault
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    SoapError::Fault {
        code: field("faultcode"),
        message: field("faultstring"),
    }
}
