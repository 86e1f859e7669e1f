use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

/// Request fields in the order they are sent.
pub type Payload = Map<String, Value>;

/// Failure raised by a transport, handed back to the caller untouched.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Remote operations exposed by the provider's service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateDisposition,
    ExecuteDebit,
    GetSerialNumbers,
}

impl Operation {
    /// Name of the operation on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Operation::CreateDisposition => "createDisposition",
            Operation::ExecuteDebit => "executeDebit",
            Operation::GetSerialNumbers => "getSerialNumbers",
        }
    }

    /// Keys leading from the response root to the operation's result record.
    pub fn response_path(self) -> [&'static str; 2] {
        match self {
            Operation::CreateDisposition => {
                ["createDispositionResponse", "createDispositionReturn"]
            }
            Operation::ExecuteDebit => ["executeDebitResponse", "executeDebitReturn"],
            Operation::GetSerialNumbers => ["getSerialNumbersResponse", "getSerialNumbersReturn"],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Performs one remote call and returns the response as a nested mapping.
#[async_trait]
pub trait PscTransport: Send + Sync {
    async fn call(&self, operation: Operation, payload: Payload) -> Result<Value, TransportError>;
}

pub type PscTransportBox = Box<dyn PscTransport>;

