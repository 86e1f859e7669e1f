use crate::domain::ports::{Operation, Payload, PscTransport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug)]
#[error("no canned response left for {0}")]
pub struct NoCannedResponse(pub Operation);

/// A recorded remote call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: Operation,
    pub payload: Payload,
}

/// An offline transport answering from a queue of scripted responses per
/// operation and remembering every request it was given.
///
/// Clones share the same script and call log, so a test can keep one handle
/// while the client owns another.
#[derive(Default, Clone)]
pub struct CannedTransport {
    responses: Arc<Mutex<HashMap<Operation, VecDeque<Result<Value, String>>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl CannedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for the next call of `operation`.
    pub async fn respond(&self, operation: Operation, response: Value) {
        let mut responses = self.responses.lock().await;
        responses.entry(operation).or_default().push_back(Ok(response));
    }

    /// Queues a transport failure for the next call of `operation`.
    pub async fn fail(&self, operation: Operation, message: impl Into<String>) {
        let mut responses = self.responses.lock().await;
        responses
            .entry(operation)
            .or_default()
            .push_back(Err(message.into()));
    }

    /// Every call received so far, oldest first.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl PscTransport for CannedTransport {
    async fn call(&self, operation: Operation, payload: Payload) -> Result<Value, TransportError> {
        self.calls
            .lock()
            .await
            .push(RecordedCall { operation, payload });

        let next = self
            .responses
            .lock()
            .await
            .get_mut(&operation)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(message.into()),
            None => Err(Box::new(NoCannedResponse(operation))),
        }
    }
}
