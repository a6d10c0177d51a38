use super::host::spawn_worker;
use super::protocol::{new_request_id, WorkerRequest, WorkerResponse};
use crate::core::models::{MinificationOptions, MinificationResult, SupportedLanguage};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How long a request may wait for its response
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    #[error("Worker request {id} timed out after {after:?}")]
    Timeout { id: String, after: Duration },

    #[error("Worker failed: {0}")]
    Failed(String),

    #[error("Worker channel closed")]
    Disconnected,

    #[error("Worker response for {id} reported success without a result")]
    MalformedResponse { id: String },
}

type PendingMap = Arc<DashMap<String, oneshot::Sender<WorkerResponse>>>;

/// Caller side of the worker protocol.
///
/// Each call registers a one-shot slot under a fresh id and waits for the
/// dispatcher to route the matching response into it. Requests are independent:
/// each has its own timeout and a late or unknown response is dropped.
pub struct WorkerClient {
    requests: mpsc::Sender<WorkerRequest>,
    pending: PendingMap,
    timeout: Duration,
    dispatcher: JoinHandle<()>,
}

impl WorkerClient {
    /// Start an in-process worker thread and connect to it.
    /// Must be called from within a tokio runtime.
    pub fn spawn() -> Self {
        let (requests, responses) = spawn_worker();
        Self::connect(requests, responses)
    }

    /// Connect to any transport that speaks the protocol
    pub fn connect(
        requests: mpsc::Sender<WorkerRequest>,
        responses: mpsc::Receiver<WorkerResponse>,
    ) -> Self {
        let pending: PendingMap = Arc::new(DashMap::new());
        let dispatcher = tokio::spawn(dispatch(responses, pending.clone()));
        Self {
            requests,
            pending,
            timeout: REQUEST_TIMEOUT,
            dispatcher,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    pub async fn minify(
        &self,
        code: impl Into<String>,
        language: SupportedLanguage,
        options: MinificationOptions,
    ) -> Result<MinificationResult, WorkerError> {
        let id = new_request_id();
        let (reply_tx, reply_rx) = oneshot::channel();
        self.pending.insert(id.clone(), reply_tx);
        let _slot = PendingSlot {
            pending: &self.pending,
            id: id.clone(),
        };

        let request = WorkerRequest {
            id: id.clone(),
            code: code.into(),
            language,
            options,
        };
        debug!("Dispatching worker request {} ({})", id, language);

        let exchange = async {
            self.requests
                .send(request)
                .await
                .map_err(|_| WorkerError::Disconnected)?;
            reply_rx.await.map_err(|_| WorkerError::Disconnected)
        };

        let response = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(response) => response?,
            Err(_) => {
                warn!("Worker request {} timed out after {:?}", id, self.timeout);
                return Err(WorkerError::Timeout {
                    id,
                    after: self.timeout,
                });
            }
        };

        into_result(response)
    }
}

impl Drop for WorkerClient {
    fn drop(&mut self) {
        self.dispatcher.abort();
    }
}

fn into_result(response: WorkerResponse) -> Result<MinificationResult, WorkerError> {
    match response {
        WorkerResponse {
            success: true,
            result: Some(result),
            ..
        } => Ok(result),
        WorkerResponse { success: true, id, .. } => Err(WorkerError::MalformedResponse { id }),
        WorkerResponse { error, .. } => Err(WorkerError::Failed(
            error.unwrap_or_else(|| "unknown worker error".to_string()),
        )),
    }
}

async fn dispatch(mut responses: mpsc::Receiver<WorkerResponse>, pending: PendingMap) {
    while let Some(response) = responses.recv().await {
        match pending.remove(&response.id) {
            Some((_, slot)) => {
                // The caller may have timed out in the meantime
                let _ = slot.send(response);
            }
            None => debug!("Dropping response for unknown request {}", response.id),
        }
    }
    // Worker gone: wake every waiter with a closed channel
    pending.clear();
}

/// Removes the pending entry however the request ends
struct PendingSlot<'a> {
    pending: &'a PendingMap,
    id: String,
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        self.pending.remove(&self.id);
    }
}
