use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::hn_client::SearchBackend;
use crate::session::{FetchOutcome, FetchRequest, SessionState};

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Runs each search request on its own thread and queues the outcomes for
/// the UI thread to apply.
///
/// Requests are neither deduplicated nor cancelled; outcomes are applied in
/// the order they complete.
pub struct SearchExecutor<B: SearchBackend> {
    backend: Arc<B>,
    outcome_tx: Sender<FetchOutcome>,
    outcome_rx: Receiver<FetchOutcome>,
    waker: Option<Waker>,
}

impl<B: SearchBackend> SearchExecutor<B> {
    pub fn new(backend: B) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel();
        Self {
            backend: Arc::new(backend),
            outcome_tx,
            outcome_rx,
            waker: None,
        }
    }

    /// Called from the worker thread after an outcome is queued.
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    /// Flags the session as loading, then starts the request in the background.
    /// Returns `false` without fetching when the session is already closed.
    pub fn fetch(&self, session: &mut SessionState, request: FetchRequest) -> bool {
        if !session.begin_fetch(&request) {
            return false;
        }

        let backend = Arc::clone(&self.backend);
        let tx = self.outcome_tx.clone();
        let liveness = session.liveness();
        let waker = self.waker.clone();

        thread::spawn(move || {
            let result = backend.search(&request.query, request.page);

            if !liveness.is_alive() {
                tracing::debug!(query = %request.query, "session closed before fetch finished");
                return;
            }

            if tx.send(FetchOutcome { request, result }).is_ok() {
                if let Some(wake) = waker {
                    wake();
                }
            }
        });

        true
    }

    /// Applies every outcome that has arrived since the last call.
    pub fn drain(&self, session: &mut SessionState) -> usize {
        let mut applied = 0;
        for outcome in self.outcome_rx.try_iter() {
            if session.apply(outcome) {
                applied += 1;
            }
        }
        applied
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub(crate) fn wait_one(&self, session: &mut SessionState, timeout: std::time::Duration) -> bool {
        match self.outcome_rx.recv_timeout(timeout) {
            Ok(outcome) => session.apply(outcome),
            Err(_) => false,
        }
    }
}
