//! Network-Worker Logik
//!
//! Läuft in einem eigenen Task/Thread und darf für die Dauer eines
//! HTTP-Roundtrips blockieren. Pro Request genau ein Service-Aufruf
//! und genau ein Ergebnis.
//!
//! # Trait-basierte Abstraktion
//! Der generische Parameter `S: TaskService` ermöglicht:
//! - Echten HTTP-Client (HttpTaskService) im Production-Code
//! - Mock Implementation (MockTaskService) in Tests

use crate::clock::WallClock;
use crate::handshake::Handshake;
use crate::traits::{RemoteError, TaskService};
use crate::types::{PendingRequest, RequestKind, RequestOutcome};

/// Arbeitet Requests aus dem Handshake-Slot ab
pub struct NetworkWorker<'a, S: TaskService> {
    handshake: &'a Handshake,
    service: S,
}

impl<'a, S: TaskService> NetworkWorker<'a, S> {
    pub fn new(handshake: &'a Handshake, service: S) -> Self {
        Self { handshake, service }
    }

    /// Endlosschleife: wartet auf Requests und bearbeitet sie
    pub async fn run(&mut self) -> ! {
        loop {
            self.serve_next().await;
        }
    }

    /// Wartet auf den nächsten Request, führt ihn aus und meldet das Ergebnis
    pub async fn serve_next(&mut self) -> RequestOutcome {
        let request = self.handshake.wait_request().await;
        self.serve(request).await
    }

    /// Bearbeitet einen Request, falls einer gepostet ist (nicht wartend)
    pub async fn try_serve(&mut self) -> Option<RequestOutcome> {
        let request = self.handshake.take_request()?;
        Some(self.serve(request).await)
    }

    async fn serve(&mut self, request: PendingRequest) -> RequestOutcome {
        debug!("Worker: executing {}", request.kind);
        let outcome = self.execute(&request).await;

        // Kann nur fehlschlagen, wenn jemand anderes den Slot manipuliert
        if let Err(e) = self.handshake.complete(outcome) {
            error!("Worker: failed to publish outcome: {}", e);
        }
        outcome
    }

    async fn execute(&mut self, request: &PendingRequest) -> RequestOutcome {
        match request.kind {
            RequestKind::Fetch => {
                let status = match self.service.fetch_status(request.device_id).await {
                    Ok(done) => {
                        info!("Worker: fetched status done={}", done);
                        Some(done)
                    }
                    Err(e) => {
                        log_remote_error("fetch", e);
                        None
                    }
                };
                RequestOutcome::Fetched { status }
            }
            RequestKind::Submit { target_done } => {
                let timestamp = request
                    .timestamp
                    .map(|secs| WallClock::from_unix_secs(secs).iso8601());
                let result = self
                    .service
                    .submit_status(
                        request.device_id,
                        target_done,
                        timestamp.as_ref().map(|t| t.as_str()),
                    )
                    .await;
                let success = match result {
                    Ok(()) => {
                        info!("Worker: submitted done={}", target_done);
                        true
                    }
                    Err(e) => {
                        log_remote_error("submit", e);
                        false
                    }
                };
                RequestOutcome::Submitted { success }
            }
        }
    }
}

/// Fehlerdetails bleiben im Log, die State Machine sieht nur `false`
fn log_remote_error(operation: &str, error: RemoteError) {
    match error {
        RemoteError::Connectivity => warn!("Worker: {} failed: no connection", operation),
        RemoteError::Protocol => warn!("Worker: {} failed: malformed response", operation),
        RemoteError::Service(code) => warn!("Worker: {} failed: HTTP {}", operation, code),
    }
}
