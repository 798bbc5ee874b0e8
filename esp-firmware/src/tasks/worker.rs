// Network-Worker Task - bearbeitet Requests aus dem Handshake-Slot
use defmt::info;
use embassy_net::Stack;

use esp_core::{Handshake, NetworkWorker};

use crate::config::{SERVICE_HOST, SERVICE_PORT};
use crate::net::HttpTaskService;

/// Network-Worker Task
///
/// Wartet auf einen Request im Handshake-Slot, führt genau einen
/// HTTP-Aufruf aus und meldet genau ein Ergebnis. Der Task darf für
/// die Dauer des Roundtrips blockieren, die Control-Loop läuft weiter.
///
/// # Parameter
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `handshake`: Slot zur Control-Loop
#[embassy_executor::task]
pub async fn network_worker_task(stack: &'static Stack<'static>, handshake: &'static Handshake) {
    info!(
        "Worker: started, service at {}:{}",
        SERVICE_HOST, SERVICE_PORT
    );

    let service = HttpTaskService::new(stack, SERVICE_HOST, SERVICE_PORT);
    let mut worker = NetworkWorker::new(handshake, service);
    worker.run().await
}
