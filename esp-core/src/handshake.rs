//! Single-Slot Handshake zwischen Control-Loop und Network-Worker
//!
//! Ein einziger Slot hinter einer Critical-Section-Mutex:
//!
//! ```text
//! Idle ──post()──► Posted ──take_request()──► InFlight ──complete()──► Done ──take_outcome()──► Idle
//! ```
//!
//! - Control-Loop: `post()`, `take_outcome()`, `is_busy()`
//! - Worker: `take_request()` / `wait_request()`, `complete()`
//!
//! Der Übergang `InFlight → Done` passiert in einem Schritt. Es gibt also
//! keinen Moment, in dem der Request schon weg, das Ergebnis aber noch
//! nicht da ist.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::types::{PendingRequest, RequestOutcome};

/// Fehlbenutzung des Slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandshakeError {
    /// Es ist bereits ein Request ausstehend
    Busy,
    /// `complete()` ohne laufenden Request
    NoRequestInFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Idle,
    Posted(PendingRequest),
    InFlight(PendingRequest),
    Done(RequestOutcome),
}

/// Synchronisierter Request/Ergebnis-Slot
pub struct Handshake {
    slot: Mutex<CriticalSectionRawMutex, Cell<Slot>>,
    /// Weckt den Worker nach `post()`
    doorbell: Signal<CriticalSectionRawMutex, ()>,
}

impl Default for Handshake {
    fn default() -> Self {
        Self::new()
    }
}

impl Handshake {
    /// `const`, damit der Slot als `static` liegen kann
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(Slot::Idle)),
            doorbell: Signal::new(),
        }
    }

    /// Busy-Flag: ein Request ist gepostet, läuft oder sein Ergebnis wurde nicht abgeholt
    pub fn is_busy(&self) -> bool {
        self.slot.lock(|slot| slot.get() != Slot::Idle)
    }

    /// Stellt einen Request ein (nur aus `Idle`)
    pub fn post(&self, request: PendingRequest) -> Result<(), HandshakeError> {
        self.slot.lock(|slot| match slot.get() {
            Slot::Idle => {
                slot.set(Slot::Posted(request));
                Ok(())
            }
            _ => Err(HandshakeError::Busy),
        })?;
        self.doorbell.signal(());
        Ok(())
    }

    /// Worker: übernimmt einen geposteten Request
    pub fn take_request(&self) -> Option<PendingRequest> {
        self.slot.lock(|slot| match slot.get() {
            Slot::Posted(request) => {
                slot.set(Slot::InFlight(request));
                Some(request)
            }
            _ => None,
        })
    }

    /// Worker: wartet bis ein Request gepostet wird und übernimmt ihn
    pub async fn wait_request(&self) -> PendingRequest {
        loop {
            if let Some(request) = self.take_request() {
                return request;
            }
            self.doorbell.wait().await;
        }
    }

    /// Worker: liefert das Ergebnis des laufenden Requests
    pub fn complete(&self, outcome: RequestOutcome) -> Result<(), HandshakeError> {
        self.slot.lock(|slot| match slot.get() {
            Slot::InFlight(_) => {
                slot.set(Slot::Done(outcome));
                Ok(())
            }
            _ => Err(HandshakeError::NoRequestInFlight),
        })
    }

    /// Control-Loop: holt das Ergebnis ab und gibt den Slot frei
    pub fn take_outcome(&self) -> Option<RequestOutcome> {
        self.slot.lock(|slot| match slot.get() {
            Slot::Done(outcome) => {
                slot.set(Slot::Idle);
                Some(outcome)
            }
            _ => None,
        })
    }

    /// Request, den der Worker gerade bearbeitet
    pub fn in_flight(&self) -> Option<PendingRequest> {
        self.slot.lock(|slot| match slot.get() {
            Slot::InFlight(request) => Some(request),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequestKind;

    fn submit(target_done: bool) -> PendingRequest {
        PendingRequest {
            device_id: "test-device",
            kind: RequestKind::Submit { target_done },
            enqueued_at_ms: 0,
            timestamp: None,
        }
    }

    #[test]
    fn test_full_cycle() {
        let handshake = Handshake::new();
        assert!(!handshake.is_busy());

        handshake.post(submit(true)).unwrap();
        assert!(handshake.is_busy());
        assert_eq!(handshake.take_outcome(), None);

        assert_eq!(handshake.take_request(), Some(submit(true)));
        assert_eq!(handshake.in_flight(), Some(submit(true)));
        assert_eq!(handshake.take_request(), None);

        handshake
            .complete(RequestOutcome::Submitted { success: true })
            .unwrap();
        assert!(handshake.is_busy());

        assert_eq!(
            handshake.take_outcome(),
            Some(RequestOutcome::Submitted { success: true })
        );
        assert!(!handshake.is_busy());
        assert_eq!(handshake.take_outcome(), None);
    }

    #[test]
    fn test_second_post_is_rejected() {
        let handshake = Handshake::new();
        handshake.post(submit(true)).unwrap();
        assert_eq!(handshake.post(submit(false)), Err(HandshakeError::Busy));
        assert_eq!(handshake.take_request(), Some(submit(true)));
        assert_eq!(handshake.post(submit(false)), Err(HandshakeError::Busy));
    }

    #[test]
    fn test_complete_without_request_is_rejected() {
        let handshake = Handshake::new();
        assert_eq!(
            handshake.complete(RequestOutcome::Submitted { success: true }),
            Err(HandshakeError::NoRequestInFlight)
        );
        handshake.post(submit(true)).unwrap();
        // Gepostet, aber noch nicht übernommen
        assert_eq!(
            handshake.complete(RequestOutcome::Submitted { success: true }),
            Err(HandshakeError::NoRequestInFlight)
        );
    }

    #[test]
    fn test_wait_request_returns_posted_request() {
        let handshake = Handshake::new();
        handshake.post(submit(false)).unwrap();
        let request = embassy_futures::block_on(handshake.wait_request());
        assert_eq!(request, submit(false));
    }
}
