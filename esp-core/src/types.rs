//! Core Types für die Task-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

/// Zustand des Geräts
///
/// Es ist immer genau ein Zustand aktiv. Besitzer ist ausschließlich
/// die [`DeviceStateMachine`](crate::DeviceStateMachine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Boot oder Recovery: Status wird vom Remote-Service geholt
    Initializing,
    /// Task ist offen
    TaskPending,
    /// Neuer Zielwert gesetzt, wartet auf freien Worker-Slot
    RequestPending,
    /// Request liegt beim Worker
    Connecting,
    /// Erfolgs-Animation nach bestätigtem Submit
    SuccessEffect,
    /// Task ist erledigt
    TaskCompleted,
    /// Submit fehlgeschlagen, Retry-Timer läuft
    RetryingAfterError,
    /// Terminaler Fehlerzustand, nur per Button verlassbar
    Failed,
}

impl DeviceState {
    /// Ruhezustand: kein Request unterwegs, kein Protokollschritt offen
    pub fn is_resting(self) -> bool {
        matches!(
            self,
            DeviceState::TaskPending | DeviceState::TaskCompleted | DeviceState::Failed
        )
    }

    /// Zustände, in denen die Animation ab dem Eintritt läuft
    pub fn is_animated(self) -> bool {
        matches!(self, DeviceState::Connecting | DeviceState::SuccessEffect)
    }

    /// Zustand für einen bekannten Remote-Status (`true` = erledigt)
    pub fn resting_for(done: bool) -> Self {
        if done {
            DeviceState::TaskCompleted
        } else {
            DeviceState::TaskPending
        }
    }
}

/// Art eines Requests an den Remote-Service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestKind {
    /// Aktuellen Status abfragen (Boot und Recovery)
    Fetch,
    /// Neuen Status setzen
    Submit { target_done: bool },
}

/// Request im Handshake-Slot
///
/// Es existiert höchstens ein solcher Request gleichzeitig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingRequest {
    pub device_id: &'static str,
    pub kind: RequestKind,
    /// Monotone Zeit beim Einstellen (ms)
    pub enqueued_at_ms: u64,
    /// Unix-Zeit (UTC) für den Submit, `None` solange die Uhr nicht synchron ist
    pub timestamp: Option<u64>,
}

/// Ergebnis genau eines [`PendingRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestOutcome {
    Submitted { success: bool },
    /// `None` wenn der Fetch fehlgeschlagen ist
    Fetched { status: Option<bool> },
}

/// Animations-Kontext für `Connecting` und `SuccessEffect`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimationContext {
    pub started_at_ms: u64,
}

/// Was der Renderer pro Tick bekommt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderFrame {
    pub state: DeviceState,
    /// Zeit seit Eintritt in den Zustand bzw. Start der Animation (ms)
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resting_states() {
        assert!(DeviceState::TaskPending.is_resting());
        assert!(DeviceState::TaskCompleted.is_resting());
        assert!(DeviceState::Failed.is_resting());
        assert!(!DeviceState::RequestPending.is_resting());
        assert!(!DeviceState::Connecting.is_resting());
        assert!(!DeviceState::RetryingAfterError.is_resting());
    }

    #[test]
    fn test_resting_for_status() {
        assert_eq!(DeviceState::resting_for(true), DeviceState::TaskCompleted);
        assert_eq!(DeviceState::resting_for(false), DeviceState::TaskPending);
    }
}
