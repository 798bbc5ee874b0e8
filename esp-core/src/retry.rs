//! Retry-Policy für fehlgeschlagene Submits
//!
//! Zwei Varianten, pro Deployment wählbar:
//! - **BoundedAttempts:** feste Anzahl Versuche im festen Abstand
//! - **TimeoutWindow:** ein Fenster ab dem ersten Fehler, kein automatischer Retry
//!
//! Beide enden garantiert in `Failed`, nie Endlos-Retries.

/// Retry-Strategie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetryPolicy {
    /// `max_attempts` zählt alle Submit-Versuche inklusive des ersten
    BoundedAttempts { max_attempts: u8, interval_ms: u64 },
    /// Nach `window_ms` ab dem ersten Fehler → `Failed`
    TimeoutWindow { window_ms: u64 },
}

/// Entscheidung in `RetryingAfterError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetryDecision {
    /// Weiter warten
    Wait,
    /// Neuer Versuch fällig
    Retry,
    /// Keine Versuche mehr → `Failed`
    Exhausted,
}

/// Zähler und Timer der aktuellen Retry-Runde
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryState {
    /// Bereits gestartete Wiederholungen (erster Versuch zählt nicht)
    pub attempt_count: u8,
    /// Zeitpunkt des letzten Fehlers (ms)
    pub last_attempt_at_ms: Option<u64>,
    /// Ende des Fehlerfensters (nur TimeoutWindow)
    pub deadline_at_ms: Option<u64>,
}

impl RetryState {
    pub const fn new() -> Self {
        Self {
            attempt_count: 0,
            last_attempt_at_ms: None,
            deadline_at_ms: None,
        }
    }

    /// Zurück auf Null (neuer User-Request oder erfolgreicher Submit)
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Fehlschlag eines Submits registrieren
    pub fn record_failure(&mut self, policy: &RetryPolicy, now_ms: u64) {
        self.last_attempt_at_ms = Some(now_ms);
        if let RetryPolicy::TimeoutWindow { window_ms } = policy {
            // Fenster startet beim ersten Fehler und wird nicht verlängert
            if self.deadline_at_ms.is_none() {
                self.deadline_at_ms = Some(now_ms.saturating_add(*window_ms));
            }
        }
    }

    /// Neuer Versuch wird gestartet
    pub fn begin_retry(&mut self) {
        self.attempt_count = self.attempt_count.saturating_add(1);
    }

    /// Was ist zum Zeitpunkt `now_ms` zu tun?
    pub fn poll(&self, policy: &RetryPolicy, now_ms: u64) -> RetryDecision {
        match *policy {
            RetryPolicy::BoundedAttempts {
                max_attempts,
                interval_ms,
            } => {
                let Some(failed_at) = self.last_attempt_at_ms else {
                    return RetryDecision::Wait;
                };
                if now_ms.saturating_sub(failed_at) < interval_ms {
                    return RetryDecision::Wait;
                }
                // Versuche bisher: erster + attempt_count Wiederholungen
                if u16::from(self.attempt_count) + 1 < u16::from(max_attempts) {
                    RetryDecision::Retry
                } else {
                    RetryDecision::Exhausted
                }
            }
            RetryPolicy::TimeoutWindow { .. } => match self.deadline_at_ms {
                Some(deadline) if now_ms >= deadline => RetryDecision::Exhausted,
                _ => RetryDecision::Wait,
            },
        }
    }
}
