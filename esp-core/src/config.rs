//! Geräte-Konfiguration
//!
//! Wird einmal beim Start festgelegt, keine Rekonfiguration zur Laufzeit.

use crate::retry::RetryPolicy;

/// Default: maximale Anzahl Submit-Versuche (inklusive erstem Versuch)
pub const DEFAULT_MAX_ATTEMPTS: u8 = 3;

/// Default: Abstand zwischen Submit-Versuchen (ms)
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 3_000;

/// Default: Länge des Fehlerfensters bei `RetryPolicy::TimeoutWindow` (ms)
pub const DEFAULT_RETRY_WINDOW_MS: u64 = 5_000;

/// Default: Dauer der Erfolgs-Animation (ms)
pub const DEFAULT_SUCCESS_DURATION_MS: u64 = 2_000;

/// Default: maximale Wartezeit auf Netzwerk in `Initializing` (ms)
pub const DEFAULT_SETUP_TIMEOUT_MS: u64 = 30_000;

/// Default: Sekunden-Fenster in der Reset-Minute
pub const DEFAULT_RESET_WINDOW_SECS: u8 = 10;

/// Uhrzeit des täglichen Resets (lokale Zeit)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResetInstant {
    pub hour: u8,
    pub minute: u8,
}

impl ResetInstant {
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }
}

impl Default for ResetInstant {
    /// 00:01 Uhr
    fn default() -> Self {
        Self::new(0, 1)
    }
}

/// Konfiguration der State Machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// Kennung gegenüber dem Remote-Service
    pub device_id: &'static str,
    pub retry_policy: RetryPolicy,
    pub success_duration_ms: u64,
    pub setup_timeout_ms: u64,
    pub reset_instant: ResetInstant,
    pub reset_window_secs: u8,
    /// Offset lokale Zeit gegenüber UTC (Sekunden)
    pub utc_offset_secs: i32,
}

impl DeviceConfig {
    /// Konfiguration mit empfohlenen Defaults
    pub const fn new(device_id: &'static str) -> Self {
        Self {
            device_id,
            retry_policy: RetryPolicy::BoundedAttempts {
                max_attempts: DEFAULT_MAX_ATTEMPTS,
                interval_ms: DEFAULT_RETRY_INTERVAL_MS,
            },
            success_duration_ms: DEFAULT_SUCCESS_DURATION_MS,
            setup_timeout_ms: DEFAULT_SETUP_TIMEOUT_MS,
            reset_instant: ResetInstant::new(0, 1),
            reset_window_secs: DEFAULT_RESET_WINDOW_SECS,
            utc_offset_secs: 0,
        }
    }

    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub const fn with_success_duration_ms(mut self, ms: u64) -> Self {
        self.success_duration_ms = ms;
        self
    }

    pub const fn with_setup_timeout_ms(mut self, ms: u64) -> Self {
        self.setup_timeout_ms = ms;
        self
    }

    pub const fn with_reset_instant(mut self, instant: ResetInstant) -> Self {
        self.reset_instant = instant;
        self
    }

    pub const fn with_reset_window_secs(mut self, secs: u8) -> Self {
        self.reset_window_secs = secs;
        self
    }

    pub const fn with_utc_offset_secs(mut self, secs: i32) -> Self {
        self.utc_offset_secs = secs;
        self
    }

    /// Lokale Unix-Zeit für den Reset-Scheduler
    pub fn local_unix_secs(&self, utc_secs: u64) -> u64 {
        utc_secs.saturating_add_signed(i64::from(self.utc_offset_secs))
    }
}
