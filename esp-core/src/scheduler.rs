//! Täglicher Reset-Trigger
//!
//! Feuert genau einmal pro Kalendertag in der konfigurierten Minute.
//! Ein Sekunden-Fenster statt exakter Sekunde, damit ein verpasster
//! Tick den Reset nicht verhindert.

use crate::clock::WallClock;
use crate::config::ResetInstant;

/// Merker, ob der Reset heute schon lief
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResetTracker {
    pub executed_today: bool,
    /// Tag (seit 1970) des letzten Resets
    pub last_reset_day: Option<i64>,
}

/// Prüft pro Tick, ob der tägliche Reset fällig ist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResetScheduler {
    instant: ResetInstant,
    window_secs: u8,
    tracker: ResetTracker,
}

impl ResetScheduler {
    pub fn new(instant: ResetInstant, window_secs: u8) -> Self {
        Self {
            instant,
            window_secs,
            tracker: ResetTracker::default(),
        }
    }

    pub fn tracker(&self) -> &ResetTracker {
        &self.tracker
    }

    /// `true` genau einmal pro Tag, wenn Stunde/Minute passen
    ///
    /// Ohne synchronisierte Uhr feuert der Trigger nie.
    pub fn check_trigger(&mut self, clock: &WallClock) -> bool {
        if !clock.synced {
            return false;
        }

        let in_minute = clock.hour == self.instant.hour && clock.minute == self.instant.minute;
        if !in_minute {
            // Nur schreiben wenn nötig: wiederholte Aufrufe ändern nichts
            if self.tracker.executed_today {
                self.tracker.executed_today = false;
            }
            return false;
        }

        if clock.second >= self.window_secs {
            return false;
        }

        let today = clock.day_number();
        if self.tracker.last_reset_day == Some(today) {
            return false;
        }

        self.tracker.executed_today = true;
        self.tracker.last_reset_day = Some(today);
        info!(
            "Reset: trigger fired for {}-{}-{}",
            clock.year, clock.month, clock.day
        );
        true
    }
}
