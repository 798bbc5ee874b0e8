//! Wall-Clock, Kalender-Mathematik und SNTP
//!
//! Eigene Kalender-Funktionen statt chrono (no_std, kleines Binary).
//! Algorithmen: Howard Hinnant `days_from_civil` / `civil_from_days`.

use core::fmt::Write;

/// Offset zwischen NTP-Epoche (1900) und Unix-Epoche (1970) in Sekunden
pub const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

/// Länge eines SNTP-Pakets in Bytes
pub const SNTP_PACKET_SIZE: usize = 48;

/// Länge von `YYYY-MM-DDTHH:MM:SSZ`
pub const ISO8601_LEN: usize = 20;

/// Kalenderzeit (UTC oder lokal, je nach Quelle)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClock {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// `false` solange keine Zeitsynchronisation stattgefunden hat
    pub synced: bool,
}

impl WallClock {
    /// Uhr ohne Synchronisation (1970-01-01 00:00:00)
    pub const fn unsynchronized() -> Self {
        Self {
            year: 1970,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            synced: false,
        }
    }

    /// Erzeugt eine synchronisierte Uhr aus Unix-Sekunden
    pub fn from_unix_secs(secs: u64) -> Self {
        let days = (secs / 86_400) as i64;
        let rem = secs % 86_400;
        let (year, month, day) = civil_from_days(days);
        Self {
            year: year as u16,
            month,
            day,
            hour: (rem / 3600) as u8,
            minute: ((rem % 3600) / 60) as u8,
            second: (rem % 60) as u8,
            synced: true,
        }
    }

    /// Tage seit 1970-01-01 (eindeutige Kennung des Kalendertags)
    pub fn day_number(&self) -> i64 {
        days_from_civil(i64::from(self.year), self.month, self.day)
    }

    /// ISO-8601 Darstellung, z.B. `2026-01-05T01:00:00Z`
    pub fn iso8601(&self) -> heapless::String<ISO8601_LEN> {
        let mut out = heapless::String::new();
        // Passt immer: Jahr ist vierstellig solange u16 < 10000
        let _ = write!(
            out,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        );
        out
    }
}

/// Tage seit Unix-Epoche für ein proleptisch gregorianisches Datum
pub fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = (if y >= 0 { y } else { y - 399 }) / 400;
    let yoe = y - era * 400;
    let m = i64::from(month);
    let mp = if m > 2 { m - 3 } else { m + 9 };
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Umkehrung von [`days_from_civil`]: (Jahr, Monat, Tag)
pub fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Verknüpft monotone Zeit mit Unix-Zeit nach einer Synchronisation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockAnchor {
    pub unix_secs: u64,
    pub mono_ms: u64,
}

impl ClockAnchor {
    /// Unix-Zeit zum monotonen Zeitpunkt `mono_ms`
    pub fn unix_at(&self, mono_ms: u64) -> u64 {
        self.unix_secs + mono_ms.saturating_sub(self.mono_ms) / 1000
    }
}

/// Fehler beim Auswerten einer SNTP-Antwort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SntpError {
    Truncated,
    NotServerMode,
    /// Stratum 0 (Kiss-o'-Death) oder Leap-Indicator "alarm"
    Unsynchronized,
    BeforeUnixEpoch,
}

/// SNTP Client-Request (LI=0, VN=4, Mode=3)
pub fn sntp_request() -> [u8; SNTP_PACKET_SIZE] {
    let mut packet = [0u8; SNTP_PACKET_SIZE];
    packet[0] = 0b00_100_011;
    packet
}

/// Liest die Transmit-Timestamp-Sekunden einer SNTP-Antwort als Unix-Zeit
pub fn parse_sntp_response(packet: &[u8]) -> Result<u64, SntpError> {
    if packet.len() < SNTP_PACKET_SIZE {
        return Err(SntpError::Truncated);
    }

    let leap = packet[0] >> 6;
    let mode = packet[0] & 0b111;
    let stratum = packet[1];

    if mode != 4 {
        return Err(SntpError::NotServerMode);
    }
    if stratum == 0 || leap == 3 {
        return Err(SntpError::Unsynchronized);
    }

    let ntp_secs = u64::from(u32::from_be_bytes([
        packet[40], packet[41], packet[42], packet[43],
    ]));
    ntp_secs
        .checked_sub(NTP_UNIX_OFFSET)
        .ok_or(SntpError::BeforeUnixEpoch)
}
