// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

use esp_core::{DeviceConfig, ResetInstant, RetryPolicy};

// ============================================================================
// Display & Button Konfiguration
// Pins sind in main.rs fest verdrahtet: Matrix an GPIO8, Button an GPIO9
// ============================================================================

/// Helligkeits-Level für die Matrix (0-255)
/// Wert ist gedimmt für Augenschonung
pub const MATRIX_BRIGHTNESS: u8 = 10;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// Anzahl der LEDs der Matrix
pub const MATRIX_LED_COUNT: usize = esp_core::render::MATRIX_SIZE;

/// Entprell-Intervall für den Button (ms)
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

// ============================================================================
// Control-Loop Konfiguration
// ============================================================================

/// Poll-Periode der Control-Loop (ms)
pub const TICK_INTERVAL_MS: u64 = 100;

/// Dauer der Erfolgs-Animation (ms)
pub const SUCCESS_DURATION_MS: u64 = 2_000;

/// Maximale Wartezeit auf Netzwerk beim Boot/Recovery (ms)
pub const SETUP_TIMEOUT_MS: u64 = 30_000;

/// Retry-Strategie für fehlgeschlagene Submits
/// Alternative: `RetryPolicy::TimeoutWindow { window_ms: 5_000 }`
pub const RETRY_POLICY: RetryPolicy = RetryPolicy::BoundedAttempts {
    max_attempts: 3,
    interval_ms: 3_000,
};

/// Uhrzeit des täglichen Resets (lokale Zeit)
pub const RESET_INSTANT: ResetInstant = ResetInstant::new(0, 1);

/// Sekunden-Fenster in der Reset-Minute
pub const RESET_WINDOW_SECS: u8 = 10;

/// Offset lokale Zeit gegenüber UTC in Sekunden (MEZ = 3600)
pub const UTC_OFFSET_SECS: i32 = 3_600;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Wartezeit vor einem erneuten Verbindungsversuch (Sekunden)
pub const WIFI_RETRY_SECS: u64 = 5;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// Remote-Service Konfiguration
// ============================================================================

/// Hostname des Task-Services
/// Wird zur Build-Zeit aus der Environment Variable SERVICE_HOST geladen
pub const SERVICE_HOST: &str = env!(
    "SERVICE_HOST",
    "Service Host nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// HTTP Port des Task-Services
/// Standard: 80, kann in .env mit SERVICE_PORT überschrieben werden
pub const SERVICE_PORT: u16 = match option_env!("SERVICE_PORT") {
    Some(port) => parse_port(port),
    None => 80,
};

/// Geräte-Kennung gegenüber dem Service
/// Wird zur Build-Zeit aus der Environment Variable DEVICE_ID geladen
pub const DEVICE_ID: &str = env!(
    "DEVICE_ID",
    "Device ID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;

/// Timeout für Connect, Senden und Empfangen eines HTTP-Requests (Sekunden)
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// TCP RX/TX Buffer-Größe in Bytes
pub const TCP_BUFFER_SIZE: usize = 1024;

/// Buffer für den Request-Text inklusive Headern
pub const HTTP_REQUEST_BUFFER_SIZE: usize = 512;

/// Buffer für die komplette Antwort (Header + JSON)
pub const HTTP_RESPONSE_BUFFER_SIZE: usize = 1024;

/// Buffer für den JSON Submit-Body
/// Für {"deviceId":"...","status":true,"timestamp":"2026-01-05T01:00:00Z"}
pub const JSON_BODY_BUFFER_SIZE: usize = 160;

// ============================================================================
// SNTP Konfiguration
// ============================================================================

/// NTP Server Hostname
pub const NTP_SERVER: &str = match option_env!("NTP_SERVER") {
    Some(server) => server,
    None => "pool.ntp.org",
};

/// NTP Port (RFC 4330)
pub const NTP_PORT: u16 = 123;

/// Lokaler UDP-Port für SNTP
pub const SNTP_LOCAL_PORT: u16 = 12_345;

/// Timeout für eine SNTP-Antwort (Sekunden)
pub const SNTP_TIMEOUT_SECS: u64 = 5;

/// Resync-Intervall nach erfolgreicher Synchronisation (Sekunden)
pub const SNTP_RESYNC_SECS: u64 = 15 * 60;

/// Wartezeit nach fehlgeschlagener Synchronisation (Sekunden)
pub const SNTP_RETRY_SECS: u64 = 10;

// ============================================================================
// Abgeleitete Konfiguration
// ============================================================================

/// Konfiguration der State Machine aus den Konstanten oben
pub const fn device_config() -> DeviceConfig {
    DeviceConfig::new(DEVICE_ID)
        .with_retry_policy(RETRY_POLICY)
        .with_success_duration_ms(SUCCESS_DURATION_MS)
        .with_setup_timeout_ms(SETUP_TIMEOUT_MS)
        .with_reset_instant(RESET_INSTANT)
        .with_reset_window_secs(RESET_WINDOW_SECS)
        .with_utc_offset_secs(UTC_OFFSET_SECS)
}

const fn parse_port(value: &str) -> u16 {
    let bytes = value.as_bytes();
    let mut port: u16 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        assert!(digit.is_ascii_digit(), "SERVICE_PORT muss eine Zahl sein");
        port = port * 10 + (digit - b'0') as u16;
        i += 1;
    }
    port
}
