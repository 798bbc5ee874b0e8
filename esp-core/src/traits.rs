//! Hardware- und Service-Abstraktionen
//!
//! Diese Traits definieren Schnittstellen für Display, Renderer und
//! Remote-Service ohne konkrete Implementierung.

use rgb::RGB8;

use crate::types::RenderFrame;

/// Fehler-Typ für Display-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    WriteFailed,
}

/// Fehler beim Zugriff auf den Remote-Service
///
/// Der Worker faltet alle Varianten zu `success: false`,
/// die Unterscheidung dient nur dem Logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemoteError {
    /// Kein Netzwerkpfad zum Service (DNS, TCP, Timeout)
    Connectivity,
    /// Antwort unlesbar oder unerwartet
    Protocol,
    /// Service antwortet mit Nicht-2xx Status
    Service(u16),
}

/// Trait für Pixel-Displays (z.B. 5x5 WS2812 Matrix)
///
/// # Implementierungen
/// - **Production:** RmtMatrixWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockDisplay (in-memory Mock)
pub trait PixelDisplay: Send {
    /// Schreibt alle Pixel in Zeilenreihenfolge
    ///
    /// # Fehlerbehandlung
    /// Gibt `DisplayError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), DisplayError>;
}

/// Senke für [`RenderFrame`]s
pub trait Renderer {
    fn render(&mut self, frame: RenderFrame) -> Result<(), DisplayError>;
}

/// Remote-Service für den Task-Status
///
/// Aufrufe dürfen für die gesamte Dauer des Netzwerk-Roundtrips blockieren;
/// sie laufen ausschließlich im Network-Worker.
#[allow(async_fn_in_trait)]
pub trait TaskService {
    /// Holt den aktuellen Status, `true` = erledigt
    async fn fetch_status(&mut self, device_id: &str) -> Result<bool, RemoteError>;

    /// Setzt den Status, `timestamp` als ISO-8601 UTC
    async fn submit_status(
        &mut self,
        device_id: &str,
        target_done: bool,
        timestamp: Option<&str>,
    ) -> Result<(), RemoteError>;
}
