// Pixel-Matrix Writer
//
// Implementiert den PixelDisplay-Trait aus esp-core für eine
// 5x5 WS2812 Matrix am RMT Peripheral.

use esp_core::{DisplayError, PixelDisplay};
use esp_hal::Blocking;
use esp_hal::rmt::Rmt;
use esp_hal::time::Rate;
use esp_hal_smartled::SmartLedsAdapter;
use rgb::RGB8;
use smart_leds_trait::SmartLedsWrite;

use crate::config::MATRIX_LED_COUNT;

// Buffer-Größe für die Matrix (LEDs * 3 Farben * 8 Bits + 1 Reset)
pub const MATRIX_BUFFER_SIZE: usize = MATRIX_LED_COUNT * 24 + 1;

/// Real Hardware Matrix Writer
///
/// Nutzt ESP32 RMT Peripheral um die WS2812 Matrix anzusteuern.
///
/// Hinweis: Der Buffer muss länger leben als der Writer, daher wird er im Task
/// erstellt und als Parameter übergeben statt im Constructor allokiert.
pub struct RmtMatrixWriter<'a> {
    matrix: SmartLedsAdapter<'a, MATRIX_BUFFER_SIZE>,
}

impl<'a> RmtMatrixWriter<'a> {
    /// Erstellt einen neuen RmtMatrixWriter
    ///
    /// # Parameter
    /// - `gpio8`: GPIO8 Peripheral für die Datenleitung
    /// - `rmt_peripheral`: RMT Peripheral
    /// - `rmt_clock_mhz`: RMT Clock Frequenz in MHz (z.B. 80)
    /// - `buffer`: Buffer für LED-Daten (erstellt mit smart_led_buffer!(25) Macro)
    pub fn new(
        gpio8: esp_hal::peripherals::GPIO8<'a>,
        rmt_peripheral: esp_hal::peripherals::RMT<'a>,
        rmt_clock_mhz: u32,
        buffer: &'a mut [esp_hal::rmt::PulseCode; MATRIX_BUFFER_SIZE],
    ) -> Result<Self, DisplayError> {
        // RMT initialisieren
        let rmt: Rmt<'a, Blocking> = Rmt::new(rmt_peripheral, Rate::from_mhz(rmt_clock_mhz))
            .map_err(|_| DisplayError::WriteFailed)?;

        // SmartLED Adapter erstellen
        let matrix = SmartLedsAdapter::new(rmt.channel0, gpio8, buffer);

        Ok(Self { matrix })
    }
}

impl PixelDisplay for RmtMatrixWriter<'_> {
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), DisplayError> {
        self.matrix
            .write(pixels.iter().copied())
            .map_err(|_| DisplayError::WriteFailed)
    }
}
