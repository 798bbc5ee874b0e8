//! Pixel-Muster für die 5x5 Matrix
//!
//! Reine Funktion `RenderFrame → [RGB8; 25]`, die Hardware sitzt
//! hinter [`PixelDisplay`].

use rgb::RGB8;

use crate::traits::{DisplayError, PixelDisplay, Renderer};
use crate::types::{DeviceState, RenderFrame};

/// Breite der Matrix
pub const MATRIX_WIDTH: usize = 5;

/// Anzahl Pixel (Zeilenreihenfolge, links oben beginnend)
pub const MATRIX_SIZE: usize = MATRIX_WIDTH * MATRIX_WIDTH;

/// Schrittdauer des Ladekreises (ms)
const SPINNER_STEP_MS: u64 = 100;

/// Periode des Pulsierens in `Connecting` (ms)
const PULSE_PERIOD_MS: u64 = 1_000;

/// Schrittdauer des wachsenden Rings (ms)
const RING_STEP_MS: u64 = 200;

/// Halbe Blink-Periode in `RetryingAfterError` (ms)
const BLINK_HALF_PERIOD_MS: u64 = 500;

/// Äußerer Ring im Uhrzeigersinn als (x, y)
const OUTER_RING: [(usize, usize); 16] = [
    (0, 0),
    (1, 0),
    (2, 0),
    (3, 0),
    (4, 0),
    (4, 1),
    (4, 2),
    (4, 3),
    (4, 4),
    (3, 4),
    (2, 4),
    (1, 4),
    (0, 4),
    (0, 3),
    (0, 2),
    (0, 1),
];

/// Häkchen für `TaskCompleted`
const CHECK_MARK: [(usize, usize); 5] = [(0, 2), (1, 3), (2, 2), (3, 1), (4, 0)];

const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

fn index(x: usize, y: usize) -> usize {
    y * MATRIX_WIDTH + x
}

/// Chebyshev-Abstand zur Mitte (0..=2)
fn ring_distance(x: usize, y: usize) -> usize {
    x.abs_diff(2).max(y.abs_diff(2))
}

/// Berechnet das Muster für einen Frame
pub fn render_pattern(frame: &RenderFrame, brightness: u8) -> [RGB8; MATRIX_SIZE] {
    let mut pixels = [OFF; MATRIX_SIZE];
    let b = brightness;
    let elapsed = frame.elapsed_ms;

    match frame.state {
        DeviceState::Initializing => {
            let step = (elapsed / SPINNER_STEP_MS) as usize % OUTER_RING.len();
            let (x, y) = OUTER_RING[step];
            pixels[index(x, y)] = RGB8 { r: 0, g: 0, b };
        }
        DeviceState::TaskPending => {
            let amber = RGB8 { r: b, g: b / 3, b: 0 };
            for (x, y) in OUTER_RING {
                pixels[index(x, y)] = amber;
            }
        }
        DeviceState::RequestPending => {
            pixels[index(2, 2)] = RGB8 { r: b, g: b, b };
        }
        DeviceState::Connecting => {
            // Dreieck-Welle 0 → b → 0
            let phase = elapsed % PULSE_PERIOD_MS;
            let half = PULSE_PERIOD_MS / 2;
            let ramp = if phase < half { phase } else { PULSE_PERIOD_MS - phase };
            let level = (u64::from(b) * ramp / half) as u8;
            pixels.fill(RGB8 { r: 0, g: 0, b: level });
        }
        DeviceState::SuccessEffect => {
            let radius = (elapsed / RING_STEP_MS) as usize % 3;
            for y in 0..MATRIX_WIDTH {
                for x in 0..MATRIX_WIDTH {
                    if ring_distance(x, y) == radius {
                        pixels[index(x, y)] = RGB8 { r: 0, g: b, b: 0 };
                    }
                }
            }
        }
        DeviceState::TaskCompleted => {
            for (x, y) in CHECK_MARK {
                pixels[index(x, y)] = RGB8 { r: 0, g: b, b: 0 };
            }
        }
        DeviceState::RetryingAfterError => {
            if (elapsed / BLINK_HALF_PERIOD_MS) % 2 == 0 {
                pixels.fill(RGB8 { r: b, g: b / 4, b: 0 });
            }
        }
        DeviceState::Failed => {
            for i in 0..MATRIX_WIDTH {
                pixels[index(i, i)] = RGB8 { r: b, g: 0, b: 0 };
                pixels[index(MATRIX_WIDTH - 1 - i, i)] = RGB8 { r: b, g: 0, b: 0 };
            }
        }
    }

    pixels
}

/// Renderer für eine Pixel-Matrix
pub struct MatrixRenderer<D: PixelDisplay> {
    display: D,
    brightness: u8,
    last: Option<[RGB8; MATRIX_SIZE]>,
}

impl<D: PixelDisplay> MatrixRenderer<D> {
    pub fn new(display: D, brightness: u8) -> Self {
        Self {
            display,
            brightness,
            last: None,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}

impl<D: PixelDisplay> Renderer for MatrixRenderer<D> {
    fn render(&mut self, frame: RenderFrame) -> Result<(), DisplayError> {
        let pixels = render_pattern(&frame, self.brightness);
        // Unverändertes Bild nicht erneut senden
        if self.last == Some(pixels) {
            return Ok(());
        }
        self.display.write(&pixels)?;
        self.last = Some(pixels);
        Ok(())
    }
}
