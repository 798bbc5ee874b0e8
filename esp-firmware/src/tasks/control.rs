// Control-Loop Task - treibt die Device State Machine
use defmt::{error, info};
use embassy_net::Stack;
use embassy_time::{Duration, Instant, Ticker};
use esp_hal_smartled::smart_led_buffer;

use esp_core::{
    Debouncer, DeviceStateMachine, Handshake, MatrixRenderer, Renderer, TickInput,
};

use crate::config::{
    BUTTON_DEBOUNCE_MS, MATRIX_BRIGHTNESS, MATRIX_LED_COUNT, RMT_CLOCK_MHZ, TICK_INTERVAL_MS,
    device_config,
};
use crate::hal::{RmtMatrixWriter, take_button_edge};
use crate::net::is_network_ready;
use crate::tasks::time_sync::unix_now;

/// Control-Loop Logic - Testbare Logik ohne Hardware-Abhängigkeit
///
/// Pro Tick (100 ms):
/// - Button-Flanke abholen und entprellen
/// - Netzwerk-Status und Wall-Clock einsammeln
/// - State Machine einen Schritt weiterschalten
/// - Frame an den Renderer geben
///
/// Blockiert nie auf Netzwerk-I/O, das macht der Network-Worker.
///
/// # Parameter
/// - `renderer`: Renderer (Matrix oder Mock)
/// - `stack`: embassy-net Stack (nur für den Link-Status)
/// - `handshake`: Slot zum Network-Worker
pub async fn control_logic<R: Renderer>(
    mut renderer: R,
    stack: &'static Stack<'static>,
    handshake: &'static Handshake,
) -> ! {
    let mut machine = DeviceStateMachine::new(device_config(), Instant::now().as_millis());
    let mut debouncer = Debouncer::new(BUTTON_DEBOUNCE_MS);
    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));

    info!("Control: started in {}", machine.state());

    loop {
        let now_ms = Instant::now().as_millis();

        let button_pressed = take_button_edge() && debouncer.accept(now_ms);
        if button_pressed {
            info!("Control: button pressed in {}", machine.state());
        }

        let input = TickInput {
            now_ms,
            button_pressed,
            network_ready: is_network_ready(stack),
            unix_secs: unix_now(now_ms),
        };
        let frame = machine.handle_tick(&input, handshake);

        if let Err(e) = renderer.render(frame) {
            error!("Control: failed to render {}: {}", frame.state, e);
        }

        // Async Delay: gibt CPU an andere Tasks zurück
        ticker.next().await;
    }
}

/// Control-Loop Task - Embassy Task für parallele Ausführung
///
/// Dieser Task übernimmt die Hardware-Initialisierung der Matrix und ruft
/// dann `control_logic()` auf.
///
/// # Parameter
/// - `gpio8`: GPIO8 Peripheral für die Matrix-Datenleitung
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
/// - `stack`: embassy-net Stack
/// - `handshake`: Slot zum Network-Worker
#[embassy_executor::task]
pub async fn control_task(
    gpio8: esp_hal::peripherals::GPIO8<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    stack: &'static Stack<'static>,
    handshake: &'static Handshake,
) {
    // Buffer für SmartLED Daten erstellen (25 LEDs)
    // Macro allokiert Speicher im richtigen Format für RMT
    let mut rmt_buffer = smart_led_buffer!(MATRIX_LED_COUNT);

    // Hardware initialisieren: RmtMatrixWriter kapselt RMT + SmartLED
    let display = RmtMatrixWriter::new(gpio8, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer)
        .expect("Failed to initialize RMT for pixel matrix");

    let renderer = MatrixRenderer::new(display, MATRIX_BRIGHTNESS);
    control_logic(renderer, stack, handshake).await
}
