// Button Interrupt - Flanken-Erkennung für den Task-Button
//
// Der Interrupt setzt nur ein Flag, die Control-Loop holt es pro Tick ab
// und entprellt mit esp_core::Debouncer.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use esp_hal::{
    gpio::{Event, Input, InputConfig, InputPin, Io, Pull},
    handler,
    peripherals::IO_MUX,
    ram,
};

/// Button Input-Pin (wird im Interrupt-Handler gebraucht)
static BUTTON: Mutex<CriticalSectionRawMutex, RefCell<Option<Input<'static>>>> =
    Mutex::new(RefCell::new(None));

/// Fallende Flanke seit dem letzten Abholen
static BUTTON_EDGE: AtomicBool = AtomicBool::new(false);

/// Bindet den Button und registriert den GPIO Interrupt-Handler
///
/// # Parameter
/// - `mux`: IO_MUX Peripheral für den Interrupt-Handler
/// - `pin`: Button-Pin (active low, interner Pull-Up)
pub fn bind_button(mux: IO_MUX<'static>, pin: impl InputPin + 'static) {
    let mut io = Io::new(mux);
    io.set_interrupt_handler(handle_button_interrupt);

    let config = InputConfig::default().with_pull(Pull::Up);
    let mut button = Input::new(pin, config);
    button.listen(Event::FallingEdge);

    BUTTON.lock(|cell| {
        cell.borrow_mut().replace(button);
    });
}

/// Holt die Flanke ab (edge-triggered, setzt das Flag zurück)
pub fn take_button_edge() -> bool {
    BUTTON_EDGE.swap(false, Ordering::AcqRel)
}

/// GPIO Interrupt-Handler
#[handler]
#[ram]
fn handle_button_interrupt() {
    let is_button_interrupt = BUTTON.lock(|cell| {
        let mut cell = cell.borrow_mut();
        if let Some(button) = cell.as_mut() {
            let is_set = button.is_interrupt_set();
            button.clear_interrupt();
            is_set
        } else {
            false
        }
    });

    if is_button_interrupt {
        BUTTON_EDGE.store(true, Ordering::Release);
    }
}
