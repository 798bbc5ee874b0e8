// Library-Root: Hardware-Anbindung und Tasks der Task-Button Firmware
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod net;
pub mod tasks;

// Re-exports von esp-core
pub use esp_core::{DeviceState, DeviceStateMachine, Handshake, MatrixRenderer, NetworkWorker};

// ============================================================================
// Testing-Strategie
// ============================================================================
//
// Dieses Crate kompiliert nur für riscv32imac-unknown-none-elf.
// Die komplette Zustandslogik (State Machine, Retry, Reset-Scheduler,
// Handshake, Protokoll, Matrix-Muster) liegt deshalb in esp-core und wird
// dort bzw. in esp-tests auf dem Host getestet.
//
// Hier bleiben nur dünne Adapter hinter den Traits aus esp-core:
// - RmtMatrixWriter   → PixelDisplay
// - HttpTaskService   → TaskService
// - Button-Interrupt  → Debouncer (in der Control-Loop)
