// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul kapselt Hardware-Zugriffe hinter Traits,
// um Testbarkeit und Wartbarkeit zu verbessern.

pub mod button;
pub mod matrix_writer;

pub use button::{bind_button, take_button_edge};
pub use matrix_writer::RmtMatrixWriter;
