// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Control-Loop und Network-Worker kommunizieren nur über den Handshake-Slot.

pub mod control;
pub mod time_sync;
pub mod wifi;
pub mod worker;

// Re-export Tasks für einfachen Import
pub use control::control_task;
pub use time_sync::{time_sync_task, unix_now};
pub use wifi::{connection_task, dhcp_task, net_task};
pub use worker::network_worker_task;
