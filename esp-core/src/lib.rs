//! ESP Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert die Task-State-Machine, den Handshake zum Netzwerk-Worker,
//! Retry- und Reset-Logik sowie Traits für Hardware und Remote-Service.

#![no_std]

#[macro_use]
mod fmt;

pub mod button;
pub mod clock;
pub mod config;
pub mod handshake;
pub mod machine;
#[cfg(feature = "serde")]
pub mod protocol;
pub mod render;
pub mod retry;
pub mod scheduler;
pub mod traits;
pub mod types;
pub mod worker;

// Re-exports für einfachen Zugriff
pub use button::Debouncer;
pub use clock::{ClockAnchor, WallClock};
pub use config::{DeviceConfig, ResetInstant};
pub use handshake::{Handshake, HandshakeError};
pub use machine::{DeviceStateMachine, TickInput};
pub use render::{MatrixRenderer, render_pattern};
pub use retry::{RetryDecision, RetryPolicy, RetryState};
pub use scheduler::{ResetScheduler, ResetTracker};
pub use traits::{DisplayError, PixelDisplay, RemoteError, Renderer, TaskService};
pub use types::{DeviceState, PendingRequest, RenderFrame, RequestKind, RequestOutcome};
pub use worker::NetworkWorker;
