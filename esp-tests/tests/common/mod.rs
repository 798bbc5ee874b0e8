//! Gemeinsame Mocks und Test-Rig für die Integration Tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use embassy_futures::block_on;
use esp_core::{
    ClockAnchor, DeviceConfig, DeviceStateMachine, Handshake, NetworkWorker, RemoteError,
    RenderFrame, RequestOutcome, TaskService, TickInput,
};

/// Geräte-Kennung in allen Tests
pub const DEVICE_ID: &str = "desk-1";

/// Poll-Periode der Control-Loop (ms)
pub const TICK_MS: u64 = 100;

// ============================================================================
// Mock Task Service
// ============================================================================

/// Aufgezeichneter Aufruf am Service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    Fetch {
        device_id: String,
    },
    Submit {
        device_id: String,
        target_done: bool,
        timestamp: Option<String>,
    },
}

#[derive(Default)]
struct MockState {
    fetch_results: VecDeque<Result<bool, RemoteError>>,
    submit_results: VecDeque<Result<(), RemoteError>>,
    calls: Vec<ServiceCall>,
}

/// Geskripteter Service; ohne Skript schlägt jeder Aufruf mit `Connectivity` fehl
///
/// Clones teilen sich Skript und Aufruf-Log (Worker-Thread + Test).
#[derive(Clone, Default)]
pub struct MockTaskService {
    state: Arc<Mutex<MockState>>,
}

impl MockTaskService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_fetch(&self, result: Result<bool, RemoteError>) {
        self.state.lock().unwrap().fetch_results.push_back(result);
    }

    pub fn push_submit(&self, result: Result<(), RemoteError>) {
        self.state.lock().unwrap().submit_results.push_back(result);
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn submit_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, ServiceCall::Submit { .. }))
            .count()
    }
}

impl TaskService for MockTaskService {
    async fn fetch_status(&mut self, device_id: &str) -> Result<bool, RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ServiceCall::Fetch {
            device_id: device_id.to_string(),
        });
        state
            .fetch_results
            .pop_front()
            .unwrap_or(Err(RemoteError::Connectivity))
    }

    async fn submit_status(
        &mut self,
        device_id: &str,
        target_done: bool,
        timestamp: Option<&str>,
    ) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ServiceCall::Submit {
            device_id: device_id.to_string(),
            target_done,
            timestamp: timestamp.map(str::to_string),
        });
        state
            .submit_results
            .pop_front()
            .unwrap_or(Err(RemoteError::Connectivity))
    }
}

// ============================================================================
// Test-Rig: Control-Loop + Worker im selben Thread
// ============================================================================

/// Simulierte Zeit, State Machine, Handshake und Mock-Service
pub struct Rig {
    pub machine: DeviceStateMachine,
    pub handshake: Handshake,
    pub service: MockTaskService,
    pub now_ms: u64,
    pub network_ready: bool,
    pub clock: Option<ClockAnchor>,
}

impl Rig {
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            machine: DeviceStateMachine::new(config, 0),
            handshake: Handshake::new(),
            service: MockTaskService::new(),
            now_ms: 0,
            network_ready: true,
            clock: None,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DeviceConfig::new(DEVICE_ID))
    }

    /// Bootet bis in den Ruhezustand für `done`
    pub fn booted(config: DeviceConfig, done: bool) -> Self {
        let mut rig = Self::new(config);
        rig.service.push_fetch(Ok(done));
        rig.tick();
        rig.serve();
        rig.step();
        rig
    }

    fn input(&self, button_pressed: bool) -> TickInput {
        TickInput {
            now_ms: self.now_ms,
            button_pressed,
            network_ready: self.network_ready,
            unix_secs: self.clock.map(|anchor| anchor.unix_at(self.now_ms)),
        }
    }

    /// Ein Tick zum aktuellen Zeitpunkt
    pub fn tick(&mut self) -> RenderFrame {
        let input = self.input(false);
        self.machine.handle_tick(&input, &self.handshake)
    }

    /// Zeit um eine Tick-Periode weiter, dann Tick
    pub fn step(&mut self) -> RenderFrame {
        self.now_ms += TICK_MS;
        self.tick()
    }

    /// Tick mit Button-Flanke zum aktuellen Zeitpunkt
    pub fn press(&mut self) -> RenderFrame {
        let input = self.input(true);
        self.machine.handle_tick(&input, &self.handshake)
    }

    /// Springt auf `now_ms` und tickt dort
    pub fn tick_at(&mut self, now_ms: u64) -> RenderFrame {
        self.now_ms = now_ms;
        self.tick()
    }

    /// Worker bearbeitet den geposteten Request (falls vorhanden)
    pub fn serve(&mut self) -> Option<RequestOutcome> {
        let mut worker = NetworkWorker::new(&self.handshake, self.service.clone());
        block_on(worker.try_serve())
    }
}
