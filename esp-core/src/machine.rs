//! Device State Machine
//!
//! Besitzt den aktuellen Zustand, den Zielwert, Retry- und Reset-Status.
//! Wird ausschließlich von der Control-Loop aufgerufen, einmal pro Tick.
//!
//! Reihenfolge pro Tick (fest):
//! 1. Ergebnis des Workers anwenden
//! 2. Button auswerten
//! 3. Übergabe an den Worker (`RequestPending → Connecting`, Fetch in `Initializing`)
//! 4. Zeitbasierte Übergänge (Erfolgs-Animation, Retry, Setup-Timeout)
//! 5. Täglicher Reset (zuletzt, damit er einen Ruhezustand überschreiben kann)

use crate::clock::WallClock;
use crate::config::DeviceConfig;
use crate::handshake::Handshake;
use crate::retry::{RetryDecision, RetryState};
use crate::scheduler::ResetScheduler;
use crate::types::{
    AnimationContext, DeviceState, PendingRequest, RenderFrame, RequestKind, RequestOutcome,
};

/// Eingaben eines Control-Loop-Ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickInput {
    /// Monotone Zeit (ms)
    pub now_ms: u64,
    /// Entprellte Button-Flanke seit dem letzten Tick
    pub button_pressed: bool,
    /// WLAN verbunden und IP-Adresse vorhanden
    pub network_ready: bool,
    /// Unix-Zeit (UTC), `None` solange nicht synchronisiert
    pub unix_secs: Option<u64>,
}

impl TickInput {
    pub fn at(now_ms: u64) -> Self {
        Self {
            now_ms,
            button_pressed: false,
            network_ready: true,
            unix_secs: None,
        }
    }
}

/// Orchestrator für den Task-Status
pub struct DeviceStateMachine {
    config: DeviceConfig,
    state: DeviceState,
    state_entered_at_ms: u64,
    /// Zielwert des laufenden bzw. letzten Submits
    target: bool,
    retry: RetryState,
    scheduler: ResetScheduler,
    animation: AnimationContext,
    /// Reset kam während eines laufenden Requests
    reset_deferred: bool,
    /// Fetch für die aktuelle `Initializing`-Phase ist gepostet
    fetch_posted: bool,
}

impl DeviceStateMachine {
    /// Startet in `Initializing`
    pub fn new(config: DeviceConfig, now_ms: u64) -> Self {
        Self {
            scheduler: ResetScheduler::new(config.reset_instant, config.reset_window_secs),
            config,
            state: DeviceState::Initializing,
            state_entered_at_ms: now_ms,
            target: false,
            retry: RetryState::new(),
            animation: AnimationContext {
                started_at_ms: now_ms,
            },
            reset_deferred: false,
            fetch_posted: false,
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn target(&self) -> bool {
        self.target
    }

    pub fn retry(&self) -> &RetryState {
        &self.retry
    }

    pub fn scheduler(&self) -> &ResetScheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn reset_deferred(&self) -> bool {
        self.reset_deferred
    }

    /// Ein Control-Loop-Tick; liefert den Frame für den Renderer
    pub fn handle_tick(&mut self, input: &TickInput, handshake: &Handshake) -> RenderFrame {
        let now = input.now_ms;

        // 1. Ergebnis des Workers
        if let Some(outcome) = handshake.take_outcome() {
            self.apply_outcome(outcome, now);
        }

        // 2. Button
        if input.button_pressed {
            self.apply_button(now);
        }

        // 3. Übergabe an den Worker
        self.hand_off(input, handshake);

        // 4. Zeitbasierte Übergänge
        self.apply_timers(input);

        // 5. Täglicher Reset
        self.apply_reset_trigger(input);

        self.frame(now)
    }

    /// Frame für den aktuellen Zustand
    pub fn frame(&self, now_ms: u64) -> RenderFrame {
        let since = if self.state.is_animated() {
            self.animation.started_at_ms
        } else {
            self.state_entered_at_ms
        };
        RenderFrame {
            state: self.state,
            elapsed_ms: now_ms.saturating_sub(since),
        }
    }

    fn apply_outcome(&mut self, outcome: RequestOutcome, now: u64) {
        debug!("State: outcome {} in {}", outcome, self.state);
        match (self.state, outcome) {
            (DeviceState::Connecting, RequestOutcome::Submitted { success: true }) => {
                self.retry.reset();
                self.animation.started_at_ms = now;
                self.transition(DeviceState::SuccessEffect, now);
            }
            (DeviceState::Connecting, RequestOutcome::Submitted { success: false }) => {
                self.retry.record_failure(&self.config.retry_policy, now);
                self.transition(DeviceState::RetryingAfterError, now);
            }
            (DeviceState::Initializing, RequestOutcome::Fetched { status: Some(done) }) => {
                self.fetch_posted = false;
                self.retry.reset();
                self.target = done;
                self.transition(DeviceState::resting_for(done), now);
            }
            (DeviceState::Initializing, RequestOutcome::Fetched { status: None }) => {
                self.fetch_posted = false;
                self.transition(DeviceState::Failed, now);
            }
            (state, outcome) => {
                // Nur die State Machine postet Requests, das sollte nie passieren
                warn!("State: unexpected outcome {} in {}", outcome, state);
            }
        }
    }

    fn apply_button(&mut self, now: u64) {
        match self.state {
            DeviceState::TaskPending => self.begin_submit(true, now),
            DeviceState::TaskCompleted => self.begin_submit(false, now),
            DeviceState::Failed | DeviceState::RetryingAfterError => {
                info!("State: manual recovery, re-fetching status");
                self.retry.reset();
                self.fetch_posted = false;
                self.transition(DeviceState::Initializing, now);
            }
            state => {
                // Request unterwegs oder Animation: Button wird ignoriert
                debug!("State: button ignored in {}", state);
            }
        }
    }

    fn hand_off(&mut self, input: &TickInput, handshake: &Handshake) {
        let now = input.now_ms;
        match self.state {
            DeviceState::RequestPending if !handshake.is_busy() => {
                let request = PendingRequest {
                    device_id: self.config.device_id,
                    kind: RequestKind::Submit {
                        target_done: self.target,
                    },
                    enqueued_at_ms: now,
                    timestamp: input.unix_secs,
                };
                if handshake.post(request).is_ok() {
                    info!("State: submit done={} handed to worker", self.target);
                    self.animation.started_at_ms = now;
                    self.transition(DeviceState::Connecting, now);
                }
            }
            DeviceState::Initializing
                if !self.fetch_posted && input.network_ready && !handshake.is_busy() =>
            {
                let request = PendingRequest {
                    device_id: self.config.device_id,
                    kind: RequestKind::Fetch,
                    enqueued_at_ms: now,
                    timestamp: None,
                };
                if handshake.post(request).is_ok() {
                    info!("State: status fetch handed to worker");
                    self.fetch_posted = true;
                }
            }
            _ => {}
        }
    }

    fn apply_timers(&mut self, input: &TickInput) {
        let now = input.now_ms;
        let in_state = now.saturating_sub(self.state_entered_at_ms);
        match self.state {
            DeviceState::SuccessEffect => {
                let elapsed = now.saturating_sub(self.animation.started_at_ms);
                if elapsed >= self.config.success_duration_ms {
                    self.transition(DeviceState::resting_for(self.target), now);
                }
            }
            DeviceState::RetryingAfterError => {
                match self.retry.poll(&self.config.retry_policy, now) {
                    RetryDecision::Wait => {}
                    RetryDecision::Retry => {
                        self.retry.begin_retry();
                        info!("State: retry attempt {}", self.retry.attempt_count);
                        self.transition(DeviceState::RequestPending, now);
                    }
                    RetryDecision::Exhausted => {
                        warn!("State: retries exhausted");
                        self.transition(DeviceState::Failed, now);
                    }
                }
            }
            DeviceState::Initializing
                if !self.fetch_posted && in_state >= self.config.setup_timeout_ms =>
            {
                warn!("State: setup timed out without network");
                self.transition(DeviceState::Failed, now);
            }
            _ => {}
        }
    }

    fn apply_reset_trigger(&mut self, input: &TickInput) {
        let clock = match input.unix_secs {
            Some(utc) => WallClock::from_unix_secs(self.config.local_unix_secs(utc)),
            None => WallClock::unsynchronized(),
        };

        if self.scheduler.check_trigger(&clock) {
            self.reset_deferred = true;
        }

        if !self.reset_deferred {
            return;
        }

        if self.state.is_resting() {
            info!("State: daily reset, setting task to pending");
            self.reset_deferred = false;
            self.begin_submit(false, input.now_ms);
        } else {
            debug!("State: daily reset deferred in {}", self.state);
        }
    }

    /// Neuer Submit aus einem Ruhezustand
    fn begin_submit(&mut self, target_done: bool, now: u64) {
        self.target = target_done;
        self.retry.reset();
        self.transition(DeviceState::RequestPending, now);
    }

    fn transition(&mut self, next: DeviceState, now: u64) {
        info!("State: {} -> {} at {}ms", self.state, next, now);
        self.state = next;
        self.state_entered_at_ms = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryPolicy;

    fn machine() -> DeviceStateMachine {
        DeviceStateMachine::new(DeviceConfig::new("unit"), 0)
    }

    /// Simuliert den Worker: übernimmt den Request und meldet das Ergebnis
    fn respond(handshake: &Handshake, outcome: RequestOutcome) -> PendingRequest {
        let request = handshake.take_request().unwrap();
        handshake.complete(outcome).unwrap();
        request
    }

    #[test]
    fn test_boot_fetch_resolves_to_pending() {
        let handshake = Handshake::new();
        let mut m = machine();
        m.handle_tick(&TickInput::at(0), &handshake);
        assert_eq!(m.state(), DeviceState::Initializing);

        let request = respond(&handshake, RequestOutcome::Fetched { status: Some(false) });
        assert_eq!(request.kind, RequestKind::Fetch);

        m.handle_tick(&TickInput::at(100), &handshake);
        assert_eq!(m.state(), DeviceState::TaskPending);
        assert!(!handshake.is_busy());
    }

    #[test]
    fn test_setup_timeout_without_network() {
        let handshake = Handshake::new();
        let mut m = machine();
        let mut input = TickInput::at(0);
        input.network_ready = false;
        m.handle_tick(&input, &handshake);
        input.now_ms = 29_999;
        m.handle_tick(&input, &handshake);
        assert_eq!(m.state(), DeviceState::Initializing);
        input.now_ms = 30_000;
        m.handle_tick(&input, &handshake);
        assert_eq!(m.state(), DeviceState::Failed);
        assert!(!handshake.is_busy());
    }

    #[test]
    fn test_window_policy_fails_after_window() {
        let handshake = Handshake::new();
        let config = DeviceConfig::new("unit")
            .with_retry_policy(RetryPolicy::TimeoutWindow { window_ms: 5_000 });
        let mut m = DeviceStateMachine::new(config, 0);
        m.handle_tick(&TickInput::at(0), &handshake);
        respond(&handshake, RequestOutcome::Fetched { status: Some(false) });
        m.handle_tick(&TickInput::at(100), &handshake);

        let mut press = TickInput::at(200);
        press.button_pressed = true;
        m.handle_tick(&press, &handshake);
        assert_eq!(m.state(), DeviceState::Connecting);
        respond(&handshake, RequestOutcome::Submitted { success: false });

        m.handle_tick(&TickInput::at(1_000), &handshake);
        assert_eq!(m.state(), DeviceState::RetryingAfterError);
        m.handle_tick(&TickInput::at(5_999), &handshake);
        assert_eq!(m.state(), DeviceState::RetryingAfterError);
        assert!(!handshake.is_busy());
        m.handle_tick(&TickInput::at(6_000), &handshake);
        assert_eq!(m.state(), DeviceState::Failed);
    }
}
