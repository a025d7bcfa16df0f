//! Decides when the advisory-analysis call may run.
//!
//! Pure state, no timers: the session loop owns the debounce sleep task and
//! feeds `now` in, so every decision here is synchronous and testable. The
//! in-flight flag is the single-slot lock that guarantees at most one
//! concurrent call, and the armed generation makes canceled debounce timers
//! inert even if their fire message is already in the queue.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::TriggerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ArmedWait,
    Calling,
}

#[derive(Debug, thiserror::Error)]
#[error("analysis call already in flight")]
pub struct ForceRejected;

#[derive(Debug)]
pub struct TriggerScheduler {
    config: TriggerConfig,
    /// Generation of the pending debounce timer, if any.
    armed: Option<u64>,
    in_flight: bool,
    /// Client finalized text as of the most recent completed call,
    /// successful or not.
    baseline: String,
    last_call_start: Option<Instant>,
    next_generation: u64,
}

impl TriggerScheduler {
    pub fn new(config: TriggerConfig) -> Self {
        Self {
            config,
            armed: None,
            in_flight: false,
            baseline: String::new(),
            last_call_start: None,
            next_generation: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight {
            Phase::Calling
        } else if self.armed.is_some() {
            Phase::ArmedWait
        } else {
            Phase::Idle
        }
    }

    pub fn debounce(&self) -> Duration {
        self.config.debounce
    }

    /// A client finalized delta arrived. Returns the generation of a newly
    /// armed debounce timer when all gates pass; the caller must cancel any
    /// previously scheduled timer and schedule this one.
    pub fn on_client_finalized(&mut self, finalized_text: &str, now: Instant) -> Option<u64> {
        if finalized_text == self.baseline {
            return None;
        }

        let new_content = finalized_text.len().saturating_sub(self.baseline.len());
        if new_content <= self.config.min_new_content {
            return None;
        }

        if let Some(started) = self.last_call_start
            && now.duration_since(started) <= self.config.cooldown
        {
            return None;
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        self.armed = Some(generation);
        Some(generation)
    }

    /// The debounce timer with this generation fired. Returns `true` when a
    /// call should start now. A fire while a call is in flight is dropped,
    /// never queued; a stale generation is ignored.
    pub fn on_debounce_fired(&mut self, generation: u64, now: Instant) -> bool {
        if self.armed != Some(generation) {
            return false;
        }
        self.armed = None;

        if self.in_flight {
            tracing::debug!(generation, "trigger_dropped_call_in_flight");
            return false;
        }

        self.in_flight = true;
        self.last_call_start = Some(now);
        true
    }

    /// Manual override: bypasses the content and time gates, still refuses
    /// while a call is in flight.
    pub fn force(&mut self, now: Instant) -> Result<(), ForceRejected> {
        if self.in_flight {
            return Err(ForceRejected);
        }
        self.armed = None;
        self.in_flight = true;
        self.last_call_start = Some(now);
        Ok(())
    }

    /// The call finished, successfully or not. The baseline advances either
    /// way so unchanged text cannot re-trigger a storm of failing calls.
    pub fn on_call_completed(&mut self, trigger_text: &str) {
        self.in_flight = false;
        self.baseline.clear();
        self.baseline.push_str(trigger_text);
    }

    pub fn reset(&mut self) {
        self.armed = None;
        self.in_flight = false;
        self.baseline.clear();
        self.last_call_start = None;
    }
}
