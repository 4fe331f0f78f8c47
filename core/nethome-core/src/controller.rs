//! Presence-to-event state machine.
//!
//! Debounces periodic presence samples into a single-event lifecycle: the
//! first positive sample opens an event, every further positive sample
//! pushes its end time forward, and a run of negative samples longer than
//! the grace window drops the event. The grace window absorbs transient
//! neighbor-table dropouts (cache expiry, retry) so one flaky scan does not
//! split an ongoing stay into many short events.

use crate::error::Result;
use crate::provider::PresenceProvider;
use crate::store::{EventStore, EventWrite};
use chrono::{DateTime, Duration, Utc};

/// Decides whether a presence sample counts as "present".
pub type PresencePredicate = Box<dyn Fn(&[String]) -> bool + Send>;

/// Controller configuration, immutable for the controller's lifetime.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub event_title: String,
    pub event_color_id: String,
    /// Consecutive absent ticks tolerated while an event is in flight.
    pub grace_threshold: u32,
}

/// The single in-flight event. At most one exists per controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEvent {
    pub event_id: String,
    /// First detection time; never moves while the event is in flight.
    pub started_at: DateTime<Utc>,
}

/// What a tick decided. The embedding loop logs these; they carry no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Presence confirmed with nothing tracked; a new event was opened.
    Created,
    /// Presence confirmed; the in-flight event's end time was pushed forward.
    Extended,
    /// Grace window exhausted; the in-flight event was forgotten. The store
    /// is not told: the event simply stops being extended.
    Ended,
    /// Absent, but the in-flight event is still within its grace window.
    Graced { consecutive_misses: u32 },
    /// Absent with nothing tracked.
    Idle,
}

/// Drives one event lifecycle from periodic presence samples.
///
/// Ticks for one controller must never run concurrently; the embedding loop
/// runs each tick to completion before scheduling the next.
pub struct PresenceController<P, S> {
    provider: P,
    store: S,
    config: ControllerConfig,
    predicate: PresencePredicate,
    active: Option<ActiveEvent>,
    grace_counter: u32,
}

impl<P: PresenceProvider, S: EventStore> PresenceController<P, S> {
    pub fn new(provider: P, store: S, config: ControllerConfig, predicate: PresencePredicate) -> Self {
        Self {
            provider,
            store,
            config,
            predicate,
            active: None,
            grace_counter: 0,
        }
    }

    /// The in-flight event, if any.
    pub fn active(&self) -> Option<&ActiveEvent> {
        self.active.as_ref()
    }

    /// Consecutive absent ticks seen since presence was last confirmed.
    /// Only meaningful while an event is in flight; it is not cleared when
    /// the event is dropped, only on the next confirmed presence.
    pub fn grace_counter(&self) -> u32 {
        self.grace_counter
    }

    /// Samples the provider and advances the lifecycle one step.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        self.tick_at(Utc::now())
    }

    /// Tick with an explicit clock, for deterministic testing.
    ///
    /// A provider or store failure propagates without mutating any state, so
    /// the next tick retries the same decision.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Result<TickOutcome> {
        let sample = self.provider.present()?;

        if !(self.predicate)(&sample) {
            return Ok(self.absent_tick());
        }

        match self.active.clone() {
            Some(active) => {
                // Keep the original detection time; only the end moves.
                let write = self.event_write(active.started_at, now);
                let event_id = self.store.update(&active.event_id, &write)?;
                self.grace_counter = 0;
                self.active = Some(ActiveEvent {
                    event_id,
                    started_at: active.started_at,
                });
                Ok(TickOutcome::Extended)
            }
            None => {
                let write = self.event_write(now, now + Duration::minutes(1));
                let event_id = self.store.create(&write)?;
                self.grace_counter = 0;
                self.active = Some(ActiveEvent {
                    event_id,
                    started_at: now,
                });
                Ok(TickOutcome::Created)
            }
        }
    }

    /// Absent branch. The threshold check runs before the increment, and the
    /// counter survives the clear; both are load-bearing for the effective
    /// grace window and must not be reordered.
    fn absent_tick(&mut self) -> TickOutcome {
        if self.grace_counter > self.config.grace_threshold {
            if self.active.take().is_some() {
                return TickOutcome::Ended;
            }
            return TickOutcome::Idle;
        }
        if self.active.is_some() {
            self.grace_counter += 1;
            return TickOutcome::Graced {
                consecutive_misses: self.grace_counter,
            };
        }
        TickOutcome::Idle
    }

    fn event_write(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> EventWrite {
        EventWrite {
            title: self.config.event_title.clone(),
            color_id: self.config.event_color_id.clone(),
            start,
            end,
        }
    }
}
