use std::fmt;
use tracing::warn;

use table_capture::Frame;

use crate::phase::{BoardPhase, HandPhase};

/// Observer notified synchronously when a phase machine transitions.
/// The frame is the one whose indicator sample caused the transition,
/// so observers can crop card slots out of it.
pub trait PhaseObserver<P> {
    fn on_transition(&mut self, phase: P, frame: &Frame);
}

/// A discrete phase value with an ordered observer list. Observers are
/// keyed by id and notified in registration order; triggering the phase
/// already active is a no-op with no notification.
pub struct PhaseMachine<P> {
    current: P,
    observers: Vec<(String, Box<dyn PhaseObserver<P>>)>,
}

impl<P: fmt::Debug> fmt::Debug for PhaseMachine<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseMachine")
            .field("current", &self.current)
            .field("observers", &self.observers.iter().map(|(id, _)| id).collect::<Vec<_>>())
            .finish()
    }
}

impl<P: Copy + PartialEq> PhaseMachine<P> {
    pub fn new(initial: P) -> Self {
        Self {
            current: initial,
            observers: Vec::new(),
        }
    }

    pub fn current(&self) -> P {
        self.current
    }

    /// Register an observer under `id`. Registering an id twice is a
    /// warned no-op; the original observer stays.
    pub fn register(&mut self, id: impl Into<String>, observer: Box<dyn PhaseObserver<P>>) {
        let id = id.into();
        if self.observers.iter().any(|(existing, _)| *existing == id) {
            warn!("observer {:?} is already registered", id);
            return;
        }
        self.observers.push((id, observer));
    }

    /// Remove the observer registered under `id`. Removing an unknown id
    /// is a warned no-op.
    pub fn unregister(&mut self, id: &str) {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| existing != id);
        if self.observers.len() == before {
            warn!("observer {:?} was not registered", id);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Move to `next`, notifying observers in registration order. Returns
    /// true iff the state actually changed.
    pub fn trigger(&mut self, next: P, frame: &Frame) -> bool {
        if self.current == next {
            return false;
        }
        self.current = next;
        for (_, observer) in &mut self.observers {
            observer.on_transition(next, frame);
        }
        true
    }
}

/// Hand phase machine with one idempotent trigger per reachable state.
#[derive(Debug)]
pub struct HandMachine {
    machine: PhaseMachine<HandPhase>,
}

impl HandMachine {
    pub fn new() -> Self {
        Self {
            machine: PhaseMachine::new(HandPhase::default()),
        }
    }

    pub fn current(&self) -> HandPhase {
        self.machine.current()
    }

    pub fn register(&mut self, id: impl Into<String>, observer: Box<dyn PhaseObserver<HandPhase>>) {
        self.machine.register(id, observer);
    }

    pub fn unregister(&mut self, id: &str) {
        self.machine.unregister(id);
    }

    pub fn playing(&mut self, frame: &Frame) -> bool {
        self.machine.trigger(HandPhase::Playing, frame)
    }

    pub fn sitting_out(&mut self, frame: &Frame) -> bool {
        self.machine.trigger(HandPhase::SittingOut, frame)
    }
}

impl Default for HandMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Board phase machine with one idempotent trigger per reachable state.
#[derive(Debug)]
pub struct BoardMachine {
    machine: PhaseMachine<BoardPhase>,
}

impl BoardMachine {
    pub fn new() -> Self {
        Self {
            machine: PhaseMachine::new(BoardPhase::default()),
        }
    }

    pub fn current(&self) -> BoardPhase {
        self.machine.current()
    }

    pub fn register(&mut self, id: impl Into<String>, observer: Box<dyn PhaseObserver<BoardPhase>>) {
        self.machine.register(id, observer);
    }

    pub fn unregister(&mut self, id: &str) {
        self.machine.unregister(id);
    }

    pub fn preflop(&mut self, frame: &Frame) -> bool {
        self.machine.trigger(BoardPhase::Preflop, frame)
    }

    pub fn flop(&mut self, frame: &Frame) -> bool {
        self.machine.trigger(BoardPhase::Flop, frame)
    }

    pub fn turn(&mut self, frame: &Frame) -> bool {
        self.machine.trigger(BoardPhase::Turn, frame)
    }

    pub fn river(&mut self, frame: &Frame) -> bool {
        self.machine.trigger(BoardPhase::River, frame)
    }
}

impl Default for BoardMachine {
    fn default() -> Self {
        Self::new()
    }
}
