//! Thread-safe bridge between the editor and the execution thread.
//!
//! This module provides the communication layer that allows the editing
//! side to safely interact with a running session.
//!
//! # Architecture
//!
//! - **Editor thread** owns [`SessionHandle`]
//! - **Execution thread** owns [`ExecutorHandle`] with the [`Executor`]
//! - Commands travel over a single-producer channel and are drained
//!   strictly between ticks; readback uses lock-free atomics
//!
//! # Usage
//!
//! ```ignore
//! let (session, executor) = create_bridge(executor);
//!
//! // Editor thread: send requests
//! session.play();
//! session.trigger(sync_id);
//!
//! // Execution thread: one call per external tick
//! executor.tick(elapsed);
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
    mpsc::{self, Receiver, Sender, TryRecvError},
};

use log::debug;

use crate::document::{Command, ScenarioDef};
use crate::events::ExecutionEvent;
use crate::executor::Executor;
use crate::expression::Expression;
use crate::scenario::{ConstraintId, SyncId};
use crate::time_value::TimeValue;
use crate::value::{Address, Value};

/// Handle for the editor thread to reach a running session.
pub struct SessionHandle {
    command_tx: Sender<Command>,
    event_rx: Receiver<ExecutionEvent>,
    readback: Arc<SharedReadback>,
}

/// Handle for the execution thread. Owns the executor and drives it.
pub struct ExecutorHandle {
    executor: Executor,
    command_rx: Receiver<Command>,
    event_tx: Sender<ExecutionEvent>,
    readback: Arc<SharedReadback>,
}

/// Lock-free shared state for execution -> editor readback.
struct SharedReadback {
    /// Root date in logical units (`u64::MAX` once past any finite date).
    date_units: AtomicU64,
    running: AtomicBool,
    ticks: AtomicU64,
}

/// Snapshot of the readback atomics.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Readback {
    pub date: TimeValue,
    pub running: bool,
    pub ticks: u64,
}

/// Create a linked pair of handles around an executor.
pub fn create_bridge(executor: Executor) -> (SessionHandle, ExecutorHandle) {
    let (command_tx, command_rx) = mpsc::channel();
    let (event_tx, event_rx) = mpsc::channel();
    let readback = Arc::new(SharedReadback {
        date_units: AtomicU64::new(0),
        running: AtomicBool::new(false),
        ticks: AtomicU64::new(0),
    });

    let session = SessionHandle {
        command_tx,
        event_rx,
        readback: Arc::clone(&readback),
    };

    let handle = ExecutorHandle {
        executor,
        command_rx,
        event_tx,
        readback,
    };

    (session, handle)
}

// ═══════════════════════════════════════════════════════════════════
// SessionHandle - editor thread API
// ═══════════════════════════════════════════════════════════════════

impl SessionHandle {
    /// Queue a command for the next inter-tick boundary.
    pub fn send(&self, command: Command) {
        let _ = self.command_tx.send(command);
    }

    pub fn play(&self) {
        self.send(Command::Play);
    }

    pub fn stop(&self) {
        self.send(Command::Stop);
    }

    pub fn pause(&self) {
        self.send(Command::Pause);
    }

    pub fn resume(&self) {
        self.send(Command::Resume);
    }

    pub fn seek(&self, date: TimeValue) {
        self.send(Command::Seek { date });
    }

    /// Manually fire a sync, bypassing its expression once.
    pub fn trigger(&self, sync: SyncId) {
        self.send(Command::RequestTrigger { sync });
    }

    /// Swap a trigger expression; re-subscription happens atomically on
    /// the execution thread.
    pub fn replace_expression(&self, sync: SyncId, expression: Expression) {
        self.send(Command::ReplaceExpression { sync, expression });
    }

    pub fn set_bounds(&self, constraint: ConstraintId, min: TimeValue, max: TimeValue) {
        self.send(Command::SetBounds {
            constraint,
            min,
            max,
        });
    }

    pub fn insert_graph(&self, def: ScenarioDef) {
        self.send(Command::InsertGraph { def });
    }

    pub fn remove_constraint(&self, constraint: ConstraintId) {
        self.send(Command::RemoveConstraint { constraint });
    }

    /// Forward an external parameter change into the value snapshot.
    pub fn device_value(&self, address: Address, value: Value) {
        self.send(Command::DeviceValue { address, value });
    }

    /// Drain pending advisory events.
    pub fn poll_events(&self) -> Vec<ExecutionEvent> {
        let mut events = Vec::new();
        loop {
            match self.event_rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    /// Current cursor state, for timeline animation.
    pub fn readback(&self) -> Readback {
        Readback {
            date: TimeValue::from_units(self.readback.date_units.load(Ordering::Relaxed)),
            running: self.readback.running.load(Ordering::Relaxed),
            ticks: self.readback.ticks.load(Ordering::Relaxed),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// ExecutorHandle - execution thread API
// ═══════════════════════════════════════════════════════════════════

impl ExecutorHandle {
    /// Apply all pending commands, in submission order.
    ///
    /// Called at the start of each tick, never inside one. A `Stop`
    /// flushes the rest of the queue: mutations submitted before the
    /// stop was processed are discarded with it.
    pub fn process_commands(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            let stopping = matches!(command, Command::Stop);
            self.executor.apply(command);
            if stopping {
                let discarded = self.command_rx.try_iter().count();
                if discarded > 0 {
                    debug!("stop flushed {discarded} queued command(s)");
                }
                break;
            }
        }
    }

    /// One external tick: drain commands, run the pass, publish events
    /// and readback.
    pub fn tick(&mut self, external_delta: f64) {
        self.process_commands();

        for event in self.executor.tick(external_delta) {
            let _ = self.event_tx.send(event);
        }

        self.readback.date_units.store(
            self.executor.date().units().unwrap_or(u64::MAX),
            Ordering::Relaxed,
        );
        self.readback
            .running
            .store(self.executor.is_playing(), Ordering::Relaxed);
        self.readback.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut Executor {
        &mut self.executor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SyncDef;
    use crate::settings::{ClockKind, Settings};
    use crate::sink::MemorySink;

    fn session_pair() -> (SessionHandle, ExecutorHandle) {
        let mut def = ScenarioDef::new();
        let a = def.add_sync(SyncDef::immediate());
        let b = def.add_sync(SyncDef::triggered(Expression::not(Expression::True)));
        def.add_constraint(a, b, TimeValue::ZERO, TimeValue::Infinite);

        let mut settings = Settings::default();
        settings.clock = ClockKind::FreeRunning;
        let executor = Executor::new(&def, settings, Box::new(MemorySink::new())).unwrap();
        create_bridge(executor)
    }

    #[test]
    fn commands_apply_between_ticks() {
        let (session, mut handle) = session_pair();
        session.play();

        handle.tick(10.0);
        assert!(handle.executor().is_playing());
        // First pass: Play arrived before the tick, so the whole delta
        // already counts.
        assert_eq!(handle.executor().date(), TimeValue::from_units(10));
    }

    #[test]
    fn stop_flushes_the_remaining_queue() {
        let (session, mut handle) = session_pair();
        session.play();
        handle.tick(1.0);

        session.stop();
        // Submitted after the stop; must be discarded with the flush.
        session.seek(TimeValue::from_units(99));
        handle.tick(1.0);

        assert!(!handle.executor().is_playing());
        assert_eq!(handle.executor().date(), TimeValue::ZERO);
    }

    #[test]
    fn readback_and_events_cross_the_thread_boundary() {
        let (session, handle) = session_pair();
        session.play();

        let worker = std::thread::spawn(move || {
            let mut handle = handle;
            for _ in 0..5 {
                handle.tick(10.0);
            }
            handle
        });
        let handle = worker.join().unwrap();

        let readback = session.readback();
        assert_eq!(readback.ticks, 5);
        assert!(readback.running);
        assert_eq!(readback.date, TimeValue::from_units(50));

        let events = session.poll_events();
        assert!(events.contains(&ExecutionEvent::PlaybackStarted));
        let _ = handle;
    }

    #[test]
    fn manual_trigger_round_trip() {
        let (session, mut handle) = session_pair();
        session.play();
        handle.tick(1.0);

        session.trigger(SyncId(1));
        handle.tick(0.0);

        let fired = session
            .poll_events()
            .into_iter()
            .filter(|e| matches!(e, ExecutionEvent::SyncFired { sync } if *sync == SyncId(1)))
            .count();
        assert_eq!(fired, 1);
    }
}
