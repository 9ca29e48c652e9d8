// src/constraint.rs

use crate::process::{ProcessContext, TickFrame, TimeProcess};
use crate::settings::Policies;
use crate::state::{State, ValueSnapshot};
use crate::time_value::TimeValue;

/// Lifecycle of a constraint.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstraintStatus {
    /// Compiled but not yet reached.
    Waiting,
    Running,
    Paused,
    /// Ended, either by its end sync firing or by an explicit stop.
    Finished,
    /// Taken out of execution by an editor request; never advanced again
    /// until re-enabled by a graph edit.
    Disabled,
}

/// A bounded time span owning nested time-processes.
///
/// Invariants:
/// - `date` stays within `[0, max_duration]` while running
/// - `date >= min_duration` is the earliest legal firing point for the
///   end sync
/// - an infinite `max_duration` never self-terminates; only the end sync
///   ends the span
pub struct Constraint {
    min: TimeValue,
    max: TimeValue,
    date: TimeValue,
    status: ConstraintStatus,
    processes: Vec<Box<dyn TimeProcess>>,
}

impl Constraint {
    pub fn new(min: TimeValue, max: TimeValue) -> Self {
        debug_assert!(min <= max, "duration bounds inverted: {min} > {max}");
        Self {
            min,
            max,
            date: TimeValue::ZERO,
            status: ConstraintStatus::Waiting,
            processes: Vec::new(),
        }
    }

    pub fn add_process(&mut self, process: Box<dyn TimeProcess>) {
        self.processes.push(process);
    }

    #[inline]
    pub fn status(&self) -> ConstraintStatus {
        self.status
    }

    #[inline]
    pub fn date(&self) -> TimeValue {
        self.date
    }

    #[inline]
    pub fn min_duration(&self) -> TimeValue {
        self.min
    }

    #[inline]
    pub fn max_duration(&self) -> TimeValue {
        self.max
    }

    #[inline]
    pub fn processes(&self) -> &[Box<dyn TimeProcess>] {
        &self.processes
    }

    /// Live edit of the duration bounds. The current date is re-clamped
    /// so the running invariant holds immediately.
    pub fn set_bounds(&mut self, min: TimeValue, max: TimeValue) {
        self.min = min;
        self.max = max;
        self.date = self.date.clamp(TimeValue::ZERO, self.max);
    }

    /// WAITING → RUNNING. A no-op in any other state.
    pub fn start(&mut self) {
        if self.status != ConstraintStatus::Waiting {
            return;
        }
        self.status = ConstraintStatus::Running;
        self.date = TimeValue::ZERO;
        for process in &mut self.processes {
            process.start();
        }
    }

    /// Any state → FINISHED. Idempotent; releases children.
    pub fn stop(&mut self) {
        if self.status == ConstraintStatus::Finished {
            return;
        }
        self.status = ConstraintStatus::Finished;
        for process in &mut self.processes {
            process.stop();
        }
    }

    pub fn pause(&mut self) {
        if self.status != ConstraintStatus::Running {
            return;
        }
        self.status = ConstraintStatus::Paused;
        for process in &mut self.processes {
            process.pause();
        }
    }

    pub fn resume(&mut self) {
        if self.status != ConstraintStatus::Paused {
            return;
        }
        self.status = ConstraintStatus::Running;
        for process in &mut self.processes {
            process.resume();
        }
    }

    pub fn disable(&mut self) {
        self.status = ConstraintStatus::Disabled;
        for process in &mut self.processes {
            process.stop();
        }
    }

    /// Is the end sync allowed to fire? Inclusive at `date == min`.
    #[inline]
    pub fn end_eligible(&self) -> bool {
        self.status == ConstraintStatus::Running && self.date >= self.min
    }

    /// Advance by `delta` and collect the combined state of the children.
    ///
    /// Called once per scheduler pass while RUNNING. Safe with a zero
    /// delta: the date does not move and the children re-report their
    /// current state. Leaf processes record their individual partials
    /// in `frame` for the granular commit policy.
    pub fn advance(
        &mut self,
        delta: TimeValue,
        snapshot: &ValueSnapshot,
        policies: &Policies,
        frame: &mut TickFrame,
    ) -> State {
        if self.status != ConstraintStatus::Running {
            return State::new();
        }

        self.date = (self.date + delta).clamp(TimeValue::ZERO, self.max);

        let ctx = ProcessContext {
            date: self.date,
            duration: self.max,
            snapshot,
            policies,
        };

        let mut combined = State::new();
        for process in &mut self.processes {
            let partial = process.advance(delta, &ctx, frame);
            policies.merging.fold(&mut combined, partial);
        }
        combined
    }

    /// State of the children at an arbitrary `date`, without advancing
    /// and without trigger side effects.
    pub fn offset(
        &mut self,
        date: TimeValue,
        snapshot: &ValueSnapshot,
        policies: &Policies,
    ) -> State {
        let date = date.clamp(TimeValue::ZERO, self.max);
        let ctx = ProcessContext {
            date,
            duration: self.max,
            snapshot,
            policies,
        };

        let mut combined = State::new();
        for process in &mut self.processes {
            let partial = process.offset(date, &ctx);
            policies.merging.fold(&mut combined, partial);
        }
        combined
    }

    /// Return to the pristine compiled state. Idempotent, callable on a
    /// constraint that was never started.
    pub fn cleanup(&mut self) {
        self.date = TimeValue::ZERO;
        self.status = ConstraintStatus::Waiting;
        for process in &mut self.processes {
            process.cleanup();
        }
    }
}
