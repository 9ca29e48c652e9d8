// src/process.rs

use crate::settings::Policies;
use crate::state::{State, ValueSnapshot};
use crate::time_value::TimeValue;

/// Context passed to time-processes while the tree advances.
#[derive(Copy, Clone)]
pub struct ProcessContext<'a> {
    /// Owning constraint's date, already clamped for this pass.
    pub date: TimeValue,

    /// Owning constraint's nominal (max) duration. May be infinite.
    pub duration: TimeValue,

    /// Live parameter values, immutable for the whole pass.
    pub snapshot: &'a ValueSnapshot,

    /// Session policies (ordering/merging) consulted during the walk.
    pub policies: &'a Policies,
}

/// Per-pass accumulator threaded through the tree.
///
/// Collects each source's partial state in walk order (for the granular
/// commit policy) and the advisory events produced along the way.
#[derive(Default)]
pub struct TickFrame {
    pub partials: Vec<State>,
    pub events: Vec<crate::events::ExecutionEvent>,
}

impl TickFrame {
    pub fn clear(&mut self) {
        self.partials.clear();
        self.events.clear();
    }
}

/// Capability interface over the heterogeneous time-process kinds a
/// constraint may own (nested scenarios, automations, ...).
///
/// Processes:
/// - do NOT know about clocks or policies beyond what the context carries
/// - never block or suspend mid-call
/// - must tolerate `cleanup` before `start`
pub trait TimeProcess: Send {
    /// Called when the owning constraint starts running.
    fn start(&mut self);

    /// Called when the owning constraint finishes. Idempotent.
    fn stop(&mut self);

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    /// Advance by `delta` and return this process's partial state.
    ///
    /// `delta` may be zero (state re-query without time movement).
    fn advance(
        &mut self,
        delta: TimeValue,
        ctx: &ProcessContext<'_>,
        frame: &mut TickFrame,
    ) -> State;

    /// State the process would produce at `date`, without advancing and
    /// without trigger side effects. Used by transport scrubbing.
    fn offset(&mut self, date: TimeValue, ctx: &ProcessContext<'_>) -> State;

    /// Return to the pristine, never-started condition.
    ///
    /// Safe on a process that was never started; calling twice is a no-op.
    fn cleanup(&mut self);
}
