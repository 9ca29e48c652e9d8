//! Scenario graph: constraints and time syncs stored in arenas, walked
//! once per tick.
//!
//! Nodes live in contiguous tables and reference each other by stable
//! index, so dynamic sub-graph edits never invalidate outstanding ids.
//! Removal tombstones a slot instead of shifting the table.

use log::warn;

use crate::constraint::{Constraint, ConstraintStatus};
use crate::events::ExecutionEvent;
use crate::process::{ProcessContext, TickFrame, TimeProcess};
use crate::settings::OrderingPolicy;
use crate::state::State;
use crate::time_sync::TimeSync;
use crate::time_value::TimeValue;

/// Stable index of a sync in the scenario's arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SyncId(pub u32);

/// Stable index of a constraint in the scenario's arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub u32);

struct SyncNode {
    sync: TimeSync,
    incoming: Vec<ConstraintId>,
    outgoing: Vec<ConstraintId>,
    /// Set once the sync has fired for the current activation.
    fired: bool,
    alive: bool,
}

struct ConstraintNode {
    constraint: Constraint,
    start: SyncId,
    end: SyncId,
    alive: bool,
}

/// A sub-scenario: the time-process owning a constraint/sync graph.
///
/// The distinguished start syncs are simply the syncs without incoming
/// constraints; an end sync is any sync without outgoing ones.
#[derive(Default)]
pub struct Scenario {
    syncs: Vec<SyncNode>,
    constraints: Vec<ConstraintNode>,
    running: bool,
    /// Whether the activation sweep (root firing) already ran.
    root_swept: bool,
}

impl Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    //
    // ───────────────────────────────────────────────────────────────
    // Graph construction and editing (between ticks only)
    // ───────────────────────────────────────────────────────────────
    //

    pub fn add_sync(&mut self, sync: TimeSync) -> SyncId {
        let id = SyncId(self.syncs.len() as u32);
        self.syncs.push(SyncNode {
            sync,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            fired: false,
            alive: true,
        });
        id
    }

    /// Attach a constraint between two existing syncs.
    pub fn add_constraint(
        &mut self,
        constraint: Constraint,
        start: SyncId,
        end: SyncId,
    ) -> ConstraintId {
        debug_assert!(self.sync_alive(start) && self.sync_alive(end));
        let id = ConstraintId(self.constraints.len() as u32);
        self.constraints.push(ConstraintNode {
            constraint,
            start,
            end,
            alive: true,
        });
        self.syncs[start.0 as usize].outgoing.push(id);
        self.syncs[end.0 as usize].incoming.push(id);
        id
    }

    /// Remove a constraint from execution. Its endpoints stay.
    pub fn remove_constraint(&mut self, id: ConstraintId) {
        let Some(node) = self.constraints.get_mut(id.0 as usize) else {
            warn!("remove_constraint: unknown id {id:?}");
            return;
        };
        if !node.alive {
            return;
        }
        node.constraint.stop();
        node.constraint.cleanup();
        node.alive = false;

        let (start, end) = (node.start, node.end);
        self.syncs[start.0 as usize].outgoing.retain(|c| *c != id);
        self.syncs[end.0 as usize].incoming.retain(|c| *c != id);
    }

    /// Remove a sync. Refused while constraints are still attached.
    pub fn remove_sync(&mut self, id: SyncId) {
        let Some(node) = self.syncs.get_mut(id.0 as usize) else {
            warn!("remove_sync: unknown id {id:?}");
            return;
        };
        if !node.incoming.is_empty() || !node.outgoing.is_empty() {
            warn!("remove_sync: {id:?} still has attached constraints, ignoring");
            return;
        }
        node.sync.cleanup();
        node.alive = false;
    }

    #[inline]
    pub fn sync(&self, id: SyncId) -> Option<&TimeSync> {
        self.syncs
            .get(id.0 as usize)
            .filter(|n| n.alive)
            .map(|n| &n.sync)
    }

    #[inline]
    pub fn sync_mut(&mut self, id: SyncId) -> Option<&mut TimeSync> {
        self.syncs
            .get_mut(id.0 as usize)
            .filter(|n| n.alive)
            .map(|n| &mut n.sync)
    }

    #[inline]
    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints
            .get(id.0 as usize)
            .filter(|n| n.alive)
            .map(|n| &n.constraint)
    }

    #[inline]
    pub fn constraint_mut(&mut self, id: ConstraintId) -> Option<&mut Constraint> {
        self.constraints
            .get_mut(id.0 as usize)
            .filter(|n| n.alive)
            .map(|n| &mut n.constraint)
    }

    fn sync_alive(&self, id: SyncId) -> bool {
        self.syncs.get(id.0 as usize).is_some_and(|n| n.alive)
    }

    /// Syncs with no incoming constraints: the graph's entry points.
    pub fn root_syncs(&self) -> Vec<SyncId> {
        self.syncs
            .iter()
            .enumerate()
            .filter(|(_, n)| n.alive && n.incoming.is_empty())
            .map(|(i, _)| SyncId(i as u32))
            .collect()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    //
    // ───────────────────────────────────────────────────────────────
    // Visit orders
    // ───────────────────────────────────────────────────────────────
    //

    fn constraint_order(&self, policy: OrderingPolicy) -> Vec<ConstraintId> {
        match policy {
            OrderingPolicy::CreationOrder => (0..self.constraints.len() as u32)
                .map(ConstraintId)
                .filter(|id| self.constraints[id.0 as usize].alive)
                .collect(),
            OrderingPolicy::Topological => {
                let mut order = Vec::new();
                let mut seen_syncs = vec![false; self.syncs.len()];
                let mut seen = vec![false; self.constraints.len()];
                let mut queue: Vec<SyncId> = self.root_syncs();

                let mut head = 0;
                while head < queue.len() {
                    let sync = queue[head];
                    head += 1;
                    if seen_syncs[sync.0 as usize] {
                        continue;
                    }
                    seen_syncs[sync.0 as usize] = true;

                    for &cid in &self.syncs[sync.0 as usize].outgoing {
                        if !seen[cid.0 as usize] {
                            seen[cid.0 as usize] = true;
                            order.push(cid);
                            queue.push(self.constraints[cid.0 as usize].end);
                        }
                    }
                }
                order
            }
        }
    }

    fn sync_order(&self, policy: OrderingPolicy) -> Vec<SyncId> {
        match policy {
            OrderingPolicy::CreationOrder => (0..self.syncs.len() as u32)
                .map(SyncId)
                .filter(|id| self.syncs[id.0 as usize].alive)
                .collect(),
            OrderingPolicy::Topological => {
                let mut order = self.root_syncs();
                let mut seen = vec![false; self.syncs.len()];
                for &s in &order {
                    seen[s.0 as usize] = true;
                }
                let mut head = 0;
                while head < order.len() {
                    let sync = order[head];
                    head += 1;
                    for &cid in &self.syncs[sync.0 as usize].outgoing {
                        let end = self.constraints[cid.0 as usize].end;
                        if !seen[end.0 as usize] {
                            seen[end.0 as usize] = true;
                            order.push(end);
                        }
                    }
                }
                order
            }
        }
    }

    //
    // ───────────────────────────────────────────────────────────────
    // Firing
    // ───────────────────────────────────────────────────────────────
    //

    /// Is the sync a candidate for evaluation right now?
    ///
    /// Every alive incoming constraint must either be finished or be
    /// running past its min date. Disabled constraints never block.
    /// Roots qualify vacuously until they fire.
    fn sync_pending(&self, id: SyncId) -> bool {
        let node = &self.syncs[id.0 as usize];
        if !node.alive || node.fired {
            return false;
        }

        let mut reachable = node.incoming.is_empty();
        for &cid in &node.incoming {
            let c = &self.constraints[cid.0 as usize].constraint;
            match c.status() {
                ConstraintStatus::Finished => reachable = true,
                ConstraintStatus::Disabled => {}
                ConstraintStatus::Running => {
                    if !c.end_eligible() {
                        return false;
                    }
                    reachable = true;
                }
                ConstraintStatus::Waiting | ConstraintStatus::Paused => return false,
            }
        }
        reachable
    }

    /// A pending sync whose incoming constraint hit a finite max duration
    /// must fire this pass regardless of its expression.
    fn sync_deadline_reached(&self, id: SyncId) -> bool {
        self.syncs[id.0 as usize].incoming.iter().any(|&cid| {
            let c = &self.constraints[cid.0 as usize].constraint;
            c.status() == ConstraintStatus::Running
                && !c.max_duration().is_infinite()
                && c.date() >= c.max_duration()
        })
    }

    /// Evaluate pending syncs and fire the ones that answer, cascading
    /// until no sync fires (zero-min chains resolve within one pass).
    ///
    /// Fired syncs fold their instantaneous state into `combined` and
    /// record it for the granular commit policy.
    fn sweep_syncs(
        &mut self,
        ctx: &ProcessContext<'_>,
        frame: &mut TickFrame,
        combined: &mut State,
    ) {
        let order = self.sync_order(ctx.policies.ordering);

        loop {
            let mut any_fired = false;

            for &sid in &order {
                let pending = self.sync_pending(sid);
                // Observation tracks pending status: enabled while the
                // sync is a live tick-boundary candidate, off otherwise.
                let fired_already = self.syncs[sid.0 as usize].fired;
                self.syncs[sid.0 as usize]
                    .sync
                    .observe(pending && !fired_already);

                if !pending {
                    continue;
                }

                let deadline = self.sync_deadline_reached(sid);
                let node = &mut self.syncs[sid.0 as usize];
                let expression_fired = node.sync.evaluate(ctx.snapshot);
                if !(expression_fired || deadline) {
                    continue;
                }

                node.fired = true;
                node.sync.observe(false);
                any_fired = true;

                let fire_state = node.sync.fire_state().clone();
                let incoming = node.incoming.clone();
                let outgoing = node.outgoing.clone();

                for cid in incoming {
                    self.constraints[cid.0 as usize].constraint.stop();
                }
                for cid in outgoing {
                    self.constraints[cid.0 as usize].constraint.start();
                }

                if !fire_state.is_empty() {
                    frame.partials.push(fire_state.clone());
                    ctx.policies.merging.fold(combined, fire_state);
                }
                frame.events.push(ExecutionEvent::SyncFired { sync: sid });
            }

            if !any_fired {
                break;
            }
        }
    }

    /// Graph invariants checked before playback: every alive constraint
    /// references alive endpoints, and at least one root exists when the
    /// graph is non-empty.
    pub fn validate(&self) -> Result<(), crate::error::CompileError> {
        use crate::error::CompileError;

        for (i, node) in self.constraints.iter().enumerate() {
            if !node.alive {
                continue;
            }
            if !self.sync_alive(node.start) || !self.sync_alive(node.end) {
                return Err(CompileError::DanglingSync {
                    constraint: ConstraintId(i as u32),
                });
            }
        }

        let has_alive_sync = self.syncs.iter().any(|n| n.alive);
        if has_alive_sync && self.root_syncs().is_empty() {
            return Err(CompileError::NoStartSync);
        }
        Ok(())
    }
}

//
// ═══════════════════════════════════════════════════════════════════
// TimeProcess implementation
// ═══════════════════════════════════════════════════════════════════
//

impl TimeProcess for Scenario {
    fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.root_swept = false;
        for node in &mut self.syncs {
            node.fired = false;
        }
    }

    fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        for node in &mut self.constraints {
            if node.alive {
                node.constraint.stop();
            }
        }
        for node in &mut self.syncs {
            node.sync.observe(false);
        }
    }

    fn pause(&mut self) {
        for node in &mut self.constraints {
            if node.alive {
                node.constraint.pause();
            }
        }
    }

    fn resume(&mut self) {
        for node in &mut self.constraints {
            if node.alive {
                node.constraint.resume();
            }
        }
    }

    fn advance(
        &mut self,
        delta: TimeValue,
        ctx: &ProcessContext<'_>,
        frame: &mut TickFrame,
    ) -> State {
        if !self.running {
            return State::new();
        }

        let mut combined = State::new();

        // Activation sweep: root syncs get their chance to fire before
        // any time passes, so constraints started at activation see the
        // full first delta.
        if !self.root_swept {
            self.root_swept = true;
            self.sweep_syncs(ctx, frame, &mut combined);
        }

        // Advance running constraints in policy order.
        for cid in self.constraint_order(ctx.policies.ordering) {
            let node = &mut self.constraints[cid.0 as usize];
            if !node.alive || node.constraint.status() != ConstraintStatus::Running {
                continue;
            }
            let partial = node
                .constraint
                .advance(delta, ctx.snapshot, ctx.policies, frame);
            frame.events.push(ExecutionEvent::DateChanged {
                constraint: cid,
                date: node.constraint.date(),
            });
            ctx.policies.merging.fold(&mut combined, partial);
        }

        // Evaluate boundary syncs, firing and cascading.
        self.sweep_syncs(ctx, frame, &mut combined);

        combined
    }

    fn offset(&mut self, _date: TimeValue, ctx: &ProcessContext<'_>) -> State {
        let mut combined = State::new();
        for cid in self.constraint_order(ctx.policies.ordering) {
            let node = &mut self.constraints[cid.0 as usize];
            if !node.alive || node.constraint.status() != ConstraintStatus::Running {
                continue;
            }
            let date = node.constraint.date();
            let partial = node.constraint.offset(date, ctx.snapshot, ctx.policies);
            ctx.policies.merging.fold(&mut combined, partial);
        }
        combined
    }

    fn cleanup(&mut self) {
        self.running = false;
        self.root_swept = false;
        for node in &mut self.constraints {
            node.constraint.cleanup();
        }
        for node in &mut self.syncs {
            node.sync.cleanup();
            node.fired = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{Comparator, Expression};
    use crate::settings::Policies;
    use crate::state::ValueSnapshot;
    use crate::value::{Address, Value};

    fn tick(scenario: &mut Scenario, snapshot: &ValueSnapshot, delta: u64) -> (State, TickFrame) {
        let policies = Policies::default();
        let mut frame = TickFrame::default();
        let ctx = ProcessContext {
            date: TimeValue::ZERO,
            duration: TimeValue::Infinite,
            snapshot,
            policies: &policies,
        };
        let state = scenario.advance(TimeValue::from_units(delta), &ctx, &mut frame);
        (state, frame)
    }

    fn fired_count(frame: &TickFrame, sync: SyncId) -> usize {
        frame
            .events
            .iter()
            .filter(|e| matches!(e, ExecutionEvent::SyncFired { sync: s } if *s == sync))
            .count()
    }

    /// start ──C──> end, C with min=2 max=5, end trigger always true.
    fn min_max_scenario() -> (Scenario, ConstraintId, SyncId) {
        let mut s = Scenario::new();
        let start = s.add_sync(TimeSync::always());
        let end = s.add_sync(TimeSync::always());
        let c = s.add_constraint(
            Constraint::new(TimeValue::from_units(2), TimeValue::from_units(5)),
            start,
            end,
        );
        (s, c, end)
    }

    #[test]
    fn end_sync_waits_for_min_duration() {
        let (mut s, c, end) = min_max_scenario();
        let snapshot = ValueSnapshot::new();
        s.start();

        // Tick 1: root fires, constraint starts and advances to 1.
        // The end sync is true but not yet eligible.
        let (_, f1) = tick(&mut s, &snapshot, 1);
        assert_eq!(s.constraint(c).unwrap().date(), TimeValue::from_units(1));
        assert_eq!(fired_count(&f1, end), 0);

        // Tick 2: date reaches min; eligible and true, so it fires.
        let (_, f2) = tick(&mut s, &snapshot, 1);
        assert_eq!(s.constraint(c).unwrap().date(), TimeValue::from_units(2));
        assert_eq!(fired_count(&f2, end), 1);
        assert_eq!(
            s.constraint(c).unwrap().status(),
            ConstraintStatus::Finished
        );
    }

    #[test]
    fn dates_accumulate_across_ticks() {
        let mut s = Scenario::new();
        let start = s.add_sync(TimeSync::always());
        let end = s.add_sync(TimeSync::new(Expression::not(Expression::True)));
        let c = s.add_constraint(
            Constraint::new(TimeValue::from_units(2), TimeValue::from_units(5)),
            start,
            end,
        );
        let snapshot = ValueSnapshot::new();
        s.start();

        tick(&mut s, &snapshot, 1);
        tick(&mut s, &snapshot, 1);
        tick(&mut s, &snapshot, 1);
        assert_eq!(s.constraint(c).unwrap().date(), TimeValue::from_units(3));
    }

    #[test]
    fn finite_max_is_a_deadline() {
        let mut s = Scenario::new();
        let start = s.add_sync(TimeSync::always());
        let end = s.add_sync(TimeSync::new(Expression::not(Expression::True)));
        let c = s.add_constraint(
            Constraint::new(TimeValue::from_units(2), TimeValue::from_units(5)),
            start,
            end,
        );
        let snapshot = ValueSnapshot::new();
        s.start();

        for _ in 0..5 {
            tick(&mut s, &snapshot, 1);
        }
        // Expression never true, but the max bound forces the fire.
        let (_, frame) = tick(&mut s, &snapshot, 1);
        assert!(
            fired_count(&frame, end) == 1
                || s.constraint(c).unwrap().status() == ConstraintStatus::Finished
        );
    }

    #[test]
    fn infinite_max_never_self_terminates() {
        let mut s = Scenario::new();
        let start = s.add_sync(TimeSync::always());
        let end = s.add_sync(TimeSync::new(Expression::not(Expression::True)));
        let c = s.add_constraint(
            Constraint::new(TimeValue::ZERO, TimeValue::Infinite),
            start,
            end,
        );
        let snapshot = ValueSnapshot::new();
        s.start();

        for _ in 0..100 {
            tick(&mut s, &snapshot, 1_000);
        }
        assert_eq!(s.constraint(c).unwrap().status(), ConstraintStatus::Running);
    }

    #[test]
    fn merge_point_fires_once() {
        let mut s = Scenario::new();
        let start = s.add_sync(TimeSync::always());
        let merge = s.add_sync(TimeSync::always());
        let a = s.add_constraint(
            Constraint::new(TimeValue::from_units(1), TimeValue::from_units(10)),
            start,
            merge,
        );
        let b = s.add_constraint(
            Constraint::new(TimeValue::from_units(3), TimeValue::from_units(10)),
            start,
            merge,
        );
        let snapshot = ValueSnapshot::new();
        s.start();

        // After one tick only `a` is past min; the merge sync must hold.
        let (_, f1) = tick(&mut s, &snapshot, 1);
        assert_eq!(fired_count(&f1, merge), 0);

        let (_, f2) = tick(&mut s, &snapshot, 1);
        assert_eq!(fired_count(&f2, merge), 0);

        // Third tick: both past min. Exactly one fire, both stopped.
        let (_, f3) = tick(&mut s, &snapshot, 1);
        assert_eq!(fired_count(&f3, merge), 1);
        assert_eq!(s.constraint(a).unwrap().status(), ConstraintStatus::Finished);
        assert_eq!(s.constraint(b).unwrap().status(), ConstraintStatus::Finished);

        // And never again.
        let (_, f4) = tick(&mut s, &snapshot, 1);
        assert_eq!(fired_count(&f4, merge), 0);
    }

    #[test]
    fn firing_starts_outgoing_constraints() {
        let mut s = Scenario::new();
        let start = s.add_sync(TimeSync::always());
        let mid = s.add_sync(TimeSync::always());
        let end = s.add_sync(TimeSync::new(Expression::not(Expression::True)));
        let first = s.add_constraint(
            Constraint::new(TimeValue::from_units(1), TimeValue::from_units(1)),
            start,
            mid,
        );
        let second = s.add_constraint(
            Constraint::new(TimeValue::ZERO, TimeValue::Infinite),
            mid,
            end,
        );
        let snapshot = ValueSnapshot::new();
        s.start();

        tick(&mut s, &snapshot, 1);
        assert_eq!(
            s.constraint(first).unwrap().status(),
            ConstraintStatus::Finished
        );
        assert_eq!(
            s.constraint(second).unwrap().status(),
            ConstraintStatus::Running
        );

        tick(&mut s, &snapshot, 4);
        assert_eq!(
            s.constraint(second).unwrap().date(),
            TimeValue::from_units(4)
        );
    }

    #[test]
    fn manual_trigger_fires_despite_false_expression() {
        let mut s = Scenario::new();
        let start = s.add_sync(TimeSync::always());
        let end = s.add_sync(TimeSync::new(Expression::atom(
            "dev:/go",
            Comparator::Equal,
            Value::Bool(true),
        )));
        let c = s.add_constraint(
            Constraint::new(TimeValue::ZERO, TimeValue::Infinite),
            start,
            end,
        );
        // Snapshot says "don't fire".
        let mut snapshot = ValueSnapshot::new();
        snapshot.set(Address::new("dev:/go"), Value::Bool(false));
        s.start();

        tick(&mut s, &snapshot, 1);
        assert_eq!(s.constraint(c).unwrap().status(), ConstraintStatus::Running);

        s.sync_mut(end).unwrap().request_trigger();
        let (_, frame) = tick(&mut s, &snapshot, 0);
        assert_eq!(fired_count(&frame, end), 1);
        assert_eq!(
            s.constraint(c).unwrap().status(),
            ConstraintStatus::Finished
        );
    }

    #[test]
    fn zero_delta_pass_still_evaluates_triggers() {
        let (mut s, c, _) = min_max_scenario();
        let snapshot = ValueSnapshot::new();
        s.start();

        // Zero tick: activation fires the root and starts the constraint,
        // but no time passes.
        tick(&mut s, &snapshot, 0);
        assert_eq!(s.constraint(c).unwrap().status(), ConstraintStatus::Running);
        assert_eq!(s.constraint(c).unwrap().date(), TimeValue::ZERO);
    }

    #[test]
    fn sync_fire_state_joins_the_working_set() {
        let mut s = Scenario::new();
        let mut fire = State::new();
        fire.push(Address::new("dev:/flag"), Value::Int(7));
        let start = s.add_sync(TimeSync::always().with_fire_state(fire));
        let end = s.add_sync(TimeSync::new(Expression::not(Expression::True)));
        s.add_constraint(
            Constraint::new(TimeValue::ZERO, TimeValue::Infinite),
            start,
            end,
        );
        let snapshot = ValueSnapshot::new();
        s.start();

        let (state, _) = tick(&mut s, &snapshot, 1);
        assert_eq!(state.get(&Address::new("dev:/flag")), Some(&Value::Int(7)));
    }

    #[test]
    fn removed_constraint_no_longer_blocks_its_sync() {
        let mut s = Scenario::new();
        let start = s.add_sync(TimeSync::always());
        let merge = s.add_sync(TimeSync::always());
        let _a = s.add_constraint(
            Constraint::new(TimeValue::from_units(1), TimeValue::from_units(10)),
            start,
            merge,
        );
        let b = s.add_constraint(
            Constraint::new(TimeValue::from_units(100), TimeValue::Infinite),
            start,
            merge,
        );
        let snapshot = ValueSnapshot::new();
        s.start();
        tick(&mut s, &snapshot, 1);

        // `b` holds the merge point back for 100 units; removing it
        // unblocks the sync on the next pass.
        s.remove_constraint(b);
        let (_, frame) = tick(&mut s, &snapshot, 0);
        assert_eq!(fired_count(&frame, merge), 1);
    }

    #[test]
    fn cleanup_resets_for_reactivation() {
        let (mut s, c, end) = min_max_scenario();
        let snapshot = ValueSnapshot::new();
        s.start();
        tick(&mut s, &snapshot, 3);
        s.stop();
        s.cleanup();
        s.cleanup();

        s.start();
        let (_, f) = tick(&mut s, &snapshot, 1);
        assert_eq!(s.constraint(c).unwrap().date(), TimeValue::from_units(1));
        assert_eq!(fired_count(&f, end), 0);
    }

    #[test]
    fn validate_rejects_rootless_graph() {
        let mut s = Scenario::new();
        let a = s.add_sync(TimeSync::always());
        let b = s.add_sync(TimeSync::always());
        s.add_constraint(Constraint::new(TimeValue::ZERO, TimeValue::Infinite), a, b);
        s.add_constraint(Constraint::new(TimeValue::ZERO, TimeValue::Infinite), b, a);
        assert!(s.validate().is_err());
    }
}
