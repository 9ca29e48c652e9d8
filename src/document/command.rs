// src/document/command.rs
//
// Commands from the editor to the execution thread.
//
// Commands are the ONLY way the editor can touch a running graph. They
// are queued over the bridge and applied strictly between ticks, so a
// pass always observes a consistent graph snapshot.

use crate::expression::Expression;
use crate::scenario::{ConstraintId, SyncId};
use crate::time_value::TimeValue;
use crate::value::{Address, Value};

use super::ScenarioDef;

/// A deferred mutation or transport request.
#[derive(Debug, Clone)]
pub enum Command {
    // ═══════════════════════════════════════════
    // Transport
    // ═══════════════════════════════════════════
    /// Start playback.
    Play,

    /// Stop playback and clean the graph up.
    Stop,

    Pause,

    Resume,

    /// Jump to a logical date, discarding in-flight partial states.
    Seek { date: TimeValue },

    // ═══════════════════════════════════════════
    // Triggers and expressions
    // ═══════════════════════════════════════════
    /// Manually fire a sync at its next evaluation (single-shot).
    RequestTrigger { sync: SyncId },

    /// Replace a sync's trigger expression. Re-subscription is handled
    /// atomically on the execution thread.
    ReplaceExpression { sync: SyncId, expression: Expression },

    // ═══════════════════════════════════════════
    // Structure edits
    // ═══════════════════════════════════════════
    /// Change a constraint's duration bounds.
    SetBounds {
        constraint: ConstraintId,
        min: TimeValue,
        max: TimeValue,
    },

    /// Splice a compiled sub-graph into the running scenario. Its root
    /// syncs become firing candidates on the next pass.
    InsertGraph { def: ScenarioDef },

    /// Remove one constraint from execution.
    RemoveConstraint { constraint: ConstraintId },

    /// Remove a detached sync.
    RemoveSync { sync: SyncId },

    // ═══════════════════════════════════════════
    // Device feedback
    // ═══════════════════════════════════════════
    /// An external parameter changed; update the value snapshot used by
    /// trigger expressions from the next pass on.
    DeviceValue { address: Address, value: Value },
}
