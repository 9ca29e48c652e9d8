// src/events.rs

use crate::scenario::{ConstraintId, SyncId};
use crate::time_value::TimeValue;

/// Advisory notifications emitted towards the editor.
///
/// These events:
/// - animate the timeline cursor and sync indicators
/// - may be dropped or ignored without affecting execution correctness
/// - are produced strictly in pass order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionEvent {
    PlaybackStarted,
    PlaybackStopped,
    PlaybackPaused,
    PlaybackResumed,

    /// The session jumped to a new logical date.
    Seeked { date: TimeValue },

    /// The root constraint's date moved during a tick.
    RootDateChanged { date: TimeValue },

    /// A scenario constraint's date moved during a tick.
    DateChanged {
        constraint: ConstraintId,
        date: TimeValue,
    },

    /// A time sync fired, ending and starting its attached constraints.
    SyncFired { sync: SyncId },

    /// The device sink reported a transport failure and was detached.
    SinkDisconnected,
}
