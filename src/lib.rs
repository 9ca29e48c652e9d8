// src/lib.rs
//
// Execution scheduling engine for interactive time-constraint scenarios.

mod automation;
mod bridge;
mod clock;
mod compile;
mod constraint;
mod document;
mod error;
mod events;
mod executor;
mod expression;
mod process;
mod scenario;
mod settings;
mod sink;
mod state;
mod time_sync;
mod time_value;
mod value;

// Re-export key types for consumers
pub use automation::{Automation, CurvePoint};
pub use bridge::{create_bridge, ExecutorHandle, Readback, SessionHandle};
pub use clock::{BufferClock, Clock, ClockStatus, FreeRunningClock};
pub use compile::{compile, splice};
pub use constraint::{Constraint, ConstraintStatus};
pub use document::{Command, ConstraintDef, ProcessDef, ScenarioDef, SyncDef};
pub use error::{CompileError, Result};
pub use events::ExecutionEvent;
pub use executor::Executor;
pub use expression::{Comparator, ExprFault, Expression};
pub use process::{ProcessContext, TickFrame, TimeProcess};
pub use scenario::{ConstraintId, Scenario, SyncId};
pub use settings::{
    ClockKind, CommitPolicy, MergingPolicy, OrderingPolicy, Policies, SchedulingPolicy, Settings,
    TickPolicy,
};
pub use sink::{MemorySink, NullSink, SinkFault, StateSink};
pub use state::{State, ValueSnapshot};
pub use time_sync::TimeSync;
pub use time_value::TimeValue;
pub use value::{Address, Value};
