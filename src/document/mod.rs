// src/document/mod.rs
//
// Declarative, editor-facing layer: documents describe graphs, commands
// mutate the running session. Nothing here executes anything.

mod command;
mod scenario_def;

pub use command::Command;
pub use scenario_def::{ConstraintDef, ProcessDef, ScenarioDef, SyncDef};
