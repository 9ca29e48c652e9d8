// src/document/scenario_def.rs

use crate::automation::CurvePoint;
use crate::expression::Expression;
use crate::time_value::TimeValue;
use crate::value::{Address, Value};

/// Declarative description of a time sync.
#[derive(Debug, Clone, Default)]
pub struct SyncDef {
    /// Trigger condition. `None` means the sync fires as soon as it is
    /// reached (the always-true default).
    pub expression: Option<Expression>,

    /// An inactive trigger compiles to always-true as well, whatever its
    /// expression says; the editor uses this to bypass a trigger without
    /// deleting it.
    pub active: bool,

    /// Instantaneous writes emitted when the sync fires.
    pub fire_writes: Vec<(Address, Value)>,
}

impl SyncDef {
    pub fn immediate() -> Self {
        Self {
            expression: None,
            active: true,
            fire_writes: Vec::new(),
        }
    }

    pub fn triggered(expression: Expression) -> Self {
        Self {
            expression: Some(expression),
            active: true,
            fire_writes: Vec::new(),
        }
    }

    pub fn with_write(mut self, address: Address, value: Value) -> Self {
        self.fire_writes.push((address, value));
        self
    }
}

/// Declarative description of a constraint between two syncs.
///
/// `start` and `end` index into the owning [`ScenarioDef`]'s sync list.
#[derive(Debug, Clone)]
pub struct ConstraintDef {
    pub start: usize,
    pub end: usize,
    pub min: TimeValue,
    pub max: TimeValue,
    pub processes: Vec<ProcessDef>,
}

/// The closed set of time-process kinds a constraint may own.
#[derive(Debug, Clone)]
pub enum ProcessDef {
    Automation {
        address: Address,
        points: Vec<CurvePoint>,
    },
    Scenario(ScenarioDef),
}

/// Declarative description of a whole scenario graph.
///
/// Compiled into a runtime [`crate::scenario::Scenario`] at play-start
/// (or spliced into a running one).
#[derive(Debug, Clone, Default)]
pub struct ScenarioDef {
    pub syncs: Vec<SyncDef>,
    pub constraints: Vec<ConstraintDef>,
}

impl ScenarioDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sync(&mut self, def: SyncDef) -> usize {
        self.syncs.push(def);
        self.syncs.len() - 1
    }

    pub fn add_constraint(
        &mut self,
        start: usize,
        end: usize,
        min: TimeValue,
        max: TimeValue,
    ) -> usize {
        self.constraints.push(ConstraintDef {
            start,
            end,
            min,
            max,
            processes: Vec::new(),
        });
        self.constraints.len() - 1
    }

    pub fn add_process(&mut self, constraint: usize, process: ProcessDef) {
        self.constraints[constraint].processes.push(process);
    }
}
