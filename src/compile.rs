// src/compile.rs
//
// Compiles ScenarioDef (declarative) into Scenario (runtime).
//
// This is the bridge between the editor's document representation and
// the executable constraint graph. Structural faults are caught here,
// before playback; nothing this module rejects can surface mid-tick.

use crate::automation::Automation;
use crate::constraint::Constraint;
use crate::document::{ProcessDef, ScenarioDef};
use crate::error::{CompileError, Result};
use crate::expression::Expression;
use crate::scenario::{Scenario, SyncId};
use crate::state::State;
use crate::time_sync::TimeSync;

/// Compile a document into a fresh runtime scenario.
pub fn compile(def: &ScenarioDef) -> Result<Scenario> {
    let mut scenario = Scenario::new();
    splice(&mut scenario, def)?;
    scenario.validate()?;
    Ok(scenario)
}

/// Splice a document's nodes into an existing scenario.
///
/// Used both by [`compile`] and by the live insert-sub-graph command;
/// the spliced nodes form an independent island whose roots become
/// firing candidates on the next pass. Returns the runtime ids of the
/// new syncs, in definition order.
pub fn splice(scenario: &mut Scenario, def: &ScenarioDef) -> Result<Vec<SyncId>> {
    // Validate the definition up front so a bad document leaves the
    // running graph untouched.
    for (index, c) in def.constraints.iter().enumerate() {
        if c.start >= def.syncs.len() {
            return Err(CompileError::UnknownSync {
                index,
                sync: c.start,
            });
        }
        if c.end >= def.syncs.len() {
            return Err(CompileError::UnknownSync { index, sync: c.end });
        }
        if c.min > c.max {
            return Err(CompileError::InvertedBounds {
                index,
                min: c.min,
                max: c.max,
            });
        }
    }

    // Definition index -> runtime id.
    let mut sync_ids = Vec::with_capacity(def.syncs.len());
    for sync_def in &def.syncs {
        // An inactive or absent trigger compiles to always-true, so a
        // bypassed trigger never stalls playback.
        let expression = match (&sync_def.expression, sync_def.active) {
            (Some(e), true) => e.clone(),
            _ => Expression::True,
        };

        let mut sync = TimeSync::new(expression);
        if !sync_def.fire_writes.is_empty() {
            let state: State = sync_def.fire_writes.iter().cloned().collect();
            sync = sync.with_fire_state(state);
        }
        sync_ids.push(scenario.add_sync(sync));
    }

    for c in &def.constraints {
        let mut constraint = Constraint::new(c.min, c.max);
        for process in &c.processes {
            constraint.add_process(build_process(process)?);
        }
        scenario.add_constraint(constraint, sync_ids[c.start], sync_ids[c.end]);
    }

    Ok(sync_ids)
}

fn build_process(def: &ProcessDef) -> Result<Box<dyn crate::process::TimeProcess>> {
    match def {
        ProcessDef::Automation { address, points } => {
            Ok(Box::new(Automation::new(address.clone(), points.clone())))
        }
        ProcessDef::Scenario(inner) => {
            let mut scenario = Scenario::new();
            splice(&mut scenario, inner)?;
            scenario.validate()?;
            Ok(Box::new(scenario))
        }
    }
}
