// src/executor.rs
//
// Execution-side session: owns the compiled graph, the clock and the
// policies, and turns external ticks into committed states.
//
// This type runs exclusively on the execution thread. The editor reaches
// it through the bridge's command queue; commands are applied strictly
// between ticks, never inside a pass.

use log::{debug, warn};

use crate::clock::Clock;
use crate::compile;
use crate::document::{Command, ScenarioDef};
use crate::error::Result;
use crate::events::ExecutionEvent;
use crate::process::{ProcessContext, TickFrame, TimeProcess};
use crate::scenario::Scenario;
use crate::settings::{CommitPolicy, Policies, Settings, TickPolicy};
use crate::sink::StateSink;
use crate::state::{State, ValueSnapshot};
use crate::time_value::TimeValue;

/// One execution session over a compiled scenario graph.
pub struct Executor {
    settings: Settings,
    policies: Policies,
    clock: Box<dyn Clock>,

    /// The root scenario, advanced under an unbounded time base.
    scenario: Scenario,
    root_date: TimeValue,

    /// Live parameter values, immutable for the duration of one pass.
    snapshot: ValueSnapshot,

    /// Device layer, if still connected.
    sink: Option<Box<dyn StateSink>>,

    frame: TickFrame,
    queued_events: Vec<ExecutionEvent>,
    playing: bool,
}

impl Executor {
    /// Compile a document and build a session around it.
    pub fn new(def: &ScenarioDef, settings: Settings, sink: Box<dyn StateSink>) -> Result<Self> {
        let scenario = compile::compile(def)?;
        Ok(Self::with_scenario(scenario, settings, sink))
    }

    pub fn with_scenario(
        scenario: Scenario,
        settings: Settings,
        sink: Box<dyn StateSink>,
    ) -> Self {
        let policies = settings.policies();
        let clock = settings.make_clock();
        Self {
            settings,
            policies,
            clock,
            scenario,
            root_date: TimeValue::ZERO,
            snapshot: ValueSnapshot::new(),
            sink: Some(sink),
            frame: TickFrame::default(),
            queued_events: Vec::new(),
            playing: false,
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[inline]
    pub fn date(&self) -> TimeValue {
        self.root_date
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    #[inline]
    pub fn scenario_mut(&mut self) -> &mut Scenario {
        &mut self.scenario
    }

    #[inline]
    pub fn snapshot(&self) -> &ValueSnapshot {
        &self.snapshot
    }

    //
    // ───────────────────────────────────────────────────────────────
    // Transport
    // ───────────────────────────────────────────────────────────────
    //

    /// Validate the graph and start playback.
    ///
    /// Structural faults are the one error class surfaced to the user:
    /// "could not start execution", with the cause.
    pub fn play(&mut self) -> Result<()> {
        if self.playing {
            return Ok(());
        }
        self.scenario.validate()?;
        self.root_date = TimeValue::ZERO;
        self.clock.start();
        self.scenario.start();
        self.playing = true;
        self.queued_events.push(ExecutionEvent::PlaybackStarted);
        Ok(())
    }

    /// Stop playback and return every node to its pristine state.
    pub fn stop(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
        self.scenario.stop();
        self.scenario.cleanup();
        self.clock.stop();
        self.root_date = TimeValue::ZERO;
        self.frame.clear();
        self.queued_events.push(ExecutionEvent::PlaybackStopped);
    }

    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.clock.pause();
        self.scenario.pause();
        self.queued_events.push(ExecutionEvent::PlaybackPaused);
    }

    pub fn resume(&mut self) {
        if !self.playing {
            return;
        }
        self.clock.resume();
        self.scenario.resume();
        self.queued_events.push(ExecutionEvent::PlaybackResumed);
    }

    /// Jump to a logical date. In-flight partial states are discarded;
    /// the post-seek state is re-derived through the offset path and
    /// flushed, so the device tree lands on the scrubbed position.
    pub fn seek(&mut self, date: TimeValue) {
        self.clock.seek(date);
        self.root_date = date;
        self.frame.clear();

        if self.playing {
            let ctx = ProcessContext {
                date: self.root_date,
                duration: TimeValue::Infinite,
                snapshot: &self.snapshot,
                policies: &self.policies,
            };
            let state = self.scenario.offset(date, &ctx);
            self.flush(vec![state]);
        }
        self.queued_events.push(ExecutionEvent::Seeked { date });
    }

    //
    // ───────────────────────────────────────────────────────────────
    // Deferred commands
    // ───────────────────────────────────────────────────────────────
    //

    /// Apply one deferred editor request. Called between ticks only.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Play => {
                if let Err(e) = self.play() {
                    warn!("could not start execution: {e}");
                }
            }
            Command::Stop => self.stop(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Seek { date } => self.seek(date),

            Command::RequestTrigger { sync } => match self.scenario.sync_mut(sync) {
                Some(s) => s.request_trigger(),
                None => warn!("trigger request for unknown sync {sync:?}"),
            },
            Command::ReplaceExpression { sync, expression } => {
                match self.scenario.sync_mut(sync) {
                    Some(s) => s.set_expression(expression),
                    None => warn!("expression replacement for unknown sync {sync:?}"),
                }
            }

            Command::SetBounds {
                constraint,
                min,
                max,
            } => match self.scenario.constraint_mut(constraint) {
                Some(c) => c.set_bounds(min, max),
                None => warn!("bounds edit for unknown constraint {constraint:?}"),
            },
            Command::InsertGraph { def } => {
                if let Err(e) = compile::splice(&mut self.scenario, &def) {
                    warn!("rejected sub-graph insertion: {e}");
                }
            }
            Command::RemoveConstraint { constraint } => {
                self.scenario.remove_constraint(constraint);
            }
            Command::RemoveSync { sync } => self.scenario.remove_sync(sync),

            Command::DeviceValue { address, value } => {
                self.snapshot.set(address, value);
            }
        }
    }

    //
    // ───────────────────────────────────────────────────────────────
    // The tick pass
    // ───────────────────────────────────────────────────────────────
    //

    /// Run one scheduler pass.
    ///
    /// `external_delta` is in the configured clock's external unit
    /// (milliseconds or frames). Returns the advisory events produced,
    /// in pass order. A zero delta still evaluates triggers.
    pub fn tick(&mut self, external_delta: f64) -> Vec<ExecutionEvent> {
        let delta = self.clock.tick(external_delta);

        if self.playing {
            self.frame.clear();
            self.root_date += delta;

            let ctx = ProcessContext {
                date: self.root_date,
                duration: TimeValue::Infinite,
                snapshot: &self.snapshot,
                policies: &self.policies,
            };
            let merged = self.scenario.advance(delta, &ctx, &mut self.frame);

            if !delta.is_zero() {
                self.queued_events.push(ExecutionEvent::RootDateChanged {
                    date: self.root_date,
                });
            }

            let flushed = match self.policies.commit {
                CommitPolicy::Merged => {
                    if merged.is_empty() {
                        Vec::new()
                    } else {
                        vec![merged]
                    }
                }
                CommitPolicy::Granular => std::mem::take(&mut self.frame.partials),
            };
            self.flush(flushed);
        }

        let mut events = std::mem::take(&mut self.queued_events);
        events.append(&mut self.frame.events);
        events
    }

    /// Push committed states out to the device layer and fold them into
    /// the next snapshot.
    ///
    /// A sink fault detaches the sink and keeps the session alive; the
    /// snapshot still absorbs the writes so triggers see the values the
    /// graph produced.
    fn flush(&mut self, states: Vec<State>) {
        if states.iter().all(|s| s.is_empty()) {
            return;
        }

        let mut fault = false;
        if let Some(sink) = self.sink.as_mut() {
            'out: for state in &states {
                for (address, value) in state.iter() {
                    if sink.write(address, value).is_err() {
                        fault = true;
                        break 'out;
                    }
                }
                // Immediate mode commits after every state; buffered mode
                // batches the whole pass into one atomic commit below.
                if self.policies.tick == TickPolicy::Immediate && sink.commit().is_err() {
                    fault = true;
                    break;
                }
            }
            if !fault && self.policies.tick == TickPolicy::Buffer && sink.commit().is_err() {
                fault = true;
            }
        }

        if fault {
            warn!("device sink disconnected, detaching");
            self.sink = None;
            self.queued_events.push(ExecutionEvent::SinkDisconnected);
        }

        for state in &states {
            self.snapshot.absorb(state);
        }
        debug!(
            "flushed {} state(s) at date {}",
            states.len(),
            self.root_date
        );
    }
}
