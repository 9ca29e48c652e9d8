// src/settings.rs
//
// Session-immutable execution configuration.
//
// Settings are resolved once, before playback starts, from persisted
// key/value pairs. Unknown policy names fall back to the documented
// defaults instead of failing; a session never refuses to start over a
// stale configuration key.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::clock::{BufferClock, Clock, FreeRunningClock, DEFAULT_GRANULARITY};
use crate::state::State;
use crate::time_value::TimeValue;

//
// ===============================
// MARK: Policy enumerations
// ===============================
//

/// Which clock strategy drives the session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ClockKind {
    /// Wall-clock driven, rate-scaled.
    FreeRunning,
    /// Driven by audio/data buffer consumption.
    #[default]
    Buffer,
}

/// How the per-tick pass is planned.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SchedulingPolicy {
    /// One statically ordered pass per tick.
    #[default]
    StaticTC,
    /// Reserved seam for a work-stealing pass; currently selects the
    /// static pass as well.
    Dynamic,
}

/// Visit order for running constraints and their end syncs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OrderingPolicy {
    /// Graph-registration order.
    #[default]
    CreationOrder,
    /// Breadth-first from the root syncs, parents before children.
    Topological,
}

/// How partial states collected in one pass combine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MergingPolicy {
    /// Latest value per address wins; later-ordered sources overwrite.
    #[default]
    Merge,
    /// Highest-priority (earliest-ordered) source wins; collisions from
    /// later sources are discarded.
    Override,
}

impl MergingPolicy {
    /// Fold `partial` into `acc` per this policy. Sources must be folded
    /// in walk order.
    pub fn fold(self, acc: &mut State, partial: State) {
        match self {
            MergingPolicy::Merge => acc.merge(partial),
            MergingPolicy::Override => acc.merge_override(partial),
        }
    }
}

/// Granularity of externally visible output.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CommitPolicy {
    /// One combined state flushed per tick.
    #[default]
    Merged,
    /// One state flushed per originating time-process.
    Granular,
}

/// When flushes reach the device layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TickPolicy {
    /// Defer until the end of the pass; one atomic batch per tick.
    #[default]
    Buffer,
    /// Write each state as soon as it is produced, trading atomicity for
    /// latency.
    Immediate,
}

/// The policy subset consulted while the tree is walked.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Policies {
    pub scheduling: SchedulingPolicy,
    pub ordering: OrderingPolicy,
    pub merging: MergingPolicy,
    pub commit: CommitPolicy,
    pub tick: TickPolicy,
}

//
// ===============================
// MARK: Settings
// ===============================
//

/// Immutable, read-only configuration for one execution session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub clock: ClockKind,
    pub scheduling: SchedulingPolicy,
    pub ordering: OrderingPolicy,
    pub merging: MergingPolicy,
    pub commit: CommitPolicy,
    pub tick: TickPolicy,

    /// Tick granularity in logical units (free-running clock period).
    pub rate: u64,

    /// Sample rate assumed by the buffer-driven clock.
    pub sample_rate: f64,

    /// Whether the scheduler may fan passes out across threads. Carried
    /// for forward compatibility; the walk is single-writer today.
    pub parallel: bool,

    pub logging: bool,

    pub bench: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            clock: ClockKind::default(),
            scheduling: SchedulingPolicy::default(),
            ordering: OrderingPolicy::default(),
            merging: MergingPolicy::default(),
            commit: CommitPolicy::default(),
            tick: TickPolicy::default(),
            rate: DEFAULT_GRANULARITY,
            sample_rate: 48_000.0,
            parallel: true,
            logging: true,
            bench: false,
        }
    }
}

impl Settings {
    /// Resolve settings from persisted key/value pairs.
    ///
    /// Recognized keys mirror the persisted names: `clock`, `scheduling`,
    /// `ordering`, `merging`, `commit`, `tick`, `rate`, `sample_rate`,
    /// `parallel`, `logging`, `bench`. Anything unknown or unparsable
    /// keeps its default.
    pub fn resolve(pairs: &HashMap<String, String>) -> Settings {
        let mut settings = Settings::default();

        for (key, raw) in pairs {
            match key.as_str() {
                "clock" => {
                    settings.clock = match raw.as_str() {
                        "FreeRunning" => ClockKind::FreeRunning,
                        "Buffer" => ClockKind::Buffer,
                        other => fallback("clock", other, ClockKind::default()),
                    }
                }
                "scheduling" => {
                    settings.scheduling = match raw.as_str() {
                        "StaticTC" => SchedulingPolicy::StaticTC,
                        "Dynamic" => SchedulingPolicy::Dynamic,
                        other => fallback("scheduling", other, SchedulingPolicy::default()),
                    }
                }
                "ordering" => {
                    settings.ordering = match raw.as_str() {
                        "CreationOrder" => OrderingPolicy::CreationOrder,
                        "Topological" => OrderingPolicy::Topological,
                        other => fallback("ordering", other, OrderingPolicy::default()),
                    }
                }
                "merging" => {
                    settings.merging = match raw.as_str() {
                        "Merge" => MergingPolicy::Merge,
                        "Override" => MergingPolicy::Override,
                        other => fallback("merging", other, MergingPolicy::default()),
                    }
                }
                "commit" => {
                    settings.commit = match raw.as_str() {
                        "Merged" => CommitPolicy::Merged,
                        "Granular" => CommitPolicy::Granular,
                        other => fallback("commit", other, CommitPolicy::default()),
                    }
                }
                "tick" => {
                    settings.tick = match raw.as_str() {
                        "Buffer" => TickPolicy::Buffer,
                        "Immediate" => TickPolicy::Immediate,
                        other => fallback("tick", other, TickPolicy::default()),
                    }
                }
                "rate" => {
                    settings.rate = raw
                        .parse()
                        .unwrap_or_else(|_| fallback("rate", raw, DEFAULT_GRANULARITY));
                }
                "sample_rate" => {
                    settings.sample_rate = raw
                        .parse()
                        .unwrap_or_else(|_| fallback("sample_rate", raw, 48_000.0));
                }
                "parallel" => settings.parallel = raw == "true",
                "logging" => settings.logging = raw == "true",
                "bench" => settings.bench = raw == "true",
                _ => debug!("ignoring unknown settings key {key:?}"),
            }
        }

        settings
    }

    /// Resolve from a persisted JSON document. Malformed documents yield
    /// the defaults.
    pub fn from_json(raw: &str) -> Settings {
        serde_json::from_str(raw).unwrap_or_else(|e| {
            debug!("settings JSON did not parse ({e}), using defaults");
            Settings::default()
        })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// The policy subset threaded through the tick walk.
    pub fn policies(&self) -> Policies {
        Policies {
            scheduling: self.scheduling,
            ordering: self.ordering,
            merging: self.merging,
            commit: self.commit,
            tick: self.tick,
        }
    }

    /// Instantiate the configured clock strategy.
    pub fn make_clock(&self) -> Box<dyn Clock> {
        match self.clock {
            ClockKind::FreeRunning => Box::new(FreeRunningClock::with_rate(1.0, self.rate)),
            ClockKind::Buffer => Box::new(BufferClock::new(self.sample_rate)),
        }
    }

    /// External → logical conversion matching the configured clock, for
    /// the scrub/seek UI.
    pub fn forward(&self, external: f64) -> TimeValue {
        match self.clock {
            ClockKind::FreeRunning => TimeValue::from_units(external.max(0.0) as u64),
            ClockKind::Buffer => {
                TimeValue::from_units((external * 1_000.0 / self.sample_rate).max(0.0) as u64)
            }
        }
    }

    /// Logical → external conversion matching the configured clock.
    pub fn reverse(&self, logical: TimeValue) -> f64 {
        let Some(units) = logical.units() else {
            return f64::INFINITY;
        };
        match self.clock {
            ClockKind::FreeRunning => units as f64,
            ClockKind::Buffer => units as f64 * self.sample_rate / 1_000.0,
        }
    }
}

fn fallback<T: std::fmt::Debug>(key: &str, raw: &str, default: T) -> T {
    debug!("unknown {key} value {raw:?}, falling back to {default:?}");
    default
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.clock, ClockKind::Buffer);
        assert_eq!(s.scheduling, SchedulingPolicy::StaticTC);
        assert_eq!(s.ordering, OrderingPolicy::CreationOrder);
        assert_eq!(s.merging, MergingPolicy::Merge);
        assert_eq!(s.commit, CommitPolicy::Merged);
        assert_eq!(s.tick, TickPolicy::Buffer);
        assert_eq!(s.rate, 50);
        assert!(s.parallel);
        assert!(s.logging);
        assert!(!s.bench);
    }

    #[test]
    fn unknown_policy_names_fall_back() {
        let pairs: HashMap<String, String> = [
            ("ordering".to_owned(), "Chaotic".to_owned()),
            ("merging".to_owned(), "Override".to_owned()),
            ("rate".to_owned(), "not-a-number".to_owned()),
        ]
        .into();

        let s = Settings::resolve(&pairs);
        assert_eq!(s.ordering, OrderingPolicy::CreationOrder);
        assert_eq!(s.merging, MergingPolicy::Override);
        assert_eq!(s.rate, 50);
    }

    #[test]
    fn json_round_trip() {
        let mut s = Settings::default();
        s.commit = CommitPolicy::Granular;
        s.rate = 10;
        let restored = Settings::from_json(&s.to_json());
        assert_eq!(restored, s);
    }

    #[test]
    fn malformed_json_yields_defaults() {
        assert_eq!(Settings::from_json("{nope"), Settings::default());
    }

    #[test]
    fn conversions_are_inverse() {
        let s = Settings::default();
        let logical = s.forward(4_800.0);
        assert_eq!(logical, TimeValue::from_units(100));
        assert_eq!(s.reverse(logical), 4_800.0);
    }
}
