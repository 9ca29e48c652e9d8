// src/automation.rs

use crate::process::{ProcessContext, TickFrame, TimeProcess};
use crate::state::State;
use crate::time_value::TimeValue;
use crate::value::{Address, Value};

/// One breakpoint of an automation curve.
///
/// `position` is normalized against the owning constraint's max duration,
/// so curves survive duration edits without rescaling.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CurvePoint {
    pub position: f64,
    pub value: f64,
}

/// Piecewise-linear parameter automation.
///
/// Every advance produces one absolute write of the interpolated value to
/// the target address. With an infinite parent duration the curve stays on
/// its first breakpoint.
pub struct Automation {
    address: Address,
    points: Vec<CurvePoint>,
    running: bool,
}

impl Automation {
    /// Points are sorted by position on construction; an empty curve is
    /// replaced by a single zero point.
    pub fn new(address: Address, mut points: Vec<CurvePoint>) -> Self {
        if points.is_empty() {
            points.push(CurvePoint {
                position: 0.0,
                value: 0.0,
            });
        }
        points.sort_by(|a, b| a.position.total_cmp(&b.position));
        Self {
            address,
            points,
            running: false,
        }
    }

    /// A flat curve holding one value.
    pub fn constant(address: Address, value: f64) -> Self {
        Self::new(
            address,
            vec![CurvePoint {
                position: 0.0,
                value,
            }],
        )
    }

    /// A straight ramp from `from` to `to` over the whole span.
    pub fn ramp(address: Address, from: f64, to: f64) -> Self {
        Self::new(
            address,
            vec![
                CurvePoint {
                    position: 0.0,
                    value: from,
                },
                CurvePoint {
                    position: 1.0,
                    value: to,
                },
            ],
        )
    }

    #[inline]
    pub fn address(&self) -> &Address {
        &self.address
    }

    fn value_at(&self, position: f64) -> f64 {
        let first = self.points.first().expect("curve never empty");
        if position <= first.position {
            return first.value;
        }

        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if position <= b.position {
                let span = b.position - a.position;
                if span <= f64::EPSILON {
                    return b.value;
                }
                let t = (position - a.position) / span;
                return a.value + (b.value - a.value) * t;
            }
        }

        self.points.last().expect("curve never empty").value
    }

    fn state_at(&self, date: TimeValue, duration: TimeValue) -> State {
        let mut state = State::new();
        state.push(
            self.address.clone(),
            Value::Float(self.value_at(date.ratio_of(duration))),
        );
        state
    }
}

impl TimeProcess for Automation {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn advance(
        &mut self,
        _delta: TimeValue,
        ctx: &ProcessContext<'_>,
        frame: &mut TickFrame,
    ) -> State {
        if !self.running {
            return State::new();
        }
        let state = self.state_at(ctx.date, ctx.duration);
        // Leaf emitters record their own partial: the granular commit
        // policy flushes one state per originating process.
        frame.partials.push(state.clone());
        state
    }

    fn offset(&mut self, date: TimeValue, ctx: &ProcessContext<'_>) -> State {
        self.state_at(date, ctx.duration)
    }

    fn cleanup(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Policies;
    use crate::state::ValueSnapshot;

    fn float_at(auto: &mut Automation, date: u64, duration: u64) -> f64 {
        let snapshot = ValueSnapshot::new();
        let policies = Policies::default();
        let mut frame = TickFrame::default();
        let ctx = ProcessContext {
            date: TimeValue::from_units(date),
            duration: TimeValue::from_units(duration),
            snapshot: &snapshot,
            policies: &policies,
        };
        let st = auto.advance(TimeValue::ZERO, &ctx, &mut frame);
        match st.get(auto.address()) {
            Some(Value::Float(v)) => *v,
            other => panic!("expected float write, got {other:?}"),
        }
    }

    #[test]
    fn ramp_hits_endpoints_and_midpoint() {
        let mut auto = Automation::ramp(Address::new("dev:/gain"), 0.0, 1.0);
        auto.start();
        assert_eq!(float_at(&mut auto, 0, 100), 0.0);
        assert_eq!(float_at(&mut auto, 50, 100), 0.5);
        assert_eq!(float_at(&mut auto, 100, 100), 1.0);
    }

    #[test]
    fn date_past_duration_saturates_at_last_point() {
        let mut auto = Automation::ramp(Address::new("dev:/gain"), 0.0, 2.0);
        auto.start();
        assert_eq!(float_at(&mut auto, 400, 100), 2.0);
    }

    #[test]
    fn infinite_duration_stays_on_first_point() {
        let mut auto = Automation::ramp(Address::new("dev:/gain"), 0.25, 1.0);
        auto.start();
        let snapshot = ValueSnapshot::new();
        let policies = Policies::default();
        let mut frame = TickFrame::default();
        let ctx = ProcessContext {
            date: TimeValue::from_units(10_000),
            duration: TimeValue::Infinite,
            snapshot: &snapshot,
            policies: &policies,
        };
        let st = auto.advance(TimeValue::ZERO, &ctx, &mut frame);
        assert_eq!(
            st.get(&Address::new("dev:/gain")),
            Some(&Value::Float(0.25))
        );
    }

    #[test]
    fn stopped_automation_is_silent() {
        let mut auto = Automation::constant(Address::new("dev:/gain"), 1.0);
        let snapshot = ValueSnapshot::new();
        let policies = Policies::default();
        let mut frame = TickFrame::default();
        let ctx = ProcessContext {
            date: TimeValue::ZERO,
            duration: TimeValue::from_units(10),
            snapshot: &snapshot,
            policies: &policies,
        };
        let st = auto.advance(TimeValue::ZERO, &ctx, &mut frame);
        assert!(st.is_empty());
    }

    #[test]
    fn unsorted_points_are_ordered() {
        let mut auto = Automation::new(
            Address::new("dev:/x"),
            vec![
                CurvePoint {
                    position: 1.0,
                    value: 10.0,
                },
                CurvePoint {
                    position: 0.0,
                    value: 0.0,
                },
            ],
        );
        auto.start();
        assert_eq!(float_at(&mut auto, 50, 100), 5.0);
    }
}
