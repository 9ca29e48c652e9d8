// src/time_sync.rs
//
// A time sync joins the endpoints of one or more constraints and decides,
// once all of them are ready, whether the graph moves past it.

use log::warn;

use crate::expression::Expression;
use crate::state::{State, ValueSnapshot};
use crate::value::Address;

/// A synchronization/trigger point in the scenario graph.
///
/// Syncs:
/// - own at most one trigger expression (`True` when untriggered)
/// - fire at most once per reachable activation
/// - are referenced by constraint edges, never owned by them
pub struct TimeSync {
    expression: Expression,

    /// Manual firing requested by the editor. Single-shot: consumed by the
    /// next `evaluate` regardless of the expression.
    trigger_request: bool,

    /// Whether live value-change re-evaluation is enabled.
    observing: bool,

    /// Addresses currently subscribed for change notifications.
    /// Present exactly while `observing` and the expression reads anything.
    subscription: Option<Vec<Address>>,

    /// Instantaneous writes folded into the working set when the sync fires.
    fire_state: State,
}

impl TimeSync {
    pub fn new(expression: Expression) -> Self {
        Self {
            expression,
            trigger_request: false,
            observing: false,
            subscription: None,
            fire_state: State::new(),
        }
    }

    /// Sync with the default always-true trigger.
    pub fn always() -> Self {
        Self::new(Expression::True)
    }

    pub fn with_fire_state(mut self, state: State) -> Self {
        self.fire_state = state;
        self
    }

    #[inline]
    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    #[inline]
    pub fn fire_state(&self) -> &State {
        &self.fire_state
    }

    /// Replace the trigger predicate.
    ///
    /// If the sync is currently observing, the swap re-subscribes
    /// atomically: unsubscribe the old expression, install, resubscribe.
    /// No evaluation can observe a half-swapped sync.
    pub fn set_expression(&mut self, expression: Expression) {
        let was_observing = self.observing;
        if was_observing {
            self.observe(false);
        }

        self.expression = expression;

        if was_observing {
            self.observe(true);
        }
    }

    /// Enable or disable live re-evaluation on value changes. Idempotent.
    ///
    /// Observation is enabled only while the sync is pending as a
    /// tick-boundary candidate.
    pub fn observe(&mut self, enable: bool) {
        if enable == self.observing {
            return;
        }
        self.observing = enable;

        if enable {
            let mut addresses = Vec::new();
            self.expression.addresses(&mut addresses);
            self.subscription = Some(addresses);
        } else {
            self.subscription = None;
        }
    }

    #[inline]
    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Number of live subscriptions held by this sync.
    pub fn subscription_count(&self) -> usize {
        self.subscription.iter().count()
    }

    /// Addresses covered by the current subscription.
    pub fn subscribed_addresses(&self) -> &[Address] {
        self.subscription.as_deref().unwrap_or(&[])
    }

    /// Request a manual fire at the next evaluation.
    pub fn request_trigger(&mut self) {
        self.trigger_request = true;
    }

    #[inline]
    pub fn trigger_requested(&self) -> bool {
        self.trigger_request
    }

    /// Should the sync fire now?
    ///
    /// A pending manual request wins and is consumed immediately; otherwise
    /// the expression decides. An expression fault degrades to `false` for
    /// this evaluation and is logged, never propagated.
    pub fn evaluate(&mut self, snapshot: &ValueSnapshot) -> bool {
        if self.trigger_request {
            self.trigger_request = false;
            return true;
        }

        match self.expression.evaluate(snapshot) {
            Ok(fire) => fire,
            Err(fault) => {
                warn!("trigger expression fault, treating as false: {fault}");
                false
            }
        }
    }

    /// Return to the pristine state. Idempotent, callable before start.
    pub fn cleanup(&mut self) {
        self.trigger_request = false;
        self.observe(false);
    }
}
