// src/state.rs
//
// States are the engine's only output: ordered sets of parameter writes
// produced during one tick, destined for the external device layer.

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::value::{Address, Value};

/// An ordered collection of `(address, value)` writes.
///
/// Insertion order is preserved; writing an address twice keeps its original
/// position and replaces the value. That gives "later source wins" semantics
/// without losing the ordering the device layer sees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    writes: IndexMap<Address, Value>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Add a write, replacing any previous value for the same address.
    pub fn push(&mut self, address: Address, value: Value) {
        self.writes.insert(address, value);
    }

    #[inline]
    pub fn get(&self, address: &Address) -> Option<&Value> {
        self.writes.get(address)
    }

    /// Fold `other` into `self`, later values winning per address.
    pub fn merge(&mut self, other: State) {
        for (address, value) in other.writes {
            self.writes.insert(address, value);
        }
    }

    /// Fold `other` into `self`, keeping the value already present on
    /// collision. The higher-priority source must be folded first.
    pub fn merge_override(&mut self, other: State) {
        for (address, value) in other.writes {
            self.writes.entry(address).or_insert(value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Value)> {
        self.writes.iter()
    }

    pub fn into_writes(self) -> impl Iterator<Item = (Address, Value)> {
        self.writes.into_iter()
    }
}

impl FromIterator<(Address, Value)> for State {
    fn from_iter<T: IntoIterator<Item = (Address, Value)>>(iter: T) -> Self {
        State {
            writes: iter.into_iter().collect(),
        }
    }
}

/// The live parameter values trigger expressions read.
///
/// Immutable for the duration of one tick pass; only the executor produces
/// the next snapshot, after flush.
#[derive(Debug, Clone, Default)]
pub struct ValueSnapshot {
    values: HashMap<Address, Value>,
}

impl ValueSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, address: &Address) -> Option<&Value> {
        self.values.get(address)
    }

    pub fn set(&mut self, address: Address, value: Value) {
        self.values.insert(address, value);
    }

    /// Fold a committed state into the snapshot.
    pub fn absorb(&mut self, state: &State) {
        for (address, value) in state.iter() {
            self.values.insert(address.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(s)
    }

    #[test]
    fn merge_later_value_wins() {
        let mut earlier = State::new();
        earlier.push(addr("a:/x"), Value::Int(1));

        let mut later = State::new();
        later.push(addr("a:/x"), Value::Int(2));

        earlier.merge(later);
        assert_eq!(earlier.get(&addr("a:/x")), Some(&Value::Int(2)));
        assert_eq!(earlier.len(), 1);
    }

    #[test]
    fn merge_preserves_first_position() {
        let mut state = State::new();
        state.push(addr("a:/x"), Value::Int(1));
        state.push(addr("a:/y"), Value::Int(2));

        let mut update = State::new();
        update.push(addr("a:/x"), Value::Int(3));
        state.merge(update);

        let order: Vec<_> = state.iter().map(|(a, _)| a.as_str().to_owned()).collect();
        assert_eq!(order, vec!["a:/x", "a:/y"]);
    }

    #[test]
    fn override_discards_collisions() {
        let mut high = State::new();
        high.push(addr("a:/x"), Value::Int(1));

        let mut low = State::new();
        low.push(addr("a:/x"), Value::Int(2));
        low.push(addr("a:/y"), Value::Int(3));

        high.merge_override(low);
        assert_eq!(high.get(&addr("a:/x")), Some(&Value::Int(1)));
        assert_eq!(high.get(&addr("a:/y")), Some(&Value::Int(3)));
    }

    #[test]
    fn snapshot_absorbs_committed_writes() {
        let mut snapshot = ValueSnapshot::new();
        let mut state = State::new();
        state.push(addr("a:/x"), Value::Float(0.5));
        snapshot.absorb(&state);
        assert_eq!(snapshot.get(&addr("a:/x")), Some(&Value::Float(0.5)));
    }
}
