// src/sink.rs
//
// Outbound boundary towards the device/parameter layer. The engine only
// ever emits "set address A to value V"; transports and wire formats
// live entirely behind this trait.

use std::sync::{Arc, Mutex};

use crate::value::{Address, Value};

/// A transport failure reported by the device layer.
///
/// Disconnection tears down the affected sink only; the scheduling
/// session keeps running without it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("device sink disconnected: {reason}")]
pub struct SinkFault {
    pub reason: String,
}

pub type SinkResult = std::result::Result<(), SinkFault>;

/// Destination for committed states.
///
/// Writes are fire-and-forget: the scheduler never waits for an
/// acknowledgement. `commit` marks an atomicity boundary; a sink that
/// batches writes sends everything since the previous `commit`.
pub trait StateSink: Send {
    fn write(&mut self, address: &Address, value: &Value) -> SinkResult;

    fn commit(&mut self) -> SinkResult {
        Ok(())
    }
}

/// Discards everything. Useful when executing without a device tree.
#[derive(Default)]
pub struct NullSink;

impl StateSink for NullSink {
    fn write(&mut self, _address: &Address, _value: &Value) -> SinkResult {
        Ok(())
    }
}

/// Records writes and commit boundaries for inspection from another
/// thread. Test and demo sink.
#[derive(Clone, Default)]
pub struct MemorySink {
    log: Arc<Mutex<SinkLog>>,
}

#[derive(Default)]
struct SinkLog {
    writes: Vec<(Address, Value)>,
    commits: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<(Address, Value)> {
        self.log.lock().expect("sink log poisoned").writes.clone()
    }

    pub fn commit_count(&self) -> usize {
        self.log.lock().expect("sink log poisoned").commits
    }

    pub fn clear(&self) {
        let mut log = self.log.lock().expect("sink log poisoned");
        log.writes.clear();
        log.commits = 0;
    }
}

impl StateSink for MemorySink {
    fn write(&mut self, address: &Address, value: &Value) -> SinkResult {
        self.log
            .lock()
            .expect("sink log poisoned")
            .writes
            .push((address.clone(), value.clone()));
        Ok(())
    }

    fn commit(&mut self) -> SinkResult {
        self.log.lock().expect("sink log poisoned").commits += 1;
        Ok(())
    }
}

/// Fails on demand, for exercising the disconnect path.
#[cfg(test)]
pub struct FailingSink;

#[cfg(test)]
impl StateSink for FailingSink {
    fn write(&mut self, _address: &Address, _value: &Value) -> SinkResult {
        Err(SinkFault {
            reason: "transport gone".to_owned(),
        })
    }
}
