// src/clock.rs

use crate::time_value::TimeValue;

//
// ===============================
// MARK: Clock contract
// ===============================
//

/// Transport state of a clock.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClockStatus {
    Stopped,
    Running,
    Paused,
}

/// Drives ticking: converts elapsed external time into logical deltas.
///
/// Clocks:
/// - own the current logical time
/// - never move backward except through an explicit `seek`
/// - report a zero delta while stopped or paused
///
/// The meaning of `external_delta` depends on the strategy: elapsed
/// milliseconds for the free-running clock, consumed frames for the
/// buffer-driven clock.
pub trait Clock: Send {
    fn status(&self) -> ClockStatus;

    fn start(&mut self);

    fn stop(&mut self);

    fn pause(&mut self);

    fn resume(&mut self);

    /// Current logical time.
    fn now(&self) -> TimeValue;

    /// Convert an elapsed external delta into a logical delta and advance.
    ///
    /// Returns `TimeValue::ZERO` when not running. `tick(0.0)` is always
    /// legal and yields a zero delta.
    fn tick(&mut self, external_delta: f64) -> TimeValue;

    /// Atomically reset logical time (scrub/seek). In-flight partial
    /// results for the old position are the caller's to discard.
    fn seek(&mut self, to: TimeValue);

    /// External units corresponding to a logical duration (reverse
    /// conversion, used by the scrubbing UI).
    fn to_external(&self, logical: TimeValue) -> f64;

    /// Logical units corresponding to an external duration.
    fn to_logical(&self, external: f64) -> TimeValue;
}

//
// ===============================
// MARK: Free-running clock
// ===============================
//

/// Wall-clock-driven strategy.
///
/// One external millisecond maps to `speed` logical units. The driver loop
/// is expected to call `tick` roughly every `granularity` units; the clock
/// itself only converts whatever elapsed time it is handed.
pub struct FreeRunningClock {
    status: ClockStatus,
    now_units: u64,
    /// Fractional units carried between ticks so rounding never drifts.
    remainder: f64,
    speed: f64,
    granularity: u64,
}

/// Default tick period, in logical units.
pub const DEFAULT_GRANULARITY: u64 = 50;

impl FreeRunningClock {
    pub fn new() -> Self {
        Self::with_rate(1.0, DEFAULT_GRANULARITY)
    }

    pub fn with_rate(speed: f64, granularity: u64) -> Self {
        Self {
            status: ClockStatus::Stopped,
            now_units: 0,
            remainder: 0.0,
            speed: if speed > 0.0 { speed } else { 1.0 },
            granularity: granularity.max(1),
        }
    }

    /// Suggested interval between driver wake-ups, in external milliseconds.
    #[inline]
    pub fn tick_period_millis(&self) -> f64 {
        self.granularity as f64 / self.speed
    }
}

impl Default for FreeRunningClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FreeRunningClock {
    fn status(&self) -> ClockStatus {
        self.status
    }

    fn start(&mut self) {
        if self.status == ClockStatus::Stopped {
            self.now_units = 0;
            self.remainder = 0.0;
            self.status = ClockStatus::Running;
        }
    }

    fn stop(&mut self) {
        self.status = ClockStatus::Stopped;
        self.now_units = 0;
        self.remainder = 0.0;
    }

    fn pause(&mut self) {
        if self.status == ClockStatus::Running {
            self.status = ClockStatus::Paused;
        }
    }

    fn resume(&mut self) {
        if self.status == ClockStatus::Paused {
            self.status = ClockStatus::Running;
        }
    }

    fn now(&self) -> TimeValue {
        TimeValue::from_units(self.now_units)
    }

    fn tick(&mut self, external_delta: f64) -> TimeValue {
        if self.status != ClockStatus::Running || external_delta <= 0.0 {
            return TimeValue::ZERO;
        }

        let exact = external_delta * self.speed + self.remainder;
        let whole = exact.floor();
        self.remainder = exact - whole;

        let delta = whole as u64;
        self.now_units = self.now_units.saturating_add(delta);
        TimeValue::from_units(delta)
    }

    fn seek(&mut self, to: TimeValue) {
        self.now_units = to.units().unwrap_or(u64::MAX);
        self.remainder = 0.0;
    }

    fn to_external(&self, logical: TimeValue) -> f64 {
        match logical.units() {
            Some(u) => u as f64 / self.speed,
            None => f64::INFINITY,
        }
    }

    fn to_logical(&self, external: f64) -> TimeValue {
        TimeValue::from_units((external * self.speed).max(0.0) as u64)
    }
}

//
// ===============================
// MARK: Buffer-driven clock
// ===============================
//

/// Data-flow strategy bound to an audio-callback cadence.
///
/// Ticks are triggered externally once per buffer; the logical delta is
/// derived from the number of frames the last buffer consumed, not from a
/// timer.
pub struct BufferClock {
    status: ClockStatus,
    now_units: u64,
    remainder: f64,
    sample_rate: f64,
    /// Logical units per second of audio. 1000 keeps one unit ≈ 1 ms.
    units_per_second: f64,
}

impl BufferClock {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            status: ClockStatus::Stopped,
            now_units: 0,
            remainder: 0.0,
            sample_rate: if sample_rate > 0.0 { sample_rate } else { 44_100.0 },
            units_per_second: 1_000.0,
        }
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    #[inline]
    fn units_per_frame(&self) -> f64 {
        self.units_per_second / self.sample_rate
    }
}

impl Clock for BufferClock {
    fn status(&self) -> ClockStatus {
        self.status
    }

    fn start(&mut self) {
        if self.status == ClockStatus::Stopped {
            self.now_units = 0;
            self.remainder = 0.0;
            self.status = ClockStatus::Running;
        }
    }

    fn stop(&mut self) {
        self.status = ClockStatus::Stopped;
        self.now_units = 0;
        self.remainder = 0.0;
    }

    fn pause(&mut self) {
        if self.status == ClockStatus::Running {
            self.status = ClockStatus::Paused;
        }
    }

    fn resume(&mut self) {
        if self.status == ClockStatus::Paused {
            self.status = ClockStatus::Running;
        }
    }

    fn now(&self) -> TimeValue {
        TimeValue::from_units(self.now_units)
    }

    /// `external_delta` is the frame count of the last consumed buffer.
    fn tick(&mut self, external_delta: f64) -> TimeValue {
        if self.status != ClockStatus::Running || external_delta <= 0.0 {
            return TimeValue::ZERO;
        }

        let exact = external_delta * self.units_per_frame() + self.remainder;
        let whole = exact.floor();
        self.remainder = exact - whole;

        let delta = whole as u64;
        self.now_units = self.now_units.saturating_add(delta);
        TimeValue::from_units(delta)
    }

    fn seek(&mut self, to: TimeValue) {
        self.now_units = to.units().unwrap_or(u64::MAX);
        self.remainder = 0.0;
    }

    fn to_external(&self, logical: TimeValue) -> f64 {
        match logical.units() {
            Some(u) => u as f64 / self.units_per_frame(),
            None => f64::INFINITY,
        }
    }

    fn to_logical(&self, external: f64) -> TimeValue {
        TimeValue::from_units((external * self.units_per_frame()).max(0.0) as u64)
    }
}
