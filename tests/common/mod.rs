//! Shared test infrastructure for dipper integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;
use dipper::{
    Actuator, ArmConfig, ArmSequencer, ConfigError, IndicatorConfig, LightStrip, StatusIndicator,
    TimeDuration, TimeInstant, TimeSource,
};
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};
use palette::Srgb;

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0.saturating_sub(earlier.0))
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + millis));
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Arm Hardware
// ============================================================================

/// Shared state behind the arm mocks, so tests can drive the endstops and
/// observe the actuator and mixer after the sequencer has taken ownership.
#[derive(Default)]
pub struct Rig {
    pub position: Cell<i32>,
    pub step_calls: Cell<u32>,
    pub speed: Cell<u32>,
    pub lower: Cell<bool>,
    pub upper: Cell<bool>,
    pub endstop_reads: Cell<u32>,
    pub fail_endstops: Cell<bool>,
    pub mixer_on: Cell<bool>,
    pub mixer_writes: Cell<u32>,
    pub fail_mixer: Cell<bool>,
}

impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parks the arm on the upper endstop.
    pub fn park_up(&self) {
        self.upper.set(true);
        self.lower.set(false);
    }

    /// Puts the arm on the lower endstop.
    pub fn park_down(&self) {
        self.upper.set(false);
        self.lower.set(true);
    }

    /// Puts the arm between the endstops.
    pub fn mid_travel(&self) {
        self.upper.set(false);
        self.lower.set(false);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPinError;

impl embedded_hal::digital::Error for MockPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct MockActuator<'a> {
    rig: &'a Rig,
}

impl Actuator for MockActuator<'_> {
    fn step(&mut self, steps: i32) {
        self.rig.position.set(self.rig.position.get() + steps);
        self.rig.step_calls.set(self.rig.step_calls.get() + 1);
    }

    fn set_speed(&mut self, rpm: u32) {
        self.rig.speed.set(rpm);
    }
}

pub struct MockEndstop<'a> {
    rig: &'a Rig,
    lower: bool,
}

impl ErrorType for MockEndstop<'_> {
    type Error = MockPinError;
}

impl InputPin for MockEndstop<'_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.rig.endstop_reads.set(self.rig.endstop_reads.get() + 1);
        if self.rig.fail_endstops.get() {
            return Err(MockPinError);
        }
        Ok(if self.lower {
            self.rig.lower.get()
        } else {
            self.rig.upper.get()
        })
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub struct MockMixer<'a> {
    rig: &'a Rig,
}

impl ErrorType for MockMixer<'_> {
    type Error = MockPinError;
}

impl OutputPin for MockMixer<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

impl MockMixer<'_> {
    fn write(&mut self, on: bool) -> Result<(), MockPinError> {
        if self.rig.fail_mixer.get() {
            return Err(MockPinError);
        }
        self.rig.mixer_on.set(on);
        self.rig.mixer_writes.set(self.rig.mixer_writes.get() + 1);
        Ok(())
    }
}

pub type TestArm<'a> = ArmSequencer<
    'a,
    TestInstant,
    MockActuator<'a>,
    MockEndstop<'a>,
    MockEndstop<'a>,
    MockMixer<'a>,
    MockTimeSource,
>;

/// Builds a sequencer over the rig, passing through config validation.
pub fn try_build_arm<'a>(
    rig: &'a Rig,
    timer: &'a MockTimeSource,
    config: ArmConfig<TestDuration>,
) -> Result<TestArm<'a>, ConfigError> {
    ArmSequencer::new(
        MockActuator { rig },
        MockEndstop { rig, lower: true },
        MockEndstop { rig, lower: false },
        MockMixer { rig },
        timer,
        config,
    )
}

/// Builds a sequencer over the rig with the given config.
pub fn build_arm<'a>(
    rig: &'a Rig,
    timer: &'a MockTimeSource,
    config: ArmConfig<TestDuration>,
) -> TestArm<'a> {
    try_build_arm(rig, timer, config).unwrap()
}

/// Short timings so cycle tests stay readable.
pub fn fast_arm_config() -> ArmConfig<TestDuration> {
    ArmConfig::builder()
        .lower_settle(TestDuration(100))
        .mix_duration(TestDuration(1000))
        .mixer_settle(TestDuration(200))
        .build()
        .unwrap()
}

// ============================================================================
// Mock Light Strip
// ============================================================================

pub const MAX_PIXELS: usize = 32;

/// Mock strip with a working buffer and a copy of the last shown frame
pub struct MockStrip {
    buffer: heapless::Vec<Srgb, MAX_PIXELS>,
    shown: heapless::Vec<Srgb, MAX_PIXELS>,
    show_count: u32,
    clear_count: u32,
    out_of_range_writes: u32,
    brightness: Option<u8>,
}

impl MockStrip {
    pub fn new(pixel_count: usize) -> Self {
        let mut buffer = heapless::Vec::new();
        for _ in 0..pixel_count {
            buffer.push(BLACK).unwrap();
        }
        Self {
            shown: buffer.clone(),
            buffer,
            show_count: 0,
            clear_count: 0,
            out_of_range_writes: 0,
            brightness: None,
        }
    }

    /// Frame most recently flushed with `show`.
    pub fn shown(&self) -> &[Srgb] {
        &self.shown
    }

    pub fn show_count(&self) -> u32 {
        self.show_count
    }

    pub fn clear_count(&self) -> u32 {
        self.clear_count
    }

    pub fn out_of_range_writes(&self) -> u32 {
        self.out_of_range_writes
    }

    pub fn brightness(&self) -> Option<u8> {
        self.brightness
    }

    /// Indices of pixels lit in the last shown frame.
    pub fn lit_pixels(&self) -> heapless::Vec<usize, MAX_PIXELS> {
        self.shown
            .iter()
            .enumerate()
            .filter(|(_, c)| !colors_equal(**c, BLACK))
            .map(|(i, _)| i)
            .collect()
    }
}

impl LightStrip for MockStrip {
    fn pixel_count(&self) -> usize {
        self.buffer.len()
    }

    fn clear(&mut self) {
        self.clear_count += 1;
        for pixel in self.buffer.iter_mut() {
            *pixel = BLACK;
        }
    }

    fn set_pixel(&mut self, index: usize, color: Srgb) {
        match self.buffer.get_mut(index) {
            Some(pixel) => *pixel = color,
            None => self.out_of_range_writes += 1,
        }
    }

    fn show(&mut self) {
        self.show_count += 1;
        self.shown = self.buffer.clone();
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = Some(brightness);
    }
}

pub type TestIndicator = StatusIndicator<TestInstant, MockStrip>;

pub fn build_indicator(pixel_count: usize, config: IndicatorConfig<TestDuration>) -> TestIndicator {
    StatusIndicator::new(MockStrip::new(pixel_count), config).unwrap()
}

// ============================================================================
// Colors
// ============================================================================

pub const BLACK: Srgb = Srgb::new(0.0, 0.0, 0.0);
pub use dipper::colors::{AMBER, RED};

/// Compare two colors with floating-point tolerance
pub fn colors_equal(a: Srgb, b: Srgb) -> bool {
    const EPSILON: f32 = 0.001;
    (a.red - b.red).abs() < EPSILON
        && (a.green - b.green).abs() < EPSILON
        && (a.blue - b.blue).abs() < EPSILON
}
