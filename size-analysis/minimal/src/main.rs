#![no_std]
#![no_main]

use core::convert::Infallible;
use cortex_m_rt::entry;
use dipper::{
    Actuator, ArmConfig, ArmSequencer, IndicatorConfig, LightStrip, Mode, Station, StationAction,
    StatusIndicator, TimeDuration, TimeInstant, TimeSource,
};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use palette::Srgb;
use panic_halt as _;

// ============================================================================
// Minimal Time Types
// ============================================================================

/// Minimal 32-bit millisecond duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration32(u32);

impl TimeDuration for Duration32 {
    fn as_millis(&self) -> u64 {
        self.0 as u64
    }

    fn from_millis(millis: u64) -> Self {
        Duration32(millis as u32)
    }
}

/// Minimal 32-bit millisecond instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Instant32(u32);

impl TimeInstant for Instant32 {
    type Duration = Duration32;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        Duration32(self.0.saturating_sub(earlier.0))
    }
}

pub struct MinimalTimeSource;

impl TimeSource<Instant32> for MinimalTimeSource {
    fn now(&self) -> Instant32 {
        Instant32(0)
    }
}

// ============================================================================
// Minimal Hardware
// ============================================================================

/// Zero-size stepper for measuring library overhead
pub struct MinimalStepper;

impl Actuator for MinimalStepper {
    fn step(&mut self, steps: i32) {
        core::hint::black_box(steps);
    }

    fn set_speed(&mut self, rpm: u32) {
        core::hint::black_box(rpm);
    }
}

/// Endstop or mixer pin that never fails
pub struct MinimalPin;

impl ErrorType for MinimalPin {
    type Error = Infallible;
}

impl InputPin for MinimalPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(core::hint::black_box(false))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(core::hint::black_box(true))
    }
}

impl OutputPin for MinimalPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// 20-pixel strip without a backing buffer
pub struct MinimalStrip;

impl LightStrip for MinimalStrip {
    fn pixel_count(&self) -> usize {
        20
    }

    fn clear(&mut self) {
        core::hint::black_box(());
    }

    fn set_pixel(&mut self, index: usize, color: Srgb) {
        core::hint::black_box((index, color));
    }

    fn show(&mut self) {
        core::hint::black_box(());
    }

    fn set_brightness(&mut self, brightness: u8) {
        core::hint::black_box(brightness);
    }
}

// ============================================================================
// Station
// ============================================================================

// This function uses the library to prevent optimizer from removing code
#[inline(never)]
fn run_station() {
    let time_source = MinimalTimeSource;

    let arm = ArmSequencer::new(
        MinimalStepper,
        MinimalPin,
        MinimalPin,
        MinimalPin,
        &time_source,
        ArmConfig::default(),
    );
    let indicator = StatusIndicator::new(MinimalStrip, IndicatorConfig::default());

    if let (Ok(arm), Ok(indicator)) = (arm, indicator) {
        let mut station: Station<'_, _, _, _, _, _, _, _, 4> = Station::new(arm, indicator);

        let _ = station.enqueue(StationAction::StartSequence);
        let _ = station.enqueue(StationAction::SetMode(Mode::Rainbow));
        for _ in 0..8 {
            let _ = station.poll();
        }
        station.handle_action(StationAction::WaitForDependency);
        station.handle_action(StationAction::ResumeAfterDependency);
        station.handle_action(StationAction::ClearModeOverride);
        let _ = station.poll();
        core::hint::black_box(station);
    }
}

#[entry]
fn main() -> ! {
    // Call test function to ensure all code is included
    run_station();

    // Halt - this is a size analysis binary, not meant to run
    loop {
        cortex_m::asm::nop();
    }
}
