//! Memory calculator for dipper
//!
//! Prints the footprint of the arm sequencer, the status indicator and the
//! composed station for the common time bases, so the cost of a larger action
//! queue or a heavier strip driver can be read off before flashing.
//!
//! Usage:
//!   cargo run --bin memory_calculator

use core::convert::Infallible;
use dipper::{
    Actuator, ArmConfig, ArmSequencer, ArmState, IndicatorConfig, LightStrip, Station,
    StationAction, StatusIndicator, TimeDuration, TimeInstant, TimeSource,
};
use embassy_time::Duration as EmbassyDurationInner;
use embassy_time::Instant as EmbassyInstantInner;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use palette::Srgb;
use std::mem::size_of;

// ============================================================================
// Time Types
// ============================================================================

// u32 milliseconds (plain SysTick counter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Duration32(u32);

impl TimeDuration for Duration32 {
    fn as_millis(&self) -> u64 {
        self.0 as u64
    }

    fn from_millis(millis: u64) -> Self {
        Duration32(millis as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Instant32(u32);

impl TimeInstant for Instant32 {
    type Duration = Duration32;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        Duration32(self.0.saturating_sub(earlier.0))
    }
}

struct TimeSource32;

impl TimeSource<Instant32> for TimeSource32 {
    fn now(&self) -> Instant32 {
        Instant32(0)
    }
}

// Embassy ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct EmbassyDuration(EmbassyDurationInner);

impl TimeDuration for EmbassyDuration {
    fn as_millis(&self) -> u64 {
        self.0.as_millis()
    }

    fn from_millis(millis: u64) -> Self {
        EmbassyDuration(EmbassyDurationInner::from_millis(millis))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct EmbassyInstant(EmbassyInstantInner);

impl TimeInstant for EmbassyInstant {
    type Duration = EmbassyDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        EmbassyDuration(self.0.saturating_duration_since(earlier.0))
    }
}

struct EmbassyTimeSource;

impl TimeSource<EmbassyInstant> for EmbassyTimeSource {
    fn now(&self) -> EmbassyInstant {
        EmbassyInstant(EmbassyInstantInner::from_ticks(0))
    }
}

// ============================================================================
// Hardware Stand-ins
// ============================================================================

// Step/dir driver: two pin numbers and a step delay
#[allow(dead_code)]
struct StepDirDriver {
    step_pin: u8,
    dir_pin: u8,
    step_delay_us: u32,
}

impl Actuator for StepDirDriver {
    fn step(&mut self, _steps: i32) {}

    fn set_speed(&mut self, _rpm: u32) {}
}

struct Pin;

impl ErrorType for Pin {
    type Error = Infallible;
}

impl InputPin for Pin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

impl OutputPin for Pin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

// WS2812 driver owning a GRB byte buffer of N pixels
#[allow(dead_code)]
struct BufferedStrip<const N: usize> {
    buffer: [[u8; 3]; N],
    brightness: u8,
}

impl<const N: usize> LightStrip for BufferedStrip<N> {
    fn pixel_count(&self) -> usize {
        N
    }

    fn clear(&mut self) {
        self.buffer = [[0; 3]; N];
    }

    fn set_pixel(&mut self, index: usize, color: Srgb) {
        if let Some(pixel) = self.buffer.get_mut(index) {
            let rgb: Srgb<u8> = color.into_format();
            *pixel = [rgb.green, rgb.red, rgb.blue];
        }
    }

    fn show(&mut self) {}

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }
}

type Arm<'t, I, T> = ArmSequencer<'t, I, StepDirDriver, Pin, Pin, Pin, T>;
type Indicator<I, const N: usize> = StatusIndicator<I, BufferedStrip<N>>;
type Mixer<'t, I, T, const N: usize, const Q: usize> =
    Station<'t, I, StepDirDriver, Pin, Pin, Pin, T, BufferedStrip<N>, Q>;

// ============================================================================
// Display Functions
// ============================================================================

fn print_header() {
    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║              dipper Memory Footprint Calculator                ║");
    println!("╚════════════════════════════════════════════════════════════════╝");
    println!();
}

fn print_component_sizes() {
    println!("Component Sizes:");
    println!("├─ Srgb:                           {} bytes", size_of::<Srgb>());
    println!("├─ ArmState:                       {} bytes", size_of::<ArmState>());
    println!("├─ StationAction:                  {} bytes", size_of::<StationAction>());
    println!(
        "├─ ArmConfig<u32>:                 {} bytes",
        size_of::<ArmConfig<Duration32>>()
    );
    println!(
        "└─ IndicatorConfig<u32>:           {} bytes",
        size_of::<IndicatorConfig<Duration32>>()
    );
    println!();
}

fn print_tables<I: TimeInstant + 'static, T: TimeSource<I> + 'static>(name: &str) {
    println!("── With {} Instant/Duration ──", name);
    println!();
    println!("ArmSequencer:                      {} bytes", size_of::<Arm<'static, I, T>>());
    println!();

    println!("┌──────────┬──────────────┬──────────────┬──────────────┐");
    println!("│ Pixels   │ Strip        │ Indicator    │ Indicator OH │");
    println!("├──────────┼──────────────┼──────────────┼──────────────┤");
    print_indicator_row::<I, 12>();
    print_indicator_row::<I, 20>();
    print_indicator_row::<I, 60>();
    println!("└──────────┴──────────────┴──────────────┴──────────────┘");
    println!();

    println!("Station (20 pixels) by action queue capacity:");
    println!("┌──────────┬──────────────┐");
    println!("│ Queue    │ Station      │");
    println!("├──────────┼──────────────┤");
    println!("│ {:^8} │ {:>10} B │", 1, size_of::<Mixer<'static, I, T, 20, 1>>());
    println!("│ {:^8} │ {:>10} B │", 4, size_of::<Mixer<'static, I, T, 20, 4>>());
    println!("│ {:^8} │ {:>10} B │", 16, size_of::<Mixer<'static, I, T, 20, 16>>());
    println!("└──────────┴──────────────┘");
    println!();
}

fn print_indicator_row<I: TimeInstant, const N: usize>() {
    let strip = size_of::<BufferedStrip<N>>();
    let total = size_of::<Indicator<I, N>>();
    println!(
        "│ {:^8} │ {:>10} B │ {:>10} B │ {:>10} B │",
        N,
        strip,
        total,
        total - strip
    );
}

fn main() {
    print_header();
    print_component_sizes();

    print_tables::<Instant32, TimeSource32>("u32");
    print_tables::<EmbassyInstant, EmbassyTimeSource>("Embassy");

    println!("Architecture Note:");
    println!(
        "  Running on host ({}-bit). Embedded 32-bit targets will have",
        size_of::<usize>() * 8
    );
    println!("  slightly smaller sizes due to pointer differences.");
    println!();
}
