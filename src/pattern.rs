//! Render state for the individual light patterns.
//!
//! Each pattern keeps its own cadence stamp and animation state, so switching
//! the indicator away from a pattern and back resumes it where it stopped.
//! Drawing assumes the strip was cleared beforehand.

use crate::colors::{gamma, pixel_hue, scale, wheel_hue};
use crate::indicator::LightStrip;
use crate::time::TimeInstant;
use palette::Srgb;

/// Brightness of the scanner trail relative to its head, nearest first.
const TRAIL_LEVELS: [f32; 3] = [125.0 / 255.0, 62.0 / 255.0, 31.0 / 255.0];

/// Rate limiter holding the instant of the last render.
#[derive(Debug, Clone, Copy)]
pub struct Cadence<I: TimeInstant> {
    last_update: Option<I>,
}

impl<I: TimeInstant> Cadence<I> {
    pub const fn new() -> Self {
        Self { last_update: None }
    }

    /// Returns true and restarts the interval if `interval` has passed since
    /// the last render. The first call is always due.
    pub fn try_tick(&mut self, now: I, interval: I::Duration) -> bool {
        let due = match self.last_update {
            None => true,
            Some(last) => now.has_elapsed(last, interval),
        };
        if due {
            self.last_update = Some(now);
        }
        due
    }

    pub fn last_update(&self) -> Option<I> {
        self.last_update
    }
}

impl<I: TimeInstant> Default for Cadence<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction the scanner head is travelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanDirection {
    /// Towards higher pixel indices.
    Forward,
    /// Towards lower pixel indices.
    Backward,
}

impl ScanDirection {
    /// Signed pixel offset of one move.
    pub fn delta(self) -> isize {
        match self {
            ScanDirection::Forward => 1,
            ScanDirection::Backward => -1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            ScanDirection::Forward => ScanDirection::Backward,
            ScanDirection::Backward => ScanDirection::Forward,
        }
    }
}

/// Back-and-forth sweep of a bright head with a fading trail.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<I: TimeInstant> {
    pub(crate) cadence: Cadence<I>,
    position: usize,
    direction: ScanDirection,
}

impl<I: TimeInstant> Scanner<I> {
    pub fn new(start: usize) -> Self {
        Self {
            cadence: Cadence::new(),
            position: start,
            direction: ScanDirection::Forward,
        }
    }

    /// Pixel the next render lights at full brightness.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn direction(&self) -> ScanDirection {
        self.direction
    }

    /// Draws the head and trail inside `[start, end]`, then advances the head
    /// and reverses it once it reaches either bound.
    pub fn draw<S: LightStrip>(&mut self, strip: &mut S, start: usize, end: usize, color: Srgb) {
        let in_range = |index: isize| index >= start as isize && index <= end as isize;
        let head = self.position as isize;
        let delta = self.direction.delta();

        put_pixel(strip, self.position, color);
        for (n, level) in TRAIL_LEVELS.iter().enumerate() {
            let index = head - (n as isize + 1) * delta;
            if in_range(index) {
                put_pixel(strip, index as usize, scale(color, *level));
            }
        }

        self.position = match self.direction {
            ScanDirection::Forward => self.position + 1,
            ScanDirection::Backward => self.position.saturating_sub(1),
        };
        if self.position >= end || self.position <= start {
            self.direction = self.direction.reversed();
        }
    }
}

/// Two-phase toggle shared by the working and error patterns.
#[derive(Debug, Clone, Copy)]
pub struct Blink<I: TimeInstant> {
    pub(crate) cadence: Cadence<I>,
    phase: bool,
}

impl<I: TimeInstant> Blink<I> {
    pub const fn new() -> Self {
        Self {
            cadence: Cadence::new(),
            phase: false,
        }
    }

    pub fn phase(&self) -> bool {
        self.phase
    }

    pub fn toggle(&mut self) {
        self.phase = !self.phase;
    }

    /// Lights even pixels in one phase and odd pixels in the other.
    pub fn draw_alternating<S: LightStrip>(&self, strip: &mut S, color: Srgb) {
        let lit_parity = if self.phase { 0 } else { 1 };
        for index in (lit_parity..strip.pixel_count()).step_by(2) {
            strip.set_pixel(index, color);
        }
    }

    /// Lights the whole strip in the on phase and leaves it dark otherwise.
    pub fn draw_solid<S: LightStrip>(&self, strip: &mut S, color: Srgb) {
        if !self.phase {
            return;
        }
        for index in 0..strip.pixel_count() {
            strip.set_pixel(index, color);
        }
    }
}

impl<I: TimeInstant> Default for Blink<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Hue wheel spread across the strip, rotating by a fixed step per render.
#[derive(Debug, Clone, Copy)]
pub struct Rainbow<I: TimeInstant> {
    pub(crate) cadence: Cadence<I>,
    base_hue: u16,
}

impl<I: TimeInstant> Rainbow<I> {
    pub const fn new() -> Self {
        Self {
            cadence: Cadence::new(),
            base_hue: 0,
        }
    }

    /// Hue wheel position of pixel 0 on the next render.
    pub fn base_hue(&self) -> u16 {
        self.base_hue
    }

    pub fn draw<S: LightStrip>(&mut self, strip: &mut S, hue_step: u16) {
        let count = strip.pixel_count();
        for index in 0..count {
            let color = gamma(wheel_hue(pixel_hue(self.base_hue, index, count)));
            strip.set_pixel(index, color);
        }
        // u16 arithmetic wraps exactly at the wheel size.
        self.base_hue = self.base_hue.wrapping_add(hue_step);
    }
}

impl<I: TimeInstant> Default for Rainbow<I> {
    fn default() -> Self {
        Self::new()
    }
}

fn put_pixel<S: LightStrip>(strip: &mut S, index: usize, color: Srgb) {
    if index < strip.pixel_count() {
        strip.set_pixel(index, color);
    }
}
