//! Status light strip driven by a declarative operating mode.
//!
//! Provides [`StatusIndicator`], which renders the current [`Mode`] as an
//! animated pattern without blocking, and the [`LightStrip`] trait for the
//! pixel hardware.

use crate::config::{ConfigError, IndicatorConfig};
use crate::pattern::{Blink, Rainbow, ScanDirection, Scanner};
use crate::time::TimeInstant;
use palette::Srgb;

/// Trait for abstracting addressable pixel strips.
///
/// Implement this for your strip driver (WS2812 over PIO, SPI, etc.). Writes
/// go to a pixel buffer; nothing reaches the hardware until [`show`] is
/// called. Handle any hardware errors internally - these methods cannot fail.
///
/// [`show`]: LightStrip::show
pub trait LightStrip {
    /// Number of pixels on the strip.
    fn pixel_count(&self) -> usize;

    /// Turns every pixel in the buffer off.
    fn clear(&mut self);

    /// Sets one pixel in the buffer. Color components are in the range 0.0-1.0.
    fn set_pixel(&mut self, index: usize, color: Srgb);

    /// Flushes the buffer to the strip.
    fn show(&mut self);

    /// Sets global strip brightness (0-255).
    fn set_brightness(&mut self, brightness: u8);
}

/// What the apparatus is doing, as communicated to the light strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Nothing in progress. Red scanner sweeping a sub-range of the strip.
    Idle,
    /// A cycle is in progress. Even and odd pixels blink alternately.
    Working,
    /// A fault needs attention. Whole strip blinks slowly.
    Error,
    /// Hue wheel rotating across the strip.
    Rainbow,
}

/// Renders a [`Mode`] onto a light strip.
///
/// Every mode has its own cadence and its own animation state. Only the active
/// mode's state advances, so returning to a mode resumes its animation where
/// it left off.
///
/// # Type Parameters
/// * `I` - Time instant type
/// * `S` - Light strip implementation type
pub struct StatusIndicator<I: TimeInstant, S: LightStrip> {
    strip: S,
    config: IndicatorConfig<I::Duration>,
    mode: Mode,
    scanner: Scanner<I>,
    working: Blink<I>,
    error: Blink<I>,
    rainbow: Rainbow<I>,
}

impl<I: TimeInstant, S: LightStrip> StatusIndicator<I, S> {
    /// Creates an indicator in [`Mode::Idle`], applying the configured
    /// brightness and blanking the strip.
    ///
    /// # Errors
    /// Any [`ConfigError`] from validating `config` against the strip length.
    pub fn new(mut strip: S, config: IndicatorConfig<I::Duration>) -> Result<Self, ConfigError> {
        config.validate_for_strip(strip.pixel_count())?;

        strip.set_brightness(config.brightness);
        strip.clear();
        strip.show();

        Ok(Self {
            strip,
            config,
            mode: Mode::Idle,
            scanner: Scanner::new(config.scan_start),
            working: Blink::new(),
            error: Blink::new(),
            rainbow: Rainbow::new(),
        })
    }

    /// Selects the pattern to render from the next poll on.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            debug!("indicator: {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Returns the active mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Renders the active mode if its cadence has elapsed.
    ///
    /// The strip is cleared, the pattern drawn and the buffer shown, all in
    /// one call. Returns `true` if the strip was updated.
    pub fn poll(&mut self, now: I) -> bool {
        let due = match self.mode {
            Mode::Idle => self.scanner.cadence.try_tick(now, self.config.idle_interval),
            Mode::Working => self.working.cadence.try_tick(now, self.config.working_interval),
            Mode::Error => self.error.cadence.try_tick(now, self.config.error_interval),
            Mode::Rainbow => self.rainbow.cadence.try_tick(now, self.config.rainbow_interval),
        };
        if !due {
            return false;
        }

        self.strip.clear();
        match self.mode {
            Mode::Idle => self.scanner.draw(
                &mut self.strip,
                self.config.scan_start,
                self.config.scan_end,
                self.config.scanner_color,
            ),
            Mode::Working => {
                self.working.toggle();
                self.working
                    .draw_alternating(&mut self.strip, self.config.working_color);
            }
            Mode::Error => {
                self.error.toggle();
                self.error.draw_solid(&mut self.strip, self.config.error_color);
            }
            Mode::Rainbow => self.rainbow.draw(&mut self.strip, self.config.hue_step),
        }
        self.strip.show();
        true
    }

    /// Pixel the scanner lights at full brightness on its next render.
    pub fn scanner_position(&self) -> usize {
        self.scanner.position()
    }

    pub fn scanner_direction(&self) -> ScanDirection {
        self.scanner.direction()
    }

    /// Hue wheel position of pixel 0 on the next rainbow render.
    pub fn rainbow_hue(&self) -> u16 {
        self.rainbow.base_hue()
    }

    /// Current phase of the blink owned by `mode`, or `None` for modes that
    /// do not blink.
    pub fn blink_phase(&self, mode: Mode) -> Option<bool> {
        match mode {
            Mode::Working => Some(self.working.phase()),
            Mode::Error => Some(self.error.phase()),
            Mode::Idle | Mode::Rainbow => None,
        }
    }

    pub fn config(&self) -> &IndicatorConfig<I::Duration> {
        &self.config
    }

    /// Returns a reference to the underlying strip.
    pub fn strip(&self) -> &S {
        &self.strip
    }

    /// Consumes the indicator and returns the strip.
    pub fn release(self) -> S {
        self.strip
    }
}
