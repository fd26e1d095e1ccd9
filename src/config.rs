//! Construction-time configuration for the arm and the status indicator.
//!
//! Both configs are immutable once built. Builders validate the values that
//! would otherwise turn into silent misbehaviour at runtime.

use crate::colors::{AMBER, RED};
use crate::time::TimeDuration;
use palette::Srgb;

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Arm step size of zero would never move the arm.
    ZeroStepSize,

    /// Actuator speed of zero.
    ZeroSpeed,

    /// Scanner range start is not strictly below its end.
    InvalidScanRange { start: usize, end: usize },

    /// Scanner range does not fit on the strip.
    ScanRangeOutOfBounds { end: usize, pixel_count: usize },

    /// Rainbow hue step of zero would freeze the pattern.
    ZeroHueStep,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroStepSize => write!(f, "arm step size must be non-zero"),
            ConfigError::ZeroSpeed => write!(f, "actuator speed must be non-zero"),
            ConfigError::InvalidScanRange { start, end } => {
                write!(f, "scan range start {} must be below end {}", start, end)
            }
            ConfigError::ScanRangeOutOfBounds { end, pixel_count } => {
                write!(
                    f,
                    "scan range end {} exceeds strip of {} pixels",
                    end, pixel_count
                )
            }
            ConfigError::ZeroHueStep => write!(f, "rainbow hue step must be non-zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Arm motion and mixing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmConfig<D: TimeDuration> {
    /// Steps issued to the actuator per poll while travelling.
    pub step_size: u16,

    /// Actuator speed applied once at construction.
    pub speed_rpm: u32,

    /// Hold at the lower limit before the mixer engages.
    pub lower_settle: D,

    /// How long the mixer runs.
    pub mix_duration: D,

    /// Hold after the mixer is switched off, before ascending.
    pub mixer_settle: D,
}

impl<D: TimeDuration> ArmConfig<D> {
    /// Creates a builder seeded with the default values.
    pub fn builder() -> ArmConfigBuilder<D> {
        ArmConfigBuilder::new()
    }

    /// Checks the values the sequencer cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_size == 0 {
            return Err(ConfigError::ZeroStepSize);
        }
        if self.speed_rpm == 0 {
            return Err(ConfigError::ZeroSpeed);
        }
        Ok(())
    }
}

impl<D: TimeDuration> Default for ArmConfig<D> {
    fn default() -> Self {
        Self {
            step_size: 3,
            speed_rpm: 10,
            lower_settle: D::from_millis(300),
            mix_duration: D::from_millis(2000),
            mixer_settle: D::from_millis(500),
        }
    }
}

/// Builder for [`ArmConfig`].
#[derive(Debug)]
pub struct ArmConfigBuilder<D: TimeDuration> {
    config: ArmConfig<D>,
}

impl<D: TimeDuration> ArmConfigBuilder<D> {
    /// Creates a builder with default values.
    pub fn new() -> Self {
        Self {
            config: ArmConfig::default(),
        }
    }

    pub fn step_size(mut self, steps: u16) -> Self {
        self.config.step_size = steps;
        self
    }

    pub fn speed_rpm(mut self, rpm: u32) -> Self {
        self.config.speed_rpm = rpm;
        self
    }

    pub fn lower_settle(mut self, duration: D) -> Self {
        self.config.lower_settle = duration;
        self
    }

    pub fn mix_duration(mut self, duration: D) -> Self {
        self.config.mix_duration = duration;
        self
    }

    pub fn mixer_settle(mut self, duration: D) -> Self {
        self.config.mixer_settle = duration;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// * `ZeroStepSize` - step size is zero
    /// * `ZeroSpeed` - actuator speed is zero
    pub fn build(self) -> Result<ArmConfig<D>, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl<D: TimeDuration> Default for ArmConfigBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Status light parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorConfig<D: TimeDuration> {
    /// First pixel of the idle scanner range (inclusive).
    pub scan_start: usize,

    /// Last pixel of the idle scanner range (inclusive).
    pub scan_end: usize,

    /// Strip brightness applied once at construction.
    pub brightness: u8,

    pub idle_interval: D,
    pub working_interval: D,
    pub error_interval: D,
    pub rainbow_interval: D,

    /// Hue wheel positions the rainbow advances per render.
    pub hue_step: u16,

    pub scanner_color: Srgb,
    pub working_color: Srgb,
    pub error_color: Srgb,
}

impl<D: TimeDuration> IndicatorConfig<D> {
    /// Creates a builder seeded with the default values.
    pub fn builder() -> IndicatorConfigBuilder<D> {
        IndicatorConfigBuilder::new()
    }

    /// Checks the values that do not depend on the strip.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan_start >= self.scan_end {
            return Err(ConfigError::InvalidScanRange {
                start: self.scan_start,
                end: self.scan_end,
            });
        }
        if self.hue_step == 0 {
            return Err(ConfigError::ZeroHueStep);
        }
        Ok(())
    }

    /// Checks the configuration against a strip of `pixel_count` pixels.
    pub fn validate_for_strip(&self, pixel_count: usize) -> Result<(), ConfigError> {
        self.validate()?;
        if self.scan_end >= pixel_count {
            return Err(ConfigError::ScanRangeOutOfBounds {
                end: self.scan_end,
                pixel_count,
            });
        }
        Ok(())
    }
}

impl<D: TimeDuration> Default for IndicatorConfig<D> {
    fn default() -> Self {
        Self {
            scan_start: 8,
            scan_end: 17,
            brightness: 100,
            idle_interval: D::from_millis(80),
            working_interval: D::from_millis(250),
            error_interval: D::from_millis(500),
            rainbow_interval: D::from_millis(20),
            hue_step: 256,
            scanner_color: RED,
            working_color: AMBER,
            error_color: RED,
        }
    }
}

/// Builder for [`IndicatorConfig`].
#[derive(Debug)]
pub struct IndicatorConfigBuilder<D: TimeDuration> {
    config: IndicatorConfig<D>,
}

impl<D: TimeDuration> IndicatorConfigBuilder<D> {
    /// Creates a builder with default values.
    pub fn new() -> Self {
        Self {
            config: IndicatorConfig::default(),
        }
    }

    /// Sets the inclusive pixel range swept by the idle scanner.
    pub fn scan_range(mut self, start: usize, end: usize) -> Self {
        self.config.scan_start = start;
        self.config.scan_end = end;
        self
    }

    pub fn brightness(mut self, brightness: u8) -> Self {
        self.config.brightness = brightness;
        self
    }

    pub fn idle_interval(mut self, interval: D) -> Self {
        self.config.idle_interval = interval;
        self
    }

    pub fn working_interval(mut self, interval: D) -> Self {
        self.config.working_interval = interval;
        self
    }

    pub fn error_interval(mut self, interval: D) -> Self {
        self.config.error_interval = interval;
        self
    }

    pub fn rainbow_interval(mut self, interval: D) -> Self {
        self.config.rainbow_interval = interval;
        self
    }

    pub fn hue_step(mut self, step: u16) -> Self {
        self.config.hue_step = step;
        self
    }

    pub fn scanner_color(mut self, color: Srgb) -> Self {
        self.config.scanner_color = color;
        self
    }

    pub fn working_color(mut self, color: Srgb) -> Self {
        self.config.working_color = color;
        self
    }

    pub fn error_color(mut self, color: Srgb) -> Self {
        self.config.error_color = color;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// Whether the scan range fits the strip is checked when the indicator is
    /// constructed, since only the strip knows its length.
    ///
    /// # Errors
    /// * `InvalidScanRange` - `scan_start >= scan_end`
    /// * `ZeroHueStep` - hue step is zero
    pub fn build(self) -> Result<IndicatorConfig<D>, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl<D: TimeDuration> Default for IndicatorConfigBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}
