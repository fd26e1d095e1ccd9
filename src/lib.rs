#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`ArmSequencer`**: Non-blocking state machine for the arm: home, descend, settle, mix, ascend
//! - **`ArmState`** / **`MixPhase`**: Where the arm is in its cycle
//! - **`Actuator`**: Trait to implement for your arm motor driver
//! - **`StatusIndicator`**: Renders a `Mode` as an animated pattern on a light strip
//! - **`Mode`**: Declarative operating intent (`Idle`, `Working`, `Error`, `Rainbow`)
//! - **`LightStrip`**: Trait to implement for your pixel strip driver
//! - **`Station`**: Polls both and maps the arm state onto a light mode
//! - **`StationAction`**: Control requests as values, applied at a poll boundary
//! - **`TimeSource`**: Trait to implement for your timing system
//!
//! Endstops and the mixer output use the `embedded-hal` 1.0 digital traits.
//! Colors are `Srgb<f32>` (0.0-1.0 range); convert them to your strip's
//! native format in your `LightStrip` implementation.

#[macro_use]
mod fmt;

pub mod arm;
pub mod colors;
pub mod command;
pub mod config;
pub mod indicator;
pub mod pattern;
pub mod station;
pub mod time;

pub use arm::{Actuator, ArmError, ArmSequencer, ArmState, Endstop, MixPhase};
pub use command::StationAction;
pub use config::{ArmConfig, ArmConfigBuilder, ConfigError, IndicatorConfig, IndicatorConfigBuilder};
pub use indicator::{LightStrip, Mode, StatusIndicator};
pub use pattern::ScanDirection;
pub use station::{Station, mode_for_arm};
pub use time::{TimeDuration, TimeInstant, TimeSource};

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;
