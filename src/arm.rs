//! Mixer arm sequencer.
//!
//! Provides [`ArmSequencer`], a non-blocking state machine that walks the arm
//! through descend, settle, mix and ascend, gated by two endstops and an
//! external "pump busy" hold. Also defines the [`Actuator`] trait for the
//! arm's motor driver.

use crate::config::{ArmConfig, ConfigError};
use crate::time::{TimeInstant, TimeSource};
use embedded_hal::digital::{Error as _, ErrorKind, InputPin, OutputPin};

/// Trait for abstracting the motor that moves the arm.
///
/// Implement this for your stepper driver. Positive steps move the arm
/// towards the lower endstop, negative steps towards the upper one. Handle
/// any hardware errors internally - these methods cannot fail.
pub trait Actuator {
    /// Moves the arm by a relative number of steps.
    fn step(&mut self, steps: i32);

    /// Sets the travel speed in RPM.
    fn set_speed(&mut self, rpm: u32);
}

/// Where the arm is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArmState {
    /// Position not known. The next poll starts homing upwards.
    Unknown,
    /// Frozen until the external dependency (pump) releases it.
    WaitingForDependency,
    /// Resting on the upper endstop.
    AtUpperLimit,
    /// Travelling towards the lower endstop.
    DescendingToLower,
    /// Resting on the lower endstop, settling before the mixer starts.
    AtLowerLimit,
    /// Mixer stage in progress; see [`MixPhase`].
    Mixing,
    /// Travelling towards the upper endstop. Always permitted.
    AscendingToUpper,
}

/// Sub-stage of [`ArmState::Mixing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MixPhase {
    /// Mixer motor engaged.
    MixerOn,
    /// Mixer off, waiting for it to spin down.
    MixerSettling,
}

/// Identifies one of the two endstops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Endstop {
    Lower,
    Upper,
}

/// Hardware faults surfaced by [`ArmSequencer::poll`].
///
/// The state is left unchanged when a fault is reported, so the same step is
/// retried on the next poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArmError {
    /// An endstop could not be read.
    Endstop { endstop: Endstop, kind: ErrorKind },
    /// The mixer output could not be driven.
    Mixer(ErrorKind),
}

impl core::fmt::Display for ArmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ArmError::Endstop { endstop, kind } => {
                write!(f, "failed to read {:?} endstop: {:?}", endstop, kind)
            }
            ArmError::Mixer(kind) => write!(f, "failed to drive mixer: {:?}", kind),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ArmError {}

/// Sequences the mixer arm through one mix per run request.
///
/// Poll it once per control-loop iteration. Every state is non-blocking,
/// including the mixer stage, whose timers are checked on each poll. The mixer
/// stage is atomic once entered: stop and start requests do not interrupt it.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `A` - Arm actuator type
/// * `L` - Lower endstop input
/// * `U` - Upper endstop input
/// * `M` - Mixer motor output
/// * `T` - Time source implementation type
pub struct ArmSequencer<'t, I, A, L, U, M, T>
where
    I: TimeInstant,
    A: Actuator,
    L: InputPin,
    U: InputPin,
    M: OutputPin,
    T: TimeSource<I>,
{
    actuator: A,
    lower_endstop: L,
    upper_endstop: U,
    mixer: M,
    time_source: &'t T,
    config: ArmConfig<I::Duration>,
    state: ArmState,
    run_requested: bool,
    restart_pending: bool,
    mix_phase: Option<MixPhase>,
    timer_start: Option<I>,
}

impl<'t, I, A, L, U, M, T> ArmSequencer<'t, I, A, L, U, M, T>
where
    I: TimeInstant,
    A: Actuator,
    L: InputPin,
    U: InputPin,
    M: OutputPin,
    T: TimeSource<I>,
{
    /// Creates a sequencer in [`ArmState::Unknown`] with the mixer off and the
    /// actuator speed applied.
    ///
    /// # Errors
    /// Any [`ConfigError`] from validating `config`.
    pub fn new(
        mut actuator: A,
        lower_endstop: L,
        upper_endstop: U,
        mut mixer: M,
        time_source: &'t T,
        config: ArmConfig<I::Duration>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        actuator.set_speed(config.speed_rpm);
        if mixer.set_low().is_err() {
            warn!("arm: could not switch mixer off at startup");
        }

        Ok(Self {
            actuator,
            lower_endstop,
            upper_endstop,
            mixer,
            time_source,
            config,
            state: ArmState::Unknown,
            run_requested: false,
            restart_pending: false,
            mix_phase: None,
            timer_start: None,
        })
    }

    /// Requests a full cycle and forces re-homing before it starts.
    ///
    /// During [`ArmState::Mixing`] the request is latched and the re-home
    /// happens once the mixer stage has finished.
    pub fn start_sequence(&mut self) {
        self.run_requested = true;
        if self.state == ArmState::Mixing {
            debug!("arm: start latched until mixing ends");
            self.restart_pending = true;
            return;
        }
        self.transition(ArmState::Unknown);
    }

    /// Withdraws the run request.
    ///
    /// Takes effect on the next poll: a descent reverses and the arm returns
    /// home. A mixer stage already in progress runs to completion.
    pub fn stop_sequence(&mut self) {
        self.run_requested = false;
        self.restart_pending = false;
    }

    /// Freezes the machine until [`resume_after_dependency`] or
    /// [`start_sequence`] is called. Accepted in every state; the mixer is
    /// switched off if it was running.
    ///
    /// [`resume_after_dependency`]: Self::resume_after_dependency
    /// [`start_sequence`]: Self::start_sequence
    pub fn wait_for_external_dependency(&mut self) {
        if self.mix_phase.is_some() && self.mixer.set_low().is_err() {
            warn!("arm: could not switch mixer off while suspending");
        }
        self.restart_pending = false;
        self.transition(ArmState::WaitingForDependency);
    }

    /// Releases a dependency wait. The arm re-homes before continuing, and a
    /// pending run request is kept. Does nothing outside the wait state.
    pub fn resume_after_dependency(&mut self) {
        if self.state == ArmState::WaitingForDependency {
            self.transition(ArmState::Unknown);
        }
    }

    /// Returns true while a run is requested and not yet complete.
    pub fn is_running(&self) -> bool {
        self.run_requested
    }

    /// Returns true while frozen for an external dependency.
    pub fn is_waiting(&self) -> bool {
        self.state == ArmState::WaitingForDependency
    }

    /// Returns the current state.
    pub fn state(&self) -> ArmState {
        self.state
    }

    /// Returns the mixer sub-stage while [`ArmState::Mixing`].
    pub fn mix_phase(&self) -> Option<MixPhase> {
        self.mix_phase
    }

    pub fn config(&self) -> &ArmConfig<I::Duration> {
        &self.config
    }

    /// Returns the time source the sequencer measures against.
    pub fn time_source(&self) -> &'t T {
        self.time_source
    }

    /// Advances the state machine by at most one transition or one motion
    /// step.
    ///
    /// # Returns
    /// * `Ok(state)` - State after this poll
    /// * `Err` - Endstop read or mixer write failed; state unchanged
    pub fn poll(&mut self) -> Result<ArmState, ArmError> {
        match self.state {
            ArmState::WaitingForDependency => {}
            ArmState::Unknown => self.transition(ArmState::AscendingToUpper),
            ArmState::AtUpperLimit => {
                if self.run_requested {
                    self.transition(ArmState::DescendingToLower);
                }
            }
            ArmState::DescendingToLower => {
                if !self.run_requested {
                    self.transition(ArmState::AscendingToUpper);
                } else if self.endstop_reached(Endstop::Lower)? {
                    self.transition(ArmState::AtLowerLimit);
                } else {
                    self.actuator.step(i32::from(self.config.step_size));
                }
            }
            ArmState::AtLowerLimit => {
                if !self.run_requested {
                    self.transition(ArmState::AscendingToUpper);
                } else if self.timer_elapsed(self.config.lower_settle) {
                    self.set_mixer(true)?;
                    self.transition(ArmState::Mixing);
                }
            }
            ArmState::Mixing => self.poll_mixing()?,
            ArmState::AscendingToUpper => {
                if self.endstop_reached(Endstop::Upper)? {
                    self.transition(ArmState::AtUpperLimit);
                } else {
                    self.actuator.step(-i32::from(self.config.step_size));
                }
            }
        }
        Ok(self.state)
    }

    fn poll_mixing(&mut self) -> Result<(), ArmError> {
        match self.mix_phase {
            Some(MixPhase::MixerOn) => {
                if self.timer_elapsed(self.config.mix_duration) {
                    self.set_mixer(false)?;
                    self.enter_phase(MixPhase::MixerSettling);
                }
            }
            Some(MixPhase::MixerSettling) => {
                if self.timer_elapsed(self.config.mixer_settle) {
                    // One mix per run request; a start latched during the
                    // mix becomes the next request.
                    self.run_requested = self.restart_pending;
                    if core::mem::take(&mut self.restart_pending) {
                        self.transition(ArmState::Unknown);
                    } else {
                        self.transition(ArmState::AscendingToUpper);
                    }
                }
            }
            None => self.enter_phase(MixPhase::MixerOn),
        }
        Ok(())
    }

    fn transition(&mut self, next: ArmState) {
        if next != self.state {
            info!("arm: {:?} -> {:?}", self.state, next);
        }
        self.state = next;
        match next {
            ArmState::AtLowerLimit => self.timer_start = Some(self.time_source.now()),
            ArmState::Mixing => self.enter_phase(MixPhase::MixerOn),
            _ => {
                self.mix_phase = None;
                self.timer_start = None;
            }
        }
    }

    fn enter_phase(&mut self, phase: MixPhase) {
        debug!("arm: mix phase {:?}", phase);
        self.mix_phase = Some(phase);
        self.timer_start = Some(self.time_source.now());
    }

    fn timer_elapsed(&mut self, threshold: I::Duration) -> bool {
        let now = self.time_source.now();
        match self.timer_start {
            Some(start) => now.has_elapsed(start, threshold),
            None => {
                self.timer_start = Some(now);
                false
            }
        }
    }

    fn endstop_reached(&mut self, endstop: Endstop) -> Result<bool, ArmError> {
        let reading = match endstop {
            Endstop::Lower => self.lower_endstop.is_high().map_err(|e| e.kind()),
            Endstop::Upper => self.upper_endstop.is_high().map_err(|e| e.kind()),
        };
        reading.map_err(|kind| {
            warn!("arm: {:?} endstop read failed", endstop);
            ArmError::Endstop { endstop, kind }
        })
    }

    fn set_mixer(&mut self, on: bool) -> Result<(), ArmError> {
        let result = if on {
            self.mixer.set_high()
        } else {
            self.mixer.set_low()
        };
        result.map_err(|e| {
            warn!("arm: mixer write failed");
            ArmError::Mixer(e.kind())
        })
    }
}
