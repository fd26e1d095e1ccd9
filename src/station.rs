//! Control-loop composition of the arm and the status light.
//!
//! [`Station`] owns one [`ArmSequencer`] and one [`StatusIndicator`] and acts
//! as the mediator between them: it derives the light mode from the arm
//! state on every poll. The two components never see each other.

use crate::arm::{Actuator, ArmError, ArmSequencer, ArmState};
use crate::command::StationAction;
use crate::indicator::{LightStrip, Mode, StatusIndicator};
use crate::time::{TimeInstant, TimeSource};
use embedded_hal::digital::{InputPin, OutputPin};
use heapless::Deque;

/// Light mode that reflects an arm state.
///
/// `running` is the arm's run request. A parked or unhomed arm shows
/// [`Mode::Idle`] unless a run is pending; every other state shows
/// [`Mode::Working`].
pub fn mode_for_arm(state: ArmState, running: bool) -> Mode {
    match state {
        ArmState::Unknown | ArmState::AtUpperLimit if !running => Mode::Idle,
        _ => Mode::Working,
    }
}

/// Arm sequencer plus status light, polled together.
///
/// # Type Parameters
/// * `Q` - Capacity of the pending action queue
pub struct Station<'t, I, A, L, U, M, T, S, const Q: usize>
where
    I: TimeInstant,
    A: Actuator,
    L: InputPin,
    U: InputPin,
    M: OutputPin,
    T: TimeSource<I>,
    S: LightStrip,
{
    arm: ArmSequencer<'t, I, A, L, U, M, T>,
    indicator: StatusIndicator<I, S>,
    mode_override: Option<Mode>,
    pending: Deque<StationAction, Q>,
    fault: Option<ArmError>,
}

impl<'t, I, A, L, U, M, T, S, const Q: usize> Station<'t, I, A, L, U, M, T, S, Q>
where
    I: TimeInstant,
    A: Actuator,
    L: InputPin,
    U: InputPin,
    M: OutputPin,
    T: TimeSource<I>,
    S: LightStrip,
{
    pub fn new(arm: ArmSequencer<'t, I, A, L, U, M, T>, indicator: StatusIndicator<I, S>) -> Self {
        Self {
            arm,
            indicator,
            mode_override: None,
            pending: Deque::new(),
            fault: None,
        }
    }

    /// Applies an action immediately.
    pub fn handle_action(&mut self, action: StationAction) {
        debug!("station: {:?}", action);
        match action {
            StationAction::StartSequence => self.arm.start_sequence(),
            StationAction::StopSequence => self.arm.stop_sequence(),
            StationAction::WaitForDependency => self.arm.wait_for_external_dependency(),
            StationAction::ResumeAfterDependency => self.arm.resume_after_dependency(),
            StationAction::SetMode(mode) => self.mode_override = Some(mode),
            StationAction::ClearModeOverride => self.mode_override = None,
        }
    }

    /// Queues an action to be applied at the start of the next poll.
    ///
    /// # Errors
    /// Returns the action back if the queue is full.
    pub fn enqueue(&mut self, action: StationAction) -> Result<(), StationAction> {
        self.pending.push_back(action)
    }

    /// Runs one control-loop iteration.
    ///
    /// Applies queued actions, polls the arm, pushes the derived (or
    /// overridden) mode into the indicator and polls the indicator. An arm
    /// fault switches the light to [`Mode::Error`] until a poll succeeds.
    ///
    /// The light is rendered even when the arm reports a fault.
    pub fn poll(&mut self) -> Result<ArmState, ArmError> {
        while let Some(action) = self.pending.pop_front() {
            self.handle_action(action);
        }

        let result = self.arm.poll();
        self.fault = result.err();

        let derived = match self.fault {
            Some(_) => Mode::Error,
            None => mode_for_arm(self.arm.state(), self.arm.is_running()),
        };
        self.indicator.set_mode(self.mode_override.unwrap_or(derived));

        let now = self.arm.time_source().now();
        self.indicator.poll(now);

        result
    }

    /// Last arm fault, cleared by the next successful poll.
    pub fn fault(&self) -> Option<ArmError> {
        self.fault
    }

    pub fn mode_override(&self) -> Option<Mode> {
        self.mode_override
    }

    pub fn arm(&self) -> &ArmSequencer<'t, I, A, L, U, M, T> {
        &self.arm
    }

    pub fn arm_mut(&mut self) -> &mut ArmSequencer<'t, I, A, L, U, M, T> {
        &mut self.arm
    }

    pub fn indicator(&self) -> &StatusIndicator<I, S> {
        &self.indicator
    }

    pub fn indicator_mut(&mut self) -> &mut StatusIndicator<I, S> {
        &mut self.indicator
    }
}
