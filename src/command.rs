//! Command-based control for the mixing station.

use crate::indicator::Mode;

/// Actions accepted by [`Station`](crate::station::Station).
///
/// Lets control requests be produced in one place (a serial handler, a button
/// task) and applied by the control loop at a poll boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StationAction {
    /// Request a full mix cycle.
    StartSequence,
    /// Withdraw the run request.
    StopSequence,
    /// Freeze the arm while the pump is busy.
    WaitForDependency,
    /// Release the pump hold.
    ResumeAfterDependency,
    /// Pin the light strip to a mode regardless of the arm state.
    SetMode(Mode),
    /// Go back to deriving the light mode from the arm state.
    ClearModeOverride,
}
