//! Module interfaces
//!
//! Cyclic flight modules are driven by the executable in two phases. `State`
//! covers loading the module (`init`) and running it once per control cycle
//! (`proc`). Modules which may only run while engaged, such as the auto
//! mapper during an autonomous mission, also implement `Activate`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::session::Session;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Init and cyclic processing interface of a module.
pub trait State {
    /// Passed to `init`, usually the module's parameter file name.
    type InitData;
    type InitError;

    type InputData;
    type OutputData;
    type StatusReport;
    type ProcError;

    /// Load parameters and set up archives in the given session.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Run one control cycle.
    ///
    /// Returns the output for downstream modules together with a report
    /// describing what happened during the cycle.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}

/// Engage/disengage interface for modules whose state must be seeded before
/// processing.
pub trait Activate {
    /// Data the module is seeded from, e.g. the current vehicle state.
    type ActivationData;

    /// Engage the module, discarding any state left from an earlier
    /// activation.
    fn activate(&mut self, data: &Self::ActivationData);

    /// Disengage the module. Processing must fail until the next activation.
    fn deactivate(&mut self);

    fn is_active(&self) -> bool;
}
