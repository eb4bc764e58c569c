//! Idle setpoint generation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{Constraints, GenContext, Setpoint, SetpointVector};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Generate the setpoints for an idle waypoint.
///
/// Idle is the only waypoint type which demands a thrust, which is zero. No
/// position or velocity is demanded and the constraints are left unchanged.
pub fn calc_idle(
    _ctx: &GenContext,
    _setpoint: Setpoint,
    constraints: Constraints,
) -> (Setpoint, Constraints) {
    let setpoint = Setpoint {
        position_m: SetpointVector::unconstrained(),
        velocity_ms: SetpointVector::unconstrained(),
        thrust: SetpointVector::zeros(),
    };

    (setpoint, constraints)
}
