//! Line following (loiter and position) setpoint generation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{Constraints, GenContext, Setpoint};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Generate the setpoints for a line following waypoint.
///
/// The setpoint seeded from the vehicle state when line following began is
/// held, and the default constraints are kept.
pub fn calc_line(
    _ctx: &GenContext,
    setpoint: Setpoint,
    constraints: Constraints,
) -> (Setpoint, Constraints) {
    // TODO: interpolate the position setpoint along the line from the
    // previous waypoint to the target, using the speed at target.
    (setpoint, constraints)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::auto_mapper::{Params, SetpointVector, VehicleState};
    use nalgebra::Vector3;

    #[test]
    fn test_calc_line_holds() {
        let vehicle = VehicleState {
            position_m: Vector3::new(1.0, 1.0, -5.0),
            velocity_ms: Vector3::new(1.0, 0.0, 0.0),
        };
        let params = Params::default();
        let target = Vector3::new(10.0, 0.0, -5.0);
        let ctx = GenContext {
            vehicle: &vehicle,
            target_m: &target,
            params: &params,
            alt_above_ground_m: 5.0,
        };

        let held = Setpoint {
            position_m: SetpointVector::from_vector(&Vector3::new(0.0, 0.0, -5.0)),
            velocity_ms: SetpointVector::from_vector(&Vector3::zeros()),
            thrust: SetpointVector::unconstrained(),
        };
        let defaults = Constraints::defaults(&params);

        assert_eq!(calc_line(&ctx, held, defaults), (held, defaults));
    }
}
