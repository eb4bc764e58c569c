//! Land setpoint generation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{AxisSetpoint, Constraints, GenContext, LandingGear, Setpoint, SetpointVector};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Generate the setpoints for a land waypoint.
///
/// The horizontal position of the target is held while descending at the
/// landing speed. Tilt and descent speed are limited for landing and the
/// landing gear is lowered.
pub fn calc_land(
    ctx: &GenContext,
    setpoint: Setpoint,
    constraints: Constraints,
) -> (Setpoint, Constraints) {
    let land_speed_ms = ctx.params.land_speed_ms;

    let setpoint = Setpoint {
        position_m: SetpointVector::new(
            AxisSetpoint::from_nan(ctx.target_m.x),
            AxisSetpoint::from_nan(ctx.target_m.y),
            AxisSetpoint::Unconstrained,
        ),
        velocity_ms: SetpointVector::new(
            AxisSetpoint::Unconstrained,
            AxisSetpoint::Unconstrained,
            AxisSetpoint::from_nan(land_speed_ms),
        ),
        ..setpoint
    };

    let constraints = Constraints {
        tilt_rad: ctx.params.tilt_max_land_rad,
        speed_down_ms: land_speed_ms,
        landing_gear: LandingGear::Down,
        ..constraints
    };

    (setpoint, constraints)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::auto_mapper::{Params, VehicleState};
    use nalgebra::Vector3;

    #[test]
    fn test_calc_land() {
        let vehicle = VehicleState {
            position_m: Vector3::new(0.0, 0.0, -20.0),
            velocity_ms: Vector3::zeros(),
        };
        let params = Params::default();
        let target = Vector3::new(4.0, 5.0, -6.0);
        let ctx = GenContext {
            vehicle: &vehicle,
            target_m: &target,
            params: &params,
            alt_above_ground_m: 20.0,
        };
        let defaults = Constraints::defaults(&params);

        let (sp, c) = calc_land(&ctx, Setpoint::default(), defaults);

        assert_eq!(sp.position_m.x(), AxisSetpoint::Constrained(4.0));
        assert_eq!(sp.position_m.y(), AxisSetpoint::Constrained(5.0));
        assert_eq!(sp.position_m.z(), AxisSetpoint::Unconstrained);
        assert_eq!(sp.velocity_ms.x(), AxisSetpoint::Unconstrained);
        assert_eq!(sp.velocity_ms.y(), AxisSetpoint::Unconstrained);
        assert_eq!(sp.velocity_ms.z(), AxisSetpoint::Constrained(params.land_speed_ms));

        // Thrust is untouched
        assert!(sp.thrust.is_unconstrained());

        assert_eq!(c.tilt_rad, params.tilt_max_land_rad);
        assert_eq!(c.speed_down_ms, params.land_speed_ms);
        assert_eq!(c.speed_up_ms, defaults.speed_up_ms);
        assert_eq!(c.landing_gear, LandingGear::Down);
    }
}
