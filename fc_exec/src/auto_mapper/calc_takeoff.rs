//! Takeoff setpoint generation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::maths::gradual;

use super::{Constraints, GenContext, LandingGear, Setpoint, SetpointVector};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Generate the setpoints for a takeoff waypoint.
///
/// Takeoff is completely defined by the target position. The ascent speed
/// limit ramps from the default limit at `land_alt2_m` to the takeoff speed at
/// `land_alt1_m`, and the landing gear is kept down.
pub fn calc_takeoff(
    ctx: &GenContext,
    setpoint: Setpoint,
    constraints: Constraints,
) -> (Setpoint, Constraints) {
    let setpoint = Setpoint {
        position_m: SetpointVector::from_vector(ctx.target_m),
        velocity_ms: SetpointVector::unconstrained(),
        ..setpoint
    };

    let constraints = Constraints {
        speed_up_ms: gradual(
            ctx.alt_above_ground_m,
            ctx.params.land_alt2_m,
            ctx.params.land_alt1_m,
            constraints.speed_up_ms,
            ctx.params.takeoff_speed_ms,
        ),
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

    const EPS: f64 = 1e-9;

    fn speed_up_at(alt_m: f64, params: &Params) -> f64 {
        let vehicle = VehicleState {
            position_m: Vector3::new(0.0, 0.0, -alt_m),
            velocity_ms: Vector3::zeros(),
        };
        let target = Vector3::new(0.0, 0.0, -20.0);
        let ctx = GenContext {
            vehicle: &vehicle,
            target_m: &target,
            params,
            alt_above_ground_m: alt_m,
        };

        calc_takeoff(&ctx, Setpoint::default(), Constraints::defaults(params)).1.speed_up_ms
    }

    #[test]
    fn test_calc_takeoff_setpoint() {
        let params = Params::default();
        let vehicle = VehicleState::default();
        let target = Vector3::new(1.0, 2.0, -20.0);
        let ctx = GenContext {
            vehicle: &vehicle,
            target_m: &target,
            params: &params,
            alt_above_ground_m: 0.0,
        };

        let (sp, c) = calc_takeoff(&ctx, Setpoint::default(), Constraints::defaults(&params));

        assert_eq!(sp.position_m, SetpointVector::from_vector(&target));
        assert!(sp.velocity_ms.is_unconstrained());
        assert!(sp.thrust.is_unconstrained());
        assert_eq!(c.landing_gear, LandingGear::Down);
    }

    #[test]
    fn test_takeoff_ramp() {
        let params = Params::default();
        let default_up = params.z_vel_max_up_ms;
        let mid = 0.5 * (params.land_alt1_m + params.land_alt2_m);

        assert_eq!(speed_up_at(params.land_alt2_m, &params), default_up);
        assert_eq!(speed_up_at(params.land_alt1_m, &params), params.takeoff_speed_ms);
        assert!(
            (speed_up_at(mid, &params) - 0.5 * (default_up + params.takeoff_speed_ms)).abs() < EPS
        );

        // Clamped outside the ramp
        assert_eq!(speed_up_at(0.0, &params), default_up);
        assert_eq!(speed_up_at(100.0, &params), params.takeoff_speed_ms);
    }

    #[test]
    fn test_takeoff_ramp_degenerate() {
        let params = Params {
            land_alt1_m: 5.0,
            land_alt2_m: 5.0,
            ..Params::default()
        };

        assert_eq!(speed_up_at(4.99, &params), params.z_vel_max_up_ms);
        assert_eq!(speed_up_at(5.0, &params), params.takeoff_speed_ms);
        assert_eq!(speed_up_at(5.01, &params), params.takeoff_speed_ms);
    }
}
