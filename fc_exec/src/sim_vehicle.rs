//! # Simulated vehicle
//!
//! A first order kinematic point mass which follows the AutoMapper output, standing in for the
//! state estimator, the distance sensor and the position controller.
//!
//! Each cycle the demanded velocity on each axis is taken from the velocity setpoint if it is
//! constrained, otherwise from a proportional controller on the position setpoint, otherwise
//! zero. The demand is limited by the cycle's constraints and applied instantaneously.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;
use nalgebra::{Vector2, Vector3};
use serde::Deserialize;

use crate::auto_mapper::{OutputData, VehicleState};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the simulated vehicle.
#[derive(Debug, Clone, Deserialize)]
pub struct SimVehicleParams {
    /// Proportional gain from position error to velocity demand.
    ///
    /// Units: 1/second
    pub pos_gain: f64,

    /// Maximum range of the distance sensor, above which no measurement is produced.
    ///
    /// Units: meters
    pub rangefinder_max_m: f64,

    /// Down position of the home position, if the home position is valid.
    ///
    /// Units: meters,
    /// Frame: Local NED
    pub home_alt_m: Option<f64>,

    /// Initial position of the vehicle.
    ///
    /// Units: meters,
    /// Frame: Local NED
    pub initial_position_m: [f64; 3],
}

/// The simulated vehicle.
#[derive(Debug, Clone)]
pub struct SimVehicle {
    params: SimVehicleParams,

    state: VehicleState,

    on_ground: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimVehicle {
    pub fn new(params: SimVehicleParams) -> Self {
        let p = params.initial_position_m;

        let mut sim = Self {
            params,
            state: VehicleState {
                position_m: Vector3::new(p[0], p[1], p[2]),
                velocity_ms: Vector3::zeros(),
            },
            on_ground: false,
        };
        sim.on_ground = sim.state.position_m.z >= 0.0;

        sim
    }

    /// The current state of the vehicle, as an estimator would report it.
    pub fn state(&self) -> VehicleState {
        self.state
    }

    /// Distance to ground measurement, or `None` if out of range.
    pub fn dist_to_ground_m(&self) -> Option<f64> {
        let height_m = -self.state.position_m.z;

        if height_m <= self.params.rangefinder_max_m {
            Some(height_m.max(0.0))
        }
        else {
            None
        }
    }

    pub fn home_alt_m(&self) -> Option<f64> {
        self.params.home_alt_m
    }

    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    /// Advance the simulation by one cycle of length `dt_s` following the given mapper output.
    pub fn step(&mut self, output: &OutputData, dt_s: f64) {
        let sp = &output.setpoint;
        let con = &output.constraints;

        let mut vel_dem = Vector3::zeros();

        for i in 0..3 {
            vel_dem[i] = match (sp.velocity_ms.0[i].value(), sp.position_m.0[i].value()) {
                (Some(v), _) => v,
                (None, Some(p)) => self.params.pos_gain * (p - self.state.position_m[i]),
                (None, None) => 0.0,
            };
        }

        // Limit horizontal speed
        let vel_xy = Vector2::new(vel_dem.x, vel_dem.y);
        let speed_xy = vel_xy.norm();
        if speed_xy > con.speed_xy_ms && speed_xy > 0.0 {
            let scaled = vel_xy * (con.speed_xy_ms / speed_xy);
            vel_dem.x = scaled.x;
            vel_dem.y = scaled.y;
        }

        // Limit vertical speed, up is negative
        vel_dem.z = util::maths::clamp(vel_dem.z, -con.speed_up_ms, con.speed_down_ms);

        self.state.velocity_ms = vel_dem;
        self.state.position_m += vel_dem * dt_s;

        // The ground stops the vehicle
        let on_ground = self.state.position_m.z >= 0.0;
        if on_ground {
            self.state.position_m.z = 0.0;
            self.state.velocity_ms = Vector3::zeros();
        }

        if on_ground != self.on_ground {
            debug!("Simulated vehicle {}", if on_ground { "landed" } else { "took off" });
            self.on_ground = on_ground;
        }
    }
}
