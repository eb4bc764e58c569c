//! Implementations for the AutoMapper state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace};
use nalgebra::Vector3;
use serde::Serialize;

// Internal
use super::{
    alt_est, calc_idle, calc_land, calc_line, calc_takeoff, calc_velocity,
    AltSource, AutoMapperError, Constraints, GenContext, LandingGear, Params,
    Setpoint, SetpointVector, WaypointType, GEAR_UP_ALT_M};
use util::{
    params,
    module::{Activate, State},
    archive::{Archived, ArchiveError, Archiver},
    session::{self, Session}};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Auto mapper state
///
/// Owns the live setpoint and the previous waypoint type, both of which carry
/// over between cycles. Constraints are rebuilt from the parameters every
/// cycle.
#[derive(Default)]
pub struct AutoMapper {

    pub(crate) params: Params,

    /// True once `activate` has been called.
    active: bool,

    /// The setpoint from the last cycle, or the seed after a reset.
    setpoint: Setpoint,

    /// The constraints produced by the last cycle.
    constraints: Constraints,

    /// Speed the vehicle should have when reaching the target.
    ///
    /// Units: meters/second
    speed_at_target_ms: f64,

    /// Waypoint type of the last cycle, `None` straight after activation.
    type_previous: Option<WaypointType>,

    /// Altitude above ground of the last cycle.
    ///
    /// Units: meters
    alt_above_ground_m: f64,

    /// Source of the last altitude estimate.
    alt_source: Option<AltSource>,

    report: StatusReport,

    last_record: Option<ArchRecord>,
    arch_output: Archiver
}

/// Current estimated state of the vehicle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct VehicleState {
    /// Units: meters,
    /// Frame: Local NED
    pub position_m: Vector3<f64>,

    /// Units: meters/second,
    /// Frame: Local NED
    pub velocity_ms: Vector3<f64>,
}

/// Input data to the AutoMapper.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputData {
    /// Current estimated state of the vehicle
    pub vehicle: VehicleState,

    /// Target position of the active waypoint.
    ///
    /// Units: meters,
    /// Frame: Local NED
    pub target_m: Vector3<f64>,

    /// Type of the active waypoint
    pub wp_type: WaypointType,

    /// Distance to ground measurement, `None` or NaN if not available.
    ///
    /// Units: meters
    pub dist_to_ground_m: Option<f64>,

    /// Down position of the home position, `None` if the home altitude is
    /// not valid.
    ///
    /// Units: meters,
    /// Frame: Local NED
    pub home_alt_m: Option<f64>,
}

/// Output data from the AutoMapper, to be executed by the position controller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OutputData {
    pub setpoint: Setpoint,
    pub constraints: Constraints,
}

/// Status report for AutoMapper processing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// Waypoint type processed this cycle
    pub wp_type: WaypointType,

    /// Waypoint type of the previous cycle
    pub wp_type_previous: Option<WaypointType>,

    /// True if the setpoints were reset to the vehicle state this cycle
    pub reset: bool,

    /// True if the thrust setpoint was cleared on leaving idle
    pub thrust_reset: bool,

    /// True if the landing gear was raised due to altitude
    pub gear_raised: bool,

    /// Units: meters
    pub alt_above_ground_m: f64,

    pub alt_source: AltSource,
}

/// A single flattened archive row.
#[derive(Clone, Copy, Debug, Serialize)]
struct ArchRecord {
    time_s: f64,
    wp_type: WaypointType,
    reset: bool,
    thrust_reset: bool,
    alt_above_ground_m: f64,
    alt_source: AltSource,
    pos_x_m: f64,
    pos_y_m: f64,
    pos_z_m: f64,
    pos_sp_x_m: f64,
    pos_sp_y_m: f64,
    pos_sp_z_m: f64,
    vel_sp_x_ms: f64,
    vel_sp_y_ms: f64,
    vel_sp_z_ms: f64,
    thrust_sp_x: f64,
    thrust_sp_y: f64,
    thrust_sp_z: f64,
    tilt_rad: f64,
    speed_xy_ms: f64,
    speed_up_ms: f64,
    speed_down_ms: f64,
    landing_gear: LandingGear,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for AutoMapper {
    type InitData = &'static str;
    type InitError = AutoMapperError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = AutoMapperError;

    /// Initialise the AutoMapper module.
    ///
    /// Expected init data is the path to the parameter file. The mapper must
    /// still be activated before it can be processed.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        let params: Params = params::load(init_data)
            .map_err(AutoMapperError::ParamLoadError)?;
        self.params = params.validated();

        self.arch_output = Archiver::from_path(session, "auto_mapper/output.csv")
            .map_err(AutoMapperError::ArchiveInitError)?;

        Ok(())
    }

    /// Perform cyclic processing of the AutoMapper.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        if !self.active {
            return Err(AutoMapperError::NotActive)
        }

        let wp_type = input_data.wp_type;

        // Clear the status report
        self.report = StatusReport {
            wp_type,
            wp_type_previous: self.type_previous,
            ..StatusReport::default()
        };

        // Constraints may have been changed by the last generator so always
        // start from the defaults.
        self.constraints = Constraints::defaults(&self.params);

        self.update_alt_above_ground(input_data);

        if self.type_previous != Some(wp_type) {
            info!("Waypoint type changed: {:?} -> {:?}", self.type_previous, wp_type);
        }

        // First cycle of following a line, the setpoints start from the
        // current vehicle state. Switching between loiter and position is not
        // a new line.
        let follow_line = wp_type.is_line_following();
        let follow_line_prev = self.type_previous
            .map(|t| t.is_line_following())
            .unwrap_or(false);

        if follow_line && !follow_line_prev {
            self.reset(&input_data.vehicle);
            self.report.reset = true;
        }

        // Only idle sends out a thrust, so it must not leak into the next
        // waypoint type.
        if self.type_previous == Some(WaypointType::Idle) && wp_type != WaypointType::Idle {
            self.setpoint.thrust = SetpointVector::unconstrained();
            self.report.thrust_reset = true;
        }

        let ctx = GenContext {
            vehicle: &input_data.vehicle,
            target_m: &input_data.target_m,
            params: &self.params,
            alt_above_ground_m: self.alt_above_ground_m,
        };

        let (setpoint, constraints) = match wp_type {
            WaypointType::Idle => calc_idle(&ctx, self.setpoint, self.constraints),
            WaypointType::Land => calc_land(&ctx, self.setpoint, self.constraints),
            WaypointType::Loiter | WaypointType::Position =>
                calc_line(&ctx, self.setpoint, self.constraints),
            WaypointType::Takeoff => calc_takeoff(&ctx, self.setpoint, self.constraints),
            WaypointType::Velocity => calc_velocity(&ctx, self.setpoint, self.constraints),
        };

        self.setpoint = setpoint;
        self.constraints = constraints;

        self.apply_gear_policy();

        self.type_previous = Some(wp_type);

        let output = OutputData {
            setpoint: self.setpoint,
            constraints: self.constraints
        };

        trace!("AutoMapper output:\n    pos: {:?}\n    vel: {:?}\n    thr: {:?}\n    con: {:?}",
            output.setpoint.position_m.to_nan_array(),
            output.setpoint.velocity_ms.to_nan_array(),
            output.setpoint.thrust.to_nan_array(),
            output.constraints);

        self.last_record = Some(ArchRecord::new(input_data, &output, &self.report));

        Ok((output, self.report))
    }
}

impl Archived for AutoMapper {
    fn write(&mut self) -> Result<(), ArchiveError> {
        match self.last_record.take() {
            Some(r) => self.arch_output.serialise(r),
            None => Ok(())
        }
    }
}

impl Activate for AutoMapper {
    type ActivationData = VehicleState;

    /// Activate the mapper.
    ///
    /// All setpoints are seeded from the current vehicle state and the
    /// previous waypoint type is forgotten, regardless of any earlier
    /// activation.
    fn activate(&mut self, vehicle: &VehicleState) {
        self.reset(vehicle);
        self.setpoint.thrust = SetpointVector::unconstrained();
        self.type_previous = None;
        self.alt_source = None;
        self.active = true;

        info!("AutoMapper activated at {:?}", vehicle.position_m);
    }

    fn deactivate(&mut self) {
        if self.active {
            info!("AutoMapper deactivated");
        }
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl AutoMapper {

    /// Create a new mapper with the given parameters.
    ///
    /// The parameters are validated before use.
    pub fn new(params: Params) -> Self {
        Self {
            params: params.validated(),
            ..Self::default()
        }
    }

    /// Replace the parameters, for example after the parameter file changed.
    ///
    /// The new parameters are validated before use.
    pub fn update_params(&mut self, params: Params) {
        self.params = params.validated();
        info!("AutoMapper parameters updated");
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The current setpoint.
    pub fn setpoint(&self) -> &Setpoint {
        &self.setpoint
    }

    /// The constraints produced by the last cycle.
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn speed_at_target_ms(&self) -> f64 {
        self.speed_at_target_ms
    }

    pub fn type_previous(&self) -> Option<WaypointType> {
        self.type_previous
    }

    /// Altitude above ground computed in the last cycle.
    pub fn alt_above_ground_m(&self) -> f64 {
        self.alt_above_ground_m
    }

    /// Seed the position and velocity setpoints from the vehicle state.
    fn reset(&mut self, vehicle: &VehicleState) {
        self.setpoint.position_m = SetpointVector::from_vector(&vehicle.position_m);
        self.setpoint.velocity_ms = SetpointVector::from_vector(&vehicle.velocity_ms);
        self.speed_at_target_ms = 0.0;

        debug!("Setpoints reset to vehicle state");
    }

    /// Recompute the altitude above ground for this cycle.
    fn update_alt_above_ground(&mut self, input_data: &InputData) {
        let (alt_m, source) = alt_est::estimate_with_source(
            input_data.vehicle.position_m.z,
            input_data.dist_to_ground_m,
            input_data.home_alt_m
        );

        if self.alt_source != Some(source) {
            debug!("Altitude above ground source is now {:?}", source);
        }

        self.alt_above_ground_m = alt_m;
        self.alt_source = Some(source);

        self.report.alt_above_ground_m = alt_m;
        self.report.alt_source = source;
    }

    /// Raise the landing gear once high enough.
    ///
    /// An explicit gear down from the generator (land and takeoff) is never
    /// overridden.
    fn apply_gear_policy(&mut self) {
        if self.alt_above_ground_m > GEAR_UP_ALT_M
            && self.constraints.landing_gear != LandingGear::Down
        {
            self.constraints.landing_gear = LandingGear::Up;
            self.report.gear_raised = true;
        }
    }
}

impl ArchRecord {
    fn new(input: &InputData, output: &OutputData, report: &StatusReport) -> Self {
        let pos_sp = output.setpoint.position_m.to_nan_array();
        let vel_sp = output.setpoint.velocity_ms.to_nan_array();
        let thr_sp = output.setpoint.thrust.to_nan_array();

        Self {
            time_s: session::get_elapsed_seconds(),
            wp_type: report.wp_type,
            reset: report.reset,
            thrust_reset: report.thrust_reset,
            alt_above_ground_m: report.alt_above_ground_m,
            alt_source: report.alt_source,
            pos_x_m: input.vehicle.position_m.x,
            pos_y_m: input.vehicle.position_m.y,
            pos_z_m: input.vehicle.position_m.z,
            pos_sp_x_m: pos_sp[0],
            pos_sp_y_m: pos_sp[1],
            pos_sp_z_m: pos_sp[2],
            vel_sp_x_ms: vel_sp[0],
            vel_sp_y_ms: vel_sp[1],
            vel_sp_z_ms: vel_sp[2],
            thrust_sp_x: thr_sp[0],
            thrust_sp_y: thr_sp[1],
            thrust_sp_z: thr_sp[2],
            tilt_rad: output.constraints.tilt_rad,
            speed_xy_ms: output.constraints.speed_xy_ms,
            speed_up_ms: output.constraints.speed_up_ms,
            speed_down_ms: output.constraints.speed_down_ms,
            landing_gear: output.constraints.landing_gear,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::auto_mapper::AxisSetpoint;

    fn vehicle(position_m: [f64; 3], velocity_ms: [f64; 3]) -> VehicleState {
        VehicleState {
            position_m: Vector3::new(position_m[0], position_m[1], position_m[2]),
            velocity_ms: Vector3::new(velocity_ms[0], velocity_ms[1], velocity_ms[2]),
        }
    }

    fn input(wp_type: WaypointType, vehicle: VehicleState) -> InputData {
        InputData {
            vehicle,
            target_m: Vector3::new(10.0, 20.0, -30.0),
            wp_type,
            dist_to_ground_m: None,
            home_alt_m: None,
        }
    }

    fn active_mapper(vehicle: &VehicleState) -> AutoMapper {
        let mut mapper = AutoMapper::new(Params::default());
        mapper.activate(vehicle);
        mapper
    }

    #[test]
    fn test_not_active() {
        let mut mapper = AutoMapper::new(Params::default());
        let v = VehicleState::default();

        match mapper.proc(&input(WaypointType::Idle, v)) {
            Err(AutoMapperError::NotActive) => (),
            r => panic!("Expected NotActive, got {:?}", r)
        }

        mapper.activate(&v);
        assert!(mapper.proc(&input(WaypointType::Idle, v)).is_ok());

        assert!(mapper.is_active());

        mapper.deactivate();
        assert!(!mapper.is_active());
        assert!(mapper.proc(&input(WaypointType::Idle, v)).is_err());
    }

    #[test]
    fn test_activation_resets() {
        let v0 = vehicle([1.0, 2.0, -3.0], [0.1, 0.2, 0.3]);
        let mut mapper = active_mapper(&v0);

        assert_eq!(mapper.setpoint().position_m, SetpointVector::from_vector(&v0.position_m));
        assert_eq!(mapper.setpoint().velocity_ms, SetpointVector::from_vector(&v0.velocity_ms));
        assert!(mapper.setpoint().thrust.is_unconstrained());
        assert_eq!(mapper.speed_at_target_ms(), 0.0);
        assert_eq!(mapper.type_previous(), None);

        // Fly some cycles then re-activate somewhere else
        mapper.proc(&input(WaypointType::Idle, v0)).unwrap();
        mapper.proc(&input(WaypointType::Takeoff, v0)).unwrap();

        let v1 = vehicle([5.0, -5.0, -15.0], [1.0, 0.0, 0.0]);
        mapper.activate(&v1);

        assert_eq!(mapper.setpoint().position_m, SetpointVector::from_vector(&v1.position_m));
        assert_eq!(mapper.setpoint().velocity_ms, SetpointVector::from_vector(&v1.velocity_ms));
        assert_eq!(mapper.speed_at_target_ms(), 0.0);
        assert_eq!(mapper.type_previous(), None);
    }

    #[test]
    fn test_line_reset_once() {
        let v0 = vehicle([0.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
        let mut mapper = active_mapper(&v0);

        let (_, r) = mapper.proc(&input(WaypointType::Takeoff, v0)).unwrap();
        assert!(!r.reset);

        // First loiter tick resets to the vehicle state
        let v1 = vehicle([0.5, 0.5, -10.0], [0.0, 0.0, -0.2]);
        let (o, r) = mapper.proc(&input(WaypointType::Loiter, v1)).unwrap();
        assert!(r.reset);
        assert_eq!(o.setpoint.position_m, SetpointVector::from_vector(&v1.position_m));
        assert_eq!(o.setpoint.velocity_ms, SetpointVector::from_vector(&v1.velocity_ms));

        // Later loiter ticks, and switching to position, hold the seed
        let v2 = vehicle([1.0, 1.0, -11.0], [0.3, 0.0, 0.0]);
        let (o, r) = mapper.proc(&input(WaypointType::Loiter, v2)).unwrap();
        assert!(!r.reset);
        assert_eq!(o.setpoint.position_m, SetpointVector::from_vector(&v1.position_m));

        let (o, r) = mapper.proc(&input(WaypointType::Position, v2)).unwrap();
        assert!(!r.reset);
        assert_eq!(o.setpoint.position_m, SetpointVector::from_vector(&v1.position_m));

        let (_, r) = mapper.proc(&input(WaypointType::Loiter, v2)).unwrap();
        assert!(!r.reset);

        // Leaving and re-entering line following resets again
        mapper.proc(&input(WaypointType::Velocity, v2)).unwrap();
        let (o, r) = mapper.proc(&input(WaypointType::Position, v2)).unwrap();
        assert!(r.reset);
        assert_eq!(o.setpoint.position_m, SetpointVector::from_vector(&v2.position_m));
    }

    #[test]
    fn test_thrust_reset_leaving_idle() {
        let v0 = VehicleState::default();
        let mut mapper = active_mapper(&v0);

        for _ in 0..2 {
            let (o, r) = mapper.proc(&input(WaypointType::Idle, v0)).unwrap();
            assert_eq!(o.setpoint.thrust, SetpointVector::zeros());
            assert!(o.setpoint.position_m.is_unconstrained());
            assert!(o.setpoint.velocity_ms.is_unconstrained());
            assert!(!r.thrust_reset);
        }

        let (o, r) = mapper.proc(&input(WaypointType::Takeoff, v0)).unwrap();
        assert!(r.thrust_reset);
        assert!(o.setpoint.thrust.is_unconstrained());

        let (o, r) = mapper.proc(&input(WaypointType::Takeoff, v0)).unwrap();
        assert!(!r.thrust_reset);
        assert!(o.setpoint.thrust.is_unconstrained());
    }

    #[test]
    fn test_takeoff_ramp_from_dist_sensor() {
        let params = Params::default();
        let v0 = VehicleState::default();
        let mut mapper = active_mapper(&v0);

        let mut i = input(WaypointType::Takeoff, v0);

        i.dist_to_ground_m = Some(params.land_alt2_m);
        let (o, _) = mapper.proc(&i).unwrap();
        assert_eq!(o.constraints.speed_up_ms, params.z_vel_max_up_ms);

        i.dist_to_ground_m = Some(params.land_alt1_m);
        let (o, r) = mapper.proc(&i).unwrap();
        assert_eq!(o.constraints.speed_up_ms, params.takeoff_speed_ms);
        assert_eq!(r.alt_source, AltSource::DistSensor);
        assert_eq!(mapper.alt_above_ground_m(), params.land_alt1_m);
    }

    #[test]
    fn test_gear_policy() {
        let mut mapper = active_mapper(&VehicleState::default());

        // Cruise like types raise the gear above the threshold only
        let low = vehicle([0.0, 0.0, -1.5], [1.0, 0.0, 0.0]);
        let (o, r) = mapper.proc(&input(WaypointType::Velocity, low)).unwrap();
        assert_eq!(o.constraints.landing_gear, LandingGear::Keep);
        assert!(!r.gear_raised);

        let high = vehicle([0.0, 0.0, -5.0], [1.0, 0.0, 0.0]);
        let (o, r) = mapper.proc(&input(WaypointType::Velocity, high)).unwrap();
        assert_eq!(o.constraints.landing_gear, LandingGear::Up);
        assert!(r.gear_raised);

        let (o, _) = mapper.proc(&input(WaypointType::Loiter, high)).unwrap();
        assert_eq!(o.constraints.landing_gear, LandingGear::Up);

        // Exactly at the threshold is not high enough
        let at = vehicle([0.0, 0.0, -GEAR_UP_ALT_M], [0.0, 0.0, 0.0]);
        let (o, _) = mapper.proc(&input(WaypointType::Loiter, at)).unwrap();
        assert_eq!(o.constraints.landing_gear, LandingGear::Keep);

        // Land and takeoff keep the gear down whatever the altitude
        let (o, r) = mapper.proc(&input(WaypointType::Land, high)).unwrap();
        assert_eq!(o.constraints.landing_gear, LandingGear::Down);
        assert!(!r.gear_raised);

        let (o, _) = mapper.proc(&input(WaypointType::Takeoff, high)).unwrap();
        assert_eq!(o.constraints.landing_gear, LandingGear::Down);
    }

    #[test]
    fn test_constraints_reset_each_cycle() {
        let params = Params::default();
        let v = vehicle([0.0, 0.0, -1.0], [0.0, 0.0, 0.0]);
        let mut mapper = active_mapper(&v);

        let (o, _) = mapper.proc(&input(WaypointType::Land, v)).unwrap();
        assert_eq!(o.constraints.tilt_rad, params.tilt_max_land_rad);

        let (o, _) = mapper.proc(&input(WaypointType::Loiter, v)).unwrap();
        assert_eq!(o.constraints, Constraints::defaults(&params));
    }

    #[test]
    fn test_velocity_zero_horizontal() {
        let v = vehicle([0.0, 0.0, -8.0], [0.0, 0.0, 0.5]);
        let mut mapper = active_mapper(&v);

        let (o, _) = mapper.proc(&input(WaypointType::Velocity, v)).unwrap();
        assert_eq!(o.setpoint.velocity_ms.x(), AxisSetpoint::Constrained(0.0));
        assert_eq!(o.setpoint.velocity_ms.y(), AxisSetpoint::Constrained(0.0));
        assert_eq!(o.setpoint.position_m.z(), AxisSetpoint::Constrained(-8.0));
    }

    #[test]
    fn test_update_params() {
        let mut mapper = AutoMapper::new(Params {
            land_alt1_m: 1.0,
            land_alt2_m: 4.0,
            ..Params::default()
        });
        assert_eq!(mapper.params().land_alt1_m, 4.0);

        mapper.update_params(Params {
            land_alt1_m: 2.0,
            land_alt2_m: 6.0,
            ..Params::default()
        });
        assert_eq!(mapper.params().land_alt1_m, 6.0);
        assert_eq!(mapper.params().land_alt2_m, 6.0);

        mapper.update_params(Params {
            land_alt1_m: 12.0,
            land_alt2_m: 6.0,
            ..Params::default()
        });
        assert_eq!(mapper.params().land_alt1_m, 12.0);
        assert_eq!(mapper.params().land_alt2_m, 6.0);
    }

    #[test]
    fn test_archive_record() {
        let v = VehicleState::default();
        let mut mapper = active_mapper(&v);

        // Without an initialised archiver writing a record fails, but only
        // once there is a record to write.
        assert!(mapper.write().is_ok());
        mapper.proc(&input(WaypointType::Idle, v)).unwrap();
        assert!(mapper.write().is_err());
    }
}
