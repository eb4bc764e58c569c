//! Main flight control executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Mission script processing
//!         - Parameter reload if the parameter file changed
//!         - Auto mapper processing
//!         - Simulated vehicle step
//!         - Archive writing
//!
//! # Usage
//!
//! `fc_exec <script>`, where the script contains timed waypoint commands, for example
//!
//! ```text
//! 1.0: {"wp_type": "takeoff", "target_m": [0.0, 0.0, -10.0]};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{Report, eyre::{WrapErr, eyre}};
use log::{debug, info, warn};
use nalgebra::Vector3;
use std::env;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant, SystemTime};

// Internal
use fc_lib::{
    auto_mapper::{AutoMapper, InputData, Params, WaypointCmd, WaypointType},
    sim_vehicle::{SimVehicle, SimVehicleParams},
};
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    module::{Activate, State},
    params,
    script_interpreter::{Pending, ScriptInterpreter},
    session::Session,
    time,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.02;

/// Parameter file of the auto mapper, relative to the params directory.
const AUTO_MAPPER_PARAMS: &str = "auto_mapper.toml";

/// Parameter file of the simulated vehicle, relative to the params directory.
const SIM_VEHICLE_PARAMS: &str = "sim_vehicle.toml";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Watches a parameter file for modifications.
struct ParamWatcher {
    path: PathBuf,
    last_modified: Option<SystemTime>,
}

impl ParamWatcher {
    fn new(param_file_path: &str) -> Result<Self, params::LoadError> {
        let path = params::get_path(param_file_path)?;
        let last_modified = params::modified_time(&path).ok();

        Ok(Self { path, last_modified })
    }

    /// Returns the new parameters if the file has changed since the last check.
    fn poll(&mut self) -> Result<Option<Params>, params::LoadError> {
        let modified = params::modified_time(&self.path)?;

        if Some(modified) == self.last_modified {
            return Ok(None)
        }

        self.last_modified = Some(modified);
        params::load_from_path(&self.path).map(Some)
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "fc_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(
        LevelFilter::Debug,
        &[("fc_lib::auto_mapper", LevelFilter::Debug)],
        &session
    ).wrap_err("Failed to initialise logging")?;

    info!("Flight Control Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD SCRIPT ----

    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    if args.len() != 2 {
        return Err(eyre!(
            "Expected one argument (the mission script path), found {}", args.len() - 1)
        );
    }

    info!("Loading script from \"{}\"", &args[1]);

    let mut script: ScriptInterpreter<WaypointCmd> = ScriptInterpreter::new(&args[1])
        .wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} commands\n",
        script.get_duration(),
        script.get_num_cmds()
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let sim_params: SimVehicleParams = params::load(SIM_VEHICLE_PARAMS)
        .wrap_err("Could not load the simulated vehicle params")?;
    let mut sim = SimVehicle::new(sim_params);
    info!("SimVehicle init complete");

    let mut auto_mapper = AutoMapper::default();
    auto_mapper.init(AUTO_MAPPER_PARAMS, &session)
        .wrap_err("Failed to initialise AutoMapper")?;
    session.save_json("params/auto_mapper.json", auto_mapper.params())
        .wrap_err("Failed to save the AutoMapper parameters")?;
    info!("AutoMapper init complete");

    let mut param_watcher = ParamWatcher::new(AUTO_MAPPER_PARAMS)
        .wrap_err("Failed to watch the AutoMapper parameters")?;

    info!("Module initialisation complete\n");

    // The vehicle starts idle at its initial position until the script says
    // otherwise.
    let initial_pos_m = sim.state().position_m;
    let mut wp_cmd = WaypointCmd {
        wp_type: WaypointType::Idle,
        target_m: [initial_pos_m.x, initial_pos_m.y, initial_pos_m.z],
    };

    auto_mapper.activate(&sim.state());

    // ---- MAIN LOOP ----

    info!("Beginning main loop\n");

    let cycles_per_second = time::cycles_per_second(CYCLE_PERIOD_S);
    let mut num_cycles: u64 = 0;

    loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();
        let is_1_hz_cycle = num_cycles % cycles_per_second == 0;

        // ---- SCRIPT PROCESSING ----

        match script.get_pending_now() {
            Pending::None => (),
            Pending::Some(cmds) => {
                for cmd in cmds {
                    info!("New waypoint: {:?} at {:?}", cmd.wp_type, cmd.target_m);
                    wp_cmd = cmd;
                }
            },
            Pending::EndOfScript => {
                info!("End of script reached, stopping");
                break
            }
        }

        // ---- PARAMETER RELOAD ----

        if is_1_hz_cycle {
            match param_watcher.poll() {
                Ok(Some(p)) => {
                    auto_mapper.update_params(p);
                    session.save_json_with_timestamp(
                        "params/auto_mapper.json",
                        auto_mapper.params()
                    );
                },
                Ok(None) => (),
                Err(e) => warn!("Could not reload the AutoMapper parameters: {}", e)
            }
        }

        // ---- AUTO MAPPER PROCESSING ----

        let input = InputData {
            vehicle: sim.state(),
            target_m: wp_cmd.target(),
            wp_type: wp_cmd.wp_type,
            dist_to_ground_m: sim.dist_to_ground_m(),
            home_alt_m: sim.home_alt_m(),
        };

        match auto_mapper.proc(&input) {
            Ok((output, report)) => {
                if report.reset {
                    debug!("Setpoints reset on entering {:?}", report.wp_type);
                }
                sim.step(&output, CYCLE_PERIOD_S);
            },
            Err(e) => warn!("Error during AutoMapper processing: {}", e)
        }

        if is_1_hz_cycle {
            let pos: Vector3<f64> = sim.state().position_m;
            info!(
                "Vehicle at [{:.2}, {:.2}, {:.2}] m, {:.2} m above ground",
                pos.x, pos.y, pos.z, auto_mapper.alt_above_ground_m()
            );
        }

        // ---- WRITE ARCHIVES ----

        if let Err(e) = auto_mapper.write() {
            warn!("Could not write AutoMapper archives: {}", e);
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S)
            .checked_sub(cycle_dur)
        {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
            )
        }

        num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    auto_mapper.deactivate();

    info!("End of execution after {} cycles", num_cycles);

    Ok(())
}
