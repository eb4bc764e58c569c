//! # Flight control library.
//!
//! This library allows other crates in the workspace to access items defined inside the flight
//! control crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Auto mapper module - maps the active waypoint onto setpoints and constraints for the position
/// controller
pub mod auto_mapper;

/// Simulated vehicle - a kinematic stand-in for the estimator, distance sensor and position
/// controller, used to exercise the mapper without hardware
pub mod sim_vehicle;
