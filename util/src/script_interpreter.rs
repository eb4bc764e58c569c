//! # Script interpreter module
//!
//! This module provides an interpreter for timed command scripts. A script is
//! a text file in which each command is written as
//!
//! ```text
//! <exec_time_s>: <json payload>;
//! ```
//!
//! The payload type is chosen by the executable, for example the flight
//! control executable uses waypoint commands. Anything not matching the
//! pattern (such as `#` comment lines) is ignored.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use serde::de::DeserializeOwned;
use thiserror::Error;

// Internal
use crate::session::get_elapsed_seconds;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
struct Command<C> {
    /// The time the command is supposed to execute at
    exec_time_s: f64,

    /// The command payload
    cmd: C
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use `get_pending` to
/// acquire a list of commands that need executing.
pub struct ScriptInterpreter<C> {
    _script_path: Option<PathBuf>,
    cmds: VecDeque<Command<C>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid command at {0} s: {1}")]
    InvalidCommand(f64, serde_json::Error),

    #[error("Script commands are not in time order (command at {0} s)")]
    OutOfOrder(f64)
}

/// Commands pending execution
#[derive(Debug, PartialEq)]
pub enum Pending<C> {
    None,
    Some(Vec<C>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<C: DeserializeOwned> ScriptInterpreter<C> {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());

        // Check that the script file exists.
        if !path.exists() {
            return Err(
                ScriptError::ScriptNotFound(path.to_string_lossy().into_owned()));
        }

        // Load the script into a string
        let script = fs::read_to_string(&path)
            .map_err(ScriptError::ScriptLoadError)?;

        let mut si = Self::from_script_str(&script)?;
        si._script_path = Some(path);

        Ok(si)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_script_str(script: &str) -> Result<Self, ScriptError> {

        // Empty queue of commands
        let mut cmd_queue: VecDeque<Command<C>> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .expect("Script regex is invalid");

        for cap in re.captures_iter(script) {
            // Both groups are not optional in the pattern so will always be
            // present on a match
            let (time_str, payload) = match (cap.get(1), cap.get(3)) {
                (Some(t), Some(p)) => (t.as_str(), p.as_str()),
                _ => continue
            };

            // Parse the exec time
            let exec_time_s: f64 = time_str
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            // Commands must be in execution order
            if let Some(last) = cmd_queue.back() {
                if exec_time_s < last.exec_time_s {
                    return Err(ScriptError::OutOfOrder(exec_time_s))
                }
            }

            // Parse the command from the payload. The scripts contain JSON only.
            let cmd = serde_json::from_str(payload)
                .map_err(|e| ScriptError::InvalidCommand(exec_time_s, e))?;

            cmd_queue.push_back(Command {
                exec_time_s,
                cmd
            });
        }

        if cmd_queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(ScriptInterpreter {
            _script_path: None,
            cmds: cmd_queue
        })
    }
}

impl<C> ScriptInterpreter<C> {

    /// Return the commands due at the current session time.
    pub fn get_pending_now(&mut self) -> Pending<C> {
        self.get_pending(get_elapsed_seconds())
    }

    /// Return the commands whose execution time is at or before `current_time_s`.
    pub fn get_pending(&mut self, current_time_s: f64) -> Pending<C> {

        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.cmds.is_empty() {
            return Pending::EndOfScript
        }

        let mut cmd_vec: Vec<C> = vec![];

        // Pop items from the queue while the head's exec time has passed
        while self
            .cmds
            .front()
            .map(|c| c.exec_time_s <= current_time_s)
            .unwrap_or(false)
        {
            if let Some(c) = self.cmds.pop_front() {
                cmd_vec.push(c.cmd);
            }
        }

        if cmd_vec.is_empty() {
            Pending::None
        }
        else {
            Pending::Some(cmd_vec)
        }
    }

    /// Get the number of commands remaining in the script
    pub fn get_num_cmds(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64
        }
    }
}
