//! Session management
//!
//! A session is a single execution of one of the flight software executables.
//! Each session gets its own directory containing the log file, the archives
//! and any snapshots saved during execution.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use log::warn;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal imports
use crate::time;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// A chrono format string which diplays a timestamp. See
/// https://docs.rs/chrono/0.4.11/chrono/format/strftime/index.html for more
/// information.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A struct storing information about the current session
#[derive(Clone, Debug)]
pub struct Session {
    /// The root directory for this session
    pub session_root: PathBuf,

    /// The root directory for this session's archives
    pub arch_root: PathBuf,

    /// The path to the session's log file
    pub log_file_path: PathBuf,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors associated with the session module.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("The software root environment variable (FC_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot create the session directory: {0}")]
    CannotCreateDir(std::io::Error),

    #[error(
        "Cannot initialise the session epoch, have you already initialised the \
         session? (conquer_once error: {0})"
    )]
    CannotInitEpoch(conquer_once::TryInitError),

    #[error("Cannot get the epoch time, did you forget to initialise the session?")]
    CannotGetEpoch,

    #[error("Cannot save {0:?}: {1}")]
    SaveError(PathBuf, String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start a new session within the given directory.
    ///
    /// This will create a new session directory named `{exec_name}_{timestamp}`
    /// inside `{FC_SW_ROOT}/{sessions_dir}`.
    pub fn new(exec_name: &str, sessions_dir: &str) -> Result<Self, SessionError> {
        // Set the session epoch
        SESSION_EPOCH
            .try_init_once(Utc::now)
            .map_err(SessionError::CannotInitEpoch)?;

        // Format the session epoch as a timestamp
        let timestamp = match SESSION_EPOCH.get() {
            Some(e) => e.format(TIMESTAMP_FORMAT),
            None => return Err(SessionError::CannotGetEpoch),
        };

        // Get the root directory
        let mut path = crate::host::get_fc_sw_root().map_err(|_| SessionError::SwRootNotSet)?;
        path.push(sessions_dir);
        path.push(format!("{}_{}", exec_name, timestamp));

        Self::in_dir(exec_name, path)
    }

    /// Create the session directory structure in an explicit directory.
    ///
    /// Unlike `new` this does not set the session epoch.
    pub fn in_dir<P: AsRef<Path>>(exec_name: &str, dir: P) -> Result<Self, SessionError> {
        let session_root = dir.as_ref().to_path_buf();

        // Create the session and archive directories
        let arch_root = session_root.join("arch");
        fs::create_dir_all(&arch_root).map_err(SessionError::CannotCreateDir)?;

        let log_file_path = session_root.join(format!("{}.log", exec_name));

        Ok(Session {
            session_root,
            arch_root,
            log_file_path,
        })
    }

    /// Save the given data as pretty JSON to the given session-relative path.
    ///
    /// Any missing parent directories are created.
    pub fn save_json<P: AsRef<Path>, T: Serialize>(
        &self,
        path: P,
        data: &T,
    ) -> Result<(), SessionError> {
        let full_path = self.session_root.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(SessionError::CannotCreateDir)?;
        }

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| SessionError::SaveError(full_path.clone(), e.to_string()))?;

        fs::write(&full_path, json)
            .map_err(|e| SessionError::SaveError(full_path.clone(), e.to_string()))
    }

    /// Save the given data, appending the elapsed session time to the file stem.
    ///
    /// Failures are only logged, this is intended for snapshots which
    /// shouldn't interrupt the cyclic processing.
    pub fn save_json_with_timestamp<P: AsRef<Path>, T: Serialize>(&self, path: P, data: &T) {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let file_name = match path.extension() {
            Some(ext) => format!(
                "{}_{:.3}.{}",
                stem,
                get_elapsed_seconds(),
                ext.to_string_lossy()
            ),
            None => format!("{}_{:.3}", stem, get_elapsed_seconds()),
        };

        if let Err(e) = self.save_json(path.with_file_name(file_name), data) {
            warn!("Could not save snapshot: {}", e);
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the number of seconds elapsed since the start of the session.
///
/// Returns NaN if the session epoch has not been initialised (e.g. in unit
/// tests which do not create a session).
pub fn get_elapsed_seconds() -> f64 {
    match SESSION_EPOCH.get() {
        Some(e) => {
            let elapsed = Utc::now() - *e;
            time::duration_to_seconds(elapsed).unwrap_or(f64::NAN)
        }
        None => f64::NAN,
    }
}

/// Return a reference to the session's epoch.
///
/// # Panics
/// - This function will panic if the session epoch has not been
///   initialised, which is performed on creating a new Session instance.
pub fn get_epoch() -> &'static DateTime<Utc> {
    match SESSION_EPOCH.get() {
        Some(e) => e,
        None => panic!("Cannot get the session epoch!"),
    }
}
