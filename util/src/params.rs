//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use toml;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (FC_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot load the parmeter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the full path to a parameter file.
///
/// The file path is relative to the "params" directory in the software root.
pub fn get_path(param_file_path: &str) -> Result<PathBuf, LoadError> {
    let mut path = crate::host::get_fc_sw_root()
        .map_err(|_| LoadError::SwRootNotSet)?;
    path.push("params");
    path.push(param_file_path);

    Ok(path)
}

/// Load a parameter file
///
/// The file path is relative to the "params" directory
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned
{
    load_from_path(get_path(param_file_path)?)
}

/// Load a parameter file from an absolute (or working directory relative) path.
pub fn load_from_path<P, Q>(path: Q) -> Result<P, LoadError>
where
    P: DeserializeOwned,
    Q: AsRef<Path>
{
    // Load the file into a string
    let params_str = match read_to_string(path) {
        Ok(s) => s,
        Err(e) => return Err(LoadError::FileLoadError(e))
    };

    from_str(params_str.as_str())
}

/// Parse a parameter structure from a TOML string.
pub fn from_str<P>(params_str: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned
{
    match toml::from_str(params_str) {
        Ok(p) => Ok(p),
        Err(e) => Err(LoadError::DeserialiseError(e))
    }
}

/// Get the last modification time of a parameter file.
///
/// Used by executables to detect that a parameter file has been changed and
/// needs reloading.
pub fn modified_time<Q: AsRef<Path>>(path: Q) -> Result<SystemTime, LoadError> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(LoadError::FileLoadError)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct TestParams {
        speed_ms: f64,
        alt_m: f64
    }

    #[test]
    fn test_from_str() {
        let p: TestParams = from_str("speed_ms = 1.5\nalt_m = 10.0\n").unwrap();
        assert_eq!(p.speed_ms, 1.5);
        assert_eq!(p.alt_m, 10.0);

        match from_str::<TestParams>("speed_ms = 1.5\n") {
            Err(LoadError::DeserialiseError(_)) => (),
            r => panic!("Expected a deserialise error, got {:?}", r)
        }
    }
}
