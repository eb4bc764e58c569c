//! Struct archiving functionality
//!
//! To add archiving functionality to a struct implement the `Archived` trait.
//! Archives are CSV files stored under the session's `arch` directory, one row
//! per cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::fs::{self, File};
use std::path::Path;
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
#[derive(Default)]
pub struct Archiver {
    writer: Option<Writer<File>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while archiving.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Could not create the archive file: {0}")]
    CreateError(std::io::Error),

    #[error("Could not write the archive record: {0}")]
    WriteError(csv::Error),

    #[error("Could not flush the archive file: {0}")]
    FlushError(std::io::Error),

    #[error("The archiver has not been initialised")]
    NotInitialised
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A trait which enables a struct to be archived as a csv.
///
/// To implement this trait, the struct shall have an `Archiver` member which
/// is setup in the struct's `init` function. Records must be flat (no nested
/// structs or sequences) so that csv headers can be written.
pub trait Archived {
    /// Write the archives for this struct
    fn write(&mut self) -> Result<(), ArchiveError>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    ///
    /// Parent directories are created as needed and any existing file is
    /// truncated.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        let session_path = session.arch_root.join(path);

        if let Some(parent) = session_path.parent() {
            fs::create_dir_all(parent).map_err(ArchiveError::CreateError)?;
        }

        let file = File::create(session_path).map_err(ArchiveError::CreateError)?;

        let w = WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        Ok(Self {
            writer: Some(w)
        })
    }

    /// Serialise a record into the archive.
    pub fn serialise<T: Serialize>(
        &mut self, record: T
    ) -> Result<(), ArchiveError> {
        match self.writer {
            Some(ref mut w) => {
                w.serialize(record).map_err(ArchiveError::WriteError)?;
                w.flush().map_err(ArchiveError::FlushError)
            },
            None => Err(ArchiveError::NotInitialised)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Record {
        time_s: f64,
        alt_m: f64,
        gear: &'static str
    }

    #[test]
    fn test_archiver() {
        let dir = std::env::temp_dir().join(format!("fc_sw_archive_test_{}", std::process::id()));
        let session = Session::in_dir("test_exec", &dir).unwrap();

        let mut arch = Archiver::from_path(&session, "module/records.csv").unwrap();
        arch.serialise(Record { time_s: 0.0, alt_m: 1.0, gear: "Down" }).unwrap();
        arch.serialise(Record { time_s: 0.1, alt_m: f64::NAN, gear: "Up" }).unwrap();

        let contents = fs::read_to_string(dir.join("arch/module/records.csv")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "time_s,alt_m,gear");
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("0.1,"));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_uninitialised() {
        let mut arch = Archiver::default();
        match arch.serialise(1.0) {
            Err(ArchiveError::NotInitialised) => (),
            r => panic!("Expected NotInitialised, got {:?}", r)
        }
    }
}
