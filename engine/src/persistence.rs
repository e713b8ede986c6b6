//! Roster snapshots on disk
//!
//! Reads the rows the member store hands out (a bare JSON array, as its REST
//! API returns) or a versioned snapshot written by `export_json`. Every row goes
//! through the fallible `RawMemberRecord -> MemberRecord` step; the import mode
//! decides whether a bad date aborts the load or only drops that row.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{BirthdayError, Result};
use crate::member::{MemberRecord, RawMemberRecord};
use crate::roster::Roster;

const SNAPSHOT_VERSION: u8 = 1;

// ============================================================================
// Snapshot format
// ============================================================================

/// Versioned roster snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterFile {
    pub version: u8,
    pub members: Vec<RawMemberRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RosterInput {
    Snapshot(RosterFile),
    Rows(Vec<RawMemberRecord>),
}

/// What to do with a row whose dates do not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Fail the whole load on the first bad row.
    #[default]
    Strict,
    /// Drop bad rows and report them.
    Lenient,
}

/// A row dropped by a lenient import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub id: String,
    pub full_name: String,
    pub reason: String,
}

/// Result of import operation
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub roster: Roster,
    pub skipped: Vec<SkippedRecord>,
}

/// Result of a save operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaveStats {
    pub members: u32,
    pub file_bytes: u64,
}

// ============================================================================
// Import
// ============================================================================

impl Roster {
    /// Parse roster JSON, validating every row.
    pub fn import_json(json: &str, mode: ImportMode) -> Result<ImportResult> {
        let rows = match serde_json::from_str::<RosterInput>(json)? {
            RosterInput::Snapshot(file) => {
                if file.version != SNAPSHOT_VERSION {
                    return Err(BirthdayError::UnsupportedVersion(file.version));
                }
                file.members
            }
            RosterInput::Rows(rows) => rows,
        };

        let mut members = Vec::with_capacity(rows.len());
        let mut skipped = Vec::new();

        for row in rows {
            let (id, full_name) = (row.id.clone(), row.full_name.clone());
            match MemberRecord::try_from(row) {
                Ok(member) => members.push(member),
                Err(err) if mode == ImportMode::Lenient => {
                    warn!(member = %id, error = %err, "skipping member with invalid date");
                    skipped.push(SkippedRecord {
                        id,
                        full_name,
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            members = members.len(),
            skipped = skipped.len(),
            "roster imported"
        );

        Ok(ImportResult {
            roster: Roster::new(members),
            skipped,
        })
    }

    /// Read roster JSON from any reader (stdin for piped snapshots).
    pub fn import_reader<R: Read>(mut reader: R, mode: ImportMode) -> Result<ImportResult> {
        let mut json = String::new();
        reader.read_to_string(&mut json)?;
        Self::import_json(&json, mode)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P, mode: ImportMode) -> Result<ImportResult> {
        let json = fs::read_to_string(path.as_ref())?;
        Self::import_json(&json, mode)
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Serialise the roster as a versioned snapshot.
    pub fn export_json(&self) -> Result<String> {
        let file = RosterFile {
            version: SNAPSHOT_VERSION,
            members: self.members().iter().map(RawMemberRecord::from).collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<SaveStats> {
        let json = self.export_json()?;
        fs::write(path.as_ref(), &json)?;

        Ok(SaveStats {
            members: self.len() as u32,
            file_bytes: json.len() as u64,
        })
    }
}
