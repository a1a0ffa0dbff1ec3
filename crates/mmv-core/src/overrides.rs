//! CSV override stores: user-editable renames layered over the symbol database.
//!
//! Two record shapes share one store implementation:
//! - [`MemberOverride`] (`fields.csv`, `methods.csv`): `srg,name,side,comment`
//! - [`ParamOverride`] (`params.csv`): `srg,name,side`
//!
//! The first line of a file is a header kept verbatim. Records are held in
//! ascending key order so saves are deterministic.
//!
//! # Save Protocol
//!
//! [`OverrideStore::save`] does nothing unless the store is dirty. When it
//! is:
//!
//! 1. The live file is renamed to `<name>_<yyyyMMdd_HHmmss>.bak`.
//! 2. The live file is recreated holding only the header, and synced.
//! 3. Every record is appended and the file synced again.
//! 4. The dirty flag is cleared.
//!
//! A crash between 1 and 3 leaves a header-only live file next to an intact
//! backup. A failed rename (step 1) does not abort the save; it comes back
//! as a [`SaveWarning`] in the [`SaveReport`].
//!
//! Before step 1, every record is serialized and parsed back. A record that
//! would not read back unchanged (a name holding a comma, a line break in a
//! comment) fails the save with the live file untouched.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{MmvError, MmvResult};

/// Default strftime format for backup file timestamps.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Check that `format` is a usable strftime string for backup names.
pub fn check_timestamp_format(format: &str) -> MmvResult<()> {
    use chrono::format::{Item, StrftimeItems};

    if format.trim().is_empty() {
        return Err(MmvError::Config(
            "backup_timestamp_format must not be empty".to_string(),
        ));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(MmvError::Config(format!(
            "backup_timestamp_format '{}' is not a valid strftime format",
            format
        )));
    }
    Ok(())
}

/// Current local time rendered with `format`.
fn backup_stamp(format: &str) -> MmvResult<String> {
    let mut stamp = String::new();
    write!(stamp, "{}", chrono::Local::now().format(format)).map_err(|_| {
        MmvError::Config(format!(
            "backup_timestamp_format '{}' is not a valid strftime format",
            format
        ))
    })?;
    Ok(stamp)
}

// ============================================================================
// Side
// ============================================================================

/// Which distribution a rename applies to.
///
/// | code | side   |
/// |------|--------|
/// | 0    | client |
/// | 1    | server |
/// | 2    | both   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Client = 0,
    Server = 1,
    #[default]
    Both = 2,
}

impl Side {
    /// Numeric code as written in CSV files.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Map a numeric code back to a side.
    pub fn from_code(code: i64) -> Option<Side> {
        match code {
            0 => Some(Side::Client),
            1 => Some(Side::Server),
            2 => Some(Side::Both),
            _ => None,
        }
    }

    /// Parse a CSV side token. Anything but `0`, `1` or `2` is an error.
    pub fn parse(line: usize, token: &str) -> MmvResult<Side> {
        token
            .parse::<i64>()
            .ok()
            .and_then(Side::from_code)
            .ok_or_else(|| MmvError::InvalidSide {
                line,
                value: token.to_string(),
            })
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Record Shapes
// ============================================================================

/// Check a display name before it goes into a CSV row.
///
/// Names are a single delimited token: no commas, no line breaks.
pub fn check_display_name(name: &str) -> MmvResult<()> {
    let reason = if name.is_empty() {
        "must not be empty"
    } else if name.contains(',') {
        "contains a comma"
    } else if name.contains(['\n', '\r']) {
        "contains a line break"
    } else {
        return Ok(());
    };
    Err(MmvError::InvalidValue {
        field: "name",
        value: name.to_string(),
        reason,
    })
}

/// Check a comment before it goes into a CSV row. Commas are allowed.
pub fn check_comment(comment: &str) -> MmvResult<()> {
    if comment.contains(['\n', '\r']) {
        return Err(MmvError::InvalidValue {
            field: "comment",
            value: comment.to_string(),
            reason: "contains a line break",
        });
    }
    Ok(())
}

/// A row of an override CSV file.
pub trait OverrideRecord: Clone + fmt::Debug + PartialEq {
    /// Label for log messages.
    const KIND: &'static str;

    /// Symbolic name this record renames.
    fn srg_name(&self) -> &str;

    /// Parse one data line. `line_no` is 1-based.
    fn from_csv_line(line_no: usize, line: &str) -> MmvResult<Self>;

    /// Serialize back to a data line (no trailing newline).
    fn to_csv_line(&self) -> String;
}

fn require_srg_name(line_no: usize, srg_name: &str) -> MmvResult<()> {
    if srg_name.is_empty() {
        return Err(MmvError::CsvFormat {
            line: line_no,
            reason: "empty symbolic name".to_string(),
        });
    }
    Ok(())
}

/// Field or method override: `srg,name,side,comment`.
///
/// The comment is the literal remainder of the line and may contain commas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberOverride {
    pub srg_name: String,
    pub mcp_name: String,
    pub side: Side,
    pub comment: String,
}

impl MemberOverride {
    pub fn new(
        srg_name: impl Into<String>,
        mcp_name: impl Into<String>,
        side: Side,
        comment: impl Into<String>,
    ) -> Self {
        MemberOverride {
            srg_name: srg_name.into(),
            mcp_name: mcp_name.into(),
            side,
            comment: comment.into(),
        }
    }
}

impl OverrideRecord for MemberOverride {
    const KIND: &'static str = "member";

    fn srg_name(&self) -> &str {
        &self.srg_name
    }

    fn from_csv_line(line_no: usize, line: &str) -> MmvResult<Self> {
        let parts: Vec<&str> = line.splitn(4, ',').collect();
        let [srg_name, mcp_name, side, comment] = *parts.as_slice() else {
            return Err(MmvError::CsvFormat {
                line: line_no,
                reason: format!(
                    "expected srg,name,side,comment but found {} field(s)",
                    parts.len()
                ),
            });
        };
        require_srg_name(line_no, srg_name)?;
        Ok(MemberOverride {
            srg_name: srg_name.to_string(),
            mcp_name: mcp_name.to_string(),
            side: Side::parse(line_no, side)?,
            comment: comment.to_string(),
        })
    }

    fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{}",
            self.srg_name, self.mcp_name, self.side, self.comment
        )
    }
}

/// Parameter override: `srg,name,side`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamOverride {
    pub srg_name: String,
    pub mcp_name: String,
    pub side: Side,
}

impl ParamOverride {
    pub fn new(srg_name: impl Into<String>, mcp_name: impl Into<String>, side: Side) -> Self {
        ParamOverride {
            srg_name: srg_name.into(),
            mcp_name: mcp_name.into(),
            side,
        }
    }
}

impl OverrideRecord for ParamOverride {
    const KIND: &'static str = "param";

    fn srg_name(&self) -> &str {
        &self.srg_name
    }

    fn from_csv_line(line_no: usize, line: &str) -> MmvResult<Self> {
        let parts: Vec<&str> = line.splitn(3, ',').collect();
        let [srg_name, mcp_name, side] = *parts.as_slice() else {
            return Err(MmvError::CsvFormat {
                line: line_no,
                reason: format!(
                    "expected srg,name,side but found {} field(s)",
                    parts.len()
                ),
            });
        };
        require_srg_name(line_no, srg_name)?;
        Ok(ParamOverride {
            srg_name: srg_name.to_string(),
            mcp_name: mcp_name.to_string(),
            side: Side::parse(line_no, side)?,
        })
    }

    fn to_csv_line(&self) -> String {
        format!("{},{},{}", self.srg_name, self.mcp_name, self.side)
    }
}

// ============================================================================
// Save Reporting
// ============================================================================

/// A housekeeping step that failed without aborting a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SaveWarning {
    /// The live file could not be renamed to its backup name.
    BackupFailed {
        path: PathBuf,
        backup: PathBuf,
        reason: String,
    },
    /// The destination directory could not be created.
    CreateDirFailed { dir: PathBuf, reason: String },
}

impl fmt::Display for SaveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveWarning::BackupFailed {
                path,
                backup,
                reason,
            } => write!(
                f,
                "failed to back up {} to {}: {}",
                path.display(),
                backup.display(),
                reason
            ),
            SaveWarning::CreateDirFailed { dir, reason } => {
                write!(f, "failed to create {}: {}", dir.display(), reason)
            }
        }
    }
}

/// What [`OverrideStore::save`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveOutcome {
    /// Store was clean; nothing touched.
    Unchanged,
    /// File rewritten with this many records.
    Written { records: usize },
}

/// Result of a save: outcome, backup location, soft failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    pub outcome: SaveOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SaveWarning>,
}

impl SaveReport {
    fn unchanged() -> Self {
        SaveReport {
            outcome: SaveOutcome::Unchanged,
            backup: None,
            warnings: Vec::new(),
        }
    }

    /// Whether the file was rewritten.
    pub fn is_written(&self) -> bool {
        matches!(self.outcome, SaveOutcome::Written { .. })
    }
}

// ============================================================================
// Backup And Reset
// ============================================================================

/// Pick `<name>_<stamp>.bak` in `dir`, adding `_<n>` if that name is
/// already taken.
fn backup_path(dir: &Path, path: &Path, stamp: &str) -> PathBuf {
    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    let mut candidate = dir.join(format!("{}_{}.bak", name, stamp));
    let mut n = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{}_{}_{}.bak", name, stamp, n));
        n += 1;
    }
    candidate
}

/// Move the live file aside and recreate it holding only `header`.
///
/// Rename and directory failures are pushed onto `warnings`; failing to
/// create or write the new file is an error.
fn backup_and_reset(
    path: &Path,
    header: &str,
    backup_dir: Option<&Path>,
    stamp: &str,
    warnings: &mut Vec<SaveWarning>,
) -> MmvResult<(File, Option<PathBuf>)> {
    let mut backup = None;

    if path.exists() {
        let dir = backup_dir
            .or_else(|| path.parent())
            .unwrap_or_else(|| Path::new(""));
        let target = backup_path(dir, path, stamp);
        match fs::rename(path, &target) {
            Ok(()) => {
                debug!("backed up {} to {}", path.display(), target.display());
                backup = Some(target);
            }
            Err(e) => {
                warn!("failed to back up {}: {}", path.display(), e);
                warnings.push(SaveWarning::BackupFailed {
                    path: path.to_path_buf(),
                    backup: target,
                    reason: e.to_string(),
                });
            }
        }
    }

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            if let Err(e) = fs::create_dir_all(dir) {
                warn!("failed to create {}: {}", dir.display(), e);
                warnings.push(SaveWarning::CreateDirFailed {
                    dir: dir.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let mut file = File::create(path).map_err(|e| MmvError::io(path, e))?;
    writeln!(file, "{}", header).map_err(|e| MmvError::io(path, e))?;
    file.sync_all().map_err(|e| MmvError::io(path, e))?;
    Ok((file, backup))
}

// ============================================================================
// Override Store
// ============================================================================

/// A CSV-backed table of overrides keyed by symbolic name.
#[derive(Debug, Clone)]
pub struct OverrideStore<R: OverrideRecord> {
    path: PathBuf,
    header: String,
    records: BTreeMap<String, R>,
    dirty: bool,
    timestamp_format: String,
    backup_dir: Option<PathBuf>,
}

/// Field or method overrides (`fields.csv`, `methods.csv`).
pub type MemberOverrides = OverrideStore<MemberOverride>;

/// Parameter overrides (`params.csv`).
pub type ParamOverrides = OverrideStore<ParamOverride>;

impl<R: OverrideRecord> OverrideStore<R> {
    /// Load a store from its CSV file.
    pub fn load(path: impl Into<PathBuf>) -> MmvResult<Self> {
        let path = path.into();
        let content = fs::read_to_string(&path).map_err(|e| MmvError::io(&path, e))?;
        Self::parse(path, &content)
    }

    /// Build a store from CSV text, bound to `path` for later saves.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> MmvResult<Self> {
        let path = path.into();
        let (header, records) = parse_csv::<R>(content)?;
        debug!(
            kind = R::KIND,
            records = records.len(),
            "loaded overrides from {}",
            path.display()
        );
        Ok(OverrideStore {
            path,
            header,
            records,
            dirty: false,
            timestamp_format: BACKUP_TIMESTAMP_FORMAT.to_string(),
            backup_dir: None,
        })
    }

    /// Use a different strftime format for backup names.
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Put backups in `dir` instead of next to the live file. The directory
    /// must already exist; if it does not, backups fail with a warning.
    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = Some(dir.into());
        self
    }

    /// Re-read the file, discarding unsaved changes.
    pub fn reload(&mut self) -> MmvResult<()> {
        let content = fs::read_to_string(&self.path).map_err(|e| MmvError::io(&self.path, e))?;
        let (header, records) = parse_csv::<R>(&content)?;
        self.header = header;
        self.records = records;
        self.dirty = false;
        Ok(())
    }

    /// Whether an override exists for `srg_name`.
    pub fn has(&self, srg_name: &str) -> bool {
        self.records.contains_key(srg_name)
    }

    /// The override for `srg_name`, if any.
    pub fn get(&self, srg_name: &str) -> Option<&R> {
        self.records.get(srg_name)
    }

    /// Insert or replace the override for `srg_name` and mark the store
    /// dirty. Returns the previous record.
    ///
    /// `srg_name` must be the record's own symbolic name; rows are keyed by
    /// that name when read back.
    pub fn update(&mut self, srg_name: impl Into<String>, record: R) -> Option<R> {
        let srg_name = srg_name.into();
        debug_assert_eq!(srg_name, record.srg_name(), "override filed under another name");
        self.dirty = true;
        self.records.insert(srg_name, record)
    }

    /// Records in ascending key order.
    pub fn records(&self) -> impl Iterator<Item = &R> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when there are unsaved updates.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Header line, verbatim.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the store back to its file if dirty. See the module docs for
    /// the backup protocol.
    pub fn save(&mut self) -> MmvResult<SaveReport> {
        if !self.dirty {
            return Ok(SaveReport::unchanged());
        }

        let lines = self.checked_lines()?;
        let stamp = backup_stamp(&self.timestamp_format)?;

        let mut warnings = Vec::new();
        let (file, backup) = backup_and_reset(
            &self.path,
            &self.header,
            self.backup_dir.as_deref(),
            &stamp,
            &mut warnings,
        )?;

        let mut out = BufWriter::new(file);
        for line in &lines {
            writeln!(out, "{}", line).map_err(|e| MmvError::io(&self.path, e))?;
        }
        let file = out
            .into_inner()
            .map_err(|e| MmvError::io(&self.path, e.into_error()))?;
        file.sync_all().map_err(|e| MmvError::io(&self.path, e))?;

        self.dirty = false;
        info!(
            kind = R::KIND,
            records = self.records.len(),
            "saved overrides to {}",
            self.path.display()
        );

        Ok(SaveReport {
            outcome: SaveOutcome::Written {
                records: self.records.len(),
            },
            backup,
            warnings,
        })
    }

    /// Serialize every record, refusing any that would not read back as
    /// itself under its own key.
    fn checked_lines(&self) -> MmvResult<Vec<String>> {
        let mut lines = Vec::with_capacity(self.records.len());
        for (idx, (key, record)) in self.records.iter().enumerate() {
            let line_no = idx + 2;
            let line = record.to_csv_line();
            let reads_back = !line.contains(['\n', '\r'])
                && R::from_csv_line(line_no, &line)
                    .map(|parsed| parsed == *record && parsed.srg_name() == key.as_str())
                    .unwrap_or(false);
            if !reads_back {
                return Err(MmvError::CsvFormat {
                    line: line_no,
                    reason: format!("override for '{}' would not read back: {:?}", key, line),
                });
            }
            lines.push(line);
        }
        Ok(lines)
    }
}

fn parse_csv<R: OverrideRecord>(content: &str) -> MmvResult<(String, BTreeMap<String, R>)> {
    let mut lines = content.lines();
    let header = lines.next().ok_or_else(|| MmvError::CsvFormat {
        line: 1,
        reason: "missing header line".to_string(),
    })?;

    let mut records = BTreeMap::new();
    for (idx, line) in lines.enumerate() {
        if line.is_empty() {
            continue;
        }
        let record = R::from_csv_line(idx + 2, line)?;
        records.insert(record.srg_name().to_string(), record);
    }
    Ok((header.to_string(), records))
}
