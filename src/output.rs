//! JSON output types for the `mmv` CLI.
//!
//! Every command prints exactly one JSON object on stdout. Success responses
//! carry `"status": "ok"`; failures carry `"status": "error"` and an
//! [`ErrorInfo`]. Fields that do not apply are omitted rather than `null`.

use std::io::{self, Write};

use serde::Serialize;

use mmv_core::commands::{MemberKind, RenameDirective};
use mmv_core::error::MmvError;
use mmv_core::mappings::{MappingSaveReport, MappingSet};
use mmv_core::symbols::{ClassSymbol, FieldSymbol, MethodSymbol};

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Common Types
// ============================================================================

/// A field or method as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberView {
    pub srg_name: String,
    pub obf_name: String,
    /// Qualified owner class.
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<String>,
    /// Override name from the CSV store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl MemberView {
    pub fn from_method(method: &MethodSymbol, set: &MappingSet) -> Self {
        MemberView {
            srg_name: method.srg_name.clone(),
            obf_name: method.obf_name.clone(),
            owner: method.qualified_owner(),
            descriptor: Some(method.descriptor().to_string()),
            display_name: set
                .display_name(MemberKind::Method, &method.srg_name)
                .map(str::to_string),
        }
    }

    pub fn from_field(field: &FieldSymbol, set: &MappingSet) -> Self {
        MemberView {
            srg_name: field.srg_name.clone(),
            obf_name: field.obf_name.clone(),
            owner: field.qualified_owner(),
            descriptor: None,
            display_name: set
                .display_name(MemberKind::Field, &field.srg_name)
                .map(str::to_string),
        }
    }
}

/// A parameter known from the Exc table or the params store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamView {
    pub srg_name: String,
    /// Method the parameter belongs to, when the Exc table knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Error information for error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    /// Process exit code.
    pub code: u8,
    /// Stable error code (e.g., "E002").
    pub error_code: String,
    pub message: String,
    /// 1-based input line for format errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl ErrorInfo {
    pub fn from_error(err: &MmvError) -> Self {
        ErrorInfo {
            code: err.exit_code(),
            error_code: err.code().to_string(),
            message: err.to_string(),
            line: err.line(),
        }
    }
}

// ============================================================================
// Response Structs
// ============================================================================

/// Response for `mmv stats`.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub status: String,
    pub schema_version: String,
    pub packages: usize,
    pub classes: usize,
    pub methods: usize,
    pub fields: usize,
    pub exc_records: usize,
    pub static_methods: usize,
    pub field_overrides: usize,
    pub method_overrides: usize,
    pub param_overrides: usize,
}

impl StatsResponse {
    pub fn from_set(set: &MappingSet) -> Self {
        let db = set.database();
        StatsResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            packages: db.packages().count(),
            classes: db.class_count(),
            methods: db.method_count(),
            fields: db.field_count(),
            exc_records: set.exc().len(),
            static_methods: set.statics().len(),
            field_overrides: set.fields().len(),
            method_overrides: set.methods().len(),
            param_overrides: set.params().len(),
        }
    }
}

/// Response for `mmv class`.
#[derive(Debug, Clone, Serialize)]
pub struct ClassResponse {
    pub status: String,
    pub schema_version: String,
    pub class: ClassSymbol,
    pub fields: Vec<MemberView>,
    pub methods: Vec<MemberView>,
}

impl ClassResponse {
    pub fn new(class: ClassSymbol, fields: Vec<MemberView>, methods: Vec<MemberView>) -> Self {
        ClassResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            class,
            fields,
            methods,
        }
    }
}

/// What `mmv lookup` found.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LookupMatch {
    Field(MemberView),
    Method(MemberView),
    Param(ParamView),
}

/// Response for `mmv lookup`.
#[derive(Debug, Clone, Serialize)]
pub struct LookupResponse {
    pub status: String,
    pub schema_version: String,
    #[serde(rename = "match")]
    pub found: LookupMatch,
}

impl LookupResponse {
    pub fn new(found: LookupMatch) -> Self {
        LookupResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            found,
        }
    }
}

/// Response for `mmv rename`.
#[derive(Debug, Clone, Serialize)]
pub struct RenameResponse {
    pub status: String,
    pub schema_version: String,
    pub directive: RenameDirective,
    /// The directive in its wire form, e.g. `!sm func_1_a tick`.
    pub command: String,
    pub saved: MappingSaveReport,
}

impl RenameResponse {
    pub fn new(directive: RenameDirective, saved: MappingSaveReport) -> Self {
        RenameResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            command: directive.to_string(),
            directive,
            saved,
        }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn from_error(err: &MmvError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}
