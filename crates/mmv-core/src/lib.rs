//! Core infrastructure for mmv.
//!
//! This crate provides:
//! - Symbol records and the cross-referenced symbol database
//! - TSRG parsing with Exc placeholder backfill
//! - Exc (parameter name) table
//! - CSV override stores with dirty tracking and backup-on-save
//! - Rename directives for pending changes
//! - Configuration and the combined mapping set

pub mod commands;
pub mod config;
pub mod database;
pub mod error;
pub mod exc;
pub mod mappings;
pub mod overrides;
pub mod statics;
pub mod symbols;
pub mod tsrg;

// Re-exports for convenience
pub use commands::{DirectiveKind, MemberKind, RenameDirective};
pub use config::MmvConfig;
pub use database::SymbolDatabase;
pub use error::{MmvError, MmvResult};
pub use exc::{ExcRecord, ExcTable};
pub use mappings::{MappingSaveReport, MappingSet};
pub use overrides::{
    MemberOverride, MemberOverrides, OverrideRecord, OverrideStore, ParamOverride,
    ParamOverrides, SaveOutcome, SaveReport, SaveWarning, Side,
};
pub use statics::{StaticMethodTest, StaticMethods};
pub use symbols::{ClassSymbol, FieldSymbol, MethodSymbol};
pub use tsrg::{load_tsrg, parse_tsrg, ParseState, TsrgParser};
