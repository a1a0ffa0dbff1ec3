//! mmv: browse TSRG mappings and edit CSV name overrides
//!
//! Parses a TSRG mapping file into a cross-referenced symbol database,
//! backfills placeholder Exc records, and maintains the field, method and
//! parameter override CSVs with a backup taken before every overwrite.

// Core infrastructure - re-exported from mmv-core
pub use mmv_core::commands;
pub use mmv_core::config;
pub use mmv_core::database;
pub use mmv_core::error;
pub use mmv_core::exc;
pub use mmv_core::mappings;
pub use mmv_core::overrides;
pub use mmv_core::statics;
pub use mmv_core::symbols;
pub use mmv_core::tsrg;

// Front door
pub mod cli;
pub mod output;
