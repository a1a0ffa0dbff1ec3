//! Command implementations behind the `mmv` binary.
//!
//! Each `run_*` function opens the data directory, does one thing, and
//! returns the response to print. The binary only parses arguments and
//! renders results.

use std::path::Path;

use tracing::info;

use mmv_core::commands::MemberKind;
use mmv_core::config::MmvConfig;
use mmv_core::error::{MmvError, MmvResult};
use mmv_core::mappings::MappingSet;

use crate::output::{
    ClassResponse, LookupMatch, LookupResponse, MemberView, ParamView, RenameResponse,
    StatsResponse,
};

/// Open the mapping set in `dir` using its `mmv.toml`, if any.
pub fn open_mappings(dir: &Path) -> MmvResult<MappingSet> {
    let config = MmvConfig::load_from_dir(dir)?;
    MappingSet::open(dir, &config)
}

/// Counts for everything loaded from `dir`.
pub fn run_stats(dir: &Path) -> MmvResult<StatsResponse> {
    let set = open_mappings(dir)?;
    Ok(StatsResponse::from_set(&set))
}

/// One class with its fields and methods, in definition order.
pub fn run_class(dir: &Path, qualified_name: &str) -> MmvResult<ClassResponse> {
    let set = open_mappings(dir)?;
    let db = set.database();
    let class = db
        .class(qualified_name)
        .ok_or_else(|| MmvError::NotFound(qualified_name.to_string()))?;

    let fields = db
        .fields_of(qualified_name)
        .into_iter()
        .map(|f| MemberView::from_field(f, &set))
        .collect();
    let methods = db
        .methods_of(qualified_name)
        .into_iter()
        .map(|m| MemberView::from_method(m, &set))
        .collect();

    Ok(ClassResponse::new(class.clone(), fields, methods))
}

/// Find a symbolic name among methods, then fields, then parameters.
pub fn run_lookup(dir: &Path, srg_name: &str) -> MmvResult<LookupResponse> {
    let set = open_mappings(dir)?;
    let db = set.database();

    let found = if let Some(method) = db.method(srg_name) {
        LookupMatch::Method(MemberView::from_method(method, &set))
    } else if let Some(field) = db.field(srg_name) {
        LookupMatch::Field(MemberView::from_field(field, &set))
    } else {
        let method = set
            .exc()
            .record_for_param(srg_name)
            .map(|r| r.srg_name.clone());
        let display_name = set
            .display_name(MemberKind::Param, srg_name)
            .map(str::to_string);
        if method.is_none() && display_name.is_none() {
            return Err(MmvError::NotFound(srg_name.to_string()));
        }
        LookupMatch::Param(ParamView {
            srg_name: srg_name.to_string(),
            method,
            display_name,
        })
    };

    Ok(LookupResponse::new(found))
}

/// Rename a member, save the override stores, and report the directive.
pub fn run_rename(
    dir: &Path,
    kind: MemberKind,
    srg_name: &str,
    new_name: &str,
    comment: Option<&str>,
    force: bool,
) -> MmvResult<RenameResponse> {
    let mut set = open_mappings(dir)?;
    let directive = set.rename(kind, srg_name, new_name, comment, force)?;
    let saved = set.save()?;
    info!(directive = %directive, "renamed {} {}", kind, srg_name);
    Ok(RenameResponse::new(directive, saved))
}
