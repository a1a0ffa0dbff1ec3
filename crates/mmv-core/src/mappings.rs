//! A loaded mapping data directory.
//!
//! [`MappingSet`] ties the pieces together the way a viewer uses them: the
//! TSRG database and Exc table are read-only, the three override stores take
//! renames, and every rename is remembered as a [`RenameDirective`].

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::commands::{DirectiveKind, MemberKind, RenameDirective};
use crate::config::MmvConfig;
use crate::database::SymbolDatabase;
use crate::error::{MmvError, MmvResult};
use crate::exc::ExcTable;
use crate::overrides::{
    check_comment, check_display_name, MemberOverride, MemberOverrides, ParamOverride,
    ParamOverrides, SaveReport,
};
use crate::statics::StaticMethods;
use crate::tsrg::load_tsrg;

/// Save reports for the three stores of a [`MappingSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingSaveReport {
    pub fields: SaveReport,
    pub methods: SaveReport,
    pub params: SaveReport,
}

/// Symbol database, Exc table and override stores for one data directory.
#[derive(Debug)]
pub struct MappingSet {
    dir: PathBuf,
    database: SymbolDatabase,
    exc: ExcTable,
    statics: StaticMethods,
    fields: MemberOverrides,
    methods: MemberOverrides,
    params: ParamOverrides,
    pending: Vec<RenameDirective>,
}

impl MappingSet {
    /// Load everything `config` names from `dir`.
    pub fn open(dir: &Path, config: &MmvConfig) -> MmvResult<Self> {
        Self::open_with_exc(dir, config, ExcTable::new())
    }

    /// Like [`MappingSet::open`], starting from Exc data already loaded from
    /// the authoritative parameter source. Placeholders never replace it.
    pub fn open_with_exc(dir: &Path, config: &MmvConfig, mut exc: ExcTable) -> MmvResult<Self> {
        let statics = StaticMethods::load(&config.resolve(dir, &config.static_methods_file))?;
        let database = load_tsrg(&config.resolve(dir, &config.tsrg_file), &mut exc, &statics)?;

        let format = config.backup_timestamp_format.as_str();
        let fields = MemberOverrides::load(config.resolve(dir, &config.fields_csv))?
            .with_timestamp_format(format);
        let methods = MemberOverrides::load(config.resolve(dir, &config.methods_csv))?
            .with_timestamp_format(format);
        let params = ParamOverrides::load(config.resolve(dir, &config.params_csv))?
            .with_timestamp_format(format);

        debug!(
            classes = database.class_count(),
            exc = exc.len(),
            fields = fields.len(),
            methods = methods.len(),
            params = params.len(),
            "opened mapping set at {}",
            dir.display()
        );

        Ok(MappingSet {
            dir: dir.to_path_buf(),
            database,
            exc,
            statics,
            fields,
            methods,
            params,
            pending: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn database(&self) -> &SymbolDatabase {
        &self.database
    }

    pub fn exc(&self) -> &ExcTable {
        &self.exc
    }

    pub fn statics(&self) -> &StaticMethods {
        &self.statics
    }

    pub fn fields(&self) -> &MemberOverrides {
        &self.fields
    }

    pub fn methods(&self) -> &MemberOverrides {
        &self.methods
    }

    pub fn params(&self) -> &ParamOverrides {
        &self.params
    }

    /// Override display name for a symbolic name, if one exists.
    pub fn display_name(&self, kind: MemberKind, srg_name: &str) -> Option<&str> {
        match kind {
            MemberKind::Field => self.fields.get(srg_name).map(|r| r.mcp_name.as_str()),
            MemberKind::Method => self.methods.get(srg_name).map(|r| r.mcp_name.as_str()),
            MemberKind::Param => self.params.get(srg_name).map(|r| r.mcp_name.as_str()),
        }
    }

    fn is_known(&self, kind: MemberKind, srg_name: &str) -> bool {
        match kind {
            MemberKind::Field => self.database.field(srg_name).is_some(),
            MemberKind::Method => self.database.method(srg_name).is_some(),
            MemberKind::Param => {
                self.params.has(srg_name) || self.exc.record_for_param(srg_name).is_some()
            }
        }
    }

    /// Rename a member: update its override store and record a directive.
    ///
    /// An existing override keeps its side; a new one applies to both
    /// sides. A `None` comment keeps the existing comment, and the directive
    /// carries whichever comment the override ends up with.
    ///
    /// Names with commas or line breaks and comments with line breaks are
    /// rejected before anything changes.
    pub fn rename(
        &mut self,
        kind: MemberKind,
        srg_name: &str,
        new_name: &str,
        comment: Option<&str>,
        forced: bool,
    ) -> MmvResult<RenameDirective> {
        if !self.is_known(kind, srg_name) {
            return Err(MmvError::NotFound(srg_name.to_string()));
        }
        check_display_name(new_name)?;
        if let Some(comment) = comment {
            check_comment(comment)?;
        }

        let comment = match kind {
            MemberKind::Field | MemberKind::Method => {
                let store = if kind == MemberKind::Field {
                    &mut self.fields
                } else {
                    &mut self.methods
                };
                let existing = store.get(srg_name);
                let side = existing.map(|r| r.side).unwrap_or_default();
                let comment = comment
                    .map(str::to_string)
                    .or_else(|| existing.map(|r| r.comment.clone()))
                    .unwrap_or_default();
                store.update(
                    srg_name,
                    MemberOverride::new(srg_name, new_name, side, comment.clone()),
                );
                comment
            }
            MemberKind::Param => {
                let side = self
                    .params
                    .get(srg_name)
                    .map(|r| r.side)
                    .unwrap_or_default();
                self.params
                    .update(srg_name, ParamOverride::new(srg_name, new_name, side));
                comment.unwrap_or_default().to_string()
            }
        };

        let directive = RenameDirective::new(
            DirectiveKind::for_member(kind, forced),
            srg_name,
            new_name,
        )
        .with_comment(comment);
        self.pending.push(directive.clone());
        Ok(directive)
    }

    /// Directives for renames made since opening, oldest first.
    pub fn pending(&self) -> &[RenameDirective] {
        &self.pending
    }

    /// Take the pending directives, leaving none.
    pub fn take_pending(&mut self) -> Vec<RenameDirective> {
        std::mem::take(&mut self.pending)
    }

    /// True when any store has unsaved updates.
    pub fn is_dirty(&self) -> bool {
        self.fields.is_dirty() || self.methods.is_dirty() || self.params.is_dirty()
    }

    /// Save all three stores. Clean stores are left untouched.
    pub fn save(&mut self) -> MmvResult<MappingSaveReport> {
        Ok(MappingSaveReport {
            fields: self.fields.save()?,
            methods: self.methods.save()?,
            params: self.params.save()?,
        })
    }
}
