//! Integration tests for opening a data directory and renaming through it

use std::fs;
use std::path::Path;

use mmv_core::commands::{DirectiveKind, MemberKind};
use mmv_core::config::{MmvConfig, CONFIG_FILE_NAME};
use mmv_core::error::MmvError;
use mmv_core::exc::{ExcRecord, ExcTable};
use mmv_core::mappings::MappingSet;
use mmv_core::overrides::{SaveOutcome, Side};
use tempfile::TempDir;

const TSRG: &str = "\
a net/minecraft/world/World
\tb field_72995_K
\tc (Lnet/minecraft/entity/Entity;)Z func_72838_d
\td ()J func_72820_D
e net/minecraft/util/Util
\tf ()J func_211177_b
";

const FIELDS: &str = "searge,name,side,desc\nfield_72995_K,isRemote,2,True if client, false if server\n";
const METHODS: &str = "searge,name,side,desc\nfunc_72838_d,spawnEntity,0,Called when an entity is spawned\n";
const PARAMS: &str = "param,name,side\np_72838_1_,entityIn,1\n";

fn data_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(dir.join("joined.tsrg"), TSRG).unwrap();
    fs::write(dir.join("fields.csv"), FIELDS).unwrap();
    fs::write(dir.join("methods.csv"), METHODS).unwrap();
    fs::write(dir.join("params.csv"), PARAMS).unwrap();
    fs::write(dir.join("static_methods.txt"), "func_211177_b\n").unwrap();
    temp
}

fn open(dir: &Path) -> MappingSet {
    let config = MmvConfig::load_from_dir(dir).unwrap();
    MappingSet::open(dir, &config).unwrap()
}

#[test]
fn test_open_loads_every_source() {
    let temp = data_dir();
    let set = open(temp.path());

    assert_eq!(set.database().class_count(), 2);
    assert_eq!(set.database().method_count(), 3);
    assert_eq!(set.exc().len(), 3);
    assert!(set.exc().get("func_211177_b").unwrap().is_static);
    assert!(!set.exc().get("func_72820_D").unwrap().is_static);
    assert_eq!(set.statics().len(), 1);
    assert_eq!(set.fields().len(), 1);
    assert_eq!(set.methods().len(), 1);
    assert_eq!(set.params().len(), 1);
    assert!(!set.is_dirty());
    assert_eq!(set.dir(), temp.path());

    assert_eq!(
        set.display_name(MemberKind::Field, "field_72995_K"),
        Some("isRemote")
    );
    assert_eq!(set.display_name(MemberKind::Method, "func_72820_D"), None);
}

#[test]
fn test_missing_static_list_is_fine() {
    let temp = data_dir();
    fs::remove_file(temp.path().join("static_methods.txt")).unwrap();
    let set = open(temp.path());
    assert!(set.statics().is_empty());
    assert!(!set.exc().get("func_211177_b").unwrap().is_static);
}

#[test]
fn test_missing_tsrg_is_io_error() {
    let temp = data_dir();
    fs::remove_file(temp.path().join("joined.tsrg")).unwrap();
    let err = MappingSet::open(temp.path(), &MmvConfig::default()).unwrap_err();
    assert!(matches!(err, MmvError::Io { .. }));
}

#[test]
fn test_config_file_renames_sources() {
    let temp = data_dir();
    let dir = temp.path();
    fs::create_dir(dir.join("config")).unwrap();
    fs::rename(dir.join("joined.tsrg"), dir.join("config").join("mappings.tsrg")).unwrap();
    fs::write(
        dir.join(CONFIG_FILE_NAME),
        "tsrg_file = \"config/mappings.tsrg\"\n",
    )
    .unwrap();

    let set = open(dir);
    assert_eq!(set.database().class_count(), 2);
}

#[test]
fn test_rename_existing_field_keeps_side_and_comment() {
    let temp = data_dir();
    let mut set = open(temp.path());

    let directive = set
        .rename(MemberKind::Field, "field_72995_K", "isClientSide", None, false)
        .unwrap();
    assert_eq!(directive.kind, DirectiveKind::SuggestField);
    assert_eq!(
        directive.to_string(),
        "!sf field_72995_K isClientSide True if client, false if server"
    );

    let record = set.fields().get("field_72995_K").unwrap();
    assert_eq!(record.mcp_name, "isClientSide");
    assert_eq!(record.side, Side::Both);
    assert_eq!(record.comment, "True if client, false if server");
    assert!(set.is_dirty());
}

#[test]
fn test_rename_new_method_defaults_to_both_sides() {
    let temp = data_dir();
    let mut set = open(temp.path());

    let directive = set
        .rename(
            MemberKind::Method,
            "func_72820_D",
            "getDayTime",
            Some("Current day time"),
            true,
        )
        .unwrap();
    assert_eq!(directive.kind, DirectiveKind::ForceMethod);
    assert_eq!(
        directive.to_string(),
        "!fsm func_72820_D getDayTime Current day time"
    );

    let record = set.methods().get("func_72820_D").unwrap();
    assert_eq!(record.side, Side::Both);
    assert_eq!(record.comment, "Current day time");
}

#[test]
fn test_rename_param_keeps_side() {
    let temp = data_dir();
    let mut set = open(temp.path());

    set.rename(MemberKind::Param, "p_72838_1_", "entity", None, false)
        .unwrap();
    let record = set.params().get("p_72838_1_").unwrap();
    assert_eq!(record.mcp_name, "entity");
    assert_eq!(record.side, Side::Server);
}

#[test]
fn test_rename_unknown_member_is_not_found() {
    let temp = data_dir();
    let mut set = open(temp.path());

    for kind in [MemberKind::Field, MemberKind::Method, MemberKind::Param] {
        let err = set
            .rename(kind, "nothing_here", "x", None, false)
            .unwrap_err();
        assert!(matches!(err, MmvError::NotFound(_)));
    }
    assert!(!set.is_dirty());
    assert!(set.pending().is_empty());
}

#[test]
fn test_rename_rejects_values_that_break_csv_rows() {
    let temp = data_dir();
    let dir = temp.path();
    let mut set = open(dir);

    let bad_names = [
        (MemberKind::Param, "p_72838_1_", "a,b"),
        (MemberKind::Field, "field_72995_K", "is\nRemote"),
        (MemberKind::Method, "func_72838_d", "spawn\r"),
        (MemberKind::Method, "func_72838_d", ""),
    ];
    for (kind, srg, name) in bad_names {
        let err = set.rename(kind, srg, name, None, false).unwrap_err();
        assert!(matches!(err, MmvError::InvalidValue { field: "name", .. }));
        assert!(err.is_format_error());
    }

    let err = set
        .rename(
            MemberKind::Field,
            "field_72995_K",
            "isRemote",
            Some("line1\nline2"),
            false,
        )
        .unwrap_err();
    assert!(matches!(err, MmvError::InvalidValue { field: "comment", .. }));

    assert!(!set.is_dirty());
    assert!(set.pending().is_empty());
    assert_eq!(set.display_name(MemberKind::Param, "p_72838_1_"), Some("entityIn"));
    assert_eq!(fs::read_to_string(dir.join("params.csv")).unwrap(), PARAMS);
}

#[test]
fn test_rename_allows_commas_in_comments() {
    let temp = data_dir();
    let dir = temp.path();
    let mut set = open(dir);

    let directive = set
        .rename(
            MemberKind::Method,
            "func_72838_d",
            "addEntity",
            Some("Adds an entity, if allowed"),
            false,
        )
        .unwrap();
    assert_eq!(
        directive.to_string(),
        "!sm func_72838_d addEntity Adds an entity, if allowed"
    );
    set.save().unwrap();

    let reopened = open(dir);
    let record = reopened.methods().get("func_72838_d").unwrap();
    assert_eq!(record.comment, "Adds an entity, if allowed");
    assert_eq!(record.side, Side::Client);
}

#[test]
fn test_pending_directives_in_order() {
    let temp = data_dir();
    let mut set = open(temp.path());

    set.rename(MemberKind::Field, "field_72995_K", "a", None, false)
        .unwrap();
    set.rename(MemberKind::Method, "func_72838_d", "b", None, false)
        .unwrap();

    let tokens: Vec<_> = set.pending().iter().map(|d| d.kind.token()).collect();
    assert_eq!(tokens, vec!["sf", "sm"]);

    let taken = set.take_pending();
    assert_eq!(taken.len(), 2);
    assert!(set.pending().is_empty());
    // Taking directives does not touch the stores.
    assert!(set.is_dirty());
}

#[test]
fn test_save_writes_only_dirty_stores() {
    let temp = data_dir();
    let dir = temp.path();
    let mut set = open(dir);

    set.rename(MemberKind::Method, "func_72838_d", "addEntity", None, false)
        .unwrap();
    let report = set.save().unwrap();

    assert_eq!(report.fields.outcome, SaveOutcome::Unchanged);
    assert_eq!(report.params.outcome, SaveOutcome::Unchanged);
    assert_eq!(report.methods.outcome, SaveOutcome::Written { records: 1 });
    assert!(report.methods.backup.is_some());
    assert!(!set.is_dirty());

    assert_eq!(fs::read_to_string(dir.join("fields.csv")).unwrap(), FIELDS);
    assert_eq!(
        fs::read_to_string(dir.join("methods.csv")).unwrap(),
        "searge,name,side,desc\nfunc_72838_d,addEntity,0,Called when an entity is spawned\n"
    );

    let reopened = open(dir);
    assert_eq!(
        reopened.display_name(MemberKind::Method, "func_72838_d"),
        Some("addEntity")
    );
}

#[test]
fn test_open_with_exc_keeps_richer_records() {
    let temp = data_dir();
    let mut exc = ExcTable::new();
    exc.insert(ExcRecord::new(
        "World",
        "func_72838_d",
        "(Lnet/minecraft/entity/Entity;)Z",
        vec!["p_72838_1_".to_string()],
        false,
    ));

    let config = MmvConfig::default();
    let mut set = MappingSet::open_with_exc(temp.path(), &config, exc).unwrap();

    let record = set.exc().get("func_72838_d").unwrap();
    assert_eq!(record.parameters, vec!["p_72838_1_".to_string()]);

    // Known through the Exc index even without a params.csv row.
    set.rename(MemberKind::Param, "p_72838_1_", "entity", None, false)
        .unwrap();
    assert_eq!(
        set.display_name(MemberKind::Param, "p_72838_1_"),
        Some("entity")
    );
}
