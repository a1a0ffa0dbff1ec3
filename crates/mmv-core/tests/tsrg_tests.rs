//! Integration tests for TSRG parsing and the symbol database

use mmv_core::error::MmvError;
use mmv_core::exc::{ExcRecord, ExcTable};
use mmv_core::statics::StaticMethods;
use mmv_core::tsrg::parse_tsrg;

const SAMPLE: &str = "\
u net/minecraft/advancements/DisplayInfo
\ta field_192300_a
\tb field_192301_b
\ta (Lhy;)Lu; func_192295_b
\tc ()Z func_193223_h
v net/minecraft/advancements/FrameType
\ta field_192313_a
\ta (Ljava/lang/String;)Lv; func_192308_a
w net/minecraft/util/Util
\ta ()J func_211177_b
";

fn not_static(_: &str) -> bool {
    false
}

#[test]
fn test_sample_scenario() {
    let mut exc = ExcTable::new();
    let db = parse_tsrg(
        "c a/B\n\tf srg_field_1\n\tm (I)V srg_method_1\n",
        &mut exc,
        &not_static,
    )
    .unwrap();

    assert_eq!(db.class_count(), 1);
    let class = db.class("a/B").unwrap();
    assert_eq!(class.obf_name, "c");
    assert_eq!(class.package, "a");
    assert_eq!(class.name, "B");
    assert!(!class.forced);

    let fields = db.fields_of("a/B");
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].srg_name, "srg_field_1");
    assert_eq!(fields[0].obf_name, "f");
    assert_eq!(fields[0].obf_owner, "c");

    let methods = db.methods_of("a/B");
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0].srg_name, "srg_method_1");
    assert_eq!(methods[0].obf_descriptor, "(I)V");
    assert!(!methods[0].is_descriptor_resolved());
    assert_eq!(methods[0].descriptor(), "(I)V");

    let record = exc.get("srg_method_1").unwrap();
    assert!(record.parameters.is_empty());
    assert!(!record.is_static);
    assert_eq!(record.class_name, "B");
    assert_eq!(exc.len(), 1);
}

#[test]
fn test_every_member_in_one_class_and_global_index() {
    let mut exc = ExcTable::new();
    let db = parse_tsrg(SAMPLE, &mut exc, &not_static).unwrap();

    assert_eq!(db.class_count(), 3);
    assert_eq!(db.method_count(), 4);
    assert_eq!(db.field_count(), 3);

    for class in db.classes() {
        let qualified = class.qualified_name();
        for method in db.methods_of(&qualified) {
            assert_eq!(db.method(&method.srg_name), Some(method));
            assert_eq!(
                db.method_owner(&method.srg_name).unwrap().qualified_name(),
                qualified
            );
        }
        for field in db.fields_of(&qualified) {
            assert_eq!(db.field(&field.srg_name), Some(field));
            assert_eq!(
                db.field_owner(&field.srg_name).unwrap().qualified_name(),
                qualified
            );
        }
    }

    let listed: usize = db
        .classes()
        .map(|c| db.methods_of(&c.qualified_name()).len())
        .sum();
    assert_eq!(listed, db.method_count());
}

#[test]
fn test_packages_and_definition_order() {
    let mut exc = ExcTable::new();
    let db = parse_tsrg(SAMPLE, &mut exc, &not_static).unwrap();

    let packages: Vec<_> = db.packages().collect();
    assert_eq!(
        packages,
        vec!["net/minecraft/advancements", "net/minecraft/util"]
    );

    let classes: Vec<_> = db
        .classes_in_package("net/minecraft/advancements")
        .iter()
        .map(|c| c.name.clone())
        .collect();
    assert_eq!(classes, vec!["DisplayInfo", "FrameType"]);

    let fields: Vec<_> = db
        .fields_of("net/minecraft/advancements/DisplayInfo")
        .iter()
        .map(|f| f.srg_name.clone())
        .collect();
    assert_eq!(fields, vec!["field_192300_a", "field_192301_b"]);
}

#[test]
fn test_method_reparsed_with_new_descriptor_overwrites() {
    let mut exc = ExcTable::new();
    let db = parse_tsrg(
        "c a/B\n\tm (I)V func_1_a\n\tn (J)V func_1_a\n",
        &mut exc,
        &not_static,
    )
    .unwrap();

    assert_eq!(db.method_count(), 1);
    let method = db.method("func_1_a").unwrap();
    assert_eq!(method.obf_name, "n");
    assert_eq!(method.obf_descriptor, "(J)V");
    assert_eq!(db.methods_of("a/B").len(), 1);
}

#[test]
fn test_member_redeclared_in_other_class_moves() {
    let mut exc = ExcTable::new();
    let db = parse_tsrg(
        "c a/B\n\tm (I)V func_1_a\n\tf field_1_f\nd a/C\n\tx ()V func_1_a\n\ty field_1_f\n",
        &mut exc,
        &not_static,
    )
    .unwrap();

    assert!(db.methods_of("a/B").is_empty());
    assert!(db.fields_of("a/B").is_empty());
    assert_eq!(db.methods_of("a/C").len(), 1);
    assert_eq!(db.fields_of("a/C").len(), 1);
    assert_eq!(db.method_owner("func_1_a").unwrap().name, "C");
    assert_eq!(db.field_owner("field_1_f").unwrap().name, "C");
    assert_eq!(db.method("func_1_a").unwrap().obf_owner, "d");
}

#[test]
fn test_backfill_never_overwrites_richer_record() {
    let mut exc = ExcTable::new();
    exc.insert(ExcRecord::new(
        "B",
        "func_1_a",
        "(ILjava/lang/String;)V",
        vec!["p_1_1_".to_string(), "p_1_2_".to_string()],
        true,
    ));

    parse_tsrg(
        "c a/B\n\tm (ILjava/lang/String;)V func_1_a\n\tn ()V func_2_b\n",
        &mut exc,
        &not_static,
    )
    .unwrap();

    let kept = exc.get("func_1_a").unwrap();
    assert_eq!(kept.parameters.len(), 2);
    assert!(kept.is_static);
    assert_eq!(exc.record_for_param("p_1_2_").unwrap().srg_name, "func_1_a");

    let placeholder = exc.get("func_2_b").unwrap();
    assert!(placeholder.is_placeholder());
    assert_eq!(placeholder.descriptor, "()V");
}

#[test]
fn test_static_list_drives_placeholder_flag() {
    let statics = StaticMethods::parse("func_211177_b\n");
    let mut exc = ExcTable::new();
    parse_tsrg(SAMPLE, &mut exc, &statics).unwrap();

    assert!(exc.get("func_211177_b").unwrap().is_static);
    assert!(!exc.get("func_192295_b").unwrap().is_static);
    assert_eq!(exc.len(), 4);
}

#[test]
fn test_bare_single_token_line_is_format_error() {
    let mut exc = ExcTable::new();
    let err = parse_tsrg("onlyonetoken\n", &mut exc, &not_static).unwrap_err();
    assert!(matches!(err, MmvError::MalformedClassLine { line: 1, .. }));
    assert!(err.is_format_error());
}

#[test]
fn test_member_before_class_is_error() {
    let mut exc = ExcTable::new();
    let err = parse_tsrg("\ta field_1_a\nc a/B\n", &mut exc, &not_static).unwrap_err();
    assert!(matches!(err, MmvError::MemberOutsideClass { line: 1 }));
}

#[test]
fn test_parse_aborts_at_bad_member_line() {
    let mut exc = ExcTable::new();
    let err = parse_tsrg(
        "c a/B\n\tm (I)V func_1_a\n\tbroken line with five tokens\n",
        &mut exc,
        &not_static,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        MmvError::MalformedMemberLine { line: 3, tokens: 5 }
    ));
}

#[test]
fn test_crlf_and_blank_lines_are_tolerated() {
    let mut exc = ExcTable::new();
    let db = parse_tsrg(
        "c a/B\r\n\tf field_1_f\r\n\r\nd a/C\r\n",
        &mut exc,
        &not_static,
    )
    .unwrap();
    assert_eq!(db.class_count(), 2);
    assert_eq!(db.field("field_1_f").unwrap().obf_name, "f");
}
