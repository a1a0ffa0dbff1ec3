//! TSRG parsing.
//!
//! TSRG is line oriented:
//!
//! ```text
//! u net/minecraft/advancements/DisplayInfo
//! 	a field_192300_a
//! 	b (Lhy;)Lu; func_192295_b
//! ```
//!
//! A line without a leading tab opens a class (`<obf> <package/Class>`).
//! A tab-indented line is a member of the most recent class: two tokens
//! make a field (`<obf> <srg>`), three a method (`<obf> <descriptor> <srg>`).
//!
//! The parser is a two-state machine ([`ParseState`]). The state is passed
//! in and returned by [`TsrgParser::step`] rather than kept on the parser,
//! so each line can be driven and inspected on its own.
//!
//! Every method parsed also gets a zero-parameter placeholder in the
//! caller's [`ExcTable`], merged with [`ExcTable::merge`] so a record that
//! already carries parameter names is never replaced.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::database::SymbolDatabase;
use crate::error::{MmvError, MmvResult};
use crate::exc::{ExcRecord, ExcTable};
use crate::statics::StaticMethodTest;
use crate::symbols::{ClassId, ClassSymbol, FieldSymbol, MethodSymbol};

// ============================================================================
// Line Classification
// ============================================================================

/// One tokenized TSRG line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsrgLine<'a> {
    /// Empty line; ignored.
    Blank,
    /// `<obf> <package/Class>`
    Class {
        obf: &'a str,
        package: &'a str,
        name: &'a str,
    },
    /// `\t<obf> <srg>`
    Field { obf: &'a str, srg: &'a str },
    /// `\t<obf> <descriptor> <srg>`
    Method {
        obf: &'a str,
        descriptor: &'a str,
        srg: &'a str,
    },
}

fn tokens(text: &str) -> Vec<&str> {
    text.trim_end_matches(' ').split(' ').collect()
}

/// Tokenize a single line. `line_no` is 1-based and only used for errors.
pub fn classify_line(line_no: usize, line: &str) -> MmvResult<TsrgLine<'_>> {
    if line.trim().is_empty() {
        return Ok(TsrgLine::Blank);
    }

    if let Some(member) = line.strip_prefix('\t') {
        let parts = tokens(member);
        return match *parts.as_slice() {
            [obf, srg] => Ok(TsrgLine::Field { obf, srg }),
            [obf, descriptor, srg] => Ok(TsrgLine::Method {
                obf,
                descriptor,
                srg,
            }),
            _ => Err(MmvError::MalformedMemberLine {
                line: line_no,
                tokens: parts.len(),
            }),
        };
    }

    let parts = tokens(line);
    let [obf, deobf] = *parts.as_slice() else {
        return Err(MmvError::MalformedClassLine {
            line: line_no,
            reason: format!("expected 2 tokens, found {}", parts.len()),
        });
    };
    let Some((package, name)) = deobf.rsplit_once('/') else {
        return Err(MmvError::MalformedClassLine {
            line: line_no,
            reason: format!("'{}' has no package separator", deobf),
        });
    };
    if package.is_empty() || name.is_empty() {
        return Err(MmvError::MalformedClassLine {
            line: line_no,
            reason: format!("'{}' has an empty package or class name", deobf),
        });
    }

    Ok(TsrgLine::Class { obf, package, name })
}

// ============================================================================
// Parser State
// ============================================================================

/// The class a member line belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassContext {
    pub id: ClassId,
    pub obf_name: String,
    pub name: String,
    pub package: String,
}

/// Parser state between lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParseState {
    /// No class line seen yet.
    #[default]
    AwaitingClass,
    /// Member lines attach to this class.
    InClass(ClassContext),
}

/// Counters for one parse pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: usize,
    pub classes: usize,
    pub methods: usize,
    pub fields: usize,
    /// Exc placeholders actually stored (methods with no prior record).
    pub placeholders: usize,
}

/// Builds a [`SymbolDatabase`] line by line, backfilling Exc placeholders.
pub struct TsrgParser<'a, S: StaticMethodTest + ?Sized> {
    db: SymbolDatabase,
    exc: &'a mut ExcTable,
    statics: &'a S,
    stats: ParseStats,
}

impl<'a, S: StaticMethodTest + ?Sized> TsrgParser<'a, S> {
    /// Create a parser writing placeholders into `exc` and asking `statics`
    /// whether each method is static.
    pub fn new(exc: &'a mut ExcTable, statics: &'a S) -> Self {
        TsrgParser {
            db: SymbolDatabase::new(),
            exc,
            statics,
            stats: ParseStats::default(),
        }
    }

    /// Process one line and return the state for the next one.
    pub fn step(&mut self, state: ParseState, line_no: usize, line: &str) -> MmvResult<ParseState> {
        self.stats.lines += 1;
        match classify_line(line_no, line)? {
            TsrgLine::Blank => Ok(state),
            TsrgLine::Class { obf, package, name } => {
                let id = self.db.insert_class(ClassSymbol::new(obf, name, package))?;
                self.stats.classes += 1;
                Ok(ParseState::InClass(ClassContext {
                    id,
                    obf_name: obf.to_string(),
                    name: name.to_string(),
                    package: package.to_string(),
                }))
            }
            TsrgLine::Field { obf, srg } => {
                let ParseState::InClass(ctx) = &state else {
                    return Err(MmvError::MemberOutsideClass { line: line_no });
                };
                self.add_field(ctx, obf, srg)?;
                Ok(state)
            }
            TsrgLine::Method {
                obf,
                descriptor,
                srg,
            } => {
                let ParseState::InClass(ctx) = &state else {
                    return Err(MmvError::MemberOutsideClass { line: line_no });
                };
                self.add_method(ctx, obf, descriptor, srg)?;
                Ok(state)
            }
        }
    }

    fn add_field(&mut self, ctx: &ClassContext, obf: &str, srg: &str) -> MmvResult<()> {
        let field = FieldSymbol {
            obf_owner: ctx.obf_name.clone(),
            obf_name: obf.to_string(),
            owner: ctx.name.clone(),
            package: ctx.package.clone(),
            srg_name: srg.to_string(),
            forced: false,
        };
        self.db.insert_field(ctx.id, field)?;
        self.stats.fields += 1;
        Ok(())
    }

    fn add_method(
        &mut self,
        ctx: &ClassContext,
        obf: &str,
        descriptor: &str,
        srg: &str,
    ) -> MmvResult<()> {
        let method = MethodSymbol {
            obf_owner: ctx.obf_name.clone(),
            obf_name: obf.to_string(),
            obf_descriptor: descriptor.to_string(),
            owner: ctx.name.clone(),
            package: ctx.package.clone(),
            srg_name: srg.to_string(),
            srg_descriptor: None,
            forced: false,
        };
        self.db.insert_method(ctx.id, method)?;
        self.stats.methods += 1;

        // The Exc descriptor is the obfuscated one until descriptors are remapped.
        let placeholder = ExcRecord::placeholder(
            ctx.name.as_str(),
            srg,
            descriptor,
            self.statics.is_static(srg),
        );
        if self.exc.merge(placeholder) {
            self.stats.placeholders += 1;
        }
        Ok(())
    }

    /// Finish the pass and hand over the database.
    pub fn finish(self) -> (SymbolDatabase, ParseStats) {
        (self.db, self.stats)
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Parse a whole TSRG document.
///
/// Parsing stops at the first malformed line; no partial database is
/// returned.
pub fn parse_tsrg<S: StaticMethodTest + ?Sized>(
    content: &str,
    exc: &mut ExcTable,
    statics: &S,
) -> MmvResult<SymbolDatabase> {
    let mut parser = TsrgParser::new(exc, statics);
    let mut state = ParseState::AwaitingClass;
    for (idx, line) in content.lines().enumerate() {
        state = parser.step(state, idx + 1, line)?;
    }
    let (db, stats) = parser.finish();
    debug!(
        classes = db.class_count(),
        methods = db.method_count(),
        fields = db.field_count(),
        placeholders = stats.placeholders,
        "parsed {} TSRG lines",
        stats.lines
    );
    Ok(db)
}

/// Read and parse a TSRG file.
pub fn load_tsrg<S: StaticMethodTest + ?Sized>(
    path: &Path,
    exc: &mut ExcTable,
    statics: &S,
) -> MmvResult<SymbolDatabase> {
    let content = fs::read_to_string(path).map_err(|e| MmvError::io(path, e))?;
    parse_tsrg(&content, exc, statics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statics::StaticMethods;

    fn never_static(_: &str) -> bool {
        false
    }

    #[test]
    fn test_classify_class_line() {
        assert_eq!(
            classify_line(1, "u net/minecraft/advancements/DisplayInfo").unwrap(),
            TsrgLine::Class {
                obf: "u",
                package: "net/minecraft/advancements",
                name: "DisplayInfo",
            }
        );
    }

    #[test]
    fn test_classify_member_lines() {
        assert_eq!(
            classify_line(2, "\ta field_192300_a").unwrap(),
            TsrgLine::Field {
                obf: "a",
                srg: "field_192300_a"
            }
        );
        assert_eq!(
            classify_line(3, "\tb (Lhy;)Lu; func_192295_b").unwrap(),
            TsrgLine::Method {
                obf: "b",
                descriptor: "(Lhy;)Lu;",
                srg: "func_192295_b"
            }
        );
        assert_eq!(classify_line(4, "").unwrap(), TsrgLine::Blank);
    }

    #[test]
    fn test_single_token_class_line_is_error() {
        let err = classify_line(1, "onlyonetoken").unwrap_err();
        assert!(matches!(err, MmvError::MalformedClassLine { line: 1, .. }));
    }

    #[test]
    fn test_class_line_without_separator_is_error() {
        let err = classify_line(5, "a Main").unwrap_err();
        assert!(matches!(err, MmvError::MalformedClassLine { line: 5, .. }));
        assert!(err.to_string().contains("no package separator"));
    }

    #[test]
    fn test_member_token_count_errors() {
        let err = classify_line(9, "\ta").unwrap_err();
        assert!(matches!(
            err,
            MmvError::MalformedMemberLine { line: 9, tokens: 1 }
        ));
        let err = classify_line(9, "\ta b c d").unwrap_err();
        assert!(matches!(
            err,
            MmvError::MalformedMemberLine { line: 9, tokens: 4 }
        ));
    }

    #[test]
    fn test_step_state_transitions() {
        let mut exc = ExcTable::new();
        let statics = never_static;
        let mut parser = TsrgParser::new(&mut exc, &statics);

        let state = parser
            .step(ParseState::AwaitingClass, 1, "c a/B")
            .unwrap();
        let ParseState::InClass(ctx) = &state else {
            panic!("expected class context, got {:?}", state);
        };
        assert_eq!(ctx.package, "a");
        assert_eq!(ctx.name, "B");

        let next = parser.step(state.clone(), 2, "\tf field_1_f").unwrap();
        assert_eq!(next, state);

        let err = parser
            .step(ParseState::AwaitingClass, 3, "\tf field_2_f")
            .unwrap_err();
        assert!(matches!(err, MmvError::MemberOutsideClass { line: 3 }));
    }

    #[test]
    fn test_placeholder_static_flag_comes_from_statics() {
        let mut statics = StaticMethods::new();
        statics.insert("func_1_s");
        let mut exc = ExcTable::new();

        parse_tsrg(
            "c a/B\n\tm ()V func_1_s\n\tn ()V func_2_i\n",
            &mut exc,
            &statics,
        )
        .unwrap();

        assert!(exc.get("func_1_s").unwrap().is_static);
        assert!(!exc.get("func_2_i").unwrap().is_static);
    }

    #[test]
    fn test_stats_count_placeholders_only_when_stored() {
        let mut exc = ExcTable::new();
        exc.insert(ExcRecord::new(
            "B",
            "func_1_a",
            "(I)V",
            vec!["p_1_1_".to_string()],
            false,
        ));
        let statics = never_static;
        let mut parser = TsrgParser::new(&mut exc, &statics);
        let mut state = ParseState::default();
        for (i, line) in ["c a/B", "\tm (I)V func_1_a", "\tn ()V func_2_b"]
            .iter()
            .enumerate()
        {
            state = parser.step(state, i + 1, line).unwrap();
        }
        let (db, stats) = parser.finish();

        assert_eq!(stats.methods, 2);
        assert_eq!(stats.placeholders, 1);
        assert_eq!(db.method_count(), 2);
    }
}
