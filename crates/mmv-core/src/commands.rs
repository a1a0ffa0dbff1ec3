//! Rename directives emitted for pending changes.
//!
//! Each rename the user makes becomes one directive:
//! `!<token> <srg_name> <new_name>[ <comment>]`, where the token names the
//! member kind and whether the rename is forced.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of member being renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Field,
    Method,
    Param,
}

impl MemberKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberKind::Field => "field",
            MemberKind::Method => "method",
            MemberKind::Param => "param",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation kind of a rename directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
    SuggestField,
    SuggestMethod,
    SuggestParam,
    ForceField,
    ForceMethod,
    ForceParam,
}

impl DirectiveKind {
    /// Pick the directive for a member kind and forced flag.
    pub fn for_member(kind: MemberKind, forced: bool) -> Self {
        match (kind, forced) {
            (MemberKind::Field, false) => DirectiveKind::SuggestField,
            (MemberKind::Method, false) => DirectiveKind::SuggestMethod,
            (MemberKind::Param, false) => DirectiveKind::SuggestParam,
            (MemberKind::Field, true) => DirectiveKind::ForceField,
            (MemberKind::Method, true) => DirectiveKind::ForceMethod,
            (MemberKind::Param, true) => DirectiveKind::ForceParam,
        }
    }

    /// Command token, e.g. `sf` or `fsm`.
    pub fn token(self) -> &'static str {
        match self {
            DirectiveKind::SuggestField => "sf",
            DirectiveKind::SuggestMethod => "sm",
            DirectiveKind::SuggestParam => "sp",
            DirectiveKind::ForceField => "fsf",
            DirectiveKind::ForceMethod => "fsm",
            DirectiveKind::ForceParam => "fsp",
        }
    }

    pub fn member_kind(self) -> MemberKind {
        match self {
            DirectiveKind::SuggestField | DirectiveKind::ForceField => MemberKind::Field,
            DirectiveKind::SuggestMethod | DirectiveKind::ForceMethod => MemberKind::Method,
            DirectiveKind::SuggestParam | DirectiveKind::ForceParam => MemberKind::Param,
        }
    }

    pub fn is_forced(self) -> bool {
        matches!(
            self,
            DirectiveKind::ForceField | DirectiveKind::ForceMethod | DirectiveKind::ForceParam
        )
    }
}

/// One rename to be sent upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameDirective {
    pub kind: DirectiveKind,
    pub srg_name: String,
    pub new_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RenameDirective {
    pub fn new(
        kind: DirectiveKind,
        srg_name: impl Into<String>,
        new_name: impl Into<String>,
    ) -> Self {
        RenameDirective {
            kind,
            srg_name: srg_name.into(),
            new_name: new_name.into(),
            comment: None,
        }
    }

    /// Attach a comment. Empty comments are dropped.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.comment = (!comment.is_empty()).then_some(comment);
        self
    }
}

impl fmt::Display for RenameDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{} {} {}", self.kind.token(), self.srg_name, self.new_name)?;
        if let Some(comment) = &self.comment {
            write!(f, " {}", comment)?;
        }
        Ok(())
    }
}
