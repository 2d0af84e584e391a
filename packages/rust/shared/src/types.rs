//! Core domain types for the course catalog.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Major
// ---------------------------------------------------------------------------

/// Degree program a course offering belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Major {
    /// 软件工程
    Se,
    /// 电子信息工程
    Eie,
    /// 物联网工程
    Iot,
    /// 金融学
    Fin,
}

impl Major {
    /// All majors, in the order filename keywords are tested.
    pub const ALL: [Major; 4] = [Major::Se, Major::Eie, Major::Iot, Major::Fin];

    /// Program-name keyword that identifies this major in a filename.
    pub fn keyword(self) -> &'static str {
        match self {
            Major::Se => "软件工程",
            Major::Eie => "电子信息工程",
            Major::Iot => "物联网工程",
            Major::Fin => "金融学",
        }
    }

    /// Short program code used in output records.
    pub fn code(self) -> &'static str {
        match self {
            Major::Se => "SE",
            Major::Eie => "EIE",
            Major::Iot => "IOT",
            Major::Fin => "FIN",
        }
    }
}

impl std::fmt::Display for Major {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Term
// ---------------------------------------------------------------------------

/// One of the two terms of an academic year. Serialized as `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Term {
    First,
    Second,
}

impl Term {
    pub fn number(self) -> u8 {
        match self {
            Term::First => 1,
            Term::Second => 2,
        }
    }
}

impl TryFrom<u8> for Term {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Term::First),
            2 => Ok(Term::Second),
            other => Err(format!("term must be 1 or 2, got {other}")),
        }
    }
}

impl From<Term> for u8 {
    fn from(term: Term) -> Self {
        term.number()
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Academic year + term that every record of one collection is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TermLabel {
    /// Two-year label, e.g. `2025-2026`.
    pub academic_year: String,
    pub term: Term,
}

impl std::fmt::Display for TermLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} term {}", self.academic_year, self.term)
    }
}

// ---------------------------------------------------------------------------
// Extraction and records
// ---------------------------------------------------------------------------

/// One course occurrence found in a table cell, before it is keyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCourse {
    pub name_cn: String,
    pub name_en: String,
    pub code: String,
}

/// The bilingual name pair stored under a record key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseNames {
    pub name_cn: String,
    pub name_en: String,
}

impl std::fmt::Display for CourseNames {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.name_cn, self.name_en)
    }
}

/// Unique identity of a course record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub academic_year: String,
    pub term: Term,
    pub major: Major,
    pub grade_level: u8,
    pub course_code: String,
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/grade {}/{}",
            self.academic_year, self.term, self.major, self.grade_level, self.course_code
        )
    }
}

/// A single output row of the merged catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub academic_year: String,
    pub term: Term,
    pub major: Major,
    pub grade_level: u8,
    pub course_code: String,
    pub course_name_cn: String,
    pub course_name_en: String,
}

impl CourseRecord {
    /// Assemble a record from its key and stored names.
    pub fn new(key: RecordKey, names: CourseNames) -> Self {
        Self {
            academic_year: key.academic_year,
            term: key.term,
            major: key.major,
            grade_level: key.grade_level,
            course_code: key.course_code,
            course_name_cn: names.name_cn,
            course_name_en: names.name_en,
        }
    }
}

/// A later occurrence of a key whose names differ from the stored ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameConflict {
    pub key: RecordKey,
    pub kept: CourseNames,
    pub discarded: CourseNames,
    /// File the discarded occurrence came from.
    pub source: String,
}

impl std::fmt::Display for NameConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: kept {}, discarded {} from {}",
            self.key, self.kept, self.discarded, self.source
        )
    }
}

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 identifying one extraction run (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
