//! Merging per-file extractions into one keyed catalog.
//!
//! The registry is built by folding [`CourseRegistry::absorb`] over the
//! extractions in processing order. The first name pair seen for a key is
//! kept; a later, different pair is recorded as a [`NameConflict`].

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::warn;

use coursecat_shared::{
    CourseNames, CourseRecord, Major, NameConflict, RawCourse, RecordKey, TermLabel,
};

/// Everything extracted from one classified source file.
#[derive(Debug, Clone)]
pub struct FileExtraction {
    /// Source file name, for diagnostics.
    pub source: String,
    pub label: TermLabel,
    pub major: Major,
    pub grade_level: u8,
    pub courses: Vec<RawCourse>,
}

/// Keyed course names accumulated over a run.
#[derive(Debug, Default)]
pub struct CourseRegistry {
    entries: HashMap<RecordKey, CourseNames>,
    conflicts: Vec<NameConflict>,
}

/// Final output of a registry: sorted records plus the conflicts seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedCatalog {
    pub records: Vec<CourseRecord>,
    pub conflicts: Vec<NameConflict>,
}

impl CourseRegistry {
    /// Fold `extractions` in order into a registry.
    pub fn from_extractions<I>(extractions: I) -> Self
    where
        I: IntoIterator<Item = FileExtraction>,
    {
        extractions
            .into_iter()
            .fold(Self::default(), |registry, extraction| registry.absorb(extraction))
    }

    /// Add every course of one file, keeping names already stored.
    pub fn absorb(mut self, extraction: FileExtraction) -> Self {
        let FileExtraction {
            source,
            label,
            major,
            grade_level,
            courses,
        } = extraction;

        for course in courses {
            let key = RecordKey {
                academic_year: label.academic_year.clone(),
                term: label.term,
                major,
                grade_level,
                course_code: course.code,
            };
            let names = CourseNames {
                name_cn: course.name_cn,
                name_en: course.name_en,
            };

            match self.entries.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(names);
                }
                Entry::Occupied(slot) if *slot.get() == names => {}
                Entry::Occupied(slot) => {
                    let conflict = NameConflict {
                        key: slot.key().clone(),
                        kept: slot.get().clone(),
                        discarded: names,
                        source: source.clone(),
                    };
                    warn!(
                        key = %conflict.key,
                        kept = %conflict.kept,
                        discarded = %conflict.discarded,
                        source = %conflict.source,
                        "course name conflict, keeping first"
                    );
                    self.conflicts.push(conflict);
                }
            }
        }

        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn conflicts(&self) -> &[NameConflict] {
        &self.conflicts
    }

    /// Materialize the records, sorted by academic year, term, grade level,
    /// major code, then course code.
    pub fn into_catalog(self) -> MergedCatalog {
        let mut records: Vec<CourseRecord> = self
            .entries
            .into_iter()
            .map(|(key, names)| CourseRecord::new(key, names))
            .collect();

        records.sort_by(|a, b| {
            (&a.academic_year, a.term, a.grade_level, a.major.code(), &a.course_code).cmp(&(
                &b.academic_year,
                b.term,
                b.grade_level,
                b.major.code(),
                &b.course_code,
            ))
        });

        MergedCatalog {
            records,
            conflicts: self.conflicts,
        }
    }
}
