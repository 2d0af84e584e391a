//! Grade level from cohort entry year.

use std::ops::RangeInclusive;

use coursecat_shared::{CatalogError, Result};

/// Valid grade levels of a four-year program.
pub const GRADE_LEVELS: RangeInclusive<i64> = 1..=4;

/// `reference_start_year - entry_year + 1`, which must land in 1..=4.
///
/// A cohort that entered in the reference start year is in grade 1.
/// Out-of-range results mean a malformed filename or a misconfigured
/// reference year and are returned as [`CatalogError::GradeOutOfRange`].
pub fn grade_level(reference_start_year: i32, entry_year: i32) -> Result<u8> {
    // Widened so no pair of configured and parsed years can overflow.
    let level = i64::from(reference_start_year) - i64::from(entry_year) + 1;

    if !GRADE_LEVELS.contains(&level) {
        return Err(CatalogError::GradeOutOfRange {
            reference_start_year,
            entry_year,
            level,
        });
    }

    Ok(level as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_in_reference_year_is_grade_one() {
        assert_eq!(grade_level(2025, 2025).unwrap(), 1);
        assert_eq!(grade_level(2024, 2024).unwrap(), 1);
    }

    #[test]
    fn four_cohorts_in_window() {
        let levels: Vec<u8> = (2022..=2025)
            .rev()
            .map(|entry| grade_level(2025, entry).unwrap())
            .collect();
        assert_eq!(levels, vec![1, 2, 3, 4]);
    }

    #[test]
    fn strictly_decreasing_in_entry_year() {
        let mut previous = None;
        for entry in 2022..=2025 {
            let level = grade_level(2025, entry).unwrap();
            if let Some(prev) = previous {
                assert!(level < prev);
            }
            previous = Some(level);
        }
    }

    #[test]
    fn entry_after_reference_is_out_of_range() {
        let err = grade_level(2025, 2026).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::GradeOutOfRange {
                reference_start_year: 2025,
                entry_year: 2026,
                level: 0,
            }
        ));
    }

    #[test]
    fn extreme_years_are_out_of_range_not_overflow() {
        let err = grade_level(i32::MAX, i32::MIN).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::GradeOutOfRange {
                level,
                ..
            } if level == i64::from(i32::MAX) - i64::from(i32::MIN) + 1
        ));
        assert!(grade_level(i32::MIN, i32::MAX).is_err());
    }

    #[test]
    fn fifth_year_is_out_of_range() {
        assert!(grade_level(2025, 2021).is_err());
        assert!(grade_level(2024, 2020).is_err());
    }
}
