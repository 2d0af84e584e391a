//! Filename classification: major and cohort entry year.
//!
//! The two collections name their files differently:
//! - primary (first term): `软件工程2025级课表.csv`, keyword anywhere, year
//!   immediately followed by the cohort marker
//! - template (second term): `2023-2024-2-2023电子信息工程课表.csv`, fixed
//!   prefix, then the entry year
//!
//! Both are [`SourceConvention`] implementations so the pipeline handles
//! them through one interface.

use std::sync::LazyLock;

use regex::Regex;

use coursecat_shared::{
    CatalogError, ClassificationRule, DEFAULT_COHORT_MARKER, DEFAULT_TEMPLATE_PREFIX, Major,
    NamingConfig, Result,
};

/// Four-digit year capture shared by both conventions.
const YEAR_PATTERN: &str = "([0-9]{4})";

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// How one collection encodes classification metadata in its filenames.
pub trait SourceConvention: Send + Sync {
    /// Human-readable convention name for tracing.
    fn name(&self) -> &str;

    /// Cohort entry year encoded in `filename`.
    fn entry_year(&self, filename: &str) -> Result<i32>;

    /// Major encoded in `filename`.
    fn major(&self, filename: &str) -> Result<Major> {
        infer_major(filename)
    }

    /// Whether this collection stands in for a term with no real timetables.
    fn stand_in(&self) -> bool {
        false
    }
}

/// Build the convention described by a `[*.naming]` config section.
pub fn convention_for(naming: &NamingConfig) -> Result<Box<dyn SourceConvention>> {
    match naming {
        NamingConfig::Primary { cohort_marker } => {
            Ok(Box::new(PrimaryConvention::new(cohort_marker)?))
        }
        NamingConfig::Template { prefix, stand_in } => {
            Ok(Box::new(TemplateConvention::new(prefix, *stand_in)?))
        }
    }
}

// ---------------------------------------------------------------------------
// Major
// ---------------------------------------------------------------------------

/// Find the program keyword in `filename`. Keywords are tried in
/// [`Major::ALL`] order and the first hit wins.
pub fn infer_major(filename: &str) -> Result<Major> {
    Major::ALL
        .into_iter()
        .find(|major| filename.contains(major.keyword()))
        .ok_or_else(|| CatalogError::classification(filename, ClassificationRule::MissingMajorKeyword))
}

// ---------------------------------------------------------------------------
// Primary convention
// ---------------------------------------------------------------------------

/// `<YYYY><marker>` anywhere in the filename.
#[derive(Debug, Clone)]
pub struct PrimaryConvention {
    marker: String,
    pattern: Regex,
}

impl PrimaryConvention {
    pub fn new(marker: &str) -> Result<Self> {
        if marker.is_empty() {
            return Err(CatalogError::config("cohort marker must not be empty"));
        }
        let pattern = Regex::new(&format!("{YEAR_PATTERN}{}", regex::escape(marker)))
            .map_err(|e| CatalogError::config(format!("invalid cohort marker '{marker}': {e}")))?;
        Ok(Self {
            marker: marker.to_string(),
            pattern,
        })
    }
}

impl SourceConvention for PrimaryConvention {
    fn name(&self) -> &str {
        "primary"
    }

    fn entry_year(&self, filename: &str) -> Result<i32> {
        capture_year(&self.pattern, filename).ok_or_else(|| {
            CatalogError::classification(
                filename,
                ClassificationRule::MissingCohortMarker {
                    marker: self.marker.clone(),
                },
            )
        })
    }
}

static DEFAULT_PRIMARY: LazyLock<PrimaryConvention> = LazyLock::new(|| {
    PrimaryConvention::new(DEFAULT_COHORT_MARKER).expect("default cohort marker")
});

/// Entry year under the primary convention with the default marker (`级`).
pub fn infer_entry_year_primary(filename: &str) -> Result<i32> {
    DEFAULT_PRIMARY.entry_year(filename)
}

// ---------------------------------------------------------------------------
// Template convention
// ---------------------------------------------------------------------------

/// `<prefix><YYYY>` at the very start of the filename.
#[derive(Debug, Clone)]
pub struct TemplateConvention {
    prefix: String,
    pattern: Regex,
    stand_in: bool,
}

impl TemplateConvention {
    pub fn new(prefix: &str, stand_in: bool) -> Result<Self> {
        if prefix.is_empty() {
            return Err(CatalogError::config("template prefix must not be empty"));
        }
        let pattern = Regex::new(&format!("^{}{YEAR_PATTERN}", regex::escape(prefix)))
            .map_err(|e| CatalogError::config(format!("invalid template prefix '{prefix}': {e}")))?;
        Ok(Self {
            prefix: prefix.to_string(),
            pattern,
            stand_in,
        })
    }
}

impl SourceConvention for TemplateConvention {
    fn name(&self) -> &str {
        "template"
    }

    fn entry_year(&self, filename: &str) -> Result<i32> {
        capture_year(&self.pattern, filename).ok_or_else(|| {
            CatalogError::classification(
                filename,
                ClassificationRule::MissingTemplatePrefix {
                    prefix: self.prefix.clone(),
                },
            )
        })
    }

    fn stand_in(&self) -> bool {
        self.stand_in
    }
}

static DEFAULT_TEMPLATE: LazyLock<TemplateConvention> = LazyLock::new(|| {
    TemplateConvention::new(DEFAULT_TEMPLATE_PREFIX, true).expect("default template prefix")
});

/// Entry year under the template convention with the default prefix.
pub fn infer_entry_year_template(filename: &str) -> Result<i32> {
    DEFAULT_TEMPLATE.entry_year(filename)
}

fn capture_year(pattern: &Regex, filename: &str) -> Option<i32> {
    pattern.captures(filename)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_from_each_keyword() {
        assert_eq!(infer_major("软件工程2025级课表.csv").unwrap(), Major::Se);
        assert_eq!(infer_major("电子信息工程2024级.csv").unwrap(), Major::Eie);
        assert_eq!(infer_major("2023-2024-2-2023物联网工程.csv").unwrap(), Major::Iot);
        assert_eq!(infer_major("金融学2022级.csv").unwrap(), Major::Fin);
    }

    #[test]
    fn missing_major_keyword() {
        let err = infer_major("计算机科学2025级.csv").unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Classification {
                rule: ClassificationRule::MissingMajorKeyword,
                ..
            }
        ));
        assert!(err.to_string().contains("计算机科学2025级.csv"));
    }

    #[test]
    fn primary_entry_year() {
        assert_eq!(infer_entry_year_primary("软件工程2025级课表.csv").unwrap(), 2025);
        assert_eq!(infer_entry_year_primary("2023级物联网工程.csv").unwrap(), 2023);
    }

    #[test]
    fn primary_requires_marker_right_after_year() {
        assert!(infer_entry_year_primary("软件工程2025课表.csv").is_err());
        assert!(infer_entry_year_primary("软件工程2025 级.csv").is_err());
        assert!(infer_entry_year_primary("软件工程25级.csv").is_err());
    }

    #[test]
    fn template_entry_year() {
        assert_eq!(
            infer_entry_year_template("2023-2024-2-2023电子信息工程课表.csv").unwrap(),
            2023
        );
    }

    #[test]
    fn template_prefix_is_anchored() {
        let err = infer_entry_year_template("课表2023-2024-2-2023电子信息工程.csv").unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Classification {
                rule: ClassificationRule::MissingTemplatePrefix { .. },
                ..
            }
        ));
        assert!(infer_entry_year_template("2023-2024-2-电子信息工程.csv").is_err());
        assert!(infer_entry_year_template("2023-2024-1-2023电子信息工程.csv").is_err());
    }

    #[test]
    fn custom_marker_and_prefix() {
        let primary = PrimaryConvention::new("cohort").unwrap();
        assert_eq!(primary.entry_year("SE_2024cohort.csv").unwrap(), 2024);

        let template = TemplateConvention::new("T(2).", false).unwrap();
        assert_eq!(template.entry_year("T(2).2021金融学.csv").unwrap(), 2021);
        assert!(template.entry_year("T(2)x2021金融学.csv").is_err());
        assert!(!template.stand_in());
    }

    #[test]
    fn empty_marker_is_rejected() {
        assert!(PrimaryConvention::new("").is_err());
        assert!(TemplateConvention::new("", true).is_err());
    }

    #[test]
    fn classification_is_deterministic() {
        let name = "物联网工程2023级课表.csv";
        for _ in 0..3 {
            assert_eq!(infer_major(name).unwrap(), Major::Iot);
            assert_eq!(infer_entry_year_primary(name).unwrap(), 2023);
        }
    }

    #[test]
    fn convention_from_config() {
        let conv = convention_for(&NamingConfig::Template {
            prefix: DEFAULT_TEMPLATE_PREFIX.into(),
            stand_in: true,
        })
        .unwrap();
        assert_eq!(conv.name(), "template");
        assert!(conv.stand_in());
        assert_eq!(conv.entry_year("2023-2024-2-2022金融学.csv").unwrap(), 2022);
        assert_eq!(conv.major("2023-2024-2-2022金融学.csv").unwrap(), Major::Fin);
    }
}
