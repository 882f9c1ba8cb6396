// vacstat - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no CLI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::core::currency::Currency;
use crate::core::field::Field;
use crate::util::error::{FilterError, ModelError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

// =============================================================================
// Vacancy
// =============================================================================

/// A single job posting, already sanitised by the dataset loader.
///
/// Fields every use case needs live directly on the struct. Fields only the
/// listing flow loads live in `details`; summary records leave it `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vacancy {
    /// Posting title. Profession filters match substrings of it.
    pub name: String,

    /// Salary range, owned by this vacancy alone.
    pub salary: Salary,

    /// Geography key.
    pub area_name: String,

    /// Publication timestamp as written in the source (offset dropped).
    pub published_at: NaiveDateTime,

    /// Full-projection attributes.
    pub details: Option<VacancyDetails>,
}

/// Attributes present only in the full projection.
#[derive(Debug, Clone, PartialEq)]
pub struct VacancyDetails {
    pub description: String,
    pub key_skills: Vec<String>,
    pub experience: ExperienceLevel,
    pub premium: bool,
    pub employer_name: String,
}

impl Vacancy {
    /// Build a summary record (no details).
    pub fn summary(
        name: impl Into<String>,
        salary: Salary,
        area_name: impl Into<String>,
        published_at: NaiveDateTime,
    ) -> Self {
        Self {
            name: name.into(),
            salary,
            area_name: area_name.into(),
            published_at,
            details: None,
        }
    }

    /// Attach full-projection attributes.
    pub fn with_details(mut self, details: VacancyDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Publication date as `DD.MM.YYYY`, the form date filters compare against.
    pub fn published_display(&self) -> String {
        self.published_at.format("%d.%m.%Y").to_string()
    }

    /// Full-projection attributes, or `FieldUnavailable` naming `field`.
    pub fn details_for(&self, field: Field) -> Result<&VacancyDetails, FilterError> {
        self.details
            .as_ref()
            .ok_or(FilterError::FieldUnavailable {
                field: field.label(),
            })
    }
}

// =============================================================================
// Salary
// =============================================================================

/// Salary range of one vacancy.
///
/// `from <= to` is assumed but never enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct Salary {
    pub from: f64,
    pub to: f64,
    pub currency: Currency,

    /// Whether the figures are before tax. Display only; `None` on summary
    /// records.
    pub gross: Option<bool>,
}

impl Salary {
    pub fn new(from: f64, to: f64, currency: Currency) -> Self {
        Self {
            from,
            to,
            currency,
            gross: None,
        }
    }

    /// Integer part of the lower bound.
    pub fn from_whole(&self) -> i64 {
        self.from.trunc() as i64
    }

    /// Integer part of the upper bound.
    pub fn to_whole(&self) -> i64 {
        self.to.trunc() as i64
    }
}

/// Localised label for the gross flag.
pub fn gross_label(gross: bool) -> &'static str {
    if gross {
        "Без вычета налогов"
    } else {
        "С вычетом налогов"
    }
}

// =============================================================================
// Experience level
// =============================================================================

/// Required work experience, ordered from least to most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExperienceLevel {
    NoExperience,
    OneToThree,
    ThreeToSix,
    MoreThanSix,
}

impl ExperienceLevel {
    /// Returns all variants in rank order.
    pub fn all() -> &'static [ExperienceLevel] {
        &[
            ExperienceLevel::NoExperience,
            ExperienceLevel::OneToThree,
            ExperienceLevel::ThreeToSix,
            ExperienceLevel::MoreThanSix,
        ]
    }

    /// Resolve a source code such as `between1And3` (case-insensitive).
    pub fn from_code(code: &str) -> Result<Self, ModelError> {
        Self::all()
            .iter()
            .copied()
            .find(|level| level.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| ModelError::UnrecognizedCategoryCode {
                category: "experience",
                code: code.to_string(),
            })
    }

    /// Normalised source code.
    pub fn code(&self) -> &'static str {
        match self {
            ExperienceLevel::NoExperience => "noExperience",
            ExperienceLevel::OneToThree => "between1And3",
            ExperienceLevel::ThreeToSix => "between3And6",
            ExperienceLevel::MoreThanSix => "moreThan6",
        }
    }

    /// Localised label for display and filtering.
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::NoExperience => "Нет опыта",
            ExperienceLevel::OneToThree => "От 1 года до 3 лет",
            ExperienceLevel::ThreeToSix => "От 3 до 6 лет",
            ExperienceLevel::MoreThanSix => "Более 6 лет",
        }
    }

    /// Sort rank, 0 for no experience through 3 for more than six years.
    pub fn rank(&self) -> u8 {
        match self {
            ExperienceLevel::NoExperience => 0,
            ExperienceLevel::OneToThree => 1,
            ExperienceLevel::ThreeToSix => 2,
            ExperienceLevel::MoreThanSix => 3,
        }
    }
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Localised label for the premium flag.
pub fn premium_label(premium: bool) -> &'static str {
    if premium {
        "Да"
    } else {
        "Нет"
    }
}

// =============================================================================
// Raw value parsing
// =============================================================================

/// Parse a `True`/`False` flag (case-insensitive). `category` names the
/// localisation table in the error.
pub fn parse_flag(category: &'static str, raw: &str) -> Result<bool, ModelError> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ModelError::UnrecognizedCategoryCode {
            category,
            code: raw.to_string(),
        })
    }
}

/// Parse a salary bound. Fractional parts are kept here and dropped at
/// conversion time.
pub fn parse_amount(field: &'static str, raw: &str) -> Result<f64, ModelError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| ModelError::InvalidAmount {
            field,
            value: raw.to_string(),
            source: e,
        })
}

/// Parse a publication timestamp.
///
/// Accepts `2022-07-05T18:19:30+0300`, the same without offset, or a bare
/// `2022-07-05`. The offset is dropped; the wall-clock value is kept.
pub fn parse_published_at(raw: &str) -> Result<NaiveDateTime, ModelError> {
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ModelError::InvalidDate {
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_published_at_with_offset_keeps_wall_clock() {
        let dt = parse_published_at("2022-07-05T18:19:30+0300").unwrap();
        assert_eq!(dt.to_string(), "2022-07-05 18:19:30");
    }

    #[test]
    fn test_parse_published_at_date_only() {
        let dt = parse_published_at("2007-12-03").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2007, 12, 3).unwrap());
    }

    #[test]
    fn test_parse_published_at_rejects_garbage() {
        assert!(matches!(
            parse_published_at("03.12.2007"),
            Err(ModelError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_experience_codes_case_insensitive() {
        assert_eq!(
            ExperienceLevel::from_code("BETWEEN1AND3").unwrap(),
            ExperienceLevel::OneToThree
        );
        assert_eq!(
            ExperienceLevel::from_code("noExperience").unwrap().label(),
            "Нет опыта"
        );
    }

    #[test]
    fn test_unknown_experience_code_is_error() {
        let result = ExperienceLevel::from_code("between6and9");
        assert!(matches!(
            result,
            Err(ModelError::UnrecognizedCategoryCode {
                category: "experience",
                ..
            })
        ));
    }

    #[test]
    fn test_experience_rank_is_monotonic() {
        let ranks: Vec<u8> = ExperienceLevel::all().iter().map(|l| l.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("premium", "True").unwrap());
        assert!(!parse_flag("premium", "FALSE").unwrap());
        assert!(matches!(
            parse_flag("premium", "yes"),
            Err(ModelError::UnrecognizedCategoryCode {
                category: "premium",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_amount_keeps_fraction() {
        assert_eq!(parse_amount("salary_from", "35000.0").unwrap(), 35_000.0);
        assert!(parse_amount("salary_to", "n/a").is_err());
    }

    #[test]
    fn test_summary_record_has_no_details() {
        let v = Vacancy::summary(
            "Аналитик",
            Salary::new(1.0, 2.0, Currency::Rur),
            "Москва",
            parse_published_at("2020-01-01").unwrap(),
        );
        assert!(matches!(
            v.details_for(Field::KeySkills),
            Err(FilterError::FieldUnavailable { field: "Навыки" })
        ));
    }
}
