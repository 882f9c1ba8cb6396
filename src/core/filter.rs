// vacstat - core/filter.rs
//
// Single-condition predicate engine and the order-preserving filter pass
// built on it. Core layer: pure logic, no I/O.

use crate::core::field::Field;
use crate::core::model::{premium_label, Vacancy};
use crate::util::error::FilterError;
use chrono::Datelike;

/// One filter condition: a field and the target value it is compared with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: Field,
    pub value: String,

    /// For the publication date, compare only the 4-digit year.
    /// Ignored by every other field.
    pub year_only: bool,
}

impl Condition {
    pub fn new(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            year_only: false,
        }
    }

    /// Resolve `name` through the field table and build a condition.
    pub fn by_name(name: &str, value: impl Into<String>) -> Result<Self, FilterError> {
        Ok(Self::new(Field::resolve(name)?, value))
    }

    /// Year-only publication date condition.
    pub fn year(year: i32) -> Self {
        Self {
            field: Field::PublishedAt,
            value: format!("{year:04}"),
            year_only: true,
        }
    }

    /// Parse a `field: value` expression, e.g. `"Оклад: 100000"`.
    pub fn parse(expression: &str) -> Result<Self, FilterError> {
        let (name, value) =
            expression
                .split_once(':')
                .ok_or_else(|| FilterError::InvalidExpression {
                    expression: expression.to_string(),
                })?;
        let condition = Self::by_name(name, value.trim())?;
        if condition.field == Field::KeySkills {
            condition.skill_tokens()?;
        }
        Ok(condition)
    }

    /// Comma-separated skill names of a key-skills target. A target with no
    /// names is rejected rather than matching every vacancy.
    fn skill_tokens(&self) -> Result<Vec<&str>, FilterError> {
        let tokens: Vec<&str> = self
            .value
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect();
        if tokens.is_empty() {
            return Err(FilterError::InvalidExpression {
                expression: format!("{}: {}", self.field.label(), self.value),
            });
        }
        Ok(tokens)
    }
}

/// Check whether `vacancy` satisfies `condition`.
///
/// Salary bounds are compared as written, without currency conversion,
/// while sorting and statistics use the converted midpoint.
pub fn matches(vacancy: &Vacancy, condition: &Condition) -> Result<bool, FilterError> {
    let value = condition.value.as_str();
    let field = condition.field;

    let matched = match field {
        Field::Name => vacancy.name.contains(value),
        Field::PublishedAt => {
            if condition.year_only {
                format!("{:04}", vacancy.published_at.year()) == value
            } else {
                vacancy.published_display() == value
            }
        }
        Field::Salary => {
            let target = value
                .trim()
                .parse::<i64>()
                .map_err(|e| FilterError::InvalidRange {
                    value: value.to_string(),
                    source: e,
                })?;
            vacancy.salary.from_whole() <= target && target <= vacancy.salary.to_whole()
        }
        Field::SalaryCurrency => vacancy.salary.currency.label() == value,
        Field::AreaName => vacancy.area_name == value,
        Field::KeySkills => {
            let skills = &vacancy.details_for(field)?.key_skills;
            condition
                .skill_tokens()?
                .into_iter()
                .all(|token| skills.iter().any(|skill| skill == token))
        }
        Field::Experience => vacancy.details_for(field)?.experience.label() == value,
        Field::Premium => premium_label(vacancy.details_for(field)?.premium) == value,
        Field::Description => vacancy.details_for(field)?.description == value,
        Field::Employer => vacancy.details_for(field)?.employer_name == value,
    };

    Ok(matched)
}

/// Keep the vacancies that satisfy `condition`, in input order.
///
/// An empty result is a normal outcome; the first predicate error aborts
/// the pass.
pub fn filter_vacancies<'a, I>(
    vacancies: I,
    condition: &Condition,
) -> Result<Vec<&'a Vacancy>, FilterError>
where
    I: IntoIterator<Item = &'a Vacancy>,
{
    let mut kept = Vec::new();
    let mut seen = 0usize;
    for vacancy in vacancies {
        seen += 1;
        if matches(vacancy, condition)? {
            kept.push(vacancy);
        }
    }

    tracing::trace!(
        field = condition.field.label(),
        value = %condition.value,
        year_only = condition.year_only,
        seen,
        kept = kept.len(),
        "Filter applied"
    );

    Ok(kept)
}
