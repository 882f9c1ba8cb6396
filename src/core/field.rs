// vacstat - core/field.rs
//
// Closed set of vacancy fields that filters, sorts and listing columns can
// address. User-facing names resolve here exactly once; everything
// downstream dispatches on the enum with exhaustive matches.

use crate::util::error::FilterError;
use std::str::FromStr;

/// A filterable, sortable or displayable vacancy attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Description,
    KeySkills,
    Experience,
    Premium,
    Employer,
    Salary,
    SalaryCurrency,
    AreaName,
    PublishedAt,
}

impl Field {
    /// Every field, in listing order, with the filter-only currency field last.
    pub fn all() -> &'static [Field] {
        &[
            Field::Name,
            Field::Description,
            Field::KeySkills,
            Field::Experience,
            Field::Premium,
            Field::Employer,
            Field::Salary,
            Field::AreaName,
            Field::PublishedAt,
            Field::SalaryCurrency,
        ]
    }

    /// Fields that appear as listing columns, in display order.
    pub fn columns() -> &'static [Field] {
        &Self::all()[..9]
    }

    /// Localised name used in filter expressions, sort requests and headers.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Название",
            Field::Description => "Описание",
            Field::KeySkills => "Навыки",
            Field::Experience => "Опыт работы",
            Field::Premium => "Премиум-вакансия",
            Field::Employer => "Компания",
            Field::Salary => "Оклад",
            Field::SalaryCurrency => "Идентификатор валюты оклада",
            Field::AreaName => "Название региона",
            Field::PublishedAt => "Дата публикации вакансии",
        }
    }

    /// Source column names (and aliases) that resolve to this field.
    fn keys(&self) -> &'static [&'static str] {
        match self {
            Field::Name => &["name"],
            Field::Description => &["description"],
            Field::KeySkills => &["key_skills"],
            Field::Experience => &["experience_id"],
            Field::Premium => &["premium"],
            Field::Employer => &["employer_name"],
            Field::Salary => &["salary", "salary_from", "salary_to"],
            Field::SalaryCurrency => &["salary_currency"],
            Field::AreaName => &["area_name"],
            Field::PublishedAt => &["published_at"],
        }
    }

    /// Whether the field lives in `VacancyDetails` (full projection only).
    pub fn requires_details(&self) -> bool {
        matches!(
            self,
            Field::Description
                | Field::KeySkills
                | Field::Experience
                | Field::Premium
                | Field::Employer
        )
    }

    /// Resolve a localised label or a source column name.
    ///
    /// Labels match exactly; column names match case-insensitively.
    /// Surrounding whitespace is ignored.
    pub fn resolve(name: &str) -> Result<Field, FilterError> {
        let name = name.trim();
        Self::all()
            .iter()
            .copied()
            .find(|field| {
                field.label() == name || field.keys().iter().any(|k| k.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| FilterError::UnknownField {
                name: name.to_string(),
            })
    }

    /// Resolve a comma-separated column list such as `"Название, Оклад"`.
    /// Empty input selects every column.
    pub fn resolve_columns(list: &str) -> Result<Vec<Field>, FilterError> {
        if list.trim().is_empty() {
            return Ok(Self::columns().to_vec());
        }
        list.split(',').map(Self::resolve).collect()
    }
}

impl FromStr for Field {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
