// vacstat - core/sort.rs
//
// Sort-key extraction and the stable ordering pass of the listing pipeline.

use crate::core::currency::midpoint;
use crate::core::field::Field;
use crate::core::model::Vacancy;
use crate::util::error::FilterError;
use chrono::NaiveDateTime;
use std::cmp::Ordering;

/// Comparable key extracted from one vacancy for one field.
///
/// All keys of a single sort pass share a variant. Ordering across variants
/// is only defined so the type can be `Ord`.
#[derive(Debug, Clone, Copy)]
pub enum SortKey<'a> {
    /// Salary midpoint in the reference currency.
    Amount(f64),
    /// Number of key skills.
    Count(usize),
    /// Experience rank, 0-3.
    Rank(u8),
    Flag(bool),
    Text(&'a str),
    Date(NaiveDateTime),
}

impl SortKey<'_> {
    fn variant_index(&self) -> u8 {
        match self {
            SortKey::Amount(_) => 0,
            SortKey::Count(_) => 1,
            SortKey::Rank(_) => 2,
            SortKey::Flag(_) => 3,
            SortKey::Text(_) => 4,
            SortKey::Date(_) => 5,
        }
    }
}

impl Ord for SortKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Amount(a), SortKey::Amount(b)) => a.total_cmp(b),
            (SortKey::Count(a), SortKey::Count(b)) => a.cmp(b),
            (SortKey::Rank(a), SortKey::Rank(b)) => a.cmp(b),
            (SortKey::Flag(a), SortKey::Flag(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            _ => self.variant_index().cmp(&other.variant_index()),
        }
    }
}

impl PartialOrd for SortKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey<'_> {}

/// Extract the sort key of `vacancy` for `field`.
pub fn sort_key(vacancy: &Vacancy, field: Field) -> Result<SortKey<'_>, FilterError> {
    let key = match field {
        Field::Salary => SortKey::Amount(midpoint(&vacancy.salary)),
        Field::KeySkills => SortKey::Count(vacancy.details_for(field)?.key_skills.len()),
        Field::Experience => SortKey::Rank(vacancy.details_for(field)?.experience.rank()),
        Field::Premium => SortKey::Flag(vacancy.details_for(field)?.premium),
        Field::Description => SortKey::Text(&vacancy.details_for(field)?.description),
        Field::Employer => SortKey::Text(&vacancy.details_for(field)?.employer_name),
        Field::Name => SortKey::Text(&vacancy.name),
        Field::AreaName => SortKey::Text(&vacancy.area_name),
        Field::SalaryCurrency => SortKey::Text(vacancy.salary.currency.code()),
        Field::PublishedAt => SortKey::Date(vacancy.published_at),
    };
    Ok(key)
}

/// Reorder `vacancies` by `field`.
///
/// The sort is stable in both directions: vacancies with equal keys keep
/// their input order even when `descending` is set. Keys are extracted
/// up front, so a key error leaves nothing half-sorted.
pub fn sort_vacancies<'a>(
    vacancies: Vec<&'a Vacancy>,
    field: Field,
    descending: bool,
) -> Result<Vec<&'a Vacancy>, FilterError> {
    let mut keyed = vacancies
        .into_iter()
        .map(|v| sort_key(v, field).map(|key| (key, v)))
        .collect::<Result<Vec<_>, _>>()?;

    keyed.sort_by(|(a, _), (b, _)| if descending { b.cmp(a) } else { a.cmp(b) });

    tracing::debug!(
        field = field.label(),
        descending,
        count = keyed.len(),
        "Vacancies sorted"
    );

    Ok(keyed.into_iter().map(|(_, v)| v).collect())
}
