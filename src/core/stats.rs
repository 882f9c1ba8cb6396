// vacstat - core/stats.rs
//
// Statistics aggregation: salary and volume series by publication year
// (for all vacancies and for a profession keyword) and by area.
//
// Both passes are built from repeated filter passes over the immutable
// input. Years and areas are independent of one another and run on rayon;
// indexed collection keeps year order, and area ranking happens after the
// merge, so results never depend on scheduling.

use crate::core::currency::midpoint;
use crate::core::field::Field;
use crate::core::filter::{filter_vacancies, Condition};
use crate::core::model::Vacancy;
use crate::util::constants;
use crate::util::error::StatsError;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Settings
// =============================================================================

/// Aggregation parameters. `Default` gives 2007-2022, a 1% area cutoff and
/// the top 10 areas.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSettings {
    /// First year of the year series (inclusive).
    pub first_year: i32,
    /// Last year of the year series (inclusive).
    pub last_year: i32,
    /// Minimum share of all postings an area needs; the boundary is closed.
    pub min_area_share: f64,
    /// Length of each ranked area series.
    pub top_areas: usize,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            first_year: constants::DEFAULT_FIRST_YEAR,
            last_year: constants::DEFAULT_LAST_YEAR,
            min_area_share: constants::DEFAULT_MIN_AREA_SHARE,
            top_areas: constants::DEFAULT_TOP_AREAS,
        }
    }
}

// =============================================================================
// Result
// =============================================================================

/// One entry of a ranked area series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaValue<T> {
    pub area: String,
    pub value: T,
}

/// Output of one aggregation run. Read-only once built.
///
/// Year series hold only years that had at least one posting; the
/// profession series always carry the same year keys as the full series.
/// Average salaries are rounded integers in the reference currency; shares
/// are 0-1 fractions rounded to four decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsResult {
    profession: String,
    salary_by_year: BTreeMap<i32, i64>,
    count_by_year: BTreeMap<i32, usize>,
    salary_by_year_for_profession: BTreeMap<i32, i64>,
    count_by_year_for_profession: BTreeMap<i32, usize>,
    salary_by_area: Vec<AreaValue<i64>>,
    share_by_area: Vec<AreaValue<f64>>,
    other_share: f64,
}

impl StatsResult {
    /// Profession keyword the narrower series were computed for.
    pub fn profession(&self) -> &str {
        &self.profession
    }

    pub fn salary_by_year(&self) -> &BTreeMap<i32, i64> {
        &self.salary_by_year
    }

    pub fn count_by_year(&self) -> &BTreeMap<i32, usize> {
        &self.count_by_year
    }

    pub fn salary_by_year_for_profession(&self) -> &BTreeMap<i32, i64> {
        &self.salary_by_year_for_profession
    }

    pub fn count_by_year_for_profession(&self) -> &BTreeMap<i32, usize> {
        &self.count_by_year_for_profession
    }

    /// Areas ranked by average salary, highest first.
    pub fn salary_by_area(&self) -> &[AreaValue<i64>] {
        &self.salary_by_area
    }

    /// Areas ranked by share of postings, highest first.
    pub fn share_by_area(&self) -> &[AreaValue<f64>] {
        &self.share_by_area
    }

    /// Share of postings outside the ranked share series
    /// (`1 - sum of listed shares`, rounded like the shares themselves),
    /// the "Other" slice of a pie chart.
    pub fn other_share(&self) -> f64 {
        self.other_share
    }

    /// Years present in the year series, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.count_by_year.keys().copied()
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Per-year figures for the full population and the profession subset.
struct YearPoint {
    year: i32,
    count: usize,
    salary: i64,
    profession_count: usize,
    profession_salary: i64,
}

/// Area figures before ranking.
struct AreaPoint {
    area: String,
    salary: i64,
    share: f64,
}

/// Rounded mean salary midpoint in the reference currency; 0 for no vacancies.
pub fn average_salary(vacancies: &[&Vacancy]) -> i64 {
    if vacancies.is_empty() {
        return 0;
    }
    let total: f64 = vacancies.iter().map(|v| midpoint(&v.salary)).sum();
    (total / vacancies.len() as f64).round() as i64
}

/// Round a 0-1 share to `SHARE_DECIMALS` places.
pub fn round_share(share: f64) -> f64 {
    let scale = 10f64.powi(constants::SHARE_DECIMALS);
    (share * scale).round() / scale
}

/// Aggregate `vacancies` with the default settings.
pub fn compute_stats(vacancies: &[Vacancy], profession: &str) -> Result<StatsResult, StatsError> {
    compute_stats_with(vacancies, profession, &StatsSettings::default())
}

/// Aggregate `vacancies` into year and area series.
///
/// Returns `EmptyDataset` for an empty input; any filter error aborts the run.
pub fn compute_stats_with(
    vacancies: &[Vacancy],
    profession: &str,
    settings: &StatsSettings,
) -> Result<StatsResult, StatsError> {
    if vacancies.is_empty() {
        return Err(StatsError::EmptyDataset);
    }

    let year_points = year_series(vacancies, profession, settings)?;

    let mut salary_by_year = BTreeMap::new();
    let mut count_by_year = BTreeMap::new();
    let mut salary_by_year_for_profession = BTreeMap::new();
    let mut count_by_year_for_profession = BTreeMap::new();
    for point in year_points {
        salary_by_year.insert(point.year, point.salary);
        count_by_year.insert(point.year, point.count);
        salary_by_year_for_profession.insert(point.year, point.profession_salary);
        count_by_year_for_profession.insert(point.year, point.profession_count);
    }

    let area_points = area_series(vacancies, settings)?;

    let mut salary_by_area: Vec<AreaValue<i64>> = area_points
        .iter()
        .map(|p| AreaValue {
            area: p.area.clone(),
            value: p.salary,
        })
        .collect();
    salary_by_area.sort_by(|a, b| b.value.cmp(&a.value));
    salary_by_area.truncate(settings.top_areas);

    let mut share_by_area: Vec<AreaValue<f64>> = area_points
        .into_iter()
        .map(|p| AreaValue {
            area: p.area,
            value: p.share,
        })
        .collect();
    share_by_area.sort_by(|a, b| b.value.total_cmp(&a.value));
    share_by_area.truncate(settings.top_areas);

    let other_share = round_share(1.0 - share_by_area.iter().map(|a| a.value).sum::<f64>());

    tracing::info!(
        vacancies = vacancies.len(),
        profession,
        years = count_by_year.len(),
        ranked_areas = salary_by_area.len(),
        "Statistics computed"
    );

    Ok(StatsResult {
        profession: profession.to_string(),
        salary_by_year,
        count_by_year,
        salary_by_year_for_profession,
        count_by_year_for_profession,
        salary_by_area,
        share_by_area,
        other_share,
    })
}

/// Year pass. Years without postings produce no point.
fn year_series(
    vacancies: &[Vacancy],
    profession: &str,
    settings: &StatsSettings,
) -> Result<Vec<YearPoint>, StatsError> {
    let points = (settings.first_year..=settings.last_year)
        .into_par_iter()
        .map(|year| -> Result<Option<YearPoint>, StatsError> {
            let in_year = filter_vacancies(vacancies, &Condition::year(year))?;
            if in_year.is_empty() {
                return Ok(None);
            }
            let for_profession = filter_vacancies(
                in_year.iter().copied(),
                &Condition::new(Field::Name, profession),
            )?;

            tracing::debug!(
                year,
                count = in_year.len(),
                profession_count = for_profession.len(),
                "Year aggregated"
            );

            Ok(Some(YearPoint {
                year,
                count: in_year.len(),
                salary: average_salary(&in_year),
                profession_count: for_profession.len(),
                profession_salary: average_salary(&for_profession),
            }))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(points.into_iter().flatten().collect())
}

/// Area pass. Areas come back in first-appearance order, already cut at the
/// minimum share, so equal values keep that order through the stable rank sort.
fn area_series(
    vacancies: &[Vacancy],
    settings: &StatsSettings,
) -> Result<Vec<AreaPoint>, StatsError> {
    let total = vacancies.len();

    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for vacancy in vacancies {
        let area = vacancy.area_name.as_str();
        match index.get(area) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(area, counts.len());
                counts.push((area, 1));
            }
        }
    }

    let distinct = counts.len();
    let kept: Vec<(&str, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count as f64 / total as f64 >= settings.min_area_share)
        .collect();

    tracing::debug!(
        distinct_areas = distinct,
        kept_areas = kept.len(),
        min_share = settings.min_area_share,
        "Area threshold applied"
    );

    kept.par_iter()
        .map(|&(area, count)| -> Result<AreaPoint, StatsError> {
            let in_area = filter_vacancies(vacancies, &Condition::new(Field::AreaName, area))?;
            Ok(AreaPoint {
                area: area.to_string(),
                salary: average_salary(&in_area),
                share: round_share(count as f64 / total as f64),
            })
        })
        .collect()
}
