// vacstat - app/report.rs
//
// Statistics flow output: a plain-text summary of the six series for the
// terminal and the years.csv / areas.csv / stats.json files.

use crate::core::export::{export_areas_csv, export_json, export_years_csv};
use crate::core::stats::{AreaValue, StatsResult};
use crate::util::constants;
use crate::util::error::ExportError;
use std::collections::BTreeMap;
use std::fmt::{Display, Write as _};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Files written by `write_reports`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub years: PathBuf,
    pub areas: PathBuf,
    pub stats: PathBuf,
}

/// Render the six series, one per line, as `label: {key: value, ...}`.
pub fn render_summary(stats: &StatsResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Profession: {}", stats.profession());
    let _ = writeln!(out, "Average salary by year: {}", format_map(stats.salary_by_year()));
    let _ = writeln!(out, "Vacancies by year: {}", format_map(stats.count_by_year()));
    let _ = writeln!(
        out,
        "Average salary by year for the profession: {}",
        format_map(stats.salary_by_year_for_profession())
    );
    let _ = writeln!(
        out,
        "Vacancies by year for the profession: {}",
        format_map(stats.count_by_year_for_profession())
    );
    let _ = writeln!(
        out,
        "Average salary by area (descending): {}",
        format_areas(stats.salary_by_area(), |v| v.to_string())
    );
    let _ = writeln!(
        out,
        "Share of vacancies by area (descending): {}",
        format_areas(stats.share_by_area(), |v| format!("{v:.4}"))
    );
    let _ = writeln!(out, "Other areas share: {:.4}", stats.other_share());
    out
}

fn format_map<V: Display>(map: &BTreeMap<i32, V>) -> String {
    let items: Vec<String> = map.iter().map(|(k, v)| format!("{k}: {v}")).collect();
    format!("{{{}}}", items.join(", "))
}

fn format_areas<T>(series: &[AreaValue<T>], value: impl Fn(&T) -> String) -> String {
    let items: Vec<String> = series
        .iter()
        .map(|entry| format!("'{}': {}", entry.area, value(&entry.value)))
        .collect();
    format!("{{{}}}", items.join(", "))
}

/// Write the year CSV, area CSV and full JSON result into `out_dir`,
/// creating the directory when needed.
pub fn write_reports(stats: &StatsResult, out_dir: &Path) -> Result<ReportFiles, ExportError> {
    std::fs::create_dir_all(out_dir).map_err(|e| ExportError::Io {
        path: out_dir.to_path_buf(),
        source: e,
    })?;

    let files = ReportFiles {
        years: out_dir.join(constants::YEARS_EXPORT_FILE_NAME),
        areas: out_dir.join(constants::AREAS_EXPORT_FILE_NAME),
        stats: out_dir.join(constants::STATS_EXPORT_FILE_NAME),
    };

    let years = export_years_csv(stats, create(&files.years)?, &files.years)?;
    let areas = export_areas_csv(stats, create(&files.areas)?, &files.areas)?;
    export_json(stats, create(&files.stats)?, &files.stats)?;

    tracing::info!(
        dir = %out_dir.display(),
        years,
        areas,
        "Statistics reports written"
    );

    Ok(files)
}

/// Open `path` for writing behind a buffer.
pub fn create(path: &Path) -> Result<BufWriter<File>, ExportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| ExportError::Io {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::Currency;
    use crate::core::model::{parse_published_at, Salary, Vacancy};
    use crate::core::stats::compute_stats;

    fn sample_stats() -> StatsResult {
        let make = |name: &str, mid: f64, area: &str, date: &str| {
            Vacancy::summary(
                name,
                Salary::new(mid, mid, Currency::Rur),
                area,
                parse_published_at(date).unwrap(),
            )
        };
        let entries = vec![
            make("Аналитик", 100.0, "Москва", "2019-01-10"),
            make("Программист", 300.0, "Москва", "2020-01-10"),
            make("Аналитик", 500.0, "Казань", "2020-01-10"),
        ];
        compute_stats(&entries, "Аналитик").unwrap()
    }

    #[test]
    fn test_render_summary() {
        let text = render_summary(&sample_stats());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Profession: Аналитик");
        assert_eq!(lines[1], "Average salary by year: {2019: 100, 2020: 400}");
        assert_eq!(lines[2], "Vacancies by year: {2019: 1, 2020: 2}");
        assert_eq!(lines[4], "Vacancies by year for the profession: {2019: 1, 2020: 1}");
        assert_eq!(
            lines[5],
            "Average salary by area (descending): {'Казань': 500, 'Москва': 200}"
        );
        assert_eq!(
            lines[6],
            "Share of vacancies by area (descending): {'Москва': 0.6667, 'Казань': 0.3333}"
        );
    }

    #[test]
    fn test_write_reports_creates_three_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out_dir = dir.path().join("reports");
        let files = write_reports(&sample_stats(), &out_dir).unwrap();

        let years = std::fs::read_to_string(&files.years).unwrap();
        assert!(years.starts_with("year,avg_salary"));
        let areas = std::fs::read_to_string(&files.areas).unwrap();
        assert_eq!(areas.lines().count(), 3);
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&files.stats).unwrap()).unwrap();
        assert_eq!(json["profession"], "Аналитик");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_json_to_full_device_is_an_error() {
        let path = Path::new("/dev/full");
        let writer = create(path).unwrap();
        let result = export_json(&sample_stats(), writer, path);
        assert!(matches!(result, Err(ExportError::Io { .. })));
    }
}
