// vacstat - core/export.rs
//
// CSV and JSON export of listings and statistics.
// Core layer: writes to any Write trait object; the path is only carried
// for error context.

use crate::core::listing::Listing;
use crate::core::stats::StatsResult;
use crate::util::error::ExportError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Export a listing as CSV: header row, then one record per display row.
pub fn export_listing_csv<W: Write>(
    listing: &Listing,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    csv_writer.write_record(&listing.headers).map_err(csv_err)?;
    for row in &listing.rows {
        csv_writer.write_record(row).map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(listing.rows.len())
}

/// Export the year series as CSV, one row per year.
///
/// Writes: year, avg_salary, avg_salary_profession, vacancies, vacancies_profession
pub fn export_years_csv<W: Write>(
    stats: &StatsResult,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    csv_writer
        .write_record([
            "year",
            "avg_salary",
            "avg_salary_profession",
            "vacancies",
            "vacancies_profession",
        ])
        .map_err(csv_err)?;

    let mut count = 0;
    for year in stats.years() {
        let salary = stats.salary_by_year().get(&year).copied().unwrap_or_default();
        let count_all = stats.count_by_year().get(&year).copied().unwrap_or_default();
        let salary_prof = stats
            .salary_by_year_for_profession()
            .get(&year)
            .copied()
            .unwrap_or_default();
        let count_prof = stats
            .count_by_year_for_profession()
            .get(&year)
            .copied()
            .unwrap_or_default();

        csv_writer
            .write_record([
                year.to_string(),
                salary.to_string(),
                salary_prof.to_string(),
                count_all.to_string(),
                count_prof.to_string(),
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export both area rankings side by side as CSV.
///
/// Row `i` pairs the i-th salary entry with the i-th share entry; the two
/// rankings may name different areas. Shares are written as 0-1 fractions.
pub fn export_areas_csv<W: Write>(
    stats: &StatsResult,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    csv_writer
        .write_record(["rank", "area", "avg_salary", "share_area", "share"])
        .map_err(csv_err)?;

    let salaries = stats.salary_by_area();
    let shares = stats.share_by_area();
    let rows = salaries.len().max(shares.len());
    for i in 0..rows {
        let (area, salary) = salaries
            .get(i)
            .map(|a| (a.area.clone(), a.value.to_string()))
            .unwrap_or_default();
        let (share_area, share) = shares
            .get(i)
            .map(|a| (a.area.clone(), format!("{:.4}", a.value)))
            .unwrap_or_default();

        csv_writer
            .write_record([(i + 1).to_string(), area, salary, share_area, share])
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(rows)
}

/// Export any serialisable result (listing or statistics) as pretty JSON.
///
/// The writer is flushed before returning so buffered write failures surface.
pub fn export_json<W: Write, T: Serialize>(
    value: &T,
    mut writer: W,
    export_path: &Path,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::Currency;
    use crate::core::listing::{build_listing, ListingWindow};
    use crate::core::model::{parse_published_at, Salary, Vacancy};
    use crate::core::field::Field;
    use crate::core::stats::compute_stats;

    fn make_vacancy(name: &str, mid: f64, area: &str, published: &str) -> Vacancy {
        Vacancy::summary(
            name,
            Salary::new(mid, mid, Currency::Rur),
            area,
            parse_published_at(published).unwrap(),
        )
    }

    fn sample_stats() -> StatsResult {
        let entries = vec![
            make_vacancy("Аналитик", 100.0, "Москва", "2019-01-10"),
            make_vacancy("Программист", 300.0, "Москва", "2020-01-10"),
            make_vacancy("Аналитик", 500.0, "Казань", "2020-01-10"),
        ];
        compute_stats(&entries, "Аналитик").unwrap()
    }

    #[test]
    fn test_listing_csv_export() {
        let entries = vec![make_vacancy("Dev, senior", 1.0, "Москва", "2020-01-01")];
        let refs: Vec<&Vacancy> = entries.iter().collect();
        let listing = build_listing(&refs, ListingWindow::default(), &[Field::Name], 100).unwrap();

        let mut buf = Vec::new();
        let count = export_listing_csv(&listing, &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 1);

        let output = String::from_utf8(buf).unwrap();
        assert_eq!(output, "№,Название\n1,\"Dev, senior\"\n");
    }

    #[test]
    fn test_years_csv_export() {
        let mut buf = Vec::new();
        let count = export_years_csv(&sample_stats(), &mut buf, Path::new("years.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "year,avg_salary,avg_salary_profession,vacancies,vacancies_profession"
        );
        assert_eq!(lines[1], "2019,100,100,1,1");
        assert_eq!(lines[2], "2020,400,500,2,1");
    }

    #[test]
    fn test_areas_csv_export() {
        let mut buf = Vec::new();
        let count = export_areas_csv(&sample_stats(), &mut buf, Path::new("areas.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[1], "1,Казань,500,Москва,0.6667");
        assert_eq!(lines[2], "2,Москва,200,Казань,0.3333");
    }

    #[test]
    fn test_stats_json_export() {
        let mut buf = Vec::new();
        export_json(&sample_stats(), &mut buf, Path::new("stats.json")).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["profession"], "Аналитик");
        assert_eq!(value["count_by_year"]["2020"], 2);
        assert_eq!(value["share_by_area"][0]["area"], "Москва");
        assert!(value["other_share"].as_f64().unwrap().abs() < 1e-9);
    }

    /// Accepts nothing; every write fails like a full disk.
    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "no space left"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_json_export_reports_buffered_write_failure() {
        // Large enough that serialisation never spills the buffer itself.
        let writer = std::io::BufWriter::with_capacity(1 << 16, FullDisk);
        let result = export_json(&sample_stats(), writer, Path::new("stats.json"));
        assert!(
            matches!(result, Err(ExportError::Io { .. })),
            "expected Io error, got {result:?}"
        );
    }
}
