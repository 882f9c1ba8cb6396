// vacstat - app/dataset.rs
//
// CSV dataset loading. Reads the vacancy file, drops incomplete rows,
// sanitises every value and builds `Vacancy` records for the requested
// projection. The core never sees raw text.
//
// Row policy:
//   - rows whose field count differs from the header are skipped;
//   - rows with any empty value are skipped;
//   - a complete row with an unparseable value aborts the load.
//
// Also splits a mixed-year file into one summary-column file per
// publication year.

use crate::core::currency::Currency;
use crate::core::model::{
    parse_amount, parse_flag, parse_published_at, ExperienceLevel, Salary, Vacancy,
    VacancyDetails,
};
use crate::util::error::{DatasetError, ModelError};
use chrono::Datelike;
use regex::Regex;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::{Path, PathBuf};

/// Columns written to per-year files, in output order.
pub const SPLIT_COLUMNS: [&str; 6] = [
    "name",
    "salary_from",
    "salary_to",
    "salary_currency",
    "area_name",
    "published_at",
];

/// Which record attributes to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Every attribute; required by listings.
    Full,
    /// Name, salary, area and date only; enough for statistics.
    Summary,
}

// =============================================================================
// Sanitiser
// =============================================================================

/// Strips markup and normalises whitespace in raw CSV values.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    markup: Regex,
}

impl Sanitizer {
    pub fn new() -> Result<Self, DatasetError> {
        let markup =
            Regex::new(r"<[^>]*>").map_err(|e| DatasetError::InvalidPattern { source: e })?;
        Ok(Self { markup })
    }

    /// Remove `<...>` tags, then collapse whitespace runs inside each line
    /// to single spaces and trim each line. Line breaks survive.
    pub fn clean(&self, raw: &str) -> String {
        let stripped = self.markup.replace_all(raw, "");
        stripped
            .split('\n')
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// =============================================================================
// Column lookup
// =============================================================================

struct SummaryColumns {
    name: usize,
    salary_from: usize,
    salary_to: usize,
    salary_currency: usize,
    area_name: usize,
    published_at: usize,
}

struct DetailColumns {
    description: usize,
    key_skills: usize,
    experience_id: usize,
    premium: usize,
    employer_name: usize,
    salary_gross: usize,
}

struct Columns {
    summary: SummaryColumns,
    details: Option<DetailColumns>,
}

fn find_column(headers: &[String], column: &'static str, path: &Path) -> Result<usize, DatasetError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| DatasetError::MissingColumn {
            path: path.to_path_buf(),
            column,
        })
}

/// Read the header row, dropping a UTF-8 BOM. No header is `EmptyFile`.
fn read_headers<R: Read>(
    csv_reader: &mut csv::Reader<R>,
    path: &Path,
) -> Result<Vec<String>, DatasetError> {
    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| DatasetError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(DatasetError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    Ok(headers)
}

impl Columns {
    fn locate(headers: &[String], projection: Projection, path: &Path) -> Result<Self, DatasetError> {
        let find = |column: &'static str| find_column(headers, column, path);

        let summary = SummaryColumns {
            name: find("name")?,
            salary_from: find("salary_from")?,
            salary_to: find("salary_to")?,
            salary_currency: find("salary_currency")?,
            area_name: find("area_name")?,
            published_at: find("published_at")?,
        };

        let details = match projection {
            Projection::Summary => None,
            Projection::Full => Some(DetailColumns {
                description: find("description")?,
                key_skills: find("key_skills")?,
                experience_id: find("experience_id")?,
                premium: find("premium")?,
                employer_name: find("employer_name")?,
                salary_gross: find("salary_gross")?,
            }),
        };

        Ok(Self { summary, details })
    }

    fn build(&self, values: &[String]) -> Result<Vacancy, ModelError> {
        let s = &self.summary;
        let mut salary = Salary::new(
            parse_amount("salary_from", &values[s.salary_from])?,
            parse_amount("salary_to", &values[s.salary_to])?,
            Currency::from_code(&values[s.salary_currency])?,
        );

        let mut vacancy_details = None;
        if let Some(d) = &self.details {
            salary.gross = Some(parse_flag("salary_gross", &values[d.salary_gross])?);
            vacancy_details = Some(VacancyDetails {
                description: values[d.description].clone(),
                key_skills: values[d.key_skills].split('\n').map(str::to_string).collect(),
                experience: ExperienceLevel::from_code(&values[d.experience_id])?,
                premium: parse_flag("premium", &values[d.premium])?,
                employer_name: values[d.employer_name].clone(),
            });
        }

        let vacancy = Vacancy::summary(
            values[s.name].clone(),
            salary,
            values[s.area_name].clone(),
            parse_published_at(&values[s.published_at])?,
        );
        Ok(match vacancy_details {
            Some(details) => vacancy.with_details(details),
            None => vacancy,
        })
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Load vacancies from the CSV file at `path`.
pub fn load_csv(path: &Path, projection: Projection) -> Result<Vec<Vacancy>, DatasetError> {
    let file = File::open(path).map_err(|e| DatasetError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_from_reader(file, path, projection)
}

/// Load vacancies from any CSV source. `path` is used for error context only.
///
/// Returns `EmptyFile` when there is no header row and `NoData` when no
/// complete row survives.
pub fn load_from_reader<R: Read>(
    reader: R,
    path: &Path,
    projection: Projection,
) -> Result<Vec<Vacancy>, DatasetError> {
    let csv_err = |e: csv::Error| DatasetError::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = read_headers(&mut csv_reader, path)?;

    let columns = Columns::locate(&headers, projection, path)?;
    let sanitizer = Sanitizer::new()?;

    let mut vacancies = Vec::new();
    let mut skipped = 0usize;
    for record in csv_reader.records() {
        let record = record.map_err(csv_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() != headers.len() || record.iter().any(str::is_empty) {
            tracing::trace!(line, "Skipping incomplete row");
            skipped += 1;
            continue;
        }

        let values: Vec<String> = record.iter().map(|v| sanitizer.clean(v)).collect();
        let vacancy = columns
            .build(&values)
            .map_err(|e| DatasetError::Record {
                path: path.to_path_buf(),
                line,
                source: e,
            })?;
        vacancies.push(vacancy);
    }

    if skipped > 0 {
        tracing::warn!(
            path = %path.display(),
            skipped,
            "Incomplete rows skipped"
        );
    }

    if vacancies.is_empty() {
        return Err(DatasetError::NoData {
            path: path.to_path_buf(),
        });
    }

    tracing::info!(
        path = %path.display(),
        loaded = vacancies.len(),
        projection = ?projection,
        "Dataset loaded"
    );

    Ok(vacancies)
}

// =============================================================================
// Splitting by year
// =============================================================================

/// One per-year file written by `split_by_year`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearFile {
    pub year: i32,
    pub path: PathBuf,
    pub rows: usize,
}

struct YearWriter {
    path: PathBuf,
    writer: csv::Writer<BufWriter<File>>,
    rows: usize,
}

/// Split the CSV file at `path` into `<out_dir>/<year>.csv` files.
pub fn split_by_year(path: &Path, out_dir: &Path) -> Result<Vec<YearFile>, DatasetError> {
    let file = File::open(path).map_err(|e| DatasetError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    split_from_reader(file, path, out_dir)
}

/// Stream rows from `reader` into one file per publication year, keeping
/// only `SPLIT_COLUMNS`. Values are sanitised; empty salary fields are
/// copied through so the per-year files hold every dated posting.
///
/// Rows with the wrong field count or no publication date are skipped. An
/// unparseable date aborts with its line number. Files come back in year
/// order.
pub fn split_from_reader<R: Read>(
    reader: R,
    path: &Path,
    out_dir: &Path,
) -> Result<Vec<YearFile>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = read_headers(&mut csv_reader, path)?;
    let indices = SPLIT_COLUMNS
        .iter()
        .map(|&column| find_column(&headers, column, path))
        .collect::<Result<Vec<_>, _>>()?;
    let date_index = SPLIT_COLUMNS.len() - 1;
    let sanitizer = Sanitizer::new()?;

    std::fs::create_dir_all(out_dir).map_err(|e| DatasetError::Io {
        path: out_dir.to_path_buf(),
        source: e,
    })?;

    let mut outputs: BTreeMap<i32, YearWriter> = BTreeMap::new();
    let mut skipped = 0usize;
    for record in csv_reader.records() {
        let record = record.map_err(|e| DatasetError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() != headers.len() || record[indices[date_index]].is_empty() {
            tracing::trace!(line, "Skipping row without a publication date");
            skipped += 1;
            continue;
        }

        let values: Vec<String> = indices.iter().map(|&i| sanitizer.clean(&record[i])).collect();
        let year = parse_published_at(&values[date_index])
            .map_err(|e| DatasetError::Record {
                path: path.to_path_buf(),
                line,
                source: e,
            })?
            .year();

        let output = match outputs.entry(year) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let out_path = out_dir.join(format!("{year}.csv"));
                let file = File::create(&out_path).map_err(|e| DatasetError::Io {
                    path: out_path.clone(),
                    source: e,
                })?;
                let mut writer = csv::Writer::from_writer(BufWriter::new(file));
                writer
                    .write_record(SPLIT_COLUMNS)
                    .map_err(|e| DatasetError::Csv {
                        path: out_path.clone(),
                        source: e,
                    })?;
                entry.insert(YearWriter {
                    path: out_path,
                    writer,
                    rows: 0,
                })
            }
        };
        output
            .writer
            .write_record(&values)
            .map_err(|e| DatasetError::Csv {
                path: output.path.clone(),
                source: e,
            })?;
        output.rows += 1;
    }

    if outputs.is_empty() {
        return Err(DatasetError::NoData {
            path: path.to_path_buf(),
        });
    }

    let mut files = Vec::with_capacity(outputs.len());
    for (year, mut output) in outputs {
        output.writer.flush().map_err(|e| DatasetError::Io {
            path: output.path.clone(),
            source: e,
        })?;
        files.push(YearFile {
            year,
            path: output.path,
            rows: output.rows,
        });
    }

    if skipped > 0 {
        tracing::warn!(path = %path.display(), skipped, "Rows without a usable date skipped");
    }
    tracing::info!(
        path = %path.display(),
        out_dir = %out_dir.display(),
        years = files.len(),
        "Dataset split by year"
    );

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL_HEADER: &str = "name,description,key_skills,experience_id,premium,employer_name,\
                               salary_from,salary_to,salary_gross,salary_currency,area_name,published_at";

    fn load(csv: &str, projection: Projection) -> Result<Vec<Vacancy>, DatasetError> {
        load_from_reader(csv.as_bytes(), Path::new("test.csv"), projection)
    }

    #[test]
    fn test_sanitizer_strips_markup_and_whitespace() {
        let s = Sanitizer::new().unwrap();
        assert_eq!(s.clean("<p>Hello   <b>world</b></p>  "), "Hello world");
        assert_eq!(s.clean("  Python \n\t SQL  "), "Python\nSQL");
    }

    #[test]
    fn test_load_full_projection() {
        let csv = format!(
            "{FULL_HEADER}\n\
             Программист,<p>Пишем  код</p>,\"Python\nSQL\",between1And3,False,Яндекс,\
             100000.0,150000.0,True,RUR,Москва,2022-07-05T18:19:30+0300\n"
        );
        let vacancies = load(&csv, Projection::Full).unwrap();
        assert_eq!(vacancies.len(), 1);

        let v = &vacancies[0];
        let details = v.details.as_ref().unwrap();
        assert_eq!(details.description, "Пишем код");
        assert_eq!(details.key_skills, vec!["Python", "SQL"]);
        assert_eq!(details.experience, ExperienceLevel::OneToThree);
        assert!(!details.premium);
        assert_eq!(v.salary.gross, Some(true));
        assert_eq!(v.salary.currency, Currency::Rur);
        assert_eq!(v.published_display(), "05.07.2022");
    }

    #[test]
    fn test_summary_projection_ignores_detail_columns() {
        let csv = "name,salary_from,salary_to,salary_currency,area_name,published_at\n\
                   Аналитик,100,200,USD,Казань,2019-04-01T10:00:00+0300\n";
        let vacancies = load(csv, Projection::Summary).unwrap();
        assert_eq!(vacancies.len(), 1);
        assert!(vacancies[0].details.is_none());
        assert_eq!(vacancies[0].salary.gross, None);
    }

    #[test]
    fn test_incomplete_rows_are_skipped() {
        let csv = "name,salary_from,salary_to,salary_currency,area_name,published_at\n\
                   A,100,200,RUR,Москва,2019-04-01\n\
                   B,,200,RUR,Москва,2019-04-01\n\
                   C,100,200,RUR\n\
                   D,100,200,RUR,Москва,2019-04-01\n";
        let vacancies = load(csv, Projection::Summary).unwrap();
        let names: Vec<&str> = vacancies.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["A", "D"]);
    }

    #[test]
    fn test_unknown_currency_aborts_with_line() {
        let csv = "name,salary_from,salary_to,salary_currency,area_name,published_at\n\
                   A,100,200,RUR,Москва,2019-04-01\n\
                   B,100,200,GBP,Москва,2019-04-01\n";
        let result = load(csv, Projection::Summary);
        assert!(
            matches!(
                result,
                Err(DatasetError::Record {
                    line: 3,
                    source: ModelError::UnknownCurrency { .. },
                    ..
                })
            ),
            "expected UnknownCurrency on line 3, got {result:?}"
        );
    }

    #[test]
    fn test_missing_column() {
        let csv = "name,salary_from,salary_to,area_name,published_at\nA,1,2,Москва,2019-04-01\n";
        let result = load(csv, Projection::Summary);
        assert!(matches!(
            result,
            Err(DatasetError::MissingColumn {
                column: "salary_currency",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_file_and_no_data() {
        assert!(matches!(
            load("", Projection::Summary),
            Err(DatasetError::EmptyFile { .. })
        ));
        let header_only = "name,salary_from,salary_to,salary_currency,area_name,published_at\n";
        assert!(matches!(
            load(header_only, Projection::Summary),
            Err(DatasetError::NoData { .. })
        ));
    }

    #[test]
    fn test_bom_header_is_accepted() {
        let csv = "\u{feff}name,salary_from,salary_to,salary_currency,area_name,published_at\n\
                   A,100,200,RUR,Москва,2019-04-01\n";
        assert_eq!(load(csv, Projection::Summary).unwrap().len(), 1);
    }

    #[test]
    fn test_load_csv_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            "name,salary_from,salary_to,salary_currency,area_name,published_at"
        )
        .expect("write header");
        writeln!(file, "A,100,200,EUR,Москва,2019-04-01").expect("write row");

        let vacancies = load_csv(file.path(), Projection::Summary).unwrap();
        assert_eq!(vacancies[0].salary.currency, Currency::Eur);
    }

    #[test]
    fn test_load_csv_missing_file() {
        let result = load_csv(Path::new("/nonexistent/vacstat/vacancies.csv"), Projection::Summary);
        assert!(matches!(result, Err(DatasetError::Io { .. })));
    }

    #[test]
    fn test_split_by_year_groups_rows() {
        let csv = "name,description,salary_from,salary_to,salary_currency,area_name,published_at\n\
                   A,<b>x</b>,100,200,RUR,Москва,2020-03-10T12:00:00+0300\n\
                   B,y,,300,RUR,Казань,2021-01-01T00:00:00+0300\n\
                   C,z,100\n\
                   D,w,1,2,USD,<i>Сочи</i>,2020-12-31T23:59:59+0300\n";
        let dir = tempfile::tempdir().expect("tempdir");

        let files = split_from_reader(csv.as_bytes(), Path::new("mixed.csv"), dir.path()).unwrap();
        let years: Vec<(i32, usize)> = files.iter().map(|f| (f.year, f.rows)).collect();
        assert_eq!(years, vec![(2020, 2), (2021, 1)]);

        let first = std::fs::read_to_string(dir.path().join("2020.csv")).unwrap();
        assert_eq!(
            first,
            "name,salary_from,salary_to,salary_currency,area_name,published_at\n\
             A,100,200,RUR,Москва,2020-03-10T12:00:00+0300\n\
             D,1,2,USD,Сочи,2020-12-31T23:59:59+0300\n"
        );
        let second = std::fs::read_to_string(&files[1].path).unwrap();
        assert_eq!(second.lines().nth(1), Some("B,,300,RUR,Казань,2021-01-01T00:00:00+0300"));
    }

    #[test]
    fn test_split_rejects_bad_date_and_missing_column() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bad_date = "name,salary_from,salary_to,salary_currency,area_name,published_at\n\
                        A,1,2,RUR,Москва,вчера\n";
        assert!(matches!(
            split_from_reader(bad_date.as_bytes(), Path::new("x.csv"), dir.path()),
            Err(DatasetError::Record {
                line: 2,
                source: ModelError::InvalidDate { .. },
                ..
            })
        ));

        let no_area = "name,salary_from,salary_to,salary_currency,published_at\n\
                       A,1,2,RUR,2020-01-01\n";
        assert!(matches!(
            split_from_reader(no_area.as_bytes(), Path::new("x.csv"), dir.path()),
            Err(DatasetError::MissingColumn {
                column: "area_name",
                ..
            })
        ));
    }
}
