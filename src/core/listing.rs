// vacstat - core/listing.rs
//
// Display projection for the listing flow: localised cell values, row
// numbering, the [start, end) row window and column selection. Produces
// plain strings; drawing a table is left to whoever consumes `Listing`.

use crate::core::field::Field;
use crate::core::model::{gross_label, premium_label, Salary, Vacancy};
use crate::util::constants;
use crate::util::error::FilterError;
use serde::Serialize;

/// Rows to show, by 1-based row number: `start <= n < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingWindow {
    pub start: usize,
    /// `None` runs to the last row.
    pub end: Option<usize>,
}

impl Default for ListingWindow {
    fn default() -> Self {
        Self {
            start: 1,
            end: None,
        }
    }
}

impl ListingWindow {
    fn contains(&self, row_number: usize) -> bool {
        row_number >= self.start && self.end.map_or(true, |end| row_number < end)
    }
}

/// Header plus display rows, ready for a renderer or exporter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the display rows for `vacancies`, which are already in final order.
///
/// Each row starts with its 1-based number, counted over all of
/// `vacancies`, followed by the requested columns.
pub fn build_listing(
    vacancies: &[&Vacancy],
    window: ListingWindow,
    columns: &[Field],
    max_chars: usize,
) -> Result<Listing, FilterError> {
    let mut headers = Vec::with_capacity(columns.len() + 1);
    headers.push(constants::ROW_NUMBER_HEADER.to_string());
    headers.extend(columns.iter().map(|f| f.label().to_string()));

    let mut rows = Vec::new();
    for (idx, vacancy) in vacancies.iter().enumerate() {
        let number = idx + 1;
        if !window.contains(number) {
            continue;
        }
        let mut row = Vec::with_capacity(columns.len() + 1);
        row.push(number.to_string());
        for field in columns {
            row.push(display_value(vacancy, *field, max_chars)?);
        }
        rows.push(row);
    }

    tracing::debug!(
        total = vacancies.len(),
        shown = rows.len(),
        columns = columns.len(),
        "Listing built"
    );

    Ok(Listing { headers, rows })
}

/// Localised display text of one field, cut to `max_chars` characters.
pub fn display_value(vacancy: &Vacancy, field: Field, max_chars: usize) -> Result<String, FilterError> {
    let value = match field {
        Field::Name => vacancy.name.clone(),
        Field::Description => vacancy.details_for(field)?.description.clone(),
        Field::KeySkills => vacancy.details_for(field)?.key_skills.join("\n"),
        Field::Experience => vacancy.details_for(field)?.experience.label().to_string(),
        Field::Premium => premium_label(vacancy.details_for(field)?.premium).to_string(),
        Field::Employer => vacancy.details_for(field)?.employer_name.clone(),
        Field::Salary => format_salary(&vacancy.salary),
        Field::SalaryCurrency => vacancy.salary.currency.label().to_string(),
        Field::AreaName => vacancy.area_name.clone(),
        Field::PublishedAt => vacancy.published_display(),
    };
    Ok(truncate_cell(value, max_chars))
}

/// `"10 000 - 20 000 (Рубли) (С вычетом налогов)"`. The gross part is left
/// out when the flag was not loaded.
pub fn format_salary(salary: &Salary) -> String {
    let mut out = format!(
        "{} - {} ({})",
        format_amount(salary.from_whole()),
        format_amount(salary.to_whole()),
        salary.currency.label()
    );
    if let Some(gross) = salary.gross {
        out.push_str(&format!(" ({})", gross_label(gross)));
    }
    out
}

/// Integer with a space between thousands groups: `1234567` -> `"1 234 567"`.
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

fn truncate_cell(value: String, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &value[..cut], constants::TRUNCATION_SUFFIX),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::Currency;
    use crate::core::model::{parse_published_at, ExperienceLevel, VacancyDetails};

    fn make_full(name: &str) -> Vacancy {
        let mut salary = Salary::new(35_000.0, 120_000.5, Currency::Rur);
        salary.gross = Some(false);
        Vacancy::summary(name, salary, "Москва", parse_published_at("2022-07-05T18:19:30+0300").unwrap())
            .with_details(VacancyDetails {
                description: "Работа".to_string(),
                key_skills: vec!["Python".to_string(), "SQL".to_string()],
                experience: ExperienceLevel::OneToThree,
                premium: true,
                employer_name: "Яндекс".to_string(),
            })
    }

    #[test]
    fn test_format_amount_groups_thousands() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1_000), "1 000");
        assert_eq!(format_amount(1_234_567), "1 234 567");
        assert_eq!(format_amount(-45_000), "-45 000");
    }

    #[test]
    fn test_format_salary() {
        let v = make_full("Dev");
        assert_eq!(
            format_salary(&v.salary),
            "35 000 - 120 000 (Рубли) (С вычетом налогов)"
        );
        let summary = Salary::new(10.0, 20.0, Currency::Usd);
        assert_eq!(format_salary(&summary), "10 - 20 (Доллары)");
    }

    #[test]
    fn test_display_values_are_localised() {
        let v = make_full("Dev");
        let value = |f| display_value(&v, f, 100).unwrap();
        assert_eq!(value(Field::KeySkills), "Python\nSQL");
        assert_eq!(value(Field::Experience), "От 1 года до 3 лет");
        assert_eq!(value(Field::Premium), "Да");
        assert_eq!(value(Field::PublishedAt), "05.07.2022");
    }

    #[test]
    fn test_long_values_are_cut() {
        let v = make_full(&"я".repeat(150));
        let name = display_value(&v, Field::Name, 100).unwrap();
        assert_eq!(name.chars().count(), 103);
        assert!(name.ends_with("..."));

        let exact = make_full(&"a".repeat(100));
        assert_eq!(display_value(&exact, Field::Name, 100).unwrap().len(), 100);
    }

    #[test]
    fn test_window_and_columns() {
        let entries: Vec<Vacancy> = (1..=5).map(|i| make_full(&format!("Dev {i}"))).collect();
        let refs: Vec<&Vacancy> = entries.iter().collect();
        let window = ListingWindow {
            start: 2,
            end: Some(4),
        };
        let listing = build_listing(&refs, window, &[Field::Name, Field::AreaName], 100).unwrap();
        assert_eq!(listing.headers, vec!["№", "Название", "Название региона"]);
        assert_eq!(listing.rows.len(), 2);
        assert_eq!(listing.rows[0], vec!["2", "Dev 2", "Москва"]);
        assert_eq!(listing.rows[1][0], "3");
    }

    #[test]
    fn test_open_window_shows_all() {
        let entries: Vec<Vacancy> = (1..=3).map(|i| make_full(&format!("Dev {i}"))).collect();
        let refs: Vec<&Vacancy> = entries.iter().collect();
        let listing = build_listing(&refs, ListingWindow::default(), Field::columns(), 100).unwrap();
        assert_eq!(listing.rows.len(), 3);
        assert_eq!(listing.headers.len(), 10);
    }

    #[test]
    fn test_details_column_on_summary_record() {
        let v = Vacancy::summary(
            "Dev",
            Salary::new(1.0, 2.0, Currency::Rur),
            "Москва",
            parse_published_at("2020-01-01").unwrap(),
        );
        let result = build_listing(&[&v], ListingWindow::default(), &[Field::Employer], 100);
        assert!(matches!(result, Err(FilterError::FieldUnavailable { .. })));
    }
}
