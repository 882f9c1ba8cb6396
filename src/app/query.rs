// vacstat - app/query.rs
//
// Listing flow: validate the user's filter, sort and column choices, then
// filter -> sort -> project. Every input is checked before any record is
// touched so a bad argument never produces partial output.

use crate::core::field::Field;
use crate::core::filter::{filter_vacancies, Condition};
use crate::core::listing::{build_listing, Listing, ListingWindow};
use crate::core::model::Vacancy;
use crate::core::sort::sort_vacancies;
use crate::util::constants;
use crate::util::error::FilterError;

/// User choices for one listing run, as typed on the command line.
#[derive(Debug, Clone)]
pub struct ListingRequest {
    /// `"Field: value"`; `None` or blank keeps every record.
    pub filter: Option<String>,
    /// Field name to sort by; `None` keeps file order.
    pub sort: Option<String>,
    /// Descending order. Ignored without `sort`.
    pub descending: bool,
    pub window: ListingWindow,
    /// Comma-separated column names; `None` or blank shows all columns.
    pub columns: Option<String>,
    pub max_cell_chars: usize,
}

impl Default for ListingRequest {
    fn default() -> Self {
        Self {
            filter: None,
            sort: None,
            descending: false,
            window: ListingWindow::default(),
            columns: None,
            max_cell_chars: constants::DEFAULT_MAX_CELL_CHARS,
        }
    }
}

/// Validated form of a `ListingRequest`.
#[derive(Debug, Clone)]
struct ListingPlan {
    condition: Option<Condition>,
    sort: Option<Field>,
    columns: Vec<Field>,
}

impl ListingPlan {
    fn from_request(request: &ListingRequest) -> Result<Self, FilterError> {
        let condition = match request.filter.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(expression) => Some(Condition::parse(expression)?),
        };
        let sort = match request.sort.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => Some(Field::resolve(name)?),
        };
        let columns = Field::resolve_columns(request.columns.as_deref().unwrap_or(""))?;
        Ok(Self {
            condition,
            sort,
            columns,
        })
    }
}

/// Result of one listing run.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingOutcome {
    /// Vacancies that passed the filter, before the row window.
    pub matched: usize,
    /// Rows inside the window.
    pub listing: Listing,
}

impl ListingOutcome {
    /// True when the filter itself matched nothing. A window that falls
    /// outside the matched rows is not "nothing found".
    pub fn nothing_found(&self) -> bool {
        self.matched == 0
    }
}

/// Run the listing flow over loaded vacancies.
pub fn run_listing(
    vacancies: &[Vacancy],
    request: &ListingRequest,
) -> Result<ListingOutcome, FilterError> {
    let plan = ListingPlan::from_request(request)?;

    let mut selected: Vec<&Vacancy> = match &plan.condition {
        Some(condition) => filter_vacancies(vacancies, condition)?,
        None => vacancies.iter().collect(),
    };

    if let Some(field) = plan.sort {
        selected = sort_vacancies(selected, field, request.descending)?;
    }

    tracing::debug!(
        total = vacancies.len(),
        selected = selected.len(),
        sort = ?plan.sort,
        descending = request.descending,
        "Listing query evaluated"
    );

    let listing = build_listing(&selected, request.window, &plan.columns, request.max_cell_chars)?;
    Ok(ListingOutcome {
        matched: selected.len(),
        listing,
    })
}

/// Draw a listing as a bordered text grid. Multi-line cells (skills) span
/// several text lines within their row.
pub fn render_listing(listing: &Listing) -> String {
    let mut widths: Vec<usize> = listing.headers.iter().map(|h| h.chars().count()).collect();
    for row in &listing.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            for line in cell.lines() {
                *width = (*width).max(line.chars().count());
            }
        }
    }

    let border = format!(
        "+{}+\n",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let mut out = border.clone();
    push_grid_row(&mut out, &listing.headers, &widths);
    out.push_str(&border);
    for row in &listing.rows {
        push_grid_row(&mut out, row, &widths);
        out.push_str(&border);
    }
    out
}

fn push_grid_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let height = cells
        .iter()
        .map(|c| c.lines().count().max(1))
        .max()
        .unwrap_or(1);
    for line_idx in 0..height {
        out.push('|');
        for (cell, width) in cells.iter().zip(widths) {
            let text = cell.lines().nth(line_idx).unwrap_or("");
            let pad = width.saturating_sub(text.chars().count());
            out.push(' ');
            out.push_str(text);
            out.push_str(&" ".repeat(pad));
            out.push_str(" |");
        }
        out.push('\n');
    }
}
