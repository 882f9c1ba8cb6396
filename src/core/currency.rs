// vacstat - core/currency.rs
//
// Fixed-rate currency normalisation. Every salary figure that is compared
// or aggregated is first converted into the reference currency (RUR).
// Core layer: pure functions over constant tables.

use crate::core::model::Salary;
use crate::util::error::ModelError;

/// Supported salary currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Currency {
    Azn,
    Byr,
    Eur,
    Gel,
    Kgs,
    Kzt,
    Rur,
    Uah,
    Usd,
    Uzs,
}

impl Currency {
    /// Returns all supported currencies in code order.
    pub fn all() -> &'static [Currency] {
        &[
            Currency::Azn,
            Currency::Byr,
            Currency::Eur,
            Currency::Gel,
            Currency::Kgs,
            Currency::Kzt,
            Currency::Rur,
            Currency::Uah,
            Currency::Usd,
            Currency::Uzs,
        ]
    }

    /// Resolve a source currency code (case-insensitive).
    pub fn from_code(code: &str) -> Result<Self, ModelError> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| ModelError::UnknownCurrency {
                code: code.to_string(),
            })
    }

    /// Upper-case ISO-like code as it appears in source data.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Azn => "AZN",
            Currency::Byr => "BYR",
            Currency::Eur => "EUR",
            Currency::Gel => "GEL",
            Currency::Kgs => "KGS",
            Currency::Kzt => "KZT",
            Currency::Rur => "RUR",
            Currency::Uah => "UAH",
            Currency::Usd => "USD",
            Currency::Uzs => "UZS",
        }
    }

    /// Units of reference currency per unit of this currency.
    pub fn rate(&self) -> f64 {
        match self {
            Currency::Azn => 35.68,
            Currency::Byr => 23.91,
            Currency::Eur => 59.90,
            Currency::Gel => 21.74,
            Currency::Kgs => 0.76,
            Currency::Kzt => 0.13,
            Currency::Rur => 1.0,
            Currency::Uah => 1.64,
            Currency::Usd => 60.66,
            Currency::Uzs => 0.0055,
        }
    }

    /// Localised display name, also the value matched by currency filters.
    pub fn label(&self) -> &'static str {
        match self {
            Currency::Azn => "Манаты",
            Currency::Byr => "Белорусские рубли",
            Currency::Eur => "Евро",
            Currency::Gel => "Грузинский лари",
            Currency::Kgs => "Киргизский сом",
            Currency::Kzt => "Тенге",
            Currency::Rur => "Рубли",
            Currency::Uah => "Гривны",
            Currency::Usd => "Доллары",
            Currency::Uzs => "Узбекский сум",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Convert `amount` into the reference currency.
///
/// Only the integer part of `amount` takes part in the conversion.
pub fn to_reference_currency(amount: f64, currency: Currency) -> f64 {
    amount.trunc() * currency.rate()
}

/// Mean of both salary bounds, each converted into the reference currency.
///
/// `from > to` is not rejected; the result is simply not meaningful.
pub fn midpoint(salary: &Salary) -> f64 {
    (to_reference_currency(salary.from, salary.currency)
        + to_reference_currency(salary.to, salary.currency))
        / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn salary(from: f64, to: f64, currency: Currency) -> Salary {
        Salary {
            from,
            to,
            currency,
            gross: None,
        }
    }

    #[test]
    fn test_rouble_rate_is_one() {
        assert_eq!(Currency::Rur.rate(), 1.0);
        assert_eq!(to_reference_currency(12_345.0, Currency::Rur), 12_345.0);
    }

    #[test]
    fn test_fractional_part_is_ignored() {
        assert_eq!(to_reference_currency(100.99, Currency::Rur), 100.0);
        assert_eq!(
            to_reference_currency(1_000.5, Currency::Usd),
            to_reference_currency(1_000.0, Currency::Usd)
        );
    }

    #[test]
    fn test_midpoint_converts_both_bounds() {
        let s = salary(1_000.0, 3_000.0, Currency::Usd);
        assert!((midpoint(&s) - 2_000.0 * 60.66).abs() < 1e-6);
    }

    #[test]
    fn test_midpoint_tolerates_inverted_bounds() {
        let s = salary(3_000.0, 1_000.0, Currency::Rur);
        assert_eq!(midpoint(&s), 2_000.0);
    }

    #[test]
    fn test_from_code_case_insensitive() {
        assert_eq!(Currency::from_code("usd").unwrap(), Currency::Usd);
        assert_eq!(Currency::from_code("KZT").unwrap(), Currency::Kzt);
    }

    #[test]
    fn test_unknown_code_is_error() {
        let result = Currency::from_code("GBP");
        assert!(
            matches!(result, Err(ModelError::UnknownCurrency { ref code }) if code == "GBP"),
            "expected UnknownCurrency, got {result:?}"
        );
    }

    #[test]
    fn test_every_currency_round_trips_through_code() {
        for currency in Currency::all() {
            assert_eq!(Currency::from_code(currency.code()).unwrap(), *currency);
        }
    }

    #[quickcheck]
    fn prop_conversion_is_linear(amount: u32, index: usize) -> bool {
        let currency = Currency::all()[index % Currency::all().len()];
        let x = f64::from(amount);
        to_reference_currency(2.0 * x, currency) == 2.0 * to_reference_currency(x, currency)
    }
}
