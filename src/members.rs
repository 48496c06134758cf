use polars::prelude::*;

use crate::error::StatError;

/// The 27 member states of the European Union, canonical English names.
///
/// Membership checks are case-insensitive: source extracts spell state names
/// in mixed case or all-uppercase depending on the dataset and year.
pub const MEMBER_STATES: [&str; 27] = [
    "Austria",
    "Belgium",
    "Bulgaria",
    "Croatia",
    "Cyprus",
    "Czech Republic",
    "Denmark",
    "Estonia",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "Hungary",
    "Ireland",
    "Italy",
    "Latvia",
    "Lithuania",
    "Luxembourg",
    "Malta",
    "Netherlands",
    "Poland",
    "Portugal",
    "Romania",
    "Slovakia",
    "Slovenia",
    "Spain",
    "Sweden",
];

/// True if `name` is an EU-27 member state, ignoring case.
pub fn is_member_state(name: &str) -> bool {
    MEMBER_STATES.iter().any(|m| m.eq_ignore_ascii_case(name))
}

fn member_series() -> Series {
    let upper: Vec<String> = MEMBER_STATES.iter().map(|m| m.to_uppercase()).collect();
    Series::new("member_state".into(), upper)
}

/// Keep only rows whose value in `country_col` is an EU-27 member state.
///
/// Returns a new DataFrame; the input is never mutated. No matches yields an
/// empty frame, not an error.
pub fn filter_member_states(df: &DataFrame, country_col: &str) -> Result<DataFrame, StatError> {
    if df.column(country_col).is_err() {
        return Err(StatError::MissingColumn(country_col.to_string()));
    }

    let filtered = df
        .clone()
        .lazy()
        .filter(
            col(country_col)
                .str()
                .to_uppercase()
                .is_in(lit(member_series()), false),
        )
        .collect()?;

    Ok(filtered)
}
