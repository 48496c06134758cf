//! Population pipeline: splitting the raw semicolon-joined population table
//! into per-year columns, EU-27 filtering, year-over-year growth rates, and
//! the wide-to-long reshape.

use std::path::{Path, PathBuf};

use polars::prelude::*;

use crate::error::StatError;
use crate::frame;
use crate::members;
use crate::schema::population;

pub const COMPOSITE_SEPARATOR: &str = ";";
pub const COMPOSITE_COLUMN: usize = 0;
pub const DEFAULT_START_YEAR: i32 = 2012;
pub const DEFAULT_END_YEAR: i32 = 2023;

/// Load the raw population CSV: one composite column whose header holds the
/// delimited year labels and whose rows hold country plus per-year figures.
pub fn load_raw(path: &Path) -> Result<DataFrame, StatError> {
    frame::read_csv(path)
}

/// Split the composite column at `column_index` into a rectangular table.
///
/// Output columns are `Countries` plus one column per delimited part of the
/// composite column's own header. Every row must split into exactly that many
/// parts; an inconsistent row fails the whole operation rather than being
/// silently truncated.
pub fn split_composite(
    df: &DataFrame,
    separator: &str,
    column_index: usize,
) -> Result<DataFrame, StatError> {
    let names = df.get_column_names_str();
    let composite = names
        .get(column_index)
        .ok_or_else(|| StatError::MissingColumn(format!("column index {column_index}")))?
        .to_string();

    let mut out_names: Vec<String> = vec![population::COUNTRIES.to_string()];
    out_names.extend(composite.split(separator).map(|part| part.trim().to_string()));

    let rows = df.column(&composite)?.str()?;
    let mut values: Vec<Vec<String>> = vec![Vec::with_capacity(df.height()); out_names.len()];

    for i in 0..df.height() {
        let row = rows
            .get(i)
            .ok_or_else(|| StatError::InvalidData(format!("empty composite value at row {i}")))?;
        let parts: Vec<&str> = row.split(separator).collect();
        if parts.len() != out_names.len() {
            return Err(StatError::Validation(format!(
                "row {i} splits into {} parts, expected {}",
                parts.len(),
                out_names.len()
            )));
        }
        for (j, part) in parts.iter().enumerate() {
            values[j].push(part.trim().to_string());
        }
    }

    let columns: Vec<Column> = out_names
        .iter()
        .zip(values)
        .map(|(name, vals)| Series::new(name.as_str().into(), vals).into())
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Attach a growth-rate column for each consecutive year pair in the range:
/// `(pop[y2] - pop[y1]) / pop[y1]`, a fraction.
///
/// Values are coerced to numbers with unparseable cells becoming null; a zero
/// or missing denominator yields a non-finite or null rate, never an error.
pub fn growth_rates(
    df: &DataFrame,
    start_year: i32,
    end_year: i32,
) -> Result<DataFrame, StatError> {
    let mut changes = Vec::new();
    for year1 in start_year..end_year {
        let year2 = year1 + 1;
        let col1 = year1.to_string();
        let col2 = year2.to_string();
        frame::require_columns(df, &[col1.as_str(), col2.as_str()])?;

        let prev = frame::parse_float(&col1);
        let next = frame::parse_float(&col2);
        changes.push(
            ((next - prev.clone()) / prev).alias(population::change_column(year1, year2).as_str()),
        );
    }

    Ok(df.clone().lazy().with_columns(changes).collect()?)
}

/// Unpivot the wide per-year table into one row per (country, year):
/// Country, Year, Population, Change_from_Previous. The change is 0 for the
/// first year in range and otherwise the precomputed growth-rate value.
pub fn to_long(df: &DataFrame, start_year: i32, end_year: i32) -> Result<DataFrame, StatError> {
    let countries = df.column(population::COUNTRIES)?.str()?;
    let years: Vec<i32> = (start_year..=end_year).collect();

    let mut population_cols = Vec::with_capacity(years.len());
    for year in &years {
        let name = year.to_string();
        population_cols.push(df.column(&name)?.str()?);
    }

    let mut change_cols: Vec<Option<&Float64Chunked>> = vec![None];
    for pair in years.windows(2) {
        let name = population::change_column(pair[0], pair[1]);
        change_cols.push(Some(df.column(&name)?.f64()?));
    }

    let total = df.height() * years.len();
    let mut country_out: Vec<String> = Vec::with_capacity(total);
    let mut year_out: Vec<i32> = Vec::with_capacity(total);
    let mut population_out: Vec<Option<f64>> = Vec::with_capacity(total);
    let mut change_out: Vec<Option<f64>> = Vec::with_capacity(total);

    for i in 0..df.height() {
        let country = countries
            .get(i)
            .ok_or_else(|| StatError::InvalidData(format!("missing country at row {i}")))?;

        for (k, year) in years.iter().enumerate() {
            country_out.push(country.to_string());
            year_out.push(*year);
            population_out.push(population_cols[k].get(i).and_then(|v| v.parse().ok()));
            change_out.push(match change_cols[k] {
                None => Some(0.0),
                Some(rates) => rates.get(i),
            });
        }
    }

    Ok(DataFrame::new(vec![
        Series::new(population::COUNTRY.into(), country_out).into(),
        Series::new(population::YEAR.into(), year_out).into(),
        Series::new(population::POPULATION.into(), population_out).into(),
        Series::new(population::CHANGE_FROM_PREVIOUS.into(), change_out).into(),
    ])?)
}

pub struct PopulationPipeline {
    input: PathBuf,
    start_year: i32,
    end_year: i32,
}

impl PopulationPipeline {
    pub fn new(input: impl Into<PathBuf>, start_year: i32, end_year: i32) -> Self {
        Self {
            input: input.into(),
            start_year,
            end_year,
        }
    }

    /// Wide table: split, filtered to EU-27, with growth-rate columns.
    pub fn wide(&self) -> Result<DataFrame, StatError> {
        log::info!("loading population table: {}", self.input.display());
        let raw = load_raw(&self.input)?;
        let split = split_composite(&raw, COMPOSITE_SEPARATOR, COMPOSITE_COLUMN)?;
        let eu = members::filter_member_states(&split, population::COUNTRIES)?;
        log::debug!("{} member-state rows", eu.height());
        growth_rates(&eu, self.start_year, self.end_year)
    }

    pub fn run(&self, wide_out: &Path, long_out: &Path) -> Result<(), StatError> {
        let mut wide = self.wide()?;
        frame::write_csv(&mut wide, wide_out, None)?;
        log::info!("wrote {} rows: {}", wide.height(), wide_out.display());

        let mut long = to_long(&wide, self.start_year, self.end_year)?;
        frame::write_csv(&mut long, long_out, None)?;
        log::info!("wrote {} rows: {}", long.height(), long_out.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composite_frame(header: &str, rows: &[&str]) -> DataFrame {
        DataFrame::new(vec![Series::new(header.into(), rows).into()]).unwrap()
    }

    #[test]
    fn split_produces_countries_plus_year_columns() {
        let df = composite_frame("2012;2013", &["France;100;110", "Germany;80;82"]);
        let split = split_composite(&df, ";", 0).unwrap();

        assert_eq!(
            split.get_column_names_str(),
            vec![population::COUNTRIES, "2012", "2013"]
        );
        assert_eq!(split.height(), 2);

        let countries = split.column(population::COUNTRIES).unwrap().str().unwrap();
        assert_eq!(countries.get(0), Some("France"));
        let y2013 = split.column("2013").unwrap().str().unwrap();
        assert_eq!(y2013.get(1), Some("82"));
    }

    #[test]
    fn split_rejects_inconsistent_rows() {
        let df = composite_frame("2012;2013", &["France;100;110", "Germany;80"]);
        let err = split_composite(&df, ";", 0).unwrap_err();
        assert!(matches!(err, StatError::Validation(_)));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn growth_rate_for_ten_percent_increase() {
        let df = composite_frame("2012;2013", &["France;100;110"]);
        let split = split_composite(&df, ";", 0).unwrap();
        let wide = growth_rates(&split, 2012, 2013).unwrap();

        let change = wide
            .column(population::change_column(2012, 2013).as_str())
            .unwrap()
            .f64()
            .unwrap();
        let rate = change.get(0).unwrap();
        assert!((rate - 0.10).abs() < 1e-12);
    }

    #[test]
    fn zero_denominator_is_non_finite_not_an_error() {
        let df = composite_frame("2012;2013", &["Atlantis;0;110"]);
        let split = split_composite(&df, ";", 0).unwrap();
        let wide = growth_rates(&split, 2012, 2013).unwrap();

        let change = wide
            .column(population::change_column(2012, 2013).as_str())
            .unwrap()
            .f64()
            .unwrap();
        match change.get(0) {
            Some(rate) => assert!(!rate.is_finite()),
            None => {}
        }
    }

    #[test]
    fn unparseable_population_becomes_missing() {
        let df = composite_frame("2012;2013", &["France;n/a;110"]);
        let split = split_composite(&df, ";", 0).unwrap();
        let wide = growth_rates(&split, 2012, 2013).unwrap();

        let change = wide
            .column(population::change_column(2012, 2013).as_str())
            .unwrap()
            .f64()
            .unwrap();
        assert_eq!(change.get(0), None);
    }

    #[test]
    fn long_format_carries_population_and_change_per_year() {
        let df = composite_frame("2012;2013", &["France;100;110"]);
        let split = split_composite(&df, ";", 0).unwrap();
        let wide = growth_rates(&split, 2012, 2013).unwrap();
        let long = to_long(&wide, 2012, 2013).unwrap();

        assert_eq!(long.height(), 2);

        let country = long.column(population::COUNTRY).unwrap().str().unwrap();
        let year = long.column(population::YEAR).unwrap().i32().unwrap();
        let pop = long.column(population::POPULATION).unwrap().f64().unwrap();
        let change = long
            .column(population::CHANGE_FROM_PREVIOUS)
            .unwrap()
            .f64()
            .unwrap();

        assert_eq!(country.get(0), Some("France"));
        assert_eq!(year.get(0), Some(2012));
        assert_eq!(pop.get(0), Some(100.0));
        assert_eq!(change.get(0), Some(0.0));

        assert_eq!(year.get(1), Some(2013));
        assert_eq!(pop.get(1), Some(110.0));
        assert!((change.get(1).unwrap() - 0.10).abs() < 1e-12);
    }
}
