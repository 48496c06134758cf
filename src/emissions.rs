//! CO2 emissions pipeline: per-year loading of the
//! `co2_emmissions_by_state_{year}.csv` extracts (the source dataset's own
//! spelling), EU-27 filtering, and the derived fuel-consumption metric.

use std::path::{Path, PathBuf};

use polars::prelude::*;

use crate::error::StatError;
use crate::frame;
use crate::members;
use crate::schema::emissions;

/// Tonnes of CO2 emitted per tonne of jet fuel burned.
pub const CO2_PER_FUEL_TONNE: f64 = 3.16;

/// A known layout difference between yearly extracts: a column that some
/// years carry and others do not, removed when present so every year aligns
/// to the canonical schema.
struct SchemaVariant {
    column: &'static str,
    note: &'static str,
}

const SCHEMA_VARIANTS: [SchemaVariant; 1] = [SchemaVariant {
    column: emissions::FLIGHT_MONTH,
    note: "day-level granularity column carried by the earlier extract years",
}];

pub struct EmissionsPipeline {
    data_dir: PathBuf,
}

impl EmissionsPipeline {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn year_file(&self, year: i32) -> PathBuf {
        self.data_dir
            .join(format!("co2_emmissions_by_state_{year}.csv"))
    }

    /// Remove the state-code and free-text note columns plus any known
    /// schema-variant columns present in this extract.
    fn normalize_schema(df: DataFrame) -> Result<DataFrame, StatError> {
        let mut df = df;
        for &column in &emissions::DROPPED {
            df = df.drop(column)?;
        }
        for variant in &SCHEMA_VARIANTS {
            if df.schema().contains(variant.column) {
                log::debug!("dropping {}: {}", variant.column, variant.note);
                df = df.drop(variant.column)?;
            }
        }
        Ok(df)
    }

    /// Load one year of per-state emissions, reduced to the canonical schema:
    /// YEAR, MONTH, STATE_NAME, CO2_QTY_TONNES, COUNTRY_TRAFFIC (renamed
    /// from TF), filtered to EU-27 states, rows with missing values dropped.
    pub fn load_year(&self, year: i32) -> Result<DataFrame, StatError> {
        let path = self.year_file(year);
        log::info!("loading emissions {year}: {}", path.display());

        let raw = frame::read_csv(&path)?;
        let normalized = Self::normalize_schema(raw)?;

        let renamed = normalized
            .lazy()
            .rename([emissions::TF], [emissions::COUNTRY_TRAFFIC], true)
            .collect()?;
        frame::require_columns(&renamed, &emissions::CANONICAL)?;

        let typed = renamed
            .lazy()
            .select([
                frame::parse_int(emissions::YEAR),
                frame::parse_int(emissions::MONTH),
                col(emissions::STATE_NAME),
                frame::parse_float(emissions::CO2_QTY_TONNES),
                frame::parse_float(emissions::COUNTRY_TRAFFIC),
            ])
            .collect()?;

        let eu = members::filter_member_states(&typed, emissions::STATE_NAME)?;
        let clean = eu
            .lazy()
            .filter(frame::all_not_null(&emissions::CANONICAL))
            .collect()?;

        log::debug!("{year}: {} state-month rows", clean.height());
        Ok(clean)
    }

    /// Combine the inclusive year range into one table, years ascending,
    /// derive fuel consumption from CO2 quantity, round both metrics to
    /// 2 decimals, and cast the traffic count to integer.
    pub fn combine(&self, start_year: i32, end_year: i32) -> Result<DataFrame, StatError> {
        let mut combined: Option<DataFrame> = None;
        for year in start_year..=end_year {
            let df = self.load_year(year)?;
            combined = Some(match combined {
                Some(acc) => acc.vstack(&df)?,
                None => df,
            });
        }

        let combined = combined.ok_or_else(|| {
            StatError::Validation(format!("empty year range {start_year}..{end_year}"))
        })?;

        let mut out = combined
            .lazy()
            .with_columns([(col(emissions::CO2_QTY_TONNES) / lit(CO2_PER_FUEL_TONNE))
                .alias(emissions::FUEL_CONSUMPTION_TONNES)])
            .with_columns([col(emissions::COUNTRY_TRAFFIC).cast(DataType::Int64)])
            .collect()?;

        frame::round_2dp(&mut out, emissions::CO2_QTY_TONNES)?;
        frame::round_2dp(&mut out, emissions::FUEL_CONSUMPTION_TONNES)?;

        Ok(out)
    }

    pub fn run(&self, start_year: i32, end_year: i32, out: &Path) -> Result<(), StatError> {
        let mut df = self.combine(start_year, end_year)?;
        frame::write_csv(&mut df, out, Some(2))?;
        log::info!("wrote {} rows: {}", df.height(), out.display());
        Ok(())
    }
}
