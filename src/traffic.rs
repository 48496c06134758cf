//! Airport traffic pipeline: per-year loading of the
//! `airport_traffic_{year}.csv` extracts, EU-27 filtering, and monthly
//! aggregation of flight counts per state.

use std::path::{Path, PathBuf};

use polars::prelude::*;

use crate::error::StatError;
use crate::frame;
use crate::members;
use crate::schema::traffic;

pub struct TrafficPipeline {
    data_dir: PathBuf,
}

impl TrafficPipeline {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn year_file(&self, year: i32) -> PathBuf {
        self.data_dir.join(format!("airport_traffic_{year}.csv"))
    }

    /// Load one year of airport traffic, reduced to the canonical schema.
    ///
    /// Required columns: YEAR, MONTH_NUM, STATE_NAME, FLT_DEP_1, FLT_ARR_1,
    /// FLT_TOT_1. Date, textual month, airport identifiers, and the secondary
    /// IFR counts are discarded, MONTH_NUM is renamed to MONTH, and rows are
    /// filtered to EU-27 states. Per-airport rows are summed into one row per
    /// (YEAR, MONTH, STATE_NAME); FLT_TOT_1 is summed as-is, not recomputed
    /// from departures and arrivals.
    pub fn load_year(&self, year: i32) -> Result<DataFrame, StatError> {
        let path = self.year_file(year);
        log::info!("loading airport traffic {year}: {}", path.display());

        let raw = frame::read_csv(&path)?;
        frame::require_columns(&raw, &traffic::REQUIRED)?;

        let trimmed = frame::drop_existing(raw, &traffic::DROPPED)?;
        let typed = trimmed
            .lazy()
            .rename([traffic::MONTH_NUM], [traffic::MONTH], true)
            .with_columns([
                frame::parse_int(traffic::YEAR),
                frame::parse_int(traffic::MONTH),
                frame::parse_float(traffic::FLT_DEP_1),
                frame::parse_float(traffic::FLT_ARR_1),
                frame::parse_float(traffic::FLT_TOT_1),
            ])
            .collect()?;

        let eu = members::filter_member_states(&typed, traffic::STATE_NAME)?;
        let clean = eu
            .lazy()
            .filter(frame::all_not_null(&traffic::CANONICAL))
            .collect()?;

        let monthly = frame::sum_by(
            clean,
            &[traffic::YEAR, traffic::MONTH, traffic::STATE_NAME],
            &traffic::COUNTS,
        )?;

        log::debug!("{year}: {} state-month rows", monthly.height());
        Ok(monthly)
    }

    /// Combine the inclusive year range into one table, years ascending,
    /// with all count columns cast to integers.
    ///
    /// A missing yearly file is fatal; there is no partial-skip behavior.
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

        let out = combined
            .lazy()
            .with_columns([
                col(traffic::FLT_DEP_1).cast(DataType::Int64),
                col(traffic::FLT_ARR_1).cast(DataType::Int64),
                col(traffic::FLT_TOT_1).cast(DataType::Int64),
            ])
            .collect()?;

        Ok(out)
    }

    pub fn run(&self, start_year: i32, end_year: i32, out: &Path) -> Result<(), StatError> {
        let mut df = self.combine(start_year, end_year)?;
        frame::write_csv(&mut df, out, None)?;
        log::info!("wrote {} rows: {}", df.height(), out.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    /// One fixture row: (airport, month, state, departures, arrivals, total).
    type Row<'a> = (&'a str, i32, &'a str, i64, i64, i64);

    fn write_year(dir: &Path, year: i32, rows: &[Row]) {
        let mut text = String::from(
            "YEAR,MONTH_NUM,MONTH_MON,FLT_DATE,APT_ICAO,APT_NAME,STATE_NAME,\
             FLT_DEP_1,FLT_ARR_1,FLT_TOT_1,FLT_DEP_IFR_2,FLT_ARR_IFR_2,FLT_TOT_IFR_2\n",
        );
        for (apt, month, state, dep, arr, tot) in rows {
            writeln!(
                text,
                "{year},{month},JAN,01-01-{year},{apt},{apt} Airport,{state},{dep},{arr},{tot},0,0,0"
            )
            .unwrap();
        }
        std::fs::write(dir.join(format!("airport_traffic_{year}.csv")), text).unwrap();
    }

    #[test]
    fn load_year_aggregates_airports_per_state_month() {
        let dir = tempfile::tempdir().unwrap();
        write_year(
            dir.path(),
            2020,
            &[
                ("EDDF", 1, "Germany", 10, 20, 30),
                ("EDDM", 1, "Germany", 1, 2, 3),
                ("LFPG", 1, "France", 5, 5, 10),
                ("SBGR", 1, "Brazil", 7, 7, 14),
            ],
        );

        let df = TrafficPipeline::new(dir.path()).load_year(2020).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.get_column_names_str(), traffic::CANONICAL.to_vec());
        for dropped in traffic::DROPPED {
            assert!(df.column(dropped).is_err());
        }

        // Sorted by group key: France before Germany.
        let dep = df.column(traffic::FLT_DEP_1).unwrap().f64().unwrap();
        let tot = df.column(traffic::FLT_TOT_1).unwrap().f64().unwrap();
        assert_eq!(dep.get(0), Some(5.0));
        assert_eq!(dep.get(1), Some(11.0));
        assert_eq!(tot.get(1), Some(33.0));
    }

    #[test]
    fn combine_casts_counts_to_integers() {
        let dir = tempfile::tempdir().unwrap();
        write_year(dir.path(), 2020, &[("EDDF", 1, "Germany", 10, 20, 30)]);

        let df = TrafficPipeline::new(dir.path()).combine(2020, 2020).unwrap();
        let dep = df.column(traffic::FLT_DEP_1).unwrap().i64().unwrap();
        assert_eq!(dep.get(0), Some(10));
    }

    #[test]
    fn combining_subranges_equals_combining_whole_range() {
        let dir = tempfile::tempdir().unwrap();
        write_year(dir.path(), 2020, &[("EDDF", 1, "Germany", 10, 20, 30)]);
        write_year(dir.path(), 2021, &[("LFPG", 2, "France", 5, 5, 10)]);
        write_year(dir.path(), 2022, &[("LOWW", 3, "Austria", 2, 2, 4)]);

        let pipeline = TrafficPipeline::new(dir.path());
        let first = pipeline.combine(2020, 2021).unwrap();
        let second = pipeline.combine(2022, 2022).unwrap();
        let split = first.vstack(&second).unwrap();
        let whole = pipeline.combine(2020, 2022).unwrap();

        assert!(split.equals(&whole));
    }

    #[test]
    fn missing_year_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_year(dir.path(), 2020, &[("EDDF", 1, "Germany", 10, 20, 30)]);

        let err = TrafficPipeline::new(dir.path())
            .combine(2020, 2021)
            .unwrap_err();
        assert!(err.to_string().contains("airport_traffic_2021.csv"));
    }
}
