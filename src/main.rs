use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use aero_statkit::emissions::EmissionsPipeline;
use aero_statkit::population::{self, PopulationPipeline};
use aero_statkit::traffic::TrafficPipeline;

#[derive(Parser)]
#[command(
    name = "aero-statkit",
    version,
    about = "Cleans European aviation and population statistics into EU-27 extracts"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Combine yearly airport traffic extracts into one EU-27 monthly table.
    Traffic {
        #[arg(long)]
        start_year: i32,
        #[arg(long)]
        end_year: i32,
        /// Directory holding airport_traffic_{year}.csv files.
        #[arg(long, default_value = "Data/airport-traffic-data")]
        data_dir: PathBuf,
        /// Output CSV; defaults under <data-dir>/cleaned-data/.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Combine yearly CO2 emission extracts and derive fuel consumption.
    Emissions {
        #[arg(long)]
        start_year: i32,
        #[arg(long)]
        end_year: i32,
        /// Directory holding co2_emmissions_by_state_{year}.csv files.
        #[arg(long, default_value = "Data/state_co2_data")]
        data_dir: PathBuf,
        /// Output CSV; defaults under <data-dir>/cleaned_data/.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Clean the population table and write wide and long formats.
    Population {
        #[arg(long, default_value = "Data/population-data/xls0009913_i.csv")]
        input: PathBuf,
        #[arg(long, default_value_t = population::DEFAULT_START_YEAR)]
        start_year: i32,
        #[arg(long, default_value_t = population::DEFAULT_END_YEAR)]
        end_year: i32,
        /// Wide-format output CSV; defaults next to the input file.
        #[arg(long)]
        wide_out: Option<PathBuf>,
        /// Long-format output CSV; defaults next to the input file.
        #[arg(long)]
        long_out: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Traffic {
            start_year,
            end_year,
            data_dir,
            out,
        } => {
            let out = out.unwrap_or_else(|| {
                data_dir
                    .join("cleaned-data")
                    .join(format!("eu_airport_traffic_{start_year}_{end_year}.csv"))
            });
            TrafficPipeline::new(data_dir).run(start_year, end_year, &out)?;
        }
        Command::Emissions {
            start_year,
            end_year,
            data_dir,
            out,
        } => {
            let out = out.unwrap_or_else(|| {
                data_dir
                    .join("cleaned_data")
                    .join(format!("eu_co2_emmissions_{start_year}_{end_year}.csv"))
            });
            EmissionsPipeline::new(data_dir).run(start_year, end_year, &out)?;
        }
        Command::Population {
            input,
            start_year,
            end_year,
            wide_out,
            long_out,
        } => {
            let parent = input.parent().unwrap_or(Path::new(".")).to_path_buf();
            let wide_out = wide_out.unwrap_or_else(|| {
                parent.join(format!("eu_population_growth_{start_year}_{end_year}.csv"))
            });
            let long_out = long_out.unwrap_or_else(|| {
                parent.join(format!("eu_population_{start_year}_{end_year}.csv"))
            });
            PopulationPipeline::new(input, start_year, end_year).run(&wide_out, &long_out)?;
        }
    }

    Ok(())
}
