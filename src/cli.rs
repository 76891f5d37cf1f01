use std::path::PathBuf;

use clap::{Parser, Subcommand};
use enumset::EnumSet;

use crate::{core::Parameters, quantity::proportions::Percent};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: forecast the sales, fleet capacity, and power potential.
    #[clap(name = "forecast")]
    Forecast(Box<ForecastArgs>),

    /// Estimate the annual consumption of the supercharger network.
    #[clap(name = "superchargers")]
    Superchargers(SuperchargersArgs),
}

#[derive(Parser)]
pub struct ForecastArgs {
    #[clap(flatten)]
    pub inputs: InputArgs,

    #[clap(flatten)]
    pub parameters: ParameterArgs,

    /// Tables to print.
    #[clap(
        long = "tables",
        env = "TABLES",
        value_delimiter = ',',
        num_args = 1..,
        default_value = "sales,fleet,power",
    )]
    pub tables: Vec<TableKind>,

    #[clap(long, env = "OUTPUT_FORMAT", default_value = "table")]
    pub format: OutputFormat,
}

impl ForecastArgs {
    #[must_use]
    pub fn tables(&self) -> EnumSet<TableKind> {
        self.tables.iter().copied().collect()
    }
}

#[derive(Parser)]
pub struct InputArgs {
    /// Historical sales: a `Year` column and one column per model.
    #[clap(
        long = "historical-sales",
        env = "HISTORICAL_SALES_PATH",
        default_value = "data/historical_sales.csv"
    )]
    pub historical_sales: PathBuf,

    /// Battery capacities: `Model` and `Battery Capacity (kWh)` columns.
    #[clap(
        long = "battery-capacity",
        env = "BATTERY_CAPACITY_PATH",
        default_value = "data/battery_capacity.csv"
    )]
    pub battery_capacity: PathBuf,
}

#[derive(Copy, Clone, Parser)]
pub struct ParameterArgs {
    /// Annual sales growth rate in percent, may be negative.
    #[clap(
        long = "growth-rate-percent",
        env = "GROWTH_RATE_PERCENT",
        default_value = "10",
        allow_negative_numbers = true
    )]
    pub growth_rate: Percent,

    /// Yearly fleet retirement factor, within `(0, 1]`.
    #[clap(long, env = "RETIREMENT_RATE", default_value = "0.95")]
    pub retirement_rate: f64,

    /// Number of years to forecast after the last historical year.
    #[clap(long, env = "YEARS_TO_FORECAST", default_value = "10")]
    pub years_to_forecast: u16,
}

impl From<ParameterArgs> for Parameters {
    fn from(args: ParameterArgs) -> Self {
        Self::builder()
            .growth_rate(args.growth_rate)
            .retirement_rate(args.retirement_rate)
            .years_to_forecast(args.years_to_forecast)
            .build()
    }
}

#[derive(Debug, clap::ValueEnum, enumset::EnumSetType)]
pub enum TableKind {
    /// Historical and forecasted vehicle sales.
    Sales,

    /// Fleet battery capacity per model.
    Fleet,

    /// Power potential with the cumulative variants.
    Power,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables.
    Table,

    /// The whole forecast as JSON.
    Json,
}

#[derive(Parser)]
pub struct SuperchargersArgs {
    /// Supercharger sites: `Name`, `Lat`, `Lon`, `Stalls`, `Power`, and `Status` columns.
    #[clap(long, env = "SUPERCHARGERS_PATH", default_value = "data/superchargers.csv")]
    pub sites: PathBuf,
}
