#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod cli;
mod core;
mod ingest;
mod prelude;
mod quantity;
mod superchargers;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command, ForecastArgs, OutputFormat, SuperchargersArgs, TableKind},
    core::{Forecast, Parameters},
    ingest::{read_battery_capacities, read_historical_sales, read_superchargers},
    prelude::*,
    quantity::energy::MegawattHours,
    superchargers::{Supercharger, rank_by_consumption},
    tables::{
        build_fleet_capacity_table,
        build_power_table,
        build_sales_table,
        build_supercharger_table,
    },
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().with_writer(std::io::stderr).init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Forecast(args) => forecast(&args)?,
        Command::Superchargers(args) => superchargers(&args)?,
    }

    info!("done!");
    Ok(())
}

#[instrument(skip_all)]
fn forecast(args: &ForecastArgs) -> Result {
    let parameters = Parameters::from(args.parameters);
    info!(
        growth_rate = %parameters.growth_rate,
        retirement_rate = parameters.retirement_rate,
        years_to_forecast = parameters.years_to_forecast,
        "parameters",
    );

    let historical_sales = read_historical_sales(&args.inputs.historical_sales)?;
    let batteries = read_battery_capacities(&args.inputs.battery_capacity)?;
    if batteries.is_empty() {
        warn!("no battery capacities, the fleet capacity will be zero");
    }
    let forecast = Forecast::try_compute(&historical_sales, &batteries, parameters)?;

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&forecast)?);
        }
        OutputFormat::Table => {
            let tables = args.tables();
            if tables.contains(TableKind::Sales) {
                println!("{}", build_sales_table(&forecast.sales));
            }
            if tables.contains(TableKind::Fleet) {
                println!("{}", build_fleet_capacity_table(&forecast.fleet_capacity));
            }
            if tables.contains(TableKind::Power) {
                println!("{}", build_power_table(&forecast.power));
            }
            println!("Forecast starts after {}.", forecast.last_historical_year);
        }
    }
    Ok(())
}

#[instrument(skip_all)]
fn superchargers(args: &SuperchargersArgs) -> Result {
    let sites = rank_by_consumption(read_superchargers(&args.sites)?);
    let total: MegawattHours = sites.iter().map(Supercharger::annual_consumption).sum();
    info!(n_sites = sites.len(), total = %total, "estimated the network consumption");
    println!("{}", build_supercharger_table(&sites));
    Ok(())
}
