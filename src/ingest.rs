//! CSV loading of the historical sales, battery capacities, and supercharger sites.
//!
//! The files may be separated by either commas or semicolons,
//! and every cell except `Year` and `Model` is coerced to a number.

use std::{collections::BTreeMap, fs, path::Path};

use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use itertools::Itertools;

use crate::{
    core::{BatteryCapacities, ForecastError, SalesTable, Year},
    prelude::*,
    quantity::energy::KilowattHours,
    superchargers::Supercharger,
};

const YEAR: &str = "Year";
const MODEL: &str = "Model";
const BATTERY_CAPACITY: &str = "Battery Capacity (kWh)";

/// Number of leading characters inspected to pick the delimiter.
const SNIFF_LENGTH: usize = 100;

#[must_use]
pub fn sniff_delimiter(content: &str) -> u8 {
    if content.chars().take(SNIFF_LENGTH).any(|character| character == ';') { b';' } else { b',' }
}

fn reader(content: &str) -> Reader<&[u8]> {
    ReaderBuilder::new()
        .delimiter(sniff_delimiter(content))
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes())
}

fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read `{}`", path.display()))
}

fn find_column(headers: &StringRecord, name: &str) -> Result<usize, ForecastError> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| ForecastError::MissingColumn(name.to_owned()))
}

/// Numeric coercion: anything unparsable or non-finite is missing.
fn coerce(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|cell| cell.parse::<f64>().ok()).filter(|value| value.is_finite())
}

#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_historical_sales(path: &Path) -> Result<SalesTable> {
    parse_historical_sales(&read_to_string(path)?)
}

#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_battery_capacities(path: &Path) -> Result<BatteryCapacities> {
    parse_battery_capacities(&read_to_string(path)?)
}

#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_superchargers(path: &Path) -> Result<Vec<Supercharger>> {
    parse_superchargers(&read_to_string(path)?)
}

/// Parse the `Year` column plus one unit count column per model.
///
/// Missing or unparsable counts are taken as zero.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_historical_sales(content: &str) -> Result<SalesTable> {
    let mut reader = reader(content);
    let headers = reader.headers().context("failed to read the sales header")?.clone();
    let year_index = find_column(&headers, YEAR)?;
    let columns = headers
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != year_index)
        .map(|(index, model)| (index, model.to_owned()))
        .collect_vec();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to read a sales record")?;
        let year: Year = record
            .get(year_index)
            .with_context(|| format!("missing year in {:?}", record.position()))?
            .parse()
            .with_context(|| format!("invalid year in {:?}", record.position()))?;
        let mut units = BTreeMap::new();
        for (index, model) in &columns {
            let value = coerce(record.get(*index)).unwrap_or_else(|| {
                warn!(year, %model, "missing sales, counting as zero");
                0.0
            });
            ensure!(value >= 0.0, "negative sales of `{model}` in {year}");
            if value.fract() != 0.0 {
                warn!(year, %model, value, "fractional sales, truncating");
            }
            units.insert(model.clone(), value.trunc() as u64);
        }
        rows.push((year, units));
    }

    let models = columns.into_iter().map(|(_, model)| model).collect();
    let table = SalesTable::try_new(models, rows)?;
    info!(
        n_models = table.models().len(),
        n_years = table.rows().len(),
        last_historical_year = table.last_historical_year(),
        "loaded the historical sales",
    );
    Ok(table)
}

/// Parse the `Model` and `Battery Capacity (kWh)` columns.
///
/// Records without a capacity are skipped, so they never override an earlier one.
pub fn parse_battery_capacities(content: &str) -> Result<BatteryCapacities> {
    let mut reader = reader(content);
    let headers = reader.headers().context("failed to read the battery capacity header")?.clone();
    let model_index = find_column(&headers, MODEL)?;
    let capacity_index = find_column(&headers, BATTERY_CAPACITY)?;

    let mut capacities = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to read a battery capacity record")?;
        let Some(model) = record.get(model_index).filter(|model| !model.is_empty()) else {
            warn!(position = ?record.position(), "missing model, skipping");
            continue;
        };
        let Some(capacity) = coerce(record.get(capacity_index)) else {
            warn!(%model, "missing battery capacity, skipping");
            continue;
        };
        ensure!(capacity > 0.0, "non-positive battery capacity of `{model}`: {capacity}");
        capacities.push((model.to_owned(), KilowattHours(capacity)));
    }

    let capacities: BatteryCapacities = capacities.into_iter().collect();
    info!(n_models = capacities.len(), "loaded the battery capacities");
    Ok(capacities)
}

pub fn parse_superchargers(content: &str) -> Result<Vec<Supercharger>> {
    let superchargers: Vec<Supercharger> = reader(content)
        .deserialize::<Supercharger>()
        .try_collect()
        .context("failed to read the supercharger sites")?;
    info!(n_sites = superchargers.len(), "loaded the supercharger sites");
    Ok(superchargers)
}
