use serde::Serialize;

use crate::{
    core::{
        BatteryCapacities,
        FleetCapacityTable,
        ForecastError,
        Parameters,
        PowerTable,
        SalesTable,
        Year,
    },
    prelude::*,
};

/// All the computed tables for one set of parameters.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[must_use]
pub struct Forecast {
    pub parameters: Parameters,
    pub last_historical_year: Year,
    pub sales: SalesTable,
    pub fleet_capacity: FleetCapacityTable,
    pub power: PowerTable,
}

impl Forecast {
    /// Run the whole pipeline from scratch.
    #[instrument(skip_all, fields(n_models = historical_sales.models().len()))]
    pub fn try_compute(
        historical_sales: &SalesTable,
        batteries: &BatteryCapacities,
        parameters: Parameters,
    ) -> Result<Self, ForecastError> {
        parameters.validate()?;
        let sales =
            historical_sales.extrapolate(parameters.growth_rate, parameters.years_to_forecast)?;
        let fleet_capacity = FleetCapacityTable::try_aggregate(&sales, batteries, &parameters)?;
        let power = PowerTable::from_fleet_capacity(&fleet_capacity, parameters.retirement_rate);
        if let Some(last) = power.rows().last() {
            info!(
                year = last.year,
                power_potential = %last.power_potential,
                simple_cumulative = %last.simple_cumulative,
                retirement_cumulative = %last.retirement_cumulative,
                "computed the forecast",
            );
        }
        Ok(Self {
            parameters,
            last_historical_year: sales.last_historical_year(),
            sales,
            fleet_capacity,
            power,
        })
    }
}
