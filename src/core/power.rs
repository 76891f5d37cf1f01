use itertools::izip;
use serde::Serialize;

use crate::{
    core::{Estimation, FleetCapacityTable, Year, series::Cumulative},
    prelude::*,
    quantity::power::Megawatts,
};

/// Number of preceding years that still contribute to the retirement cumulative.
pub const RETIREMENT_WINDOW: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[must_use]
pub struct PowerRow {
    pub year: Year,
    pub estimation: Estimation,
    pub power_potential: Megawatts,

    /// Running total of the power potential since the first year.
    pub simple_cumulative: Megawatts,

    /// Power potential plus the last [`RETIREMENT_WINDOW`] years discounted
    /// by the retirement rate raised to their age.
    pub retirement_cumulative: Megawatts,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[must_use]
pub struct PowerTable(Vec<PowerRow>);

impl PowerTable {
    /// Derive the power potential from the fleet capacity, one row per capacity row
    /// in the same ascending order.
    #[instrument(skip_all, fields(retirement_rate = retirement_rate))]
    pub fn from_fleet_capacity(fleet_capacity: &FleetCapacityTable, retirement_rate: f64) -> Self {
        Self::from_potentials(
            fleet_capacity
                .rows()
                .iter()
                .map(|row| (row.year, row.estimation, Megawatts::from(row.total()))),
            retirement_rate,
        )
    }

    fn from_potentials(
        potentials: impl IntoIterator<Item = (Year, Estimation, Megawatts)>,
        retirement_rate: f64,
    ) -> Self {
        let potentials: Vec<_> = potentials.into_iter().collect();
        let power_potentials = || potentials.iter().map(|(_, _, power_potential)| *power_potential);
        let rows = izip!(
            &potentials,
            power_potentials().running_sum(),
            power_potentials().decayed_window_sum(RETIREMENT_WINDOW, retirement_rate),
        )
        .map(|(&(year, estimation, power_potential), simple_cumulative, retirement_cumulative)| {
            PowerRow {
                year,
                estimation,
                power_potential,
                simple_cumulative,
                retirement_cumulative,
            }
        })
        .collect();
        Self(rows)
    }

    pub fn rows(&self) -> &[PowerRow] {
        &self.0
    }
}
