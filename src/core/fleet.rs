use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::{
    core::{BatteryCapacities, Estimation, ForecastError, Parameters, SalesTable, Year},
    prelude::*,
    quantity::energy::MegawattHours,
};

type Capacities = BTreeMap<String, MegawattHours>;

/// Fleet battery capacity of a single year, by model.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct FleetCapacityRow {
    pub year: Year,
    pub estimation: Estimation,
    pub capacities: Capacities,
}

impl FleetCapacityRow {
    /// Sum across the models, recomputed on every call.
    pub fn total(&self) -> MegawattHours {
        self.capacities.values().copied().sum()
    }
}

impl Serialize for FleetCapacityRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FleetCapacityRow", 4)?;
        state.serialize_field("year", &self.year)?;
        state.serialize_field("estimation", &self.estimation)?;
        state.serialize_field("capacities", &self.capacities)?;
        state.serialize_field("total", &self.total())?;
        state.end()
    }
}

/// Fleet capacity table spanning every year from the first sales year
/// to the end of the forecast horizon.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[must_use]
pub struct FleetCapacityTable {
    models: Vec<String>,
    rows: Vec<FleetCapacityRow>,
}

impl FleetCapacityTable {
    /// Join the sales with the battery capacities and aggregate per year.
    ///
    /// Years missing from the sales are carried forward from the previous year,
    /// grown by the growth rate and discounted by the retirement rate raised to
    /// the number of years since the first sales year.
    #[instrument(
        skip_all,
        fields(
            growth_rate = %parameters.growth_rate,
            retirement_rate = parameters.retirement_rate,
            years_to_forecast = parameters.years_to_forecast,
        ),
    )]
    pub fn try_aggregate(
        sales: &SalesTable,
        batteries: &BatteryCapacities,
        parameters: &Parameters,
    ) -> Result<Self, ForecastError> {
        parameters.validate()?;
        if sales.models().is_empty() {
            return Err(ForecastError::MissingColumn("model".to_owned()));
        }
        let Some(first_year) = sales.rows().first().map(|row| row.year) else {
            return Err(ForecastError::EmptyInput);
        };
        let last_historical_year = sales.last_historical_year();
        let last_year = last_historical_year + Year::from(parameters.years_to_forecast);

        let models = sales.models().iter().cloned().sorted().dedup().collect_vec();
        let mut pivot = Self::pivot(sales, batteries);
        let growth = 1.0 + parameters.growth_rate.to_proportion();

        let initial: Capacities =
            models.iter().map(|model| (model.clone(), MegawattHours::ZERO)).collect();
        let rows = (first_year..=last_year)
            .scan(initial, |previous, year| {
                let capacities = if let Some(capacities) = pivot.remove(&year) {
                    capacities
                } else {
                    let decay = parameters.retirement_rate.powi(year - first_year);
                    debug!(year, decay, "filling in the missing year…");
                    previous
                        .iter()
                        .map(|(model, capacity)| (model.clone(), *capacity * growth * decay))
                        .collect()
                };
                previous.clone_from(&capacities);
                Some(FleetCapacityRow {
                    year,
                    estimation: Estimation::of(year, last_historical_year),
                    capacities,
                })
            })
            .collect_vec();

        info!(n_rows = rows.len(), first_year, last_year, "aggregated the fleet capacity");
        Ok(Self { models, rows })
    }

    /// Capacity per year and model in megawatt-hours.
    ///
    /// Models without a battery capacity contribute zero.
    #[expect(clippy::cast_precision_loss)]
    fn pivot(sales: &SalesTable, batteries: &BatteryCapacities) -> BTreeMap<Year, Capacities> {
        let batteries: BTreeMap<&str, _> = sales
            .models()
            .iter()
            .map(|model| {
                let capacity = batteries.get(model);
                if capacity.is_none() {
                    warn!(%model, "unknown battery capacity, counting the model as zero");
                }
                (model.as_str(), capacity)
            })
            .collect();

        let mut pivot = BTreeMap::<Year, Capacities>::new();
        for (year, model, units) in sales.melt() {
            let capacity = batteries
                .get(model)
                .copied()
                .flatten()
                .map_or(MegawattHours::ZERO, |battery| MegawattHours::from(battery * units as f64));
            *pivot.entry(year).or_default().entry(model.to_owned()).or_default() += capacity;
        }
        pivot
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn rows(&self) -> &[FleetCapacityRow] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{
        core::sales::tests::sales_table,
        quantity::{energy::KilowattHours, proportions::Percent},
    };

    fn batteries(capacities: &[(&str, f64)]) -> BatteryCapacities {
        capacities
            .iter()
            .map(|(model, capacity)| ((*model).to_owned(), KilowattHours(*capacity)))
            .collect()
    }

    fn parameters(growth_rate: f64, retirement_rate: f64, years_to_forecast: u16) -> Parameters {
        Parameters::builder()
            .growth_rate(Percent(growth_rate))
            .retirement_rate(retirement_rate)
            .years_to_forecast(years_to_forecast)
            .build()
    }

    #[test]
    fn test_capacity_per_model() {
        let sales = sales_table(&[(2021, &[("ModelX", 100)]), (2022, &[("ModelX", 120)])])
            .extrapolate(Percent(0.0), 1)
            .unwrap();
        let fleet = FleetCapacityTable::try_aggregate(
            &sales,
            &batteries(&[("ModelX", 50.0)]),
            &parameters(0.0, 0.95, 1),
        )
        .unwrap();
        assert_eq!(fleet.rows().len(), 3);
        assert_abs_diff_eq!(fleet.rows()[0].total().0, 5.0);
        assert_abs_diff_eq!(fleet.rows()[2].total().0, 6.0);
        assert_eq!(fleet.rows()[2].year, 2023);
        assert_eq!(fleet.rows()[2].estimation, Estimation::Forecast);
    }

    #[test]
    fn test_unknown_model_contributes_zero() {
        let sales = sales_table(&[(2021, &[("ModelX", 100), ("Roadster", 500)])]);
        let fleet = FleetCapacityTable::try_aggregate(
            &sales,
            &batteries(&[("ModelX", 50.0)]),
            &parameters(10.0, 0.9, 3),
        )
        .unwrap();
        assert_eq!(fleet.models(), ["ModelX", "Roadster"]);
        for row in fleet.rows() {
            assert_eq!(row.capacities["Roadster"], MegawattHours::ZERO);
        }
        assert_abs_diff_eq!(fleet.rows()[0].total().0, 5.0);
    }

    #[test]
    fn test_total_is_sum_of_models() {
        let sales = sales_table(&[
            (2019, &[("A", 10), ("B", 1_000), ("C", 3)]),
            (2020, &[("A", 20), ("B", 900), ("C", 7)]),
        ])
        .extrapolate(Percent(12.5), 5)
        .unwrap();
        let fleet = FleetCapacityTable::try_aggregate(
            &sales,
            &batteries(&[("A", 75.0), ("B", 57.5), ("C", 100.0)]),
            &parameters(12.5, 0.95, 5),
        )
        .unwrap();
        for row in fleet.rows() {
            let sum: f64 = row.capacities.values().map(|capacity| capacity.0).sum();
            assert_abs_diff_eq!(row.total().0, sum);
        }
    }

    #[test]
    fn test_dense_years() {
        let sales = sales_table(&[(2018, &[("A", 1)]), (2019, &[("A", 2)])]);
        for years_to_forecast in [0, 1, 7] {
            let extended = sales.extrapolate(Percent(3.0), years_to_forecast).unwrap();
            let fleet = FleetCapacityTable::try_aggregate(
                &extended,
                &batteries(&[("A", 60.0)]),
                &parameters(3.0, 0.95, years_to_forecast),
            )
            .unwrap();
            let years = fleet.rows().iter().map(|row| row.year).collect_vec();
            assert_eq!(years, (2018..=2019 + Year::from(years_to_forecast)).collect_vec());
        }
    }

    #[test]
    fn test_gap_fill_from_previous_year() {
        // 2020 is missing from the sales:
        let sales = sales_table(&[(2019, &[("A", 100)]), (2021, &[("A", 300)])]);
        let fleet = FleetCapacityTable::try_aggregate(
            &sales,
            &batteries(&[("A", 50.0)]),
            &parameters(10.0, 0.9, 0),
        )
        .unwrap();
        assert_eq!(fleet.rows().len(), 3);
        assert_abs_diff_eq!(fleet.rows()[0].total().0, 5.0);
        assert_abs_diff_eq!(fleet.rows()[1].total().0, 5.0 * 1.1 * 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(fleet.rows()[2].total().0, 15.0);
    }

    #[test]
    fn test_consecutive_gaps_compound() {
        // Un-extrapolated sales, but two forecast years requested:
        let sales = sales_table(&[(2020, &[("A", 1_000)])]);
        let fleet = FleetCapacityTable::try_aggregate(
            &sales,
            &batteries(&[("A", 10.0)]),
            &parameters(0.0, 0.5, 2),
        )
        .unwrap();
        let totals = fleet.rows().iter().map(|row| row.total().0).collect_vec();
        assert_abs_diff_eq!(totals[0], 10.0);
        assert_abs_diff_eq!(totals[1], 10.0 * 0.5);
        assert_abs_diff_eq!(totals[2], 10.0 * 0.5 * 0.25);
        assert_eq!(fleet.rows()[2].estimation, Estimation::Forecast);
    }

    #[test]
    fn test_sales_beyond_the_horizon_are_dropped() {
        let sales = sales_table(&[(2020, &[("A", 10)])]).extrapolate(Percent(0.0), 5).unwrap();
        let fleet = FleetCapacityTable::try_aggregate(
            &sales,
            &batteries(&[("A", 10.0)]),
            &parameters(0.0, 0.9, 2),
        )
        .unwrap();
        assert_eq!(fleet.rows().last().unwrap().year, 2022);
    }

    #[test]
    fn test_invalid_retirement_rate() {
        let sales = sales_table(&[(2020, &[("A", 10)])]);
        let result = FleetCapacityTable::try_aggregate(
            &sales,
            &batteries(&[("A", 10.0)]),
            &parameters(0.0, 1.5, 2),
        );
        assert_eq!(result, Err(ForecastError::InvalidRate(1.5)));
    }

    #[test]
    fn test_serialize_total() {
        let row = FleetCapacityRow {
            year: 2030,
            estimation: Estimation::Forecast,
            capacities: [("A".to_owned(), MegawattHours(1.5)), ("B".to_owned(), MegawattHours(2.0))]
                .into_iter()
                .collect(),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["total"], 3.5);
        assert_eq!(value["estimation"], "forecast");
        assert_eq!(value["capacities"]["B"], 2.0);
    }
}
