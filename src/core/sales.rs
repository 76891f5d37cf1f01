use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use crate::{
    core::{Estimation, ForecastError, Year},
    prelude::*,
    quantity::proportions::Percent,
};

/// Vehicle sales of a single year, by model.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[must_use]
pub struct SalesRow {
    pub year: Year,
    pub estimation: Estimation,
    pub units: BTreeMap<String, u64>,
}

impl SalesRow {
    /// Units sold of the model, zero if the model is absent from the row.
    pub fn units_of(&self, model: &str) -> u64 {
        self.units.get(model).copied().unwrap_or_default()
    }
}

/// Annual sales table: one row per year in ascending order, one column per model.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[must_use]
pub struct SalesTable {
    /// Model columns in the input order.
    models: Vec<String>,

    last_historical_year: Year,

    rows: Vec<SalesRow>,
}

impl SalesTable {
    /// Build the historical table. Rows are sorted by year, and all of them are actual.
    pub fn try_new(
        models: Vec<String>,
        rows: impl IntoIterator<Item = (Year, BTreeMap<String, u64>)>,
    ) -> Result<Self, ForecastError> {
        if models.is_empty() {
            return Err(ForecastError::MissingColumn("model".to_owned()));
        }
        if let Some(model) = models.iter().duplicates().next() {
            return Err(ForecastError::DuplicateModel(model.clone()));
        }
        let rows = rows.into_iter().sorted_unstable_by_key(|(year, _)| *year).collect_vec();
        if let Some(((year, _), _)) = rows.iter().tuple_windows().find(|(lhs, rhs)| lhs.0 == rhs.0)
        {
            return Err(ForecastError::DuplicateYear(*year));
        }
        let Some((last_historical_year, _)) = rows.last() else {
            return Err(ForecastError::EmptyInput);
        };
        let last_historical_year = *last_historical_year;
        let rows = rows
            .into_iter()
            .map(|(year, units)| SalesRow { year, estimation: Estimation::Actual, units })
            .collect();
        Ok(Self { models, last_historical_year, rows })
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn rows(&self) -> &[SalesRow] {
        &self.rows
    }

    pub const fn last_historical_year(&self) -> Year {
        self.last_historical_year
    }

    /// Reshape into `(year, model, units)` triples.
    pub fn melt(&self) -> impl Iterator<Item = (Year, &str, u64)> {
        self.rows.iter().flat_map(|row| {
            self.models.iter().map(move |model| (row.year, model.as_str(), row.units_of(model)))
        })
    }

    /// Extend the table by `n_years` forecast years.
    ///
    /// Every model starts from its sales in the last year present and compounds
    /// the growth rate independently. Sales are floored at zero every year,
    /// so a model that reaches zero stays there.
    #[instrument(skip_all, fields(growth_rate = %growth_rate, n_years = n_years))]
    #[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
    pub fn extrapolate(&self, growth_rate: Percent, n_years: u16) -> Result<Self, ForecastError> {
        if !growth_rate.is_finite() {
            return Err(ForecastError::InvalidRate(growth_rate.0));
        }
        if self.models.is_empty() {
            return Err(ForecastError::MissingColumn("model".to_owned()));
        }
        let Some(last_row) = self.rows.last() else {
            return Err(ForecastError::EmptyInput);
        };

        let factor = 1.0 + growth_rate.to_proportion();
        let mut running_units: BTreeMap<&str, f64> = self
            .models
            .iter()
            .map(|model| (model.as_str(), last_row.units_of(model) as f64))
            .collect();

        let mut rows = self.rows.clone();
        rows.reserve(usize::from(n_years));
        for year in (1..=Year::from(n_years)).map(|offset| last_row.year + offset) {
            let units = running_units
                .iter_mut()
                .map(|(model, running)| {
                    *running = (*running * factor).max(0.0);
                    ((*model).to_owned(), running.trunc() as u64)
                })
                .collect();
            rows.push(SalesRow {
                year,
                estimation: Estimation::of(year, self.last_historical_year),
                units,
            });
        }
        debug!(n_rows = rows.len(), "extrapolated");

        Ok(Self {
            models: self.models.clone(),
            last_historical_year: self.last_historical_year,
            rows,
        })
    }
}
