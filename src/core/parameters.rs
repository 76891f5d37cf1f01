use bon::Builder;
use serde::Serialize;

use crate::{core::ForecastError, quantity::proportions::Percent};

/// Forecast assumptions. The defaults match the dashboard's initial slider positions.
#[derive(Copy, Clone, Debug, PartialEq, Builder, Serialize)]
#[must_use]
pub struct Parameters {
    /// Annual sales growth, compounded year over year. May be negative.
    #[builder(default = Percent(10.0))]
    pub growth_rate: Percent,

    /// Per-year fleet attrition factor in `(0, 1]`.
    #[builder(default = 0.95)]
    pub retirement_rate: f64,

    /// Number of years to extrapolate past the last historical year.
    #[builder(default = 10)]
    pub years_to_forecast: u16,
}

impl Default for Parameters {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Parameters {
    pub fn validate(&self) -> Result<(), ForecastError> {
        if !self.growth_rate.is_finite() {
            return Err(ForecastError::InvalidRate(self.growth_rate.0));
        }
        if self.retirement_rate.is_nan()
            || self.retirement_rate <= 0.0
            || self.retirement_rate > 1.0
        {
            return Err(ForecastError::InvalidRate(self.retirement_rate));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(Parameters::default().validate(), Ok(()));
    }

    #[test]
    fn test_retirement_rate_bounds() {
        for retirement_rate in [0.0, -0.5, 1.01, f64::INFINITY] {
            let parameters = Parameters::builder().retirement_rate(retirement_rate).build();
            assert_eq!(parameters.validate(), Err(ForecastError::InvalidRate(retirement_rate)));
        }
        assert_eq!(Parameters::builder().retirement_rate(1.0).build().validate(), Ok(()));
        assert_eq!(Parameters::builder().retirement_rate(1e-6).build().validate(), Ok(()));
    }

    #[test]
    fn test_nan_retirement_rate() {
        let parameters = Parameters::builder().retirement_rate(f64::NAN).build();
        assert!(matches!(parameters.validate(), Err(ForecastError::InvalidRate(_))));
    }

    #[test]
    fn test_any_finite_growth_rate() {
        for growth_rate in [-1000.0, -100.0, 0.0, 30.0, 1e6] {
            let parameters = Parameters::builder().growth_rate(Percent(growth_rate)).build();
            assert_eq!(parameters.validate(), Ok(()));
        }
        let parameters = Parameters::builder().growth_rate(Percent(f64::NAN)).build();
        assert!(matches!(parameters.validate(), Err(ForecastError::InvalidRate(_))));
    }
}
