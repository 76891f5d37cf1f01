use serde::Serialize;

use crate::core::Year;

/// Whether a table row is ground truth or derived by the forecast.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Estimation {
    Actual,
    Forecast,
}

impl Estimation {
    pub const fn of(year: Year, last_historical_year: Year) -> Self {
        if year > last_historical_year { Self::Forecast } else { Self::Actual }
    }

    pub const fn is_forecast(self) -> bool {
        matches!(self, Self::Forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of() {
        assert_eq!(Estimation::of(2022, 2022), Estimation::Actual);
        assert_eq!(Estimation::of(2021, 2022), Estimation::Actual);
        assert_eq!(Estimation::of(2023, 2022), Estimation::Forecast);
    }
}
