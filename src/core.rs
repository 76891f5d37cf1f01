mod battery;
mod error;
mod estimation;
mod fleet;
mod forecast;
mod parameters;
mod power;
mod sales;
mod series;

pub use self::{
    battery::BatteryCapacities,
    error::ForecastError,
    estimation::Estimation,
    fleet::FleetCapacityTable,
    forecast::Forecast,
    parameters::Parameters,
    power::PowerTable,
    sales::SalesTable,
};

pub type Year = i32;
