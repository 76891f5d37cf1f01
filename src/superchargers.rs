use std::cmp::Reverse;

use itertools::Itertools;
use serde::Deserialize;

use crate::quantity::{energy::MegawattHours, power::Kilowatts, time::Hours};

/// Average power drawn by a stall while in use, regardless of its rating.
const AVERAGE_STALL_POWER: Kilowatts = Kilowatts(50.0);

const DAILY_HOURS_IN_USE: f64 = 8.0;
const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Clone, Debug, Deserialize)]
#[must_use]
pub struct Supercharger {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Lat")]
    pub latitude: f64,

    #[serde(rename = "Lon")]
    pub longitude: f64,

    #[serde(rename = "Stalls")]
    pub n_stalls: u32,

    /// Rated power per stall.
    #[serde(rename = "Power")]
    pub power: Kilowatts,

    #[serde(rename = "Status")]
    pub status: String,
}

impl Supercharger {
    pub fn annual_consumption(&self) -> MegawattHours {
        let hours_in_use = Hours(f64::from(self.n_stalls) * DAILY_HOURS_IN_USE * DAYS_PER_YEAR);
        MegawattHours::from(AVERAGE_STALL_POWER * hours_in_use)
    }
}

/// Sort the sites by their annual consumption, the largest first.
pub fn rank_by_consumption(sites: impl IntoIterator<Item = Supercharger>) -> Vec<Supercharger> {
    sites.into_iter().sorted_by_cached_key(|site| Reverse(site.annual_consumption())).collect()
}
