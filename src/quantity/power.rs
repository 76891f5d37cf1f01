use std::ops::Mul;

use crate::quantity::{
    energy::{KilowattHours, MegawattHours},
    time::Hours,
};

quantity!(Kilowatts, f64, "kW");
quantity!(Megawatts, f64, "MW");

impl Mul<Hours> for Kilowatts {
    type Output = KilowattHours;

    fn mul(self, hours: Hours) -> Self::Output {
        KilowattHours(self.0 * hours.0)
    }
}

impl From<MegawattHours> for Megawatts {
    /// Reinterpret a year's fleet energy capacity as its power market contribution.
    fn from(capacity: MegawattHours) -> Self {
        Self(capacity.0)
    }
}
