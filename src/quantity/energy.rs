quantity!(KilowattHours, f64, "kWh");
quantity!(MegawattHours, f64, "MWh");

impl From<KilowattHours> for MegawattHours {
    fn from(kilowatt_hours: KilowattHours) -> Self {
        Self(kilowatt_hours.0 / 1000.0)
    }
}
