quantity!(Percent, f64, "%");

impl Percent {
    pub const fn to_proportion(self) -> f64 {
        0.01 * self.0
    }

    pub const fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}
