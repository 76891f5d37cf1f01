use std::collections::BTreeMap;

use crate::quantity::energy::KilowattHours;

/// Battery capacity reference by model.
///
/// Only the latest record per model is kept: collecting from an iterator
/// lets later records override earlier ones.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct BatteryCapacities(BTreeMap<String, KilowattHours>);

impl BatteryCapacities {
    pub fn get(&self, model: &str) -> Option<KilowattHours> {
        self.0.get(model).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, KilowattHours)> for BatteryCapacities {
    fn from_iter<T: IntoIterator<Item = (String, KilowattHours)>>(iterator: T) -> Self {
        Self(iterator.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_capacity_wins() {
        let capacities: BatteryCapacities = [
            ("Model S".to_owned(), KilowattHours(85.0)),
            ("Model 3".to_owned(), KilowattHours(50.0)),
            ("Model S".to_owned(), KilowattHours(100.0)),
        ]
        .into_iter()
        .collect();
        assert_eq!(capacities.len(), 2);
        assert_eq!(capacities.get("Model S"), Some(KilowattHours(100.0)));
        assert_eq!(capacities.get("Model 3"), Some(KilowattHours(50.0)));
        assert_eq!(capacities.get("Cybertruck"), None);
    }
}
