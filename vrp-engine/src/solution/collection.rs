#[cfg(test)]
#[path = "../../tests/unit/solution/collection_test.rs"]
mod collection_test;

use crate::utils::Random;
use nohash_hasher::IntMap;

/// A set of plan unit indices with constant time insertion, removal, membership and random
/// access. Insertion and removal are idempotent.
#[derive(Clone, Debug, Default)]
pub struct PlanUnitCollection {
    units: Vec<usize>,
    indices: IntMap<usize, usize>,
}

impl PlanUnitCollection {
    /// Returns amount of plan units in the collection.
    pub fn size(&self) -> usize {
        self.units.len()
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Returns true if the plan unit is in the collection.
    pub fn contains(&self, unit: usize) -> bool {
        self.indices.contains_key(&unit)
    }

    /// Iterates over plan units in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.units.iter().copied()
    }

    /// Returns a random plan unit.
    pub fn random_element(&self, random: &(dyn Random + Send + Sync)) -> Option<usize> {
        if self.units.is_empty() {
            return None;
        }

        Some(self.units[random.uniform_int(0, self.units.len() as i32 - 1) as usize])
    }

    /// Returns up to `amount` distinct random plan units.
    pub fn random_draw(&self, random: &(dyn Random + Send + Sync), amount: usize) -> Vec<usize> {
        let mut units = self.units.clone();
        let amount = amount.min(units.len());

        // partial Fisher-Yates: the first `amount` elements are the sample
        for i in 0..amount {
            let j = random.uniform_int(i as i32, units.len() as i32 - 1) as usize;
            units.swap(i, j);
        }
        units.truncate(amount);

        units
    }

    pub(crate) fn add(&mut self, unit: usize) {
        if self.indices.contains_key(&unit) {
            return;
        }

        self.indices.insert(unit, self.units.len());
        self.units.push(unit);
    }

    pub(crate) fn remove(&mut self, unit: usize) {
        let Some(idx) = self.indices.remove(&unit) else { return };

        self.units.swap_remove(idx);
        if let Some(&moved) = self.units.get(idx) {
            self.indices.insert(moved, idx);
        }
    }
}

impl PartialEq for PlanUnitCollection {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size() && self.iter().all(|unit| other.contains(unit))
    }
}
