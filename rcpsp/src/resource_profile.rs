/// Remaining capacity of every renewable resource per unit time slot.
///
/// Slots past the allocated length are implicitly at full capacity; reserving
/// beyond the current length extends the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceProfile {
    capacities: Vec<usize>,
    remaining_resource_capacity: Vec<Vec<usize>>,
}

impl ResourceProfile {
    pub fn new(capacities: &[usize], makespan_upper_bound: usize) -> Self {
        let remaining_resource_capacity = capacities
            .iter()
            .map(|&capacity| vec![capacity; makespan_upper_bound])
            .collect();

        Self {
            capacities: capacities.to_vec(),
            remaining_resource_capacity,
        }
    }

    /// Number of allocated time slots
    pub fn len(&self) -> usize {
        self.remaining_resource_capacity
            .first()
            .map_or(0, |slots| slots.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remaining(&self, resource_id: usize, t: usize) -> usize {
        self.remaining_resource_capacity[resource_id]
            .get(t)
            .copied()
            .unwrap_or(self.capacities[resource_id])
    }

    /// Whether `demands` can be held during `[start, start + duration)` without overload.
    pub fn fits(&self, start: usize, duration: usize, demands: &[usize]) -> bool {
        demands
            .iter()
            .enumerate()
            .filter(|&(_, &demand)| demand > 0)
            .all(|(resource_id, &demand)| {
                (start..start + duration).all(|t| self.remaining(resource_id, t) >= demand)
            })
    }

    /// Deducts `demands` from every slot in `[activity_start, activity_stop)`.
    pub fn reserve(&mut self, activity_start: usize, activity_stop: usize, demands: &[usize]) {
        if activity_stop > self.len() {
            for (slots, &capacity) in self
                .remaining_resource_capacity
                .iter_mut()
                .zip(&self.capacities)
            {
                slots.resize(activity_stop, capacity);
            }
        }

        for (slots, &demand) in self.remaining_resource_capacity.iter_mut().zip(demands) {
            for remaining in &mut slots[activity_start..activity_stop] {
                debug_assert!(*remaining >= demand, "resource overload");
                *remaining -= demand;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ResourceProfile;

    #[test]
    fn reserve_deducts_over_window() {
        let mut profile = ResourceProfile::new(&[3, 2], 5);

        profile.reserve(1, 3, &[2, 1]);

        assert_eq!(profile.remaining(0, 0), 3);
        assert_eq!(profile.remaining(0, 1), 1);
        assert_eq!(profile.remaining(0, 2), 1);
        assert_eq!(profile.remaining(0, 3), 3);
        assert_eq!(profile.remaining(1, 2), 1);
    }

    #[test]
    fn fits_checks_every_slot_and_resource() {
        let mut profile = ResourceProfile::new(&[3, 2], 5);
        profile.reserve(2, 4, &[0, 2]);

        assert!(profile.fits(0, 2, &[3, 2]));
        assert!(!profile.fits(1, 2, &[0, 1]));
        assert!(profile.fits(1, 2, &[3, 0]));
        assert!(profile.fits(4, 1, &[3, 2]));
        // zero-length windows never conflict
        assert!(profile.fits(2, 0, &[3, 2]));
    }

    #[test]
    fn grows_past_initial_length() {
        let mut profile = ResourceProfile::new(&[1], 2);

        assert!(profile.fits(1, 4, &[1]));
        profile.reserve(1, 5, &[1]);

        assert_eq!(profile.len(), 5);
        assert_eq!(profile.remaining(0, 4), 0);
        assert_eq!(profile.remaining(0, 5), 1);
        assert!(!profile.fits(3, 1, &[1]));
    }
}
