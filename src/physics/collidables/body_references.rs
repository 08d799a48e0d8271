use std::collections::HashMap;

use glam::Vec3;

use crate::physics::handles::BodyHandle;

/// Receives mass center changes of a compound for each body attached to it.
pub trait MassCenterObserver {
    /// `previous_mass_center` is the compound's mass center before the change.
    fn mass_center_changed(&mut self, body: BodyHandle, previous_mass_center: Vec3);
}

impl<F: FnMut(BodyHandle, Vec3)> MassCenterObserver for F {
    #[inline]
    fn mass_center_changed(&mut self, body: BodyHandle, previous_mass_center: Vec3) {
        self(body, previous_mass_center)
    }
}

/// Ordered registry of the bodies attached to a compound.
///
/// Removal leaves a hole that is compacted away once holes outnumber live entries, so both
/// operations are amortized constant time and traversal order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct BodyReferenceList {
    slots: Vec<Option<BodyHandle>>,
    positions: HashMap<BodyHandle, usize>,
}

impl BodyReferenceList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn contains(&self, body: BodyHandle) -> bool {
        self.positions.contains_key(&body)
    }

    /// Attaches `body`. Returns false if it was already attached.
    pub fn add(&mut self, body: BodyHandle) -> bool {
        if self.positions.contains_key(&body) {
            return false;
        }
        self.positions.insert(body, self.slots.len());
        self.slots.push(Some(body));
        true
    }

    /// Detaches `body`. Returns false if it was not attached.
    pub fn remove(&mut self, body: BodyHandle) -> bool {
        let Some(slot) = self.positions.remove(&body) else {
            return false;
        };
        self.slots[slot] = None;
        if self.positions.is_empty() {
            self.slots.clear();
        } else if self.slots.len() > 2 * self.positions.len() {
            self.compact();
        }
        true
    }

    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        for (slot, body) in self.slots.iter().enumerate() {
            if let Some(body) = body {
                self.positions.insert(*body, slot);
            }
        }
    }

    /// Attached bodies in attachment order.
    pub fn iter(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.slots.iter().flatten().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_preserved_across_removal() {
        let mut list = BodyReferenceList::new();
        for i in 0..6 {
            assert!(list.add(BodyHandle(i)));
        }
        assert!(!list.add(BodyHandle(3)));
        assert!(list.remove(BodyHandle(1)));
        assert!(list.remove(BodyHandle(4)));
        assert!(!list.remove(BodyHandle(4)));
        assert!(list.remove(BodyHandle(0)));
        assert!(list.remove(BodyHandle(5)));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![BodyHandle(2), BodyHandle(3)]);

        assert!(list.add(BodyHandle(9)));
        assert!(list.remove(BodyHandle(2)));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![BodyHandle(3), BodyHandle(9)]);
        assert!(list.contains(BodyHandle(9)));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_removing_last_entry_empties_list() {
        let mut list = BodyReferenceList::new();
        list.add(BodyHandle(7));
        assert!(list.remove(BodyHandle(7)));
        assert!(list.is_empty());
        assert_eq!(list.iter().count(), 0);
        assert!(list.add(BodyHandle(7)));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![BodyHandle(7)]);
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        let mut observer = |body: BodyHandle, previous: Vec3| seen.push((body, previous));
        observer.mass_center_changed(BodyHandle(1), Vec3::X);
        assert_eq!(seen, vec![(BodyHandle(1), Vec3::X)]);
    }
}
