use std::collections::HashMap;
use std::hash::Hash;

/// Insertion-ordered key → accumulator map.
///
/// Groups come back in the order their key was first seen, which is the
/// order the charts and exports present them in.
#[derive(Debug)]
pub struct OrderedGroups<K, A> {
    index: HashMap<K, usize>,
    groups: Vec<(K, A)>,
}

impl<K: Eq + Hash + Copy, A: Default> OrderedGroups<K, A> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    /// Returns the accumulator for `key`, creating it on first sight.
    pub fn entry(&mut self, key: K) -> &mut A {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.groups.len();
                self.index.insert(key, slot);
                self.groups.push((key, A::default()));
                slot
            }
        };
        &mut self.groups[slot].1
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_vec(self) -> Vec<(K, A)> {
        self.groups
    }
}

impl<K: Eq + Hash + Copy, A: Default> Default for OrderedGroups<K, A> {
    fn default() -> Self {
        Self::new()
    }
}
