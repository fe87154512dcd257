use std::collections::HashMap;

use stockmaster_core::Entity;

/// Entity collection keyed by id, iterated in insertion order.
#[derive(Debug, Clone)]
pub struct Collection<V: Entity> {
    items: Vec<V>,
    index: HashMap<V::Id, usize>,
}

impl<V: Entity> Default for Collection<V> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V: Entity> Collection<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by id. A replaced value keeps its position.
    pub fn insert(&mut self, value: V) {
        let id = value.id().clone();
        match self.index.get(&id) {
            Some(&pos) => self.items[pos] = value,
            None => {
                self.index.insert(id, self.items.len());
                self.items.push(value);
            }
        }
    }

    pub fn get(&self, id: &V::Id) -> Option<&V> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    pub fn get_mut(&mut self, id: &V::Id) -> Option<&mut V> {
        match self.index.get(id) {
            Some(&pos) => self.items.get_mut(pos),
            None => None,
        }
    }

    pub fn contains(&self, id: &V::Id) -> bool {
        self.index.contains_key(id)
    }

    pub fn remove(&mut self, id: &V::Id) -> Option<V> {
        let pos = self.index.remove(id)?;
        let value = self.items.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
