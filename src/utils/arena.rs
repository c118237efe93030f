use std::ops::{Index, IndexMut};

pub type NodeId = usize;

// Slab of owned values addressed by `NodeId`. Released slots go on a free
// list and are handed out again by the next `allocate`.
pub struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<NodeId>,
    usage: usize,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
            usage: 0,
        }
    }

    pub fn allocate(&mut self, value: T) -> NodeId {
        self.usage += 1;
        if let Some(id) = self.free.pop() {
            self.slots[id] = Some(value);
            id
        } else {
            self.slots.push(Some(value));
            self.slots.len() - 1
        }
    }

    pub fn release(&mut self, id: NodeId) -> Option<T> {
        let value = self.slots.get_mut(id)?.take()?;
        self.free.push(id);
        self.usage -= 1;
        Some(value)
    }

    #[cfg(test)]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id)?.as_ref()
    }

    pub fn memory_usage(&self) -> usize {
        self.usage
    }

    #[cfg(test)]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.usage = 0;
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        match self.slots.get(id) {
            Some(Some(value)) => value,
            _ => panic!("arena slot {} is not allocated", id),
        }
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match self.slots.get_mut(id) {
            Some(Some(value)) => value,
            _ => panic!("arena slot {} is not allocated", id),
        }
    }
}
