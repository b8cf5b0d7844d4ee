//! Capacity-bounded reverse index lists

use crate::error::{Error, IndexKind, Result};

/// Default capacity of both reverse indexes
pub const DEFAULT_INDEX_CAPACITY: usize = 20;

/// An append-only list of child IDs under a parent key
///
/// Built from whatever the store currently holds for the key (nothing
/// yields an empty list), then extended by one ID per creation. The
/// capacity is enforced on append; a full list rejects the push and is left
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedList<T> {
    kind: IndexKind,
    capacity: usize,
    items: Vec<T>,
}

impl<T> BoundedList<T> {
    /// Start from the stored list for a key, or an empty one if absent
    pub fn get_or_default(kind: IndexKind, capacity: usize, existing: Option<Vec<T>>) -> Self {
        Self {
            kind,
            capacity,
            items: existing.unwrap_or_default(),
        }
    }

    /// Check that one more item would fit
    pub fn ensure_room(&self) -> Result<()> {
        if self.items.len() >= self.capacity {
            return Err(Error::IndexCapacityExceeded {
                index: self.kind,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Append an item at the end of the list
    pub fn push(&mut self, item: T) -> Result<()> {
        self.ensure_room()?;
        self.items.push(item);
        Ok(())
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consume into the stored representation
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_key_starts_empty() {
        let mut list: BoundedList<u64> =
            BoundedList::get_or_default(IndexKind::GameCollections, 3, None);
        assert!(list.is_empty());
        list.push(1).unwrap();
        assert_eq!(list.as_slice(), &[1]);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut list =
            BoundedList::get_or_default(IndexKind::CollectionGameRules, 5, Some(vec![4u64, 2]));
        list.push(9).unwrap();
        assert_eq!(list.into_vec(), vec![4, 2, 9]);
    }

    #[test]
    fn test_full_list_rejects_push() {
        let mut list =
            BoundedList::get_or_default(IndexKind::GameCollections, 2, Some(vec![1u64, 2]));
        let err = list.push(3).unwrap_err();
        assert!(matches!(
            err,
            Error::IndexCapacityExceeded {
                index: IndexKind::GameCollections,
                capacity: 2
            }
        ));
        assert_eq!(list.len(), 2);
    }
}
