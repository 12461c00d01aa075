//! # Journal Module
//!
//! A journal is an ordered list of entries.

use tracing::debug;

use crate::entry::Entry;
use crate::error::{BookError, BookResult};
use crate::item::{position_by_id, position_by_name, Header, Item, ObjectKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Journal {
    header: Header,
    entries: Vec<Entry>,
}

impl Journal {
    pub fn new() -> Self {
        Journal::default()
    }

    pub fn with_name(name: &str) -> Self {
        Journal {
            header: Header::named(name),
            entries: Vec::new(),
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.entries.get_mut(index)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Appends an entry and returns its index.
    pub fn add_entry(&mut self, entry: Entry) -> usize {
        self.entries.push(entry);
        let index = self.entries.len() - 1;
        debug!(journal = ?self.name(), index, "Entry added");
        index
    }

    pub fn remove_entry(&mut self, index: usize) -> BookResult<Entry> {
        if index >= self.entries.len() {
            return Err(BookError::IndexOutOfRange {
                kind: ObjectKind::Entry,
                index,
                count: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    pub fn find_entry(&self, name: &str) -> Option<usize> {
        position_by_name(&self.entries, name)
    }

    pub fn find_entry_by_id(&self, id: i64) -> Option<usize> {
        position_by_id(&self.entries, id)
    }
}

impl Item for Journal {
    const KIND: ObjectKind = ObjectKind::Journal;

    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_order() {
        let mut journal = Journal::with_name("general");
        assert_eq!(journal.add_entry(Entry::with_name("open")), 0);
        assert_eq!(journal.add_entry(Entry::new()), 1);
        assert_eq!(journal.add_entry(Entry::with_name("close")), 2);

        assert_eq!(journal.entry_count(), 3);
        assert_eq!(journal.find_entry("close"), Some(2));
        assert_eq!(journal.entry(1).and_then(Entry::name), None);

        let removed = journal.remove_entry(0).unwrap();
        assert_eq!(removed.name(), Some("open"));
        assert_eq!(journal.find_entry("close"), Some(1));
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut journal = Journal::new();
        assert_eq!(
            journal.remove_entry(0),
            Err(BookError::IndexOutOfRange {
                kind: ObjectKind::Entry,
                index: 0,
                count: 0,
            })
        );
    }

    #[test]
    fn test_find_by_id() {
        let mut journal = Journal::new();
        let mut entry = Entry::new();
        entry.set_id(41);
        journal.add_entry(Entry::new());
        journal.add_entry(entry);
        assert_eq!(journal.find_entry_by_id(41), Some(1));
        assert_eq!(journal.find_entry_by_id(7), None);
    }
}
