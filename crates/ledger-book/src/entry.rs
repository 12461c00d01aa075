//! Journal entries.

use crate::item::{Header, Item, ObjectKind};

/// One entry of a journal. Account lines refer to it by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    header: Header,
}

impl Entry {
    pub fn new() -> Self {
        Entry::default()
    }

    pub fn with_name(name: &str) -> Self {
        Entry {
            header: Header::named(name),
        }
    }
}

impl Item for Entry {
    const KIND: ObjectKind = ObjectKind::Entry;

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
    fn test_defaults() {
        let entry = Entry::new();
        assert_eq!(entry.name(), None);
        assert_eq!(entry.description(), None);
        assert_eq!(entry.id(), -1);
    }

    #[test]
    fn test_equality_follows_header() {
        let mut a = Entry::with_name("rent");
        let b = Entry::with_name("rent");
        assert_eq!(a, b);

        a.set_description(Some("march"));
        assert_ne!(a, b);
    }
}
