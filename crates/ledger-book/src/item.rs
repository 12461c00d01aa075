//! # Item Module
//!
//! Identity shared by every container: an optional name, an optional
//! description and a numeric id (`-1` when unassigned).
//!
//! ## Labels
//! ```text
//! name set         →  account:Cash
//! else id >= 0     →  account#80
//! else             →  account@2      (position in the parent)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BookError;

/// Id carried by objects that were never assigned one.
pub const NO_ID: i64 = -1;

// =============================================================================
// Object Kind
// =============================================================================

/// The kinds of object that can appear in a path below the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Ledger,
    Account,
    Journal,
    Entry,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Ledger => write!(f, "ledger"),
            ObjectKind::Account => write!(f, "account"),
            ObjectKind::Journal => write!(f, "journal"),
            ObjectKind::Entry => write!(f, "entry"),
        }
    }
}

impl FromStr for ObjectKind {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ledger" => Ok(ObjectKind::Ledger),
            "account" => Ok(ObjectKind::Account),
            "journal" => Ok(ObjectKind::Journal),
            "entry" => Ok(ObjectKind::Entry),
            other => Err(BookError::InvalidSegment(other.to_string())),
        }
    }
}

// =============================================================================
// Header
// =============================================================================

/// Name, description and id of one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: Option<String>,
    pub description: Option<String>,
    pub id: i64,
}

impl Default for Header {
    fn default() -> Self {
        Header {
            name: None,
            description: None,
            id: NO_ID,
        }
    }
}

impl Header {
    pub fn named(name: &str) -> Self {
        Header {
            name: Some(name.to_string()),
            ..Header::default()
        }
    }
}

// =============================================================================
// Item Trait
// =============================================================================

/// Accessors common to ledgers, accounts, journals and entries.
pub trait Item {
    const KIND: ObjectKind;

    fn header(&self) -> &Header;

    fn header_mut(&mut self) -> &mut Header;

    fn name(&self) -> Option<&str> {
        self.header().name.as_deref()
    }

    /// Sets or (with `None`) clears the name.
    fn set_name(&mut self, name: Option<&str>) {
        self.header_mut().name = name.map(str::to_string);
    }

    fn description(&self) -> Option<&str> {
        self.header().description.as_deref()
    }

    /// Sets or (with `None`) clears the description.
    fn set_description(&mut self, description: Option<&str>) {
        self.header_mut().description = description.map(str::to_string);
    }

    fn id(&self) -> i64 {
        self.header().id
    }

    fn set_id(&mut self, id: i64) {
        self.header_mut().id = id;
    }

    /// Path segment naming this item at `index` within its parent.
    fn label(&self, index: usize) -> String {
        match (self.name(), self.id()) {
            (Some(name), _) => format!("{}:{}", Self::KIND, name),
            (None, id) if id >= 0 => format!("{}#{}", Self::KIND, id),
            _ => format!("{}@{}", Self::KIND, index),
        }
    }
}

/// Position of the first item called `name`.
pub fn position_by_name<T: Item>(items: &[T], name: &str) -> Option<usize> {
    items.iter().position(|item| item.name() == Some(name))
}

/// Position of the first item with id `id`.
pub fn position_by_id<T: Item>(items: &[T], id: i64) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Entry;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            ObjectKind::Ledger,
            ObjectKind::Account,
            ObjectKind::Journal,
            ObjectKind::Entry,
        ] {
            assert_eq!(kind.to_string().parse::<ObjectKind>().unwrap(), kind);
        }
        assert!("book".parse::<ObjectKind>().is_err());
    }

    #[test]
    fn test_label_precedence() {
        let mut entry = Entry::new();
        assert_eq!(entry.label(3), "entry@3");

        entry.set_id(12);
        assert_eq!(entry.label(3), "entry#12");

        entry.set_name(Some("rent"));
        assert_eq!(entry.label(3), "entry:rent");

        entry.set_name(None);
        assert_eq!(entry.label(3), "entry#12");
    }

    #[test]
    fn test_lookup_helpers() {
        let mut first = Entry::new();
        first.set_id(5);
        let second = Entry::with_name("payroll");
        let entries = vec![first, second];

        assert_eq!(position_by_id(&entries, 5), Some(0));
        assert_eq!(position_by_id(&entries, NO_ID), Some(1));
        assert_eq!(position_by_name(&entries, "payroll"), Some(1));
        assert_eq!(position_by_name(&entries, "missing"), None);
    }
}
