//! # Object Paths
//!
//! Positional addresses of objects inside a [`Book`], and the resolver that
//! turns navigator text into them.
//!
//! ## Grammar
//! ```text
//! path     := ['/'] segment ('/' segment)*
//! segment  := '.' | '..' | kind ':' NAME | kind '#' ID | kind '@' INDEX
//! kind     := 'ledger' | 'account' | 'journal' | 'entry'
//!
//! /                       → Book
//! ├── ledger:Main         → Ledger(0)
//! │   └── account#80      → Account(0, 1)
//! └── journal@1           → Journal(1)
//!     └── entry:rent      → Entry(1, 0)
//! ```
//!
//! Paths without a leading `/` start from the current object. Empty
//! segments (`a//b`, trailing `/`) are ignored.

use std::fmt;

use crate::book::Book;
use crate::error::{BookError, BookResult};
use crate::item::{position_by_id, position_by_name, Item, ObjectKind};

// =============================================================================
// Object Path
// =============================================================================

/// Where an object lives, as indices into its containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObjectPath {
    #[default]
    Book,
    Ledger(usize),
    Account(usize, usize),
    Journal(usize),
    Entry(usize, usize),
}

impl ObjectPath {
    /// Resolves `text` against `book`, starting from `current`.
    ///
    /// ## Example
    /// ```rust
    /// use ledger_book::{Account, Book, Ledger, ObjectPath};
    ///
    /// let mut book = Book::new();
    /// let mut ledger = Ledger::with_name("Main");
    /// ledger.add_account(Account::with_name("Cash").unwrap());
    /// book.add_ledger(ledger);
    ///
    /// let cash = ObjectPath::compute(&book, "ledger:Main/account:Cash", ObjectPath::Book).unwrap();
    /// assert_eq!(cash, ObjectPath::Account(0, 0));
    /// assert_eq!(ObjectPath::compute(&book, "..", cash).unwrap(), ObjectPath::Ledger(0));
    /// assert_eq!(cash.render(&book), "/ledger:Main/account:Cash");
    /// ```
    pub fn compute(book: &Book, text: &str, current: ObjectPath) -> BookResult<ObjectPath> {
        let mut path = if text.starts_with('/') {
            ObjectPath::Book
        } else {
            current
        };

        for segment in text.split('/').filter(|s| !s.is_empty()) {
            path = match segment {
                "." => path,
                ".." => path.parent(),
                _ => path.child(book, segment)?,
            };
        }
        Ok(path)
    }

    /// The containing object; the book is its own parent.
    pub fn parent(self) -> ObjectPath {
        match self {
            ObjectPath::Book | ObjectPath::Ledger(_) | ObjectPath::Journal(_) => ObjectPath::Book,
            ObjectPath::Account(l, _) => ObjectPath::Ledger(l),
            ObjectPath::Entry(j, _) => ObjectPath::Journal(j),
        }
    }

    /// Kind of the addressed object (`None` for the book).
    pub fn kind(self) -> Option<ObjectKind> {
        match self {
            ObjectPath::Book => None,
            ObjectPath::Ledger(_) => Some(ObjectKind::Ledger),
            ObjectPath::Account(..) => Some(ObjectKind::Account),
            ObjectPath::Journal(_) => Some(ObjectKind::Journal),
            ObjectPath::Entry(..) => Some(ObjectKind::Entry),
        }
    }

    fn child(self, book: &Book, segment: &str) -> BookResult<ObjectPath> {
        let (kind, selector) = parse_segment(segment)?;
        match (self, kind) {
            (ObjectPath::Book, ObjectKind::Ledger) => {
                select(book.ledgers(), selector, segment).map(ObjectPath::Ledger)
            }
            (ObjectPath::Book, ObjectKind::Journal) => {
                select(book.journals(), selector, segment).map(ObjectPath::Journal)
            }
            (ObjectPath::Ledger(l), ObjectKind::Account) => {
                let ledger = book.ledger(l).ok_or_else(|| missing(ObjectKind::Ledger, l))?;
                select(ledger.accounts(), selector, segment).map(|a| ObjectPath::Account(l, a))
            }
            (ObjectPath::Journal(j), ObjectKind::Entry) => {
                let journal = book
                    .journal(j)
                    .ok_or_else(|| missing(ObjectKind::Journal, j))?;
                select(journal.entries(), selector, segment).map(|e| ObjectPath::Entry(j, e))
            }
            (parent, kind) => Err(BookError::UnexpectedKind {
                kind,
                parent: parent.to_string(),
            }),
        }
    }

    /// Canonical path using each object's label (`name`, else `#id`, else
    /// `@index`).
    ///
    /// A label that would resolve to a different sibling (a repeated name or
    /// id, or a name containing `/`) is replaced by the `@index` form, so the
    /// result always resolves back to `self`.
    pub fn render(&self, book: &Book) -> String {
        let segments = match *self {
            ObjectPath::Book => Vec::new(),
            ObjectPath::Ledger(l) => vec![labelled(book.ledgers(), l)],
            ObjectPath::Account(l, a) => {
                let accounts = book.ledger(l).map_or(&[][..], |parent| parent.accounts());
                vec![labelled(book.ledgers(), l), labelled(accounts, a)]
            }
            ObjectPath::Journal(j) => vec![labelled(book.journals(), j)],
            ObjectPath::Entry(j, e) => {
                let entries = book.journal(j).map_or(&[][..], |parent| parent.entries());
                vec![labelled(book.journals(), j), labelled(entries, e)]
            }
        };
        format!("/{}", segments.join("/"))
    }
}

/// Index form, valid without the book: `/ledger@0/account@2`.
impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ObjectPath::Book => write!(f, "/"),
            ObjectPath::Ledger(l) => write!(f, "/ledger@{}", l),
            ObjectPath::Account(l, a) => write!(f, "/ledger@{}/account@{}", l, a),
            ObjectPath::Journal(j) => write!(f, "/journal@{}", j),
            ObjectPath::Entry(j, e) => write!(f, "/journal@{}/entry@{}", j, e),
        }
    }
}

// =============================================================================
// Segments
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selector<'a> {
    Name(&'a str),
    Id(i64),
    Index(usize),
}

fn parse_segment(segment: &str) -> BookResult<(ObjectKind, Selector<'_>)> {
    let invalid = || BookError::InvalidSegment(segment.to_string());

    let split = segment
        .find(|c: char| matches!(c, ':' | '#' | '@'))
        .ok_or_else(invalid)?;
    let kind: ObjectKind = segment[..split].parse().map_err(|_| invalid())?;
    let rest = &segment[split + 1..];

    let selector = match &segment[split..split + 1] {
        ":" if !rest.is_empty() => Selector::Name(rest),
        "#" => Selector::Id(rest.parse().map_err(|_| invalid())?),
        "@" => Selector::Index(rest.parse().map_err(|_| invalid())?),
        _ => return Err(invalid()),
    };
    Ok((kind, selector))
}

fn select<T: Item>(items: &[T], selector: Selector<'_>, segment: &str) -> BookResult<usize> {
    let found = match selector {
        Selector::Name(name) => position_by_name(items, name),
        Selector::Id(id) => position_by_id(items, id),
        Selector::Index(index) => (index < items.len()).then_some(index),
    };
    found.ok_or_else(|| BookError::NotFound {
        kind: T::KIND,
        key: segment.to_string(),
    })
}

fn missing(kind: ObjectKind, index: usize) -> BookError {
    BookError::NotFound {
        kind,
        key: format!("{}@{}", kind, index),
    }
}

fn labelled<T: Item>(items: &[T], index: usize) -> String {
    let Some(item) = items.get(index) else {
        return format!("{}@{}", T::KIND, index);
    };
    let label = item.label(index);
    let unique = !label.contains('/')
        && matches!(
            parse_segment(&label),
            Ok((_, selector)) if select(items, selector, &label) == Ok(index)
        );
    if unique {
        label
    } else {
        format!("{}@{}", T::KIND, index)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
