//! # Navigator Session
//!
//! Holds a book and the current position in it, and runs one command line
//! at a time.
//!
//! ## Commands
//! ```text
//! ┌──────────────────────────┬──────────────────────────────────────────────┐
//! │ list | ls                │ contents of the current object               │
//! │ enter | cd PATH          │ move to PATH (see ObjectPath grammar)        │
//! │ pwd                      │ canonical path of the current object         │
//! │ new KIND [NAME]          │ create a ledger, account, journal or entry   │
//! │ post AMOUNT [MEMO...]    │ append a line to the current account         │
//! │ lines                    │ show the current account's lines             │
//! │ drop N                   │ remove line N of the current account         │
//! │ help                     │ this table                                   │
//! │ quit | exit              │ leave                                        │
//! └──────────────────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Regular output goes to `out`; diagnostics for a failed command go to
//! `err`. Only I/O failures on those writers are returned as errors.

use std::io::{self, Write};

use ledger_book::account::{JOURNAL_COLUMN, MEMO_COLUMN};
use ledger_book::{
    Account, Book, Entry, Item, Journal, Ledger, ObjectKind, ObjectPath, TransactionLine,
};
use ledger_core::Mark;
use tracing::{debug, info};

use crate::amount::{parse_amount, render_amount};
use crate::config::DisplaySettings;

const HELP: &str = "\
commands:
  list | ls               contents of the current object
  enter | cd PATH         move to PATH, e.g. /ledger:Main/account#3, .., journal@0
  pwd                     show the current path
  new KIND [NAME]         create a ledger, account, journal or entry
  post AMOUNT [MEMO...]   append a transaction line to the current account
  lines                   show the current account's transaction lines
  drop N                  remove transaction line N of the current account
  help                    show this help
  quit | exit             leave the navigator";

/// Result of one command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran.
    Done,
    /// The command was understood but could not be carried out.
    Failed,
    /// The command was missing arguments or unknown.
    Usage,
    /// The user asked to leave.
    Quit,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Done | Outcome::Quit)
    }
}

// =============================================================================
// Session
// =============================================================================

#[derive(Debug)]
pub struct Session {
    book: Book,
    current: ObjectPath,
    display: DisplaySettings,
}

impl Session {
    pub fn new(book: Book, display: DisplaySettings) -> Self {
        Session {
            book,
            current: ObjectPath::Book,
            display,
        }
    }

    pub fn current(&self) -> ObjectPath {
        self.current
    }

    /// Canonical path of the current object, for prompts.
    pub fn current_path(&self) -> String {
        self.current.render(&self.book)
    }

    /// Runs one command line.
    pub fn execute<W: Write, E: Write>(
        &mut self,
        line: &str,
        out: &mut W,
        err: &mut E,
    ) -> io::Result<Outcome> {
        let args: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, rest)) = args.split_first() else {
            return Ok(Outcome::Done);
        };
        debug!(command, args = rest.len(), "Executing command");

        match command {
            "list" | "ls" => self.list(out, err),
            "enter" | "cd" => self.enter(rest, err),
            "pwd" => {
                writeln!(out, "{}", self.current_path())?;
                Ok(Outcome::Done)
            }
            "new" => self.create(rest, out, err),
            "post" => self.post(rest, out, err),
            "lines" => self.lines(out, err),
            "drop" => self.drop_line(rest, out, err),
            "help" => {
                writeln!(out, "{}", HELP)?;
                Ok(Outcome::Done)
            }
            "quit" | "exit" => Ok(Outcome::Quit),
            other => {
                writeln!(err, "{}: unknown command (try 'help')", other)?;
                Ok(Outcome::Usage)
            }
        }
    }

    // =========================================================================
    // list
    // =========================================================================

    fn list<W: Write, E: Write>(&self, out: &mut W, err: &mut E) -> io::Result<Outcome> {
        match self.current {
            ObjectPath::Book => {
                writeln!(out, "total ledgers: {}", self.book.ledger_count())?;
                writeln!(out, "total journals: {}", self.book.journal_count())?;
                for (i, ledger) in self.book.ledgers().iter().enumerate() {
                    writeln!(out, "  {}/", ledger.label(i))?;
                }
                for (i, journal) in self.book.journals().iter().enumerate() {
                    writeln!(out, "  {}/", journal.label(i))?;
                }
            }
            ObjectPath::Ledger(l) => {
                let Some(ledger) = self.book.ledger(l) else {
                    return unavailable(err, ObjectKind::Ledger);
                };
                writeln!(out, "total accounts: {}", ledger.account_count())?;
                for (i, account) in ledger.accounts().iter().enumerate() {
                    writeln!(out, "  {}/", account.label(i))?;
                }
            }
            ObjectPath::Journal(j) => {
                let Some(journal) = self.book.journal(j) else {
                    return unavailable(err, ObjectKind::Journal);
                };
                writeln!(out, "total entries: {}", journal.entry_count())?;
                for (i, entry) in journal.entries().iter().enumerate() {
                    writeln!(out, "  {}/", entry.label(i))?;
                }
            }
            ObjectPath::Entry(j, e) => {
                let Some(journal) = self.book.journal(j) else {
                    return unavailable(err, ObjectKind::Journal);
                };
                let Some(entry) = journal.entry(e) else {
                    return unavailable(err, ObjectKind::Entry);
                };
                writeln!(out, "{}", entry.label(e))?;
            }
            ObjectPath::Account(..) => {
                let Some(account) = self.account() else {
                    return unavailable(err, ObjectKind::Account);
                };
                let balance = account.balance().map_err(|e| e.to_string()).and_then(|b| {
                    render_amount(&b, self.display.amount_scale, self.display.force_sign)
                        .map_err(|e| e.to_string())
                });
                match balance {
                    Ok(text) => writeln!(out, "balance: {}", text)?,
                    Err(reason) => {
                        debug!(%reason, "Balance unavailable");
                        writeln!(out, "balance unavailable")?
                    }
                }
                writeln!(out, "transaction lines: {}", account.line_count())?;
            }
        }
        Ok(Outcome::Done)
    }

    // =========================================================================
    // enter
    // =========================================================================

    fn enter<E: Write>(&mut self, args: &[&str], err: &mut E) -> io::Result<Outcome> {
        let Some(&target) = args.first() else {
            writeln!(err, "enter: Enter an object.\nusage: enter (path_to_object)")?;
            return Ok(Outcome::Usage);
        };

        match ObjectPath::compute(&self.book, target, self.current) {
            Ok(path) => {
                debug!(from = %self.current, to = %path, "Entered object");
                self.current = path;
                Ok(Outcome::Done)
            }
            Err(e) => {
                writeln!(err, "enter: Object not found ({}).", e)?;
                Ok(Outcome::Failed)
            }
        }
    }

    // =========================================================================
    // new
    // =========================================================================

    fn create<W: Write, E: Write>(
        &mut self,
        args: &[&str],
        out: &mut W,
        err: &mut E,
    ) -> io::Result<Outcome> {
        let Some(&kind) = args.first() else {
            writeln!(err, "new: Create an object.\nusage: new (ledger|account|journal|entry) [name]")?;
            return Ok(Outcome::Usage);
        };
        let name = args.get(1).copied();

        let kind: ObjectKind = match kind.parse() {
            Ok(kind) => kind,
            Err(_) => {
                writeln!(err, "new: Unknown object kind '{}'.", kind)?;
                return Ok(Outcome::Usage);
            }
        };

        let created = match kind {
            ObjectKind::Ledger => {
                let ledger = name.map(Ledger::with_name).unwrap_or_default();
                Some(ObjectPath::Ledger(self.book.add_ledger(ledger)))
            }
            ObjectKind::Journal => {
                let journal = name.map(Journal::with_name).unwrap_or_default();
                Some(ObjectPath::Journal(self.book.add_journal(journal)))
            }
            ObjectKind::Account => match self.current {
                ObjectPath::Ledger(l) | ObjectPath::Account(l, _) => {
                    let account = match name {
                        Some(name) => Account::with_name(name),
                        None => Account::new(),
                    };
                    match (account, self.book.ledger_mut(l)) {
                        (Ok(account), Some(ledger)) => {
                            Some(ObjectPath::Account(l, ledger.add_account(account)))
                        }
                        (Err(e), _) => {
                            writeln!(err, "new: {}", e)?;
                            return Ok(Outcome::Failed);
                        }
                        (_, None) => None,
                    }
                }
                _ => None,
            },
            ObjectKind::Entry => match self.current {
                ObjectPath::Journal(j) | ObjectPath::Entry(j, _) => {
                    let entry = name.map(Entry::with_name).unwrap_or_default();
                    self.book
                        .journal_mut(j)
                        .map(|journal| ObjectPath::Entry(j, journal.add_entry(entry)))
                }
                _ => None,
            },
        };

        match created {
            Some(path) => {
                info!(path = %path, "Object created");
                writeln!(out, "{}", path.render(&self.book))?;
                Ok(Outcome::Done)
            }
            None => {
                let parent = match kind {
                    ObjectKind::Account => "a ledger",
                    _ => "a journal",
                };
                writeln!(err, "new: Enter {} before creating an {}.", parent, kind)?;
                Ok(Outcome::Failed)
            }
        }
    }

    // =========================================================================
    // Account commands
    // =========================================================================

    fn account(&self) -> Option<&Account> {
        match self.current {
            ObjectPath::Account(l, a) => self.book.ledger(l)?.account(a),
            _ => None,
        }
    }

    fn post<W: Write, E: Write>(
        &self,
        args: &[&str],
        out: &mut W,
        err: &mut E,
    ) -> io::Result<Outcome> {
        let Some((&amount, memo)) = args.split_first() else {
            writeln!(err, "post: Add a transaction line.\nusage: post (amount) [memo]")?;
            return Ok(Outcome::Usage);
        };
        let Some(account) = self.account() else {
            writeln!(err, "post: Enter an account first.")?;
            return Ok(Outcome::Failed);
        };

        let amount = match parse_amount(amount, self.display.amount_scale) {
            Ok(amount) => amount,
            Err(e) => {
                writeln!(err, "post: Bad amount '{}' ({}).", amount, e)?;
                return Ok(Outcome::Failed);
            }
        };

        let line = TransactionLine::new(amount, &memo.join(" "));
        match account.post_line(&line) {
            Ok(row) => {
                writeln!(out, "line {}", row)?;
                Ok(Outcome::Done)
            }
            Err(e) => {
                writeln!(err, "post: {}", e)?;
                Ok(Outcome::Failed)
            }
        }
    }

    /// One row per line: index, then every cell rendered as text.
    fn lines<W: Write, E: Write>(&self, out: &mut W, err: &mut E) -> io::Result<Outcome> {
        let Some(account) = self.account() else {
            writeln!(err, "lines: Enter an account first.")?;
            return Ok(Outcome::Failed);
        };

        let table = account.table();
        let mark = table.begin_read();
        let mut index = 0usize;
        while mark.is_valid() {
            let mut cells = Vec::new();
            for column in JOURNAL_COLUMN..=MEMO_COLUMN {
                match cell_text(&mark, column) {
                    Ok(text) => cells.push(text),
                    Err(e) => {
                        writeln!(err, "lines: {}", e)?;
                        return Ok(Outcome::Failed);
                    }
                }
            }
            writeln!(out, "{:>4}  {}", index, cells.join(" | "))?;
            mark.move_by(1);
            index += 1;
        }
        Ok(Outcome::Done)
    }

    fn drop_line<W: Write, E: Write>(
        &self,
        args: &[&str],
        out: &mut W,
        err: &mut E,
    ) -> io::Result<Outcome> {
        let Some(index) = args.first().and_then(|s| s.parse::<usize>().ok()) else {
            writeln!(err, "drop: Remove a transaction line.\nusage: drop (line_number)")?;
            return Ok(Outcome::Usage);
        };
        let Some(account) = self.account() else {
            writeln!(err, "drop: Enter an account first.")?;
            return Ok(Outcome::Failed);
        };

        match account.drop_line(index) {
            Ok(()) => {
                writeln!(out, "transaction lines: {}", account.line_count())?;
                Ok(Outcome::Done)
            }
            Err(e) => {
                writeln!(err, "drop: {}", e)?;
                Ok(Outcome::Failed)
            }
        }
    }
}

/// Renders a cell through the sizing query: ask for the length, then fill.
fn cell_text(mark: &Mark, column: usize) -> ledger_core::TableResult<String> {
    let needed = mark.fetch_text(column, &mut [])?;
    let mut buf = vec![0u8; needed];
    if needed > 0 {
        mark.fetch_text(column, &mut buf)?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn unavailable<E: Write>(err: &mut E, kind: ObjectKind) -> io::Result<Outcome> {
    writeln!(err, "{} unavailable.", capitalized(kind))?;
    Ok(Outcome::Failed)
}

fn capitalized(kind: ObjectKind) -> String {
    let text = kind.to_string();
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => text,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Harness {
        session: Session,
    }

    impl Harness {
        fn new() -> Self {
            Harness {
                session: Session::new(Book::new(), DisplaySettings::default()),
            }
        }

        fn with_display(display: DisplaySettings) -> Self {
            Harness {
                session: Session::new(Book::new(), display),
            }
        }

        /// Runs a command and returns (outcome, stdout, stderr).
        fn run(&mut self, line: &str) -> (Outcome, String, String) {
            let mut out = Vec::new();
            let mut err = Vec::new();
            let outcome = self.session.execute(line, &mut out, &mut err).unwrap();
            (
                outcome,
                String::from_utf8(out).unwrap(),
                String::from_utf8(err).unwrap(),
            )
        }

        fn ok(&mut self, line: &str) -> String {
            let (outcome, out, err) = self.run(line);
            assert_eq!(outcome, Outcome::Done, "{}: {}", line, err);
            out
        }
    }

    #[test]
    fn test_empty_book_listing() {
        let mut h = Harness::new();
        assert_eq!(h.ok("ls"), "total ledgers: 0\ntotal journals: 0\n");
        assert_eq!(h.ok("pwd"), "/\n");
        assert_eq!(h.ok("   "), "");
    }

    #[test]
    fn test_book_listing_labels() {
        let mut h = Harness::new();
        h.ok("new ledger Main");
        h.ok("new ledger");
        h.ok("new journal general");

        h.session.book.ledger_mut(1).unwrap().set_id(7);
        assert_eq!(
            h.ok("list"),
            "total ledgers: 2\ntotal journals: 1\n  ledger:Main/\n  ledger#7/\n  journal:general/\n"
        );

        h.session.book.ledger_mut(1).unwrap().set_id(-1);
        assert!(h.ok("list").contains("  ledger@1/\n"));
    }

    #[test]
    fn test_account_flow() {
        let mut h = Harness::new();
        assert_eq!(h.ok("new ledger Main"), "/ledger:Main\n");
        h.ok("cd ledger:Main");
        assert_eq!(h.ok("new account Cash"), "/ledger:Main/account:Cash\n");
        h.ok("enter account:Cash");
        assert_eq!(h.ok("pwd"), "/ledger:Main/account:Cash\n");

        assert_eq!(h.ok("post 10.50 opening float"), "line 0\n");
        assert_eq!(h.ok("post -3.25"), "line 1\n");
        assert_eq!(h.ok("post 0.75 coffee"), "line 2\n");

        assert_eq!(h.ok("ls"), "balance: +8.00\ntransaction lines: 3\n");

        let lines = h.ok("lines");
        assert_eq!(
            lines,
            "   0  -1 | -1 | 10.50 |  | opening float\n   1  -1 | -1 | -3.25 |  | \n   2  -1 | -1 | 0.75 |  | coffee\n"
        );

        assert_eq!(h.ok("drop 0"), "transaction lines: 2\n");
        assert_eq!(h.ok("ls"), "balance: -2.50\ntransaction lines: 2\n");

        h.ok("cd ..");
        assert_eq!(h.ok("ls"), "total accounts: 1\n  account:Cash/\n");
    }

    #[test]
    fn test_balance_display_settings() {
        let mut h = Harness::with_display(DisplaySettings {
            force_sign: false,
            amount_scale: Some(3),
        });
        h.ok("new ledger L");
        h.ok("cd ledger@0");
        h.ok("new account");
        h.ok("cd account@0");
        h.ok("post 1.23456");
        h.ok("post 2");
        assert_eq!(h.ok("ls"), "balance: 3.234\ntransaction lines: 2\n");
    }

    #[test]
    fn test_journal_and_entries() {
        let mut h = Harness::new();
        h.ok("new journal general");
        h.ok("cd journal:general");
        assert_eq!(h.ok("new entry rent"), "/journal:general/entry:rent\n");
        assert_eq!(h.ok("new entry"), "/journal:general/entry@1\n");
        assert_eq!(
            h.ok("ls"),
            "total entries: 2\n  entry:rent/\n  entry@1/\n"
        );
        h.ok("cd entry@1");
        assert_eq!(h.ok("ls"), "entry@1\n");
        h.ok("cd /");
        assert_eq!(h.ok("pwd"), "/\n");
    }

    #[test]
    fn test_enter_errors_keep_position() {
        let mut h = Harness::new();
        h.ok("new ledger Main");

        let (outcome, _, err) = h.run("enter");
        assert_eq!(outcome, Outcome::Usage);
        assert!(err.starts_with("enter: Enter an object."));

        let (outcome, _, err) = h.run("cd ledger:Missing");
        assert_eq!(outcome, Outcome::Failed);
        assert!(err.starts_with("enter: Object not found"));
        assert_eq!(h.session.current(), ObjectPath::Book);
    }

    #[test]
    fn test_commands_outside_their_context() {
        let mut h = Harness::new();

        let (outcome, _, err) = h.run("post 5");
        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(err, "post: Enter an account first.\n");

        let (outcome, _, _) = h.run("new account Cash");
        assert_eq!(outcome, Outcome::Failed);
        let (outcome, _, err) = h.run("new entry x");
        assert_eq!(outcome, Outcome::Failed);
        assert!(err.contains("a journal"));

        let (outcome, _, _) = h.run("new shelf x");
        assert_eq!(outcome, Outcome::Usage);
        let (outcome, _, _) = h.run("drop x");
        assert_eq!(outcome, Outcome::Usage);
        let (outcome, _, _) = h.run("frobnicate");
        assert_eq!(outcome, Outcome::Usage);
    }

    #[test]
    fn test_bad_amount_and_drop_range() {
        let mut h = Harness::new();
        h.ok("new ledger L");
        h.ok("cd ledger:L");
        h.ok("new account A");
        h.ok("cd account:A");

        let (outcome, _, err) = h.run("post 12abc");
        assert_eq!(outcome, Outcome::Failed);
        assert!(err.starts_with("post: Bad amount '12abc'"));

        let (outcome, _, err) = h.run("drop 3");
        assert_eq!(outcome, Outcome::Failed);
        assert!(err.contains("out of range"));
        assert_eq!(h.ok("ls"), "balance: +0\ntransaction lines: 0\n");
    }

    #[test]
    fn test_quit_and_help() {
        let mut h = Harness::new();
        assert!(h.ok("help").contains("enter | cd PATH"));
        assert_eq!(h.run("quit").0, Outcome::Quit);
        assert_eq!(h.run("exit").0, Outcome::Quit);
        assert!(Outcome::Quit.is_success());
        assert!(!Outcome::Usage.is_success());
    }

    #[test]
    fn test_capitalized() {
        assert_eq!(capitalized(ObjectKind::Ledger), "Ledger");
        assert_eq!(capitalized(ObjectKind::Entry), "Entry");
    }
}
