//! Linear undo history of committed object transforms.
//!
//! The sequence is never empty (index 0 is the origin seed) and the cursor always
//! points at a valid entry. Every state change is written through to the
//! backing store; a failed write is parked in `take_error` and the in-memory
//! history stays authoritative.

use std::rc::Rc;

use crate::model::Transform3;
use crate::storage::{KeyValueStore, StorageError};
use crate::util::{clog, cwarn};

const SEQUENCE_KEY: &str = "cube-positions";
const CURRENT_KEY: &str = "current-position";
const CURSOR_KEY: &str = "history-index";

/// Storage keys for one history. Global unless the page is scoped to a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryKeys {
    pub sequence: String,
    pub current: String,
    pub cursor: String,
}

impl HistoryKeys {
    pub fn global() -> Self {
        Self {
            sequence: SEQUENCE_KEY.to_string(),
            current: CURRENT_KEY.to_string(),
            cursor: CURSOR_KEY.to_string(),
        }
    }

    pub fn for_document(document_id: &str) -> Self {
        Self {
            sequence: format!("doc:{}:{}", document_id, SEQUENCE_KEY),
            current: format!("doc:{}:{}", document_id, CURRENT_KEY),
            cursor: format!("doc:{}:{}", document_id, CURSOR_KEY),
        }
    }

    /// Keys for a page path: `/projects/<project>/<document>` gets its own history,
    /// anything else shares the global one.
    pub fn from_path(path: &str) -> Self {
        match document_from_path(path) {
            Some(id) => Self::for_document(id),
            None => Self::global(),
        }
    }
}

fn document_from_path(path: &str) -> Option<&str> {
    let mut parts = path.split('/').filter(|s| !s.is_empty());
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("projects"), Some(_project), Some(document), None) => Some(document),
        _ => None,
    }
}

pub struct HistoryStore {
    entries: Vec<Transform3>,
    cursor: usize,
    keys: HistoryKeys,
    store: Rc<dyn KeyValueStore>,
    error: Option<StorageError>,
}

impl HistoryStore {
    /// Restore the persisted history, falling back to the seeded origin entry when
    /// nothing usable is stored.
    pub fn load(store: Rc<dyn KeyValueStore>, keys: HistoryKeys) -> Self {
        let mut error = None;
        let (entries, cursor) = match read_persisted(store.as_ref(), &keys) {
            Ok(Some(found)) => found,
            Ok(None) => (vec![Transform3::ORIGIN], 0),
            Err(e) => {
                cwarn(&format!("History load failed, starting fresh: {}", e));
                error = Some(e);
                (vec![Transform3::ORIGIN], 0)
            }
        };
        clog(&format!(
            "History loaded: len={} cursor={} current={}",
            entries.len(),
            cursor,
            entries[cursor]
        ));
        Self {
            entries,
            cursor,
            keys,
            store,
            error,
        }
    }

    pub fn current(&self) -> Transform3 {
        self.entries[self.cursor]
    }

    /// Drop everything after the cursor, append `t` and move the cursor onto it.
    pub fn commit(&mut self, t: Transform3) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(t);
        self.cursor = self.entries.len() - 1;
        clog(&format!(
            "History commit: {} (len={}, cursor={})",
            t,
            self.entries.len(),
            self.cursor
        ));
        self.persist();
    }

    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        clog(&format!("Undo to {} -> {}", self.cursor, self.current()));
        self.persist();
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        clog(&format!("Redo to {} -> {}", self.cursor, self.current()));
        self.persist();
        true
    }

    /// Back to the single origin entry.
    pub fn reset(&mut self) {
        self.entries = vec![Transform3::ORIGIN];
        self.cursor = 0;
        clog("History reset");
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn entries(&self) -> &[Transform3] {
        &self.entries
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn keys(&self) -> &HistoryKeys {
        &self.keys
    }

    /// Last persistence failure since the previous call, if any.
    pub fn take_error(&mut self) -> Option<StorageError> {
        self.error.take()
    }

    fn persist(&mut self) {
        if let Err(e) = self.write_all() {
            cwarn(&format!("History not saved: {}", e));
            self.error = Some(e);
        }
    }

    /// The cursor is written last and acts as the commit point. Commits only
    /// truncate past the old cursor, so a write that stops early leaves the
    /// stored cursor on the same pose it showed before.
    fn write_all(&self) -> Result<(), StorageError> {
        let sequence = encode(&self.keys.sequence, &self.entries)?;
        let current = encode(&self.keys.current, &self.current())?;
        let cursor = encode(&self.keys.cursor, &self.cursor)?;
        self.store.set_item(&self.keys.sequence, &sequence)?;
        self.store.set_item(&self.keys.current, &current)?;
        self.store.set_item(&self.keys.cursor, &cursor)?;
        Ok(())
    }
}

fn encode<T: serde::Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| StorageError::Encode {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// `Ok(None)` means nothing usable was stored; only storage access failures are errors.
fn read_persisted(
    store: &dyn KeyValueStore,
    keys: &HistoryKeys,
) -> Result<Option<(Vec<Transform3>, usize)>, StorageError> {
    let Some(raw) = store.get_item(&keys.sequence)? else {
        return Ok(None);
    };
    let entries: Vec<Transform3> = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            cwarn(&format!("Ignoring malformed `{}`: {}", keys.sequence, e));
            return Ok(None);
        }
    };
    if entries.is_empty() || entries.iter().any(|t| !t.is_finite()) {
        cwarn(&format!("Ignoring unusable `{}`", keys.sequence));
        return Ok(None);
    }
    let last = entries.len() - 1;
    let cursor = match store.get_item(&keys.cursor)? {
        Some(raw) => match serde_json::from_str::<i64>(raw.trim()) {
            Ok(i) if i < 0 => 0,
            Ok(i) => usize::try_from(i).map_or(last, |i| i.min(last)),
            Err(_) => last,
        },
        None => last,
    };
    if let Some(raw) = store.get_item(&keys.current)? {
        if let Ok(saved) = serde_json::from_str::<Transform3>(&raw) {
            if saved != entries[cursor] {
                clog(&format!(
                    "Stored current {} disagrees with entry {} ({}); using the entry",
                    saved, cursor, entries[cursor]
                ));
            }
        }
    }
    Ok(Some((entries, cursor)))
}
