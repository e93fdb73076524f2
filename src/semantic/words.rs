//! Frequency table of the terminal tokens of all prose.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::constants::{LINE_BREAK_WORD, PARAGRAPH_BREAK_WORD};
use crate::store::{GraphStore, RowId, StoreResult};
use crate::syntax::NodeKind;

#[derive(Debug, Clone, Copy)]
struct WordEntry {
    id: RowId,
    frequency: i64,
}

#[derive(Debug, Default)]
pub struct WordIndex {
    words: FxHashMap<SmolStr, WordEntry>,
}

/// Text under which a token is indexed.
///
/// Line and paragraph breaks map to fixed sentinels; other word tokens keep
/// their literal text. `None` for kinds that are not word tokens.
pub fn canonical_text(kind: NodeKind, text: Option<&str>) -> Option<&str> {
    match kind {
        NodeKind::NewLine => Some(LINE_BREAK_WORD),
        NodeKind::EndParagraph => Some(PARAGRAPH_BREAK_WORD),
        NodeKind::Word | NodeKind::Punctuation | NodeKind::Number => text,
        _ => None,
    }
}

impl WordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `text` and return its word identity.
    pub fn intern(&mut self, store: &GraphStore, text: &str) -> StoreResult<RowId> {
        if let Some(entry) = self.words.get_mut(text) {
            entry.frequency += 1;
            store.set_word_frequency(entry.id, entry.frequency)?;
            return Ok(entry.id);
        }
        let id = store.insert_word(text)?;
        self.words
            .insert(SmolStr::new(text), WordEntry { id, frequency: 1 });
        Ok(id)
    }

    pub fn frequency(&self, text: &str) -> Option<i64> {
        self.words.get(text).map(|entry| entry.frequency)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
