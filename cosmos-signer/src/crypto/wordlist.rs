//! The BIP39 English wordlist as a process-wide immutable resource

use std::collections::HashSet;

use bip39::Language;
use once_cell::sync::OnceCell;
use tracing::debug;

/// Number of words every BIP39 wordlist carries
pub const WORDLIST_SIZE: usize = 2048;

static WORDLIST: OnceCell<WordlistResource> = OnceCell::new();

/// The 2048 mnemonic words, loaded once and shared read-only afterwards
#[derive(Debug)]
pub struct WordlistResource {
    words: &'static [&'static str; WORDLIST_SIZE],
    index: HashSet<&'static str>,
}

impl WordlistResource {
    /// Load the wordlist, initializing it on first use.
    ///
    /// Concurrent first callers block until a single initialization finishes,
    /// every caller then sees the same instance.
    pub fn load() -> &'static WordlistResource {
        WORDLIST.get_or_init(|| {
            let words = Language::English.word_list();
            let index: HashSet<&'static str> = words.iter().copied().collect();
            debug!(words = index.len(), "Loaded mnemonic wordlist");
            WordlistResource { words, index }
        })
    }

    /// Check whether a word belongs to the list
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(word)
    }

    /// Number of words in the list
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false once loaded
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words in their canonical order
    pub fn words(&self) -> &'static [&'static str] {
        self.words
    }
}
