//! Sentence and word records that flow through the tagger and retaggers.

/// One word of a sentence.
///
/// `standard_spelling` is the form used for lexicon lookup; it starts out
/// equal to `spelling` and may be replaced by an external spelling
/// standardizer before tagging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdornedWord {
    /// Text as it appeared in the source.
    pub token: String,
    pub spelling: String,
    pub standard_spelling: String,
    /// Assigned tag; empty until tagged.
    pub tag: String,
    /// Position within the sentence.
    pub index: usize,
    /// Byte offset of `token` in the source text, when known.
    pub offset: Option<usize>,
}

impl AdornedWord {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            spelling: token.clone(),
            standard_spelling: token.clone(),
            token,
            tag: String::new(),
            index: 0,
            offset: None,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_standard_spelling(mut self, standard: impl Into<String>) -> Self {
        self.standard_spelling = standard.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

/// An ordered sequence of words. Words refer to their neighbours by index
/// only, so the sentence is the sole owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentence {
    words: Vec<AdornedWord>,
}

impl Sentence {
    pub fn new(words: Vec<AdornedWord>) -> Self {
        let mut sentence = Self { words };
        sentence.resync();
        sentence
    }

    pub fn from_spellings<S: AsRef<str>>(spellings: &[S]) -> Self {
        Self::new(
            spellings
                .iter()
                .map(|s| AdornedWord::new(s.as_ref()))
                .collect(),
        )
    }

    /// Words with their byte offsets in the source text.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[(S, usize)]) -> Self {
        Self::new(
            tokens
                .iter()
                .map(|(t, off)| AdornedWord::new(t.as_ref()).with_offset(*off))
                .collect(),
        )
    }

    pub fn words(&self) -> &[AdornedWord] {
        &self.words
    }

    pub fn words_mut(&mut self) -> &mut [AdornedWord] {
        &mut self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AdornedWord> {
        self.words.get(index)
    }

    pub fn previous(&self, index: usize) -> Option<&AdornedWord> {
        index.checked_sub(1).and_then(|i| self.words.get(i))
    }

    pub fn next(&self, index: usize) -> Option<&AdornedWord> {
        self.words.get(index + 1)
    }

    pub fn insert(&mut self, index: usize, word: AdornedWord) {
        self.words.insert(index, word);
    }

    pub fn remove(&mut self, index: usize) -> AdornedWord {
        self.words.remove(index)
    }

    pub fn tags(&self) -> Vec<&str> {
        self.words.iter().map(|w| w.tag.as_str()).collect()
    }

    pub fn spellings(&self) -> Vec<&str> {
        self.words.iter().map(|w| w.spelling.as_str()).collect()
    }

    /// Renumber word indices and derive missing offsets from the preceding
    /// word (`offset + token length`). Required after any pass that inserts
    /// or deletes words.
    pub fn resync(&mut self) {
        let mut prev_end: Option<usize> = None;
        for (i, word) in self.words.iter_mut().enumerate() {
            word.index = i;
            if word.offset.is_none() {
                word.offset = prev_end;
            }
            prev_end = word.offset.map(|off| off + word.token.len());
        }
    }

    /// `(spelling, tag)` pairs in order.
    pub fn into_tagged(self) -> Vec<(String, String)> {
        self.words
            .into_iter()
            .map(|w| (w.spelling, w.tag))
            .collect()
    }
}
