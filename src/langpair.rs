use std::collections::HashMap;

/// Allow-list restricting which language pairs produce cross-reference rows.
///
/// Maps a source language code to the target language codes whose translations
/// are kept. The extractor receives this table explicitly so new pairs can be
/// configured without touching extraction logic.
pub struct LanguagePairs {
    allowed: HashMap<String, Vec<String>>,
}

impl LanguagePairs {
    /// Builds the symmetric two-entry table for a bilingual pair: entries in
    /// language `a` keep only translations into `b`, and vice versa.
    pub fn bilingual(a: &str, b: &str) -> Self {
        let mut allowed = HashMap::new();
        allowed.insert(a.to_string(), vec![b.to_string()]);
        allowed.insert(b.to_string(), vec![a.to_string()]);
        Self { allowed }
    }

    pub fn allows(&self, source: &str, target: &str) -> bool {
        self.allowed
            .get(source)
            .is_some_and(|targets| targets.iter().any(|t| t == target))
    }

    pub fn targets_for(&self, source: &str) -> &[String] {
        self.allowed.get(source).map_or(&[], Vec::as_slice)
    }
}
