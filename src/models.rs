use serde::Deserialize;

/// One decoded JSONL line. Only the fields the pipeline cares about are
/// declared; everything else in the dump is ignored. All fields are optional
/// in the input, so absent ones default rather than failing the decode.
#[derive(Debug, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub lang_code: String,
    #[serde(default)]
    pub pos: Option<String>,
    #[serde(default)]
    pub etymology_text: Option<String>,
    #[serde(default)]
    pub etymology_texts: Vec<String>,
    #[serde(default)]
    pub senses: Vec<RawSense>,
    #[serde(default)]
    pub translations: Vec<RawTranslation>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSense {
    #[serde(default)]
    pub glosses: Vec<String>,
}

/// Dumps are inconsistent about the translation language field: some carry
/// `lang_code`, others `code`. Both are kept and resolved at extraction time.
#[derive(Debug, Default, Deserialize)]
pub struct RawTranslation {
    #[serde(default)]
    pub lang_code: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub roman: Option<String>,
}

/// The extractor's output for one accepted record.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRecord {
    pub word: String,
    pub pos: Option<String>,
    /// First gloss of each sense that had one, in source order.
    pub glosses: Vec<String>,
    pub etymology: Option<String>,
    pub cross_refs: Vec<CrossRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossRef {
    pub target_lang: String,
    pub target_word: String,
    pub roman: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EntryRow {
    pub id: i64,
    pub word: String,
    pub lang_code: String,
}

#[derive(Debug, Clone)]
pub struct DefinitionRow {
    pub id: i64,
    pub entry_id: i64,
    pub pos: Option<String>,
    pub gloss: String,
    /// Duplicated across all definitions of the same entry.
    pub etymology: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CrossRefRow {
    /// Always the first definition of the owning entry.
    pub definition_id: i64,
    pub target_lang: String,
    pub target_word: String,
    pub roman: Option<String>,
}
