use crate::langpair::LanguagePairs;
use crate::models::{CrossRef, ExtractedRecord, RawRecord};

/// Maps one decoded record to zero-or-one normalized tuple.
///
/// Rejection rules:
/// - missing or empty headword
/// - no sense with at least one gloss
///
/// Pure and deterministic: identical input and language code always yield
/// identical output. Language filtering against the record's declared
/// `lang_code` is the caller's responsibility; this function assumes the
/// record already belongs to `lang_code`.
pub fn extract_record(
    record: &RawRecord,
    lang_code: &str,
    pairs: &LanguagePairs,
) -> Option<ExtractedRecord> {
    if record.word.is_empty() {
        return None;
    }

    // One definition per sense that carries a gloss; senses without glosses
    // are dropped. Only the first gloss of each sense is kept.
    let glosses: Vec<String> = record
        .senses
        .iter()
        .filter_map(|sense| sense.glosses.first().cloned())
        .collect();
    if glosses.is_empty() {
        return None;
    }

    // Singular field wins over the list form.
    let etymology = record
        .etymology_text
        .clone()
        .or_else(|| record.etymology_texts.first().cloned());

    let cross_refs = record
        .translations
        .iter()
        .filter_map(|trans| {
            let target_lang = trans
                .lang_code
                .as_deref()
                .filter(|code| !code.is_empty())
                .or_else(|| trans.code.as_deref().filter(|code| !code.is_empty()))?;
            if !pairs.allows(lang_code, target_lang) || trans.word.is_empty() {
                return None;
            }
            Some(CrossRef {
                target_lang: target_lang.to_string(),
                target_word: trans.word.clone(),
                roman: trans.roman.clone(),
            })
        })
        .collect();

    Some(ExtractedRecord {
        word: record.word.clone(),
        pos: record.pos.clone(),
        glosses,
        etymology,
        cross_refs,
    })
}
