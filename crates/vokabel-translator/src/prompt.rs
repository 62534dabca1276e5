/// Longest prefix of `text` with at most `max_chars` characters
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn enrich_system(target_lang: &str) -> String {
    format!(
        "You help a language learner annotate unfamiliar words. \
         Reply with a single JSON object and nothing else: \
         {{\"translation\": string, \"notes\": string}}. \
         \"translation\" is a short {target_lang} translation of the word as used in the context. \
         \"notes\" is one short mnemonic or etymology hint in {target_lang}, \
         or an empty string when there is nothing useful to add. \
         Do not restate grammar and do not repeat the context."
    )
}

pub fn enrich_user(word: &str, context: &str) -> String {
    if context.trim().is_empty() {
        format!("Word: {word}")
    } else {
        format!("Word: {word}\nContext:\n{context}")
    }
}

pub fn translate_system(target_lang: &str) -> String {
    format!(
        "Translate the user's text into {target_lang}. \
         Reply with the translation only, without quotes or commentary."
    )
}
