//! Text parsing utilities for tweet content.
//!
//! Detects "thank you" intent in mentions and extracts hashtag-worthy keywords.

/// Words of six letters or more that never make a useful hashtag.
const KEYWORD_STOPWORDS: &[&str] = &[
    "about", "across", "after", "again", "against", "almost", "already", "although", "always",
    "amazing", "another", "anyone", "anything", "around", "because", "become", "before",
    "behind", "believe", "better", "between", "beyond", "cannot", "comments", "could",
    "during", "either", "enough", "especially", "everyone", "everything", "article",
    "articles", "exclusive", "following", "further", "however", "inside", "instead", "itself",
    "little", "likely", "nothing", "really", "reports", "should", "simply", "something",
    "thanks", "themselves", "things", "though", "through", "together", "toward", "towards",
    "update", "updated", "whether", "within", "without", "would", "yourself",
];

/// Returns true if the tweet text reads as someone thanking the bot.
///
/// Matches "thank you", "thanks", "thank u", "thx", "ty", "tyvm" and "much
/// appreciated", case-insensitively and on word boundaries.
pub fn is_thank_you_text(text: &str) -> bool {
    let Ok(re) = regex::Regex::new(
        r"(?i)\b(thank\s*(you|u|ya)|thanks|thanx|thx|ty|tyvm|much\s+appreciated)\b",
    ) else {
        return false;
    };
    re.is_match(text)
}

/// Extracts candidate hashtag keywords: alphabetic tokens of six letters or
/// more that are not stopwords, in order of appearance, without duplicates.
pub fn extract_keywords(text: &str) -> Vec<String> {
    keyword_spans(text)
        .into_iter()
        .map(|(_, word)| word.to_string())
        .collect()
}

/// Like [`extract_keywords`], but yields each keyword with the byte offset of
/// the occurrence that qualified it.
pub fn keyword_spans(text: &str) -> Vec<(usize, &str)> {
    let Ok(re) = regex::Regex::new(r"\b[A-Za-z]{6,}\b") else {
        return Vec::new();
    };

    let mut spans: Vec<(usize, &str)> = Vec::new();
    for m in re.find_iter(text) {
        let word = m.as_str();
        // Skip words glued to a URL, handle or existing hashtag
        if text[..m.start()].ends_with(['#', '@', '/', '.']) {
            continue;
        }
        if KEYWORD_STOPWORDS.contains(&word.to_lowercase().as_str()) {
            continue;
        }
        if !spans.iter().any(|(_, k)| *k == word) {
            spans.push((m.start(), word));
        }
    }
    spans
}
