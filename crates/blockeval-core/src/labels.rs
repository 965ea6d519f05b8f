//! Fixed label table and free-text label normalization.

/// Emotion labels, indexed by the dataset's integer label encoding.
///
/// The order is a contract with the dataset: index 0 is `sadness`, 1 is
/// `joy`, and so on. Reordering silently corrupts every gold label.
pub const LABELS: [&str; 6] = ["sadness", "joy", "love", "anger", "fear", "surprise"];

/// Model vocabulary that maps onto a canonical label.
pub const SYNONYMS: &[(&str, &str)] = &[
    ("happy", "joy"),
    ("happiness", "joy"),
    ("joyful", "joy"),
    ("ecstatic", "joy"),
    ("sad", "sadness"),
    ("depressed", "sadness"),
    ("angry", "anger"),
    ("mad", "anger"),
    ("furious", "anger"),
    ("afraid", "fear"),
    ("scared", "fear"),
    ("fearful", "fear"),
    ("terrified", "fear"),
    ("surprised", "surprise"),
    ("shocked", "surprise"),
    ("astonished", "surprise"),
    ("love", "love"),
    ("loved", "love"),
    ("loving", "love"),
];

/// Label name for a dataset label index, `None` when out of range.
pub fn label_for_index(index: usize) -> Option<&'static str> {
    LABELS.get(index).copied()
}

pub fn is_label(token: &str) -> bool {
    LABELS.contains(&token)
}

fn synonym(token: &str) -> Option<&'static str> {
    SYNONYMS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, label)| *label)
}

/// Canonicalize free-text model output.
///
/// Anything other than ASCII letters and spaces becomes a space, the text is
/// lowercased and only the first word is kept. Known labels pass through,
/// synonyms are mapped, and unknown words are returned as-is so they score
/// as a miss instead of failing the run. Empty input yields an empty string.
pub fn normalize_label(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphabetic() || c == ' ' { c } else { ' ' })
        .collect::<String>()
        .to_lowercase();

    let token = match cleaned.split_whitespace().next() {
        Some(token) => token,
        None => return String::new(),
    };

    if is_label(token) {
        return token.to_string();
    }
    synonym(token).unwrap_or(token).to_string()
}
