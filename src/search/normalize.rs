/// Comparison form of a piece of text.
///
/// Lowercases, trims surrounding whitespace and drops the tonos from Greek
/// vowels. Internal whitespace, digits and Latin letters are left alone.
/// `None` (a missing cell upstream) normalizes to the empty string.
pub fn normalize<'a>(text: impl Into<Option<&'a str>>) -> String {
    let Some(text) = text.into() else {
        return String::new();
    };

    text.to_lowercase().trim().chars().map(strip_tonos).collect()
}

fn strip_tonos(c: char) -> char {
    match c {
        'ά' => 'α',
        'έ' => 'ε',
        'ή' => 'η',
        'ί' => 'ι',
        'ό' => 'ο',
        'ύ' => 'υ',
        'ώ' => 'ω',
        other => other,
    }
}
