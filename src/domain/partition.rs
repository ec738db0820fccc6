use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    search::normalize,
};

/// The (school, class section) scope every index and listing is built over.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Partition {
    pub school: String,
    pub class_section: String,
}

impl Partition {
    pub fn new(school: &str, class_section: &str) -> Self {
        Self {
            school: school.trim().to_string(),
            class_section: normalize_class_section(class_section),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.school.is_empty() {
            return Err(AppError::Validation("School is required".to_string()));
        }
        if self.class_section.is_empty() {
            return Err(AppError::Validation("Class section is required".to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.school, self.class_section)
    }
}

/// Canonical class section: uppercase Greek letters and digits, no spaces.
///
/// Accents are dropped and Latin capitals that look like Greek ones
/// (`B1` typed on a Latin keyboard) are folded onto the Greek letter.
pub fn normalize_class_section(raw: &str) -> String {
    normalize(raw)
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .map(latin_to_greek)
        .collect()
}

fn latin_to_greek(c: char) -> char {
    match c {
        'A' => 'Α',
        'B' => 'Β',
        'E' => 'Ε',
        'Z' => 'Ζ',
        'H' => 'Η',
        'I' => 'Ι',
        'K' => 'Κ',
        'M' => 'Μ',
        'N' => 'Ν',
        'O' => 'Ο',
        'P' => 'Ρ',
        'T' => 'Τ',
        'Y' => 'Υ',
        'X' => 'Χ',
        other => other,
    }
}
