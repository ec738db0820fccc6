use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{
    domain::Partition,
    error::{AppError, Result},
};

/// One piece of classroom information, filed under a keyword phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementRecord {
    pub record_id: Uuid,
    pub keyword_phrase: String,
    pub info: String,
    pub url: Option<String>,
    pub kind: EntryKind,
    pub entry_date: NaiveDate,
    pub school: String,
    pub class_section: String,
    pub action_date: Option<NaiveDate>,
    pub author_id: Option<Uuid>,
}

impl AnnouncementRecord {
    pub fn partition(&self) -> Partition {
        Partition {
            school: self.school.clone(),
            class_section: self.class_section.clone(),
        }
    }

    /// A link entry without a usable URL. Still searchable, but shown as incomplete.
    pub fn is_incomplete_link(&self) -> bool {
        self.kind.is_incomplete(self.url.as_deref())
    }

    pub fn has_keyword_phrase(&self) -> bool {
        !self.keyword_phrase.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Text,
    Link,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Text => "Text",
            EntryKind::Link => "Link",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(EntryKind::Text),
            "link" => Some(EntryKind::Link),
            _ => None,
        }
    }

    pub(crate) fn is_incomplete(&self, url: Option<&str>) -> bool {
        *self == EntryKind::Link && url.map_or(true, |u| u.trim().is_empty())
    }
}

/// Submission payload for a new announcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnnouncement {
    pub school: String,
    pub class_section: String,
    pub keyword_phrase: String,
    pub info: String,
    #[serde(default)]
    pub url: Option<String>,
    pub kind: EntryKind,
    /// Defaults to the submission day when absent.
    #[serde(default)]
    pub entry_date: Option<NaiveDate>,
    #[serde(default)]
    pub action_date: Option<NaiveDate>,
}

impl NewAnnouncement {
    pub fn validate(&self) -> Result<()> {
        if self.school.trim().is_empty() {
            return Err(AppError::Validation("School is required".to_string()));
        }
        if self.class_section.trim().is_empty() {
            return Err(AppError::Validation("Class section is required".to_string()));
        }
        if self.keyword_phrase.trim().is_empty() {
            return Err(AppError::Validation("Keyword phrase is required".to_string()));
        }
        if self.info.trim().is_empty() {
            return Err(AppError::Validation("Information text is required".to_string()));
        }
        validate_link(self.kind, self.url.as_deref())
    }
}

/// Partial edit of an existing announcement. Absent fields stay untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAnnouncementRequest {
    pub keyword_phrase: Option<String>,
    pub info: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub url: Option<Option<String>>,
    pub kind: Option<EntryKind>,
    pub entry_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub action_date: Option<Option<NaiveDate>>,
    pub school: Option<String>,
    pub class_section: Option<String>,
}

impl UpdateAnnouncementRequest {
    /// Applies the changes on top of `record` and validates the result.
    pub fn apply(self, mut record: AnnouncementRecord) -> Result<AnnouncementRecord> {
        if let Some(phrase) = self.keyword_phrase {
            record.keyword_phrase = phrase.trim().to_string();
        }
        if let Some(info) = self.info {
            record.info = info.trim().to_string();
        }
        if let Some(url) = self.url {
            record.url = clean_url(url);
        }
        if let Some(kind) = self.kind {
            record.kind = kind;
        }
        if let Some(entry_date) = self.entry_date {
            record.entry_date = entry_date;
        }
        if let Some(action_date) = self.action_date {
            record.action_date = action_date;
        }
        if self.school.is_some() || self.class_section.is_some() {
            let partition = Partition::new(
                self.school.as_deref().unwrap_or(&record.school),
                self.class_section.as_deref().unwrap_or(&record.class_section),
            );
            partition.validate()?;
            record.school = partition.school;
            record.class_section = partition.class_section;
        }

        if !record.has_keyword_phrase() {
            return Err(AppError::Validation("Keyword phrase is required".to_string()));
        }
        if record.info.is_empty() {
            return Err(AppError::Validation("Information text is required".to_string()));
        }
        validate_link(record.kind, record.url.as_deref())?;

        Ok(record)
    }
}

// Distinguishes an explicit `null` (clear the field) from an absent key.
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn clean_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

fn validate_link(kind: EntryKind, url: Option<&str>) -> Result<()> {
    let url = url.map(str::trim).unwrap_or_default();
    match kind {
        EntryKind::Link if url.is_empty() => {
            Err(AppError::Validation("Link entries need a URL".to_string()))
        }
        EntryKind::Link if !(url.starts_with("http://") || url.starts_with("https://")) => {
            Err(AppError::Validation(format!("Invalid link: {}", url)))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: EntryKind, url: Option<&str>) -> AnnouncementRecord {
        AnnouncementRecord {
            record_id: Uuid::new_v4(),
            keyword_phrase: "Εκδρομή".to_string(),
            info: "Φύλλο συμμετοχής".to_string(),
            url: url.map(str::to_string),
            kind,
            entry_date: NaiveDate::from_ymd_opt(2024, 2, 3).unwrap(),
            school: "1ο Δημοτικό".to_string(),
            class_section: "Β1".to_string(),
            action_date: None,
            author_id: None,
        }
    }

    #[test]
    fn test_incomplete_link() {
        assert!(record(EntryKind::Link, None).is_incomplete_link());
        assert!(record(EntryKind::Link, Some("  ")).is_incomplete_link());
        assert!(!record(EntryKind::Link, Some("https://x")).is_incomplete_link());
        assert!(!record(EntryKind::Text, None).is_incomplete_link());
    }

    #[test]
    fn test_entry_kind_from_str() {
        assert_eq!(EntryKind::from_str("Link"), Some(EntryKind::Link));
        assert_eq!(EntryKind::from_str(" text "), Some(EntryKind::Text));
        assert_eq!(EntryKind::from_str("video"), None);
    }

    #[test]
    fn test_new_announcement_validation() {
        let mut new = NewAnnouncement {
            school: "1ο Δημοτικό".to_string(),
            class_section: "Β1".to_string(),
            keyword_phrase: "Εκδρομή".to_string(),
            info: "Φύλλο συμμετοχής".to_string(),
            url: None,
            kind: EntryKind::Link,
            entry_date: None,
            action_date: None,
        };
        assert!(matches!(new.validate(), Err(AppError::Validation(_))));

        new.url = Some("ftp://x".to_string());
        assert!(matches!(new.validate(), Err(AppError::Validation(_))));

        new.url = Some("https://x".to_string());
        assert!(new.validate().is_ok());

        new.keyword_phrase = "   ".to_string();
        assert!(matches!(new.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_update_moves_partition_and_normalizes_section() {
        let update = UpdateAnnouncementRequest {
            class_section: Some("γ 2".to_string()),
            ..Default::default()
        };
        let updated = update.apply(record(EntryKind::Text, None)).unwrap();
        assert_eq!(updated.class_section, "Γ2");
        assert_eq!(updated.school, "1ο Δημοτικό");
    }

    #[test]
    fn test_update_rejects_blank_phrase() {
        let update = UpdateAnnouncementRequest {
            keyword_phrase: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(update.apply(record(EntryKind::Text, None)).is_err());
    }

    #[test]
    fn test_update_request_null_clears_field() {
        let update: UpdateAnnouncementRequest =
            serde_json::from_str(r#"{"action_date": null, "info": "Νέο"}"#).unwrap();
        assert_eq!(update.action_date, Some(None));
        assert_eq!(update.url, None);
        assert_eq!(update.info.as_deref(), Some("Νέο"));
    }

    #[test]
    fn test_update_clears_action_date() {
        let mut original = record(EntryKind::Text, None);
        original.action_date = NaiveDate::from_ymd_opt(2024, 3, 1);
        let update = UpdateAnnouncementRequest {
            action_date: Some(None),
            ..Default::default()
        };
        assert_eq!(update.apply(original).unwrap().action_date, None);
    }
}
