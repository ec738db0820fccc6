use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::{extract_tags, normalize};
use crate::domain::{AnnouncementRecord, EntryKind};

/// A record as stored under its keyword phrase: everything but the phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedEntry {
    pub record_id: Uuid,
    pub info: String,
    pub url: Option<String>,
    pub kind: EntryKind,
    pub entry_date: NaiveDate,
    pub action_date: Option<NaiveDate>,
    pub author_id: Option<Uuid>,
}

impl IndexedEntry {
    pub fn is_incomplete_link(&self) -> bool {
        self.kind.is_incomplete(self.url.as_deref())
    }
}

impl From<&AnnouncementRecord> for IndexedEntry {
    fn from(record: &AnnouncementRecord) -> Self {
        Self {
            record_id: record.record_id,
            info: record.info.clone(),
            url: record.url.clone(),
            kind: record.kind,
            entry_date: record.entry_date,
            action_date: record.action_date,
            author_id: record.author_id,
        }
    }
}

/// One search result: an entry together with the phrase it was filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub phrase: String,
    #[serde(flatten)]
    pub entry: IndexedEntry,
    pub incomplete_link: bool,
}

/// Tag and phrase lookups for a single partition snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    tag_to_phrases: BTreeMap<String, BTreeSet<String>>,
    phrase_to_entries: BTreeMap<String, Vec<IndexedEntry>>,
}

impl SearchIndex {
    /// Builds the index from a snapshot of one partition.
    ///
    /// Records with a blank keyword phrase are skipped. Entries under each
    /// phrase end up newest first; records sharing a phrase and a date keep
    /// their snapshot order.
    pub fn build(records: &[AnnouncementRecord]) -> Self {
        let mut sorted: Vec<&AnnouncementRecord> =
            records.iter().filter(|r| r.has_keyword_phrase()).collect();
        sorted.sort_by(|a, b| {
            a.keyword_phrase
                .cmp(&b.keyword_phrase)
                .then_with(|| b.entry_date.cmp(&a.entry_date))
        });

        let mut phrase_to_entries: BTreeMap<String, Vec<IndexedEntry>> = BTreeMap::new();
        for record in sorted {
            phrase_to_entries
                .entry(record.keyword_phrase.clone())
                .or_default()
                .push(IndexedEntry::from(record));
        }

        let mut tag_to_phrases: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for phrase in phrase_to_entries.keys() {
            for tag in extract_tags(phrase.as_str()) {
                tag_to_phrases
                    .entry(tag)
                    .or_default()
                    .insert(phrase.clone());
            }
        }

        Self {
            tag_to_phrases,
            phrase_to_entries,
        }
    }

    /// Looks the whole normalized query up as a single tag.
    ///
    /// Multi-word queries are not split: "σχολικη εκδρομη" only matches if
    /// that exact string is a tag, which it never is.
    pub fn search(&self, query_text: &str) -> Vec<SearchHit> {
        let tag = normalize(query_text);
        let Some(phrases) = self.tag_to_phrases.get(&tag) else {
            return Vec::new();
        };

        let mut hits: Vec<SearchHit> = phrases
            .iter()
            .filter_map(|phrase| self.phrase_to_entries.get(phrase).map(|e| (phrase, e)))
            .flat_map(|(phrase, entries)| {
                entries.iter().map(move |entry| SearchHit {
                    phrase: phrase.clone(),
                    entry: entry.clone(),
                    incomplete_link: entry.is_incomplete_link(),
                })
            })
            .collect();

        // Stable: equal dates keep the per-phrase concatenation order.
        hits.sort_by(|a, b| b.entry.entry_date.cmp(&a.entry.entry_date));
        hits
    }

    pub fn phrases_for_tag(&self, tag: &str) -> Option<&BTreeSet<String>> {
        self.tag_to_phrases.get(tag)
    }

    pub fn entries_for_phrase(&self, phrase: &str) -> Option<&[IndexedEntry]> {
        self.phrase_to_entries.get(phrase).map(Vec::as_slice)
    }

    /// Distinct keyword phrases in ascending order.
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.phrase_to_entries.keys().map(String::as_str)
    }

    pub fn phrase_count(&self) -> usize {
        self.phrase_to_entries.len()
    }

    pub fn tag_count(&self) -> usize {
        self.tag_to_phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrase_to_entries.is_empty()
    }
}

pub fn build_index(records: &[AnnouncementRecord]) -> SearchIndex {
    SearchIndex::build(records)
}

pub fn search(index: &SearchIndex, query_text: &str) -> Vec<SearchHit> {
    index.search(query_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(phrase: &str, info: &str, entry_date: NaiveDate) -> AnnouncementRecord {
        AnnouncementRecord {
            record_id: Uuid::new_v4(),
            keyword_phrase: phrase.to_string(),
            info: info.to_string(),
            url: None,
            kind: EntryKind::Text,
            entry_date,
            school: "1ο Δημοτικό".to_string(),
            class_section: "Β1".to_string(),
            action_date: None,
            author_id: None,
        }
    }

    #[test]
    fn test_entries_newest_first() {
        let index = build_index(&[
            record("Εκδρομή", "παλιό", date(2024, 1, 5)),
            record("Εκδρομή", "νέο", date(2024, 1, 10)),
        ]);

        let entries = index.entries_for_phrase("Εκδρομή").unwrap();
        let dates: Vec<NaiveDate> = entries.iter().map(|e| e.entry_date).collect();
        assert_eq!(dates, vec![date(2024, 1, 10), date(2024, 1, 5)]);
    }

    #[test]
    fn test_every_phrase_and_tag_is_indexed() {
        let records = vec![
            record("Σχολική Εκδρομή", "α", date(2024, 1, 1)),
            record("Μαθηματικά", "β", date(2024, 1, 2)),
        ];
        let index = build_index(&records);

        for r in &records {
            assert!(index.entries_for_phrase(&r.keyword_phrase).is_some());
            for tag in extract_tags(r.keyword_phrase.as_str()) {
                let phrases = index.phrases_for_tag(&tag).unwrap();
                assert!(phrases.contains(&r.keyword_phrase));
            }
        }
        assert_eq!(index.phrase_count(), 2);
        assert_eq!(index.tag_count(), 3);
    }

    #[test]
    fn test_blank_phrases_are_excluded() {
        let index = build_index(&[
            record("   ", "κενό", date(2024, 1, 1)),
            record("Ιστορία", "κεφάλαιο 2", date(2024, 1, 1)),
        ]);

        assert_eq!(index.phrases().collect::<Vec<_>>(), vec!["Ιστορία"]);
    }

    #[test]
    fn test_shared_tag_deduplicates_phrases() {
        let index = build_index(&[
            record("Εκδρομή Μουσείο", "α", date(2024, 1, 1)),
            record("Εκδρομή Μουσείο", "β", date(2024, 1, 2)),
        ]);

        assert_eq!(index.phrases_for_tag("εκδρομη").unwrap().len(), 1);
    }

    #[test]
    fn test_search_is_accent_insensitive() {
        let index = build_index(&[record("Εκδρομή", "Φύλλο συμμετοχής", date(2024, 2, 3))]);

        assert_eq!(search(&index, "εκδρομη").len(), 1);
        assert_eq!(search(&index, "  ΕΚΔΡΟΜΉ ").len(), 1);
    }

    #[test]
    fn test_search_no_match_is_empty() {
        let index = build_index(&[record("Εκδρομή", "α", date(2024, 2, 3))]);

        assert!(search(&index, "γεωγραφια").is_empty());
        assert!(search(&index, "").is_empty());
        assert!(search(&SearchIndex::default(), "εκδρομη").is_empty());
    }

    #[test]
    fn test_search_merges_phrases_by_date() {
        let index = build_index(&[
            record("σχολικη εκδρομη", "s1", date(2024, 3, 1)),
            record("σχολικη εκδρομη", "s2", date(2024, 3, 5)),
            record("εκδρομη θεατρου", "t1", date(2024, 3, 3)),
            record("θεατρο", "other", date(2024, 3, 9)),
        ]);

        let hits = search(&index, "εκδρομη");
        let infos: Vec<&str> = hits.iter().map(|h| h.entry.info.as_str()).collect();
        assert_eq!(infos, vec!["s2", "t1", "s1"]);
        assert_eq!(hits[1].phrase, "εκδρομη θεατρου");
    }

    #[test]
    fn test_search_equal_dates_keep_phrase_order() {
        let day = date(2024, 3, 1);
        let index = build_index(&[
            record("β εκδρομη", "second", day),
            record("α εκδρομη", "first", day),
        ]);

        let infos: Vec<String> = search(&index, "εκδρομη")
            .into_iter()
            .map(|h| h.entry.info)
            .collect();
        assert_eq!(infos, vec!["first", "second"]);
    }

    #[test]
    fn test_multi_word_query_is_a_single_tag() {
        let index = build_index(&[record("Σχολική Εκδρομή", "α", date(2024, 1, 1))]);

        assert!(search(&index, "σχολικη εκδρομη").is_empty());
        assert_eq!(search(&index, "σχολικη").len(), 1);
    }

    #[test]
    fn test_incomplete_link_is_flagged_not_dropped() {
        let mut broken = record("Εργασία", "Οδηγίες", date(2024, 1, 1));
        broken.kind = EntryKind::Link;
        let index = build_index(&[broken]);

        let hits = search(&index, "εργασια");
        assert_eq!(hits.len(), 1);
        assert!(hits[0].incomplete_link);
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let records = vec![
            record("Εκδρομή Μουσείο", "a", date(2024, 2, 3)),
            record("Εκδρομή", "b", date(2024, 2, 3)),
            record("Μουσική", "c", date(2024, 2, 1)),
        ];

        let first = build_index(&records);
        let second = build_index(&records);
        assert_eq!(first, second);
        assert_eq!(search(&first, "εκδρομη"), search(&second, "εκδρομη"));
    }
}
