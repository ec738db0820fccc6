use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::AnnouncementRecord;

/// Days back from today that still count as "recent".
pub const RECENT_WINDOW_DAYS: i64 = 2;
/// How far ahead the calendar view looks.
pub const UPCOMING_WINDOW_DAYS: i64 = 30;

/// Human label for how far away a scheduled action is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaysRemaining {
    Today,
    Tomorrow,
    InDays(i64),
}

impl DaysRemaining {
    pub fn from_days(days: i64) -> Self {
        match days {
            0 => DaysRemaining::Today,
            1 => DaysRemaining::Tomorrow,
            n => DaysRemaining::InDays(n),
        }
    }
}

impl std::fmt::Display for DaysRemaining {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DaysRemaining::Today => write!(f, "today"),
            DaysRemaining::Tomorrow => write!(f, "tomorrow"),
            DaysRemaining::InDays(n) => write!(f, "in {} days", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingAction {
    #[serde(flatten)]
    pub record: AnnouncementRecord,
    pub days_remaining: i64,
    pub label: String,
}

/// Announcements written in the last [`RECENT_WINDOW_DAYS`] days, newest first.
pub fn recent_window(records: &[AnnouncementRecord], today: NaiveDate) -> Vec<AnnouncementRecord> {
    recent_window_within(records, today, RECENT_WINDOW_DAYS)
}

/// Announcements with `today - days <= entry_date <= today`, newest first.
/// Negative sizes behave as zero.
pub fn recent_window_within(
    records: &[AnnouncementRecord],
    today: NaiveDate,
    days: i64,
) -> Vec<AnnouncementRecord> {
    // Windows reaching past the calendar's range are cut at its edge.
    let start = Duration::try_days(days.max(0))
        .and_then(|span| today.checked_sub_signed(span))
        .unwrap_or(NaiveDate::MIN);

    let mut recent: Vec<AnnouncementRecord> = records
        .iter()
        .filter(|r| r.entry_date >= start && r.entry_date <= today)
        .cloned()
        .collect();
    recent.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
    recent
}

/// Calendar items due within the next [`UPCOMING_WINDOW_DAYS`] days, soonest first.
pub fn upcoming_window(records: &[AnnouncementRecord], today: NaiveDate) -> Vec<UpcomingAction> {
    upcoming_window_within(records, today, UPCOMING_WINDOW_DAYS)
}

/// Calendar items with `today < action_date <= today + days`, soonest first.
pub fn upcoming_window_within(
    records: &[AnnouncementRecord],
    today: NaiveDate,
    days: i64,
) -> Vec<UpcomingAction> {
    let end = Duration::try_days(days.max(0))
        .and_then(|span| today.checked_add_signed(span))
        .unwrap_or(NaiveDate::MAX);

    let mut upcoming: Vec<UpcomingAction> = records
        .iter()
        .filter_map(|record| {
            let action_date = record.action_date?;
            if action_date <= today || action_date > end {
                return None;
            }
            let days_remaining = (action_date - today).num_days();
            Some(UpcomingAction {
                record: record.clone(),
                days_remaining,
                label: DaysRemaining::from_days(days_remaining).to_string(),
            })
        })
        .collect();
    upcoming.sort_by_key(|u| u.record.action_date);
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryKind;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(info: &str, entry_date: NaiveDate, action_date: Option<NaiveDate>) -> AnnouncementRecord {
        AnnouncementRecord {
            record_id: Uuid::new_v4(),
            keyword_phrase: "Ανακοίνωση".to_string(),
            info: info.to_string(),
            url: None,
            kind: EntryKind::Text,
            entry_date,
            school: "1ο Δημοτικό".to_string(),
            class_section: "Β1".to_string(),
            action_date,
            author_id: None,
        }
    }

    #[test]
    fn test_recent_window_boundaries() {
        let today = date(2024, 3, 10);
        let records = vec![
            record("edge", date(2024, 3, 8), None),
            record("too-old", date(2024, 3, 7), None),
            record("today", date(2024, 3, 10), None),
            record("future", date(2024, 3, 11), None),
            record("yesterday", date(2024, 3, 9), None),
        ];

        let infos: Vec<String> = recent_window(&records, today)
            .into_iter()
            .map(|r| r.info)
            .collect();
        assert_eq!(infos, vec!["today", "yesterday", "edge"]);
    }

    #[test]
    fn test_recent_window_empty() {
        assert!(recent_window(&[], date(2024, 3, 10)).is_empty());
    }

    #[test]
    fn test_upcoming_window_boundaries() {
        let today = date(2024, 3, 10);
        let records = vec![
            record("same-day", today, Some(today)),
            record("last-day", today, Some(today + Duration::days(30))),
            record("too-far", today, Some(today + Duration::days(31))),
            record("tomorrow", today, Some(today + Duration::days(1))),
            record("past", today, Some(today - Duration::days(1))),
            record("no-date", today, None),
        ];

        let upcoming = upcoming_window(&records, today);
        let infos: Vec<&str> = upcoming.iter().map(|u| u.record.info.as_str()).collect();
        assert_eq!(infos, vec!["tomorrow", "last-day"]);
        assert_eq!(upcoming[0].label, "tomorrow");
        assert_eq!(upcoming[1].days_remaining, 30);
        assert_eq!(upcoming[1].label, "in 30 days");
    }

    #[test]
    fn test_upcoming_window_sorted_by_action_date() {
        let today = date(2024, 3, 10);
        let records = vec![
            record("later", date(2024, 3, 1), Some(date(2024, 3, 20))),
            record("sooner", date(2024, 3, 9), Some(date(2024, 3, 12))),
        ];

        let upcoming = upcoming_window(&records, today);
        assert_eq!(upcoming[0].record.info, "sooner");
        assert_eq!(upcoming[0].label, "in 2 days");
        assert_eq!(upcoming[1].record.info, "later");
    }

    #[test]
    fn test_days_remaining_labels() {
        assert_eq!(DaysRemaining::from_days(0).to_string(), "today");
        assert_eq!(DaysRemaining::from_days(1).to_string(), "tomorrow");
        assert_eq!(DaysRemaining::from_days(7).to_string(), "in 7 days");
    }

    #[test]
    fn test_custom_window_sizes() {
        let today = date(2024, 3, 10);
        let records = vec![record("week-old", date(2024, 3, 3), Some(date(2024, 4, 20)))];

        assert!(recent_window(&records, today).is_empty());
        assert_eq!(recent_window_within(&records, today, 7).len(), 1);
        assert!(upcoming_window(&records, today).is_empty());
        assert_eq!(upcoming_window_within(&records, today, 60).len(), 1);
    }

    #[test]
    fn test_windows_at_calendar_edges() {
        let last = NaiveDate::MAX;
        let first = NaiveDate::MIN;

        assert!(upcoming_window(&[], last).is_empty());
        assert!(recent_window(&[], first).is_empty());

        let records = vec![
            record("first-day", first, None),
            record("last-day", last, Some(last)),
        ];
        let recent: Vec<String> = recent_window(&records, first).into_iter().map(|r| r.info).collect();
        assert_eq!(recent, vec!["first-day"]);
        assert!(upcoming_window(&records, last).is_empty());

        let eve = last.pred_opt().unwrap();
        let upcoming = upcoming_window(&records, eve);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].label, "tomorrow");
    }

    #[test]
    fn test_huge_and_negative_window_sizes() {
        let today = date(2024, 3, 10);
        let records = vec![record("far", date(1900, 1, 1), Some(date(2300, 1, 1)))];

        assert_eq!(recent_window_within(&records, today, i64::MAX).len(), 1);
        assert_eq!(upcoming_window_within(&records, today, i64::MAX).len(), 1);
        assert!(recent_window_within(&records, today, -5).is_empty());
        assert!(upcoming_window_within(&records, today, i64::MIN).is_empty());
    }
}
