//! Anniversary operations and day-count reminders

use super::Journal;
use crate::error::{Error, Result};
use crate::types::{AnniversaryEdit, NewAnniversary, UpcomingAnniversary};
use chrono::{Datelike, NaiveDate};
use keepsake_core::date;
use keepsake_core::{AnniversaryId, AnniversaryRecord};
use tokio::sync::watch;

impl Journal {
    /// Create an anniversary and return it with its assigned id.
    pub fn add_anniversary(&self, anniversary: NewAnniversary) -> Result<AnniversaryRecord> {
        anniversary.validate()?;
        let mut record = anniversary.into_record();
        record.id = self.records.insert_anniversary(record.clone())?;
        Ok(record)
    }

    /// Replace the fields of an existing anniversary.
    pub fn edit_anniversary(
        &self,
        id: AnniversaryId,
        edit: AnniversaryEdit,
    ) -> Result<AnniversaryRecord> {
        edit.validate()?;
        let existing = self
            .records
            .get_anniversary(id)?
            .ok_or_else(|| Error::NotFound(format!("anniversary {}", id)))?;

        let record = AnniversaryRecord {
            id,
            title: edit.title,
            date: edit.date,
            description: edit.description,
            is_important: edit.is_important,
            created_at: existing.created_at,
        };
        self.records.update_anniversary(&record)?;
        Ok(record)
    }

    /// Delete an anniversary.
    pub fn delete_anniversary(&self, id: AnniversaryId) -> Result<AnniversaryRecord> {
        self.records
            .delete_anniversary(id)?
            .ok_or_else(|| Error::NotFound(format!("anniversary {}", id)))
    }

    /// All anniversaries, oldest date first
    pub fn anniversaries(&self) -> Result<Vec<AnniversaryRecord>> {
        Ok(self.records.list_anniversaries()?)
    }

    /// One anniversary by id
    pub fn anniversary(&self, id: AnniversaryId) -> Result<Option<AnniversaryRecord>> {
        Ok(self.records.get_anniversary(id)?)
    }

    /// Receiver that always holds the current anniversary list
    pub fn watch_anniversaries(&self) -> watch::Receiver<Vec<AnniversaryRecord>> {
        self.records.watch_anniversaries()
    }

    /// Days elapsed from `date` to `today`; negative if `date` is in the future
    pub fn days_since(date: NaiveDate, today: NaiveDate) -> i64 {
        date::days_between(date, today)
    }

    /// Days from `today` until `date`; negative if `date` has passed
    pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
        date::days_between(today, date)
    }

    /// Next yearly recurrence of `date` on or after `today`
    pub fn next_occurrence(date: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
        date::next_occurrence(date, today)
    }

    /// Anniversaries recurring within `within_days` of `today`, soonest first
    ///
    /// An anniversary falling on `today` is included with `days_until == 0`.
    /// Dates that have not happened yet for the first time are skipped.
    pub fn upcoming_anniversaries(
        &self,
        today: NaiveDate,
        within_days: i64,
    ) -> Result<Vec<UpcomingAnniversary>> {
        let mut upcoming: Vec<UpcomingAnniversary> = self
            .records
            .list_anniversaries()?
            .into_iter()
            .filter(|a| a.date <= today)
            .filter_map(|anniversary| {
                let next = date::next_occurrence(anniversary.date, today)?;
                let days_until = date::days_between(today, next);
                (days_until <= within_days).then(|| UpcomingAnniversary {
                    years: next.year() - anniversary.date.year(),
                    next,
                    days_until,
                    anniversary,
                })
            })
            .collect();
        upcoming.sort_by(|a, b| {
            a.days_until
                .cmp(&b.days_until)
                .then_with(|| b.anniversary.is_important.cmp(&a.anniversary.is_important))
        });
        Ok(upcoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_counts() {
        let today = ymd(2024, 3, 15);
        assert_eq!(Journal::days_since(ymd(2024, 3, 1), today), 14);
        assert_eq!(Journal::days_until(ymd(2024, 3, 20), today), 5);
        assert_eq!(Journal::days_until(ymd(2024, 3, 10), today), -5);
        assert_eq!(
            Journal::next_occurrence(ymd(2019, 1, 2), today),
            Some(ymd(2025, 1, 2))
        );
    }

    #[test]
    fn test_upcoming_window_and_order() {
        let journal = Journal::ephemeral().unwrap();
        journal
            .add_anniversary(NewAnniversary::new("Met", ymd(2019, 3, 20)))
            .unwrap();
        journal
            .add_anniversary(NewAnniversary::new("Wedding", ymd(2021, 3, 16)).important())
            .unwrap();
        journal
            .add_anniversary(NewAnniversary::new("Far", ymd(2020, 9, 1)))
            .unwrap();
        journal
            .add_anniversary(NewAnniversary::new("Future", ymd(2030, 3, 17)))
            .unwrap();

        let upcoming = journal.upcoming_anniversaries(ymd(2024, 3, 15), 7).unwrap();
        let titles: Vec<_> = upcoming.iter().map(|u| u.anniversary.title.as_str()).collect();
        assert_eq!(titles, vec!["Wedding", "Met"]);
        assert_eq!(upcoming[0].days_until, 1);
        assert_eq!(upcoming[0].years, 3);
        assert_eq!(upcoming[1].next, ymd(2024, 3, 20));
        assert_eq!(upcoming[1].years, 5);
    }

    #[test]
    fn test_edit_and_delete_anniversary() {
        let journal = Journal::ephemeral().unwrap();
        let added = journal
            .add_anniversary(NewAnniversary::new("Met", ymd(2019, 5, 20)))
            .unwrap();
        let edit = NewAnniversary::new("First met", ymd(2019, 5, 21)).with_description("library");
        let edited = journal.edit_anniversary(added.id, edit).unwrap();
        assert_eq!(edited.description.as_deref(), Some("library"));
        assert_eq!(journal.anniversary(added.id).unwrap().unwrap().title, "First met");

        journal.delete_anniversary(added.id).unwrap();
        assert!(journal.anniversaries().unwrap().is_empty());
        assert!(journal.delete_anniversary(added.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_blank_anniversary_title_rejected() {
        let journal = Journal::ephemeral().unwrap();
        let err = journal.add_anniversary(NewAnniversary::new(" ", ymd(2019, 5, 20))).unwrap_err();
        assert!(err.is_invalid_input());
    }
}
