use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use serde::Deserialize;

/// One unit of user activity. Only the instant it happened is kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionEvent {
    pub occurred_at: String,
}

impl ContributionEvent {
    pub fn new(occurred_at: impl Into<String>) -> Self {
        Self {
            occurred_at: occurred_at.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// Cursor to continue from, if this collection has more pages.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_next_page {
            self.end_cursor.as_deref()
        } else {
            None
        }
    }
}

/// Per-collection `after:` arguments for one query round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursors {
    pub commits: Option<String>,
    pub issues: Option<String>,
    pub pull_requests: Option<String>,
    pub reviews: Option<String>,
    pub repositories: Option<String>,
    /// Commits have no further pages; later rounds leave them out.
    pub commits_done: bool,
}

impl Cursors {
    /// The same cursor applied to every sub-collection.
    pub fn shared(cursor: Option<&str>) -> Self {
        let cursor = cursor.map(str::to_string);
        Self {
            commits: cursor.clone(),
            issues: cursor.clone(),
            pull_requests: cursor.clone(),
            reviews: cursor.clone(),
            repositories: cursor,
            commits_done: false,
        }
    }

    /// Moves every collection to its own end cursor. A collection that reported
    /// no end cursor keeps its previous position. The commit cursor only belongs
    /// to the first repository, so once commits are drained they stop being
    /// requested at all.
    pub fn advance(&self, page: &Page) -> Self {
        fn step(previous: &Option<String>, info: &PageInfo) -> Option<String> {
            info.end_cursor.clone().or_else(|| previous.clone())
        }

        Self {
            commits: step(&self.commits, &page.commits),
            issues: step(&self.issues, &page.issues),
            pull_requests: step(&self.pull_requests, &page.pull_requests),
            reviews: step(&self.reviews, &page.reviews),
            repositories: step(&self.repositories, &page.repositories),
            commits_done: self.commits_done || !page.commits.has_next_page,
        }
    }
}

/// Totals reported alongside each page. Never folded into the event list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarSummary {
    pub total_contributions: u64,
    pub restricted_contributions: u64,
}

/// Result of a single query round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub events: Vec<ContributionEvent>,
    pub commits: PageInfo,
    pub issues: PageInfo,
    pub pull_requests: PageInfo,
    pub reviews: PageInfo,
    pub repositories: PageInfo,
    pub summary: CalendarSummary,
}

impl Page {
    /// Continuation for the next round, derived from commit pagination only.
    pub fn next_cursor(&self) -> Option<&str> {
        self.commits.next_cursor()
    }

    pub fn has_more(&self) -> bool {
        self.commits.has_next_page
    }

    /// True while any collection whose events are extracted has more pages.
    pub fn any_extracted_has_more(&self) -> bool {
        self.commits.has_next_page || self.issues.has_next_page || self.pull_requests.has_next_page
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PaginationMode {
    /// Follow the commit cursor and apply it to every sub-collection.
    #[default]
    Shared,
    /// Track a separate cursor for each sub-collection.
    PerCollection,
}

/// A one-year query range anchored at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearWindow {
    pub start: NaiveDate,
}

impl YearWindow {
    pub fn new(start: NaiveDate) -> Self {
        Self { start }
    }

    /// Exclusive end: the same month and day one year later.
    pub fn end(&self) -> NaiveDate {
        shift_year(self.start, self.start.year() + 1)
    }

    /// The `from:` argument sent to the API.
    pub fn from_timestamp(&self) -> String {
        format!("{}T00:00:00Z", self.start.format("%Y-%m-%d"))
    }
}

/// Same month/day in `year`; Feb 29 falls back to Feb 28 in non-leap years.
pub fn shift_year(date: NaiveDate, year: i32) -> NaiveDate {
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
        .unwrap_or(date)
}
