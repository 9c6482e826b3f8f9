use crate::error::Result;
use crate::model::ContributionEvent;
use crate::util::{parse_timestamp, week_key, year_week};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;

pub const DEFAULT_CAP: u32 = 10;

pub const WEEKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// One (year, ISO week) bucket with a count per working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekColumn {
    pub year: i32,
    pub week: u32,
    /// Indexed Monday (0) through Friday (4).
    pub counts: [u32; 5],
}

impl WeekColumn {
    fn new(year: i32, week: u32) -> Self {
        Self {
            year,
            week,
            counts: [0; 5],
        }
    }

    pub fn key(&self) -> String {
        week_key(self.year, self.week)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }
}

/// Weekday × week matrix. Columns hold only the buckets seen in the data,
/// ordered by (year, week).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributionGrid {
    columns: Vec<WeekColumn>,
}

impl ContributionGrid {
    pub fn columns(&self) -> &[WeekColumn] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Count for a cell; 0 for weekends and unseen buckets.
    pub fn get(&self, weekday: Weekday, year: i32, week: u32) -> u32 {
        let Some(row) = weekday_row(weekday) else {
            return 0;
        };
        self.columns
            .binary_search_by(|c| (c.year, c.week).cmp(&(year, week)))
            .map(|idx| self.columns[idx].counts[row])
            .unwrap_or(0)
    }

    pub fn max(&self) -> u32 {
        self.columns
            .iter()
            .flat_map(|c| c.counts)
            .max()
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.columns.iter().map(WeekColumn::total).sum()
    }

    /// Column index of the first bucket of each calendar year.
    pub fn year_ticks(&self) -> Vec<(usize, i32)> {
        let mut ticks: Vec<(usize, i32)> = Vec::new();
        for (idx, column) in self.columns.iter().enumerate() {
            if ticks.last().map_or(true, |&(_, year)| year != column.year) {
                ticks.push((idx, column.year));
            }
        }
        ticks
    }
}

pub fn weekday_row(weekday: Weekday) -> Option<usize> {
    let idx = weekday.num_days_from_monday() as usize;
    (idx < WEEKDAYS.len()).then_some(idx)
}

pub fn extract_dates(events: &[ContributionEvent]) -> Vec<String> {
    events.iter().map(|e| e.occurred_at.clone()).collect()
}

/// Count events per UTC date, drop weekends, then pivot into
/// (weekday, year, week) cells.
pub fn build_grid<S: AsRef<str>>(dates: &[S]) -> Result<ContributionGrid> {
    let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for raw in dates {
        let day = parse_timestamp(raw.as_ref())?;
        *per_day.entry(day).or_insert(0) += 1;
    }

    let mut buckets: BTreeMap<(i32, u32), WeekColumn> = BTreeMap::new();
    for (day, count) in per_day {
        let Some(row) = weekday_row(day.weekday()) else {
            continue;
        };
        let (year, week) = year_week(day);
        buckets
            .entry((year, week))
            .or_insert_with(|| WeekColumn::new(year, week))
            .counts[row] += count;
    }

    Ok(ContributionGrid {
        columns: buckets.into_values().collect(),
    })
}

pub fn cap_value(value: u32, cap: u32) -> u32 {
    value.min(cap)
}

/// Clamp every cell to at most `cap`.
pub fn cap_grid(grid: &ContributionGrid, cap: u32) -> ContributionGrid {
    ContributionGrid {
        columns: grid
            .columns
            .iter()
            .map(|c| WeekColumn {
                counts: c.counts.map(|v| cap_value(v, cap)),
                ..*c
            })
            .collect(),
    }
}
