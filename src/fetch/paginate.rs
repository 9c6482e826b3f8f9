use crate::error::{ContribError, Result};
use crate::fetch::client::PageSource;
use crate::model::{shift_year, ContributionEvent, Cursors, PaginationMode, YearWindow};
use chrono::{Datelike, NaiveDate};
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

/// One window per whole-year offset from `start`, for offsets
/// `0..(end.year - start.year)`. Same-year ranges yield no windows.
pub fn year_windows(start: NaiveDate, end: NaiveDate) -> Vec<YearWindow> {
    (start.year()..end.year())
        .map(|year| YearWindow::new(shift_year(start, year)))
        .collect()
}

/// Walk every page of one window. A GraphQL error ends the window early but
/// keeps whatever was collected before it; transport errors propagate.
pub async fn fetch_all_pages_for_year<S: PageSource>(
    source: &S,
    username: &str,
    window: &YearWindow,
    mode: PaginationMode,
    progress: &ProgressBar,
) -> Result<Vec<ContributionEvent>> {
    let mut events = Vec::new();
    let mut cursors = Cursors::default();
    let mut pages = 0usize;

    loop {
        let page = match source
            .fetch_page_with_cursors(username, window.start, &cursors)
            .await
        {
            Ok(page) => page,
            Err(ContribError::Protocol(errors)) => {
                warn!(window = %window.start, "GraphQL API returned errors: {errors}");
                break;
            }
            Err(e) => return Err(e),
        };

        pages += 1;
        if pages == 1 {
            debug!(
                window = %window.start,
                total = page.summary.total_contributions,
                restricted = page.summary.restricted_contributions,
                "calendar summary"
            );
        }

        let next = match mode {
            PaginationMode::Shared => page.next_cursor().map(|c| Cursors::shared(Some(c))),
            PaginationMode::PerCollection => {
                if page.any_extracted_has_more() {
                    Some(cursors.advance(&page))
                } else {
                    None
                }
            }
        };

        if mode == PaginationMode::Shared && page.has_more() && page.next_cursor().is_none() {
            warn!(window = %window.start, "commit page reports more results but no cursor");
        }

        events.extend(page.events);
        progress.set_message(format!(
            "{}: page {pages}, {} contributions",
            window.start.year(),
            events.len()
        ));

        match next {
            Some(c) if c != cursors => cursors = c,
            Some(_) => {
                warn!(window = %window.start, "cursor did not advance; stopping");
                break;
            }
            None => break,
        }
    }

    info!(window = %window.start, pages, events = events.len(), "window complete");
    Ok(events)
}

/// Fetch every window between `start` and `end` in ascending order and
/// concatenate the results.
pub async fn fetch_all_years<S: PageSource>(
    source: &S,
    username: &str,
    start: NaiveDate,
    end: NaiveDate,
    mode: PaginationMode,
    progress: &ProgressBar,
) -> Result<Vec<ContributionEvent>> {
    let windows = year_windows(start, end);
    info!(%username, windows = windows.len(), "fetching contributions");

    let mut per_window = Vec::with_capacity(windows.len());
    for window in &windows {
        per_window.push(fetch_all_pages_for_year(source, username, window, mode, progress).await?);
    }

    Ok(per_window.concat())
}
