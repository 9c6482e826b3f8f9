pub mod client;
pub mod paginate;
pub mod query;
pub mod response;

pub use client::{ClientConfig, ContributionsClient, PageSource, GITHUB_GRAPHQL_ENDPOINT, TOKEN_ENV};
pub use paginate::{fetch_all_pages_for_year, fetch_all_years, year_windows};
pub use query::{build_query, build_query_with_cursors, QueryRequest, CONTRIBUTIONS_QUERY, PAGE_SIZE};
