use crate::model::{Cursors, YearWindow};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};

/// Items requested per sub-collection per round. Also the repository cap for
/// commits grouped by repository.
pub const PAGE_SIZE: u32 = 100;

pub const CONTRIBUTIONS_QUERY: &str = r#"
query Contributions(
  $login: String!,
  $from: DateTime!,
  $perPage: Int!,
  $withCommits: Boolean!,
  $afterCommits: String,
  $afterIssues: String,
  $afterPullRequests: String,
  $afterReviews: String,
  $afterRepositories: String
) {
  user(login: $login) {
    contributionsCollection(from: $from) {
      commitContributionsByRepository(maxRepositories: $perPage) @include(if: $withCommits) {
        contributions(first: $perPage, after: $afterCommits) {
          nodes { occurredAt }
          pageInfo { hasNextPage endCursor }
        }
      }
      issueContributions(first: $perPage, after: $afterIssues) {
        nodes { occurredAt }
        pageInfo { hasNextPage endCursor }
      }
      pullRequestContributions(first: $perPage, after: $afterPullRequests) {
        nodes { occurredAt }
        pageInfo { hasNextPage endCursor }
      }
      pullRequestReviewContributions(first: $perPage, after: $afterReviews) {
        nodes { occurredAt }
        pageInfo { hasNextPage endCursor }
      }
      repositoryContributions(first: $perPage, after: $afterRepositories) {
        nodes { occurredAt }
        pageInfo { hasNextPage endCursor }
      }
      restrictedContributionsCount
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            contributionCount
            date
          }
        }
      }
    }
  }
}
"#;

/// Request body for one query round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    pub query: &'static str,
    pub variables: Value,
}

/// Query for one year window starting at `from_date`, with `cursor` applied
/// to every sub-collection.
pub fn build_query(username: &str, from_date: NaiveDate, cursor: Option<&str>) -> QueryRequest {
    build_query_with_cursors(username, from_date, &Cursors::shared(cursor))
}

pub fn build_query_with_cursors(
    username: &str,
    from_date: NaiveDate,
    cursors: &Cursors,
) -> QueryRequest {
    QueryRequest {
        query: CONTRIBUTIONS_QUERY,
        variables: build_variables(username, from_date, cursors),
    }
}

pub fn build_variables(username: &str, from_date: NaiveDate, cursors: &Cursors) -> Value {
    json!({
        "login": username,
        "from": YearWindow::new(from_date).from_timestamp(),
        "perPage": PAGE_SIZE,
        "withCommits": !cursors.commits_done,
        "afterCommits": cursors.commits,
        "afterIssues": cursors.issues,
        "afterPullRequests": cursors.pull_requests,
        "afterReviews": cursors.reviews,
        "afterRepositories": cursors.repositories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
    }

    #[test]
    fn first_round_sends_no_cursors() {
        let request = build_query("octocat", from(), None);
        let vars = &request.variables;
        assert_eq!(vars["login"], "octocat");
        assert_eq!(vars["from"], "2021-03-01T00:00:00Z");
        assert_eq!(vars["perPage"], 100);
        assert_eq!(vars["withCommits"], true);
        for key in [
            "afterCommits",
            "afterIssues",
            "afterPullRequests",
            "afterReviews",
            "afterRepositories",
        ] {
            assert!(vars[key].is_null(), "{key} should be null");
        }
    }

    #[test]
    fn query_requests_every_collection_and_calendar() {
        for field in [
            "commitContributionsByRepository(maxRepositories: $perPage)",
            "issueContributions(first: $perPage, after: $afterIssues)",
            "pullRequestContributions(first: $perPage, after: $afterPullRequests)",
            "pullRequestReviewContributions(first: $perPage, after: $afterReviews)",
            "repositoryContributions(first: $perPage, after: $afterRepositories)",
            "restrictedContributionsCount",
            "totalContributions",
            "contributionCount",
        ] {
            assert!(CONTRIBUTIONS_QUERY.contains(field), "missing {field}");
        }
        assert_eq!(CONTRIBUTIONS_QUERY.matches("pageInfo").count(), 5);
        assert_eq!(CONTRIBUTIONS_QUERY.matches("occurredAt").count(), 5);
    }

    #[test]
    fn cursor_is_applied_to_every_collection() {
        let vars = build_query("octocat", from(), Some("Y3Vyc29y")).variables;
        let applied = vars
            .as_object()
            .unwrap()
            .iter()
            .filter(|(k, v)| k.starts_with("after") && v.as_str() == Some("Y3Vyc29y"))
            .count();
        assert_eq!(applied, 5);
    }

    #[test]
    fn per_collection_cursors_are_independent() {
        let cursors = Cursors {
            commits: Some("c".into()),
            issues: Some("i".into()),
            ..Cursors::default()
        };
        let vars = build_query_with_cursors("octocat", from(), &cursors).variables;
        assert_eq!(vars["afterCommits"], "c");
        assert_eq!(vars["afterIssues"], "i");
        assert!(vars["afterPullRequests"].is_null());
    }

    #[test]
    fn drained_commits_are_left_out() {
        let cursors = Cursors {
            commits: Some("c".into()),
            commits_done: true,
            ..Cursors::default()
        };
        let vars = build_variables("octocat", from(), &cursors);
        assert_eq!(vars["withCommits"], false);
    }

    #[test]
    fn login_is_sent_verbatim() {
        let request = build_query("a\"b\\c\u{7}", from(), None);
        assert_eq!(request.variables["login"], "a\"b\\c\u{7}");
        assert!(!request.query.contains("a\"b"));
        let body = serde_json::to_string(&request).unwrap();
        let decoded: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(decoded["variables"]["login"], "a\"b\\c\u{7}");
    }
}
