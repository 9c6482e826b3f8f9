use crate::error::{ContribError, Result};
use crate::model::{CalendarSummary, ContributionEvent, Page, PageInfo};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<ResponseData>,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseData {
    pub user: Option<UserData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub contributions_collection: ContributionsCollection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    #[serde(default)]
    pub nodes: Vec<ContributionEvent>,
    #[serde(default)]
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryCommits {
    pub contributions: Connection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    #[serde(default)]
    pub commit_contributions_by_repository: Vec<RepositoryCommits>,
    pub issue_contributions: Connection,
    pub pull_request_contributions: Connection,
    #[serde(default)]
    pub pull_request_review_contributions: Option<Connection>,
    #[serde(default)]
    pub repository_contributions: Option<Connection>,
    #[serde(default)]
    pub restricted_contributions_count: u64,
    #[serde(default)]
    pub contribution_calendar: Option<ContributionCalendar>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub total_contributions: u64,
}

impl GraphqlResponse {
    /// Turn a decoded body into a page, or a protocol error if the API
    /// reported `errors`.
    pub fn into_page(self) -> Result<Page> {
        if let Some(errors) = self.errors {
            return Err(ContribError::Protocol(errors));
        }

        let user = self
            .data
            .ok_or_else(|| ContribError::MalformedResponse("missing `data`".to_string()))?
            .user
            .ok_or_else(|| ContribError::MalformedResponse("missing `data.user`".to_string()))?;

        Ok(user.contributions_collection.into_page())
    }
}

impl ContributionsCollection {
    /// Events come from commits, issues and pull requests only. Commit
    /// pagination is read from the first repository.
    pub fn into_page(self) -> Page {
        let commits = self
            .commit_contributions_by_repository
            .first()
            .map(|repo| repo.contributions.page_info.clone())
            .unwrap_or_default();

        let mut events = Vec::new();
        for repo in self.commit_contributions_by_repository {
            events.extend(repo.contributions.nodes);
        }
        events.extend(self.issue_contributions.nodes);
        events.extend(self.pull_request_contributions.nodes);

        Page {
            events,
            commits,
            issues: self.issue_contributions.page_info,
            pull_requests: self.pull_request_contributions.page_info,
            reviews: self
                .pull_request_review_contributions
                .map(|c| c.page_info)
                .unwrap_or_default(),
            repositories: self
                .repository_contributions
                .map(|c| c.page_info)
                .unwrap_or_default(),
            summary: CalendarSummary {
                total_contributions: self
                    .contribution_calendar
                    .map(|c| c.total_contributions)
                    .unwrap_or_default(),
                restricted_contributions: self.restricted_contributions_count,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(body: serde_json::Value) -> Result<Page> {
        serde_json::from_value::<GraphqlResponse>(body)?.into_page()
    }

    #[test]
    fn extracts_commits_issues_and_pull_requests_only() {
        let page = decode(json!({
            "data": { "user": { "contributionsCollection": {
                "commitContributionsByRepository": [
                    { "contributions": {
                        "nodes": [{ "occurredAt": "2023-01-02T10:00:00Z" }],
                        "pageInfo": { "hasNextPage": true, "endCursor": "c1" }
                    }},
                    { "contributions": {
                        "nodes": [{ "occurredAt": "2023-01-03T10:00:00Z" }],
                        "pageInfo": { "hasNextPage": false, "endCursor": "other" }
                    }}
                ],
                "issueContributions": {
                    "nodes": [{ "occurredAt": "2023-01-04T10:00:00Z" }],
                    "pageInfo": { "hasNextPage": true, "endCursor": "i1" }
                },
                "pullRequestContributions": {
                    "nodes": [{ "occurredAt": "2023-01-05T10:00:00Z" }],
                    "pageInfo": { "hasNextPage": false, "endCursor": null }
                },
                "pullRequestReviewContributions": {
                    "nodes": [{ "occurredAt": "2023-01-06T10:00:00Z" }],
                    "pageInfo": { "hasNextPage": false, "endCursor": null }
                },
                "repositoryContributions": {
                    "nodes": [{ "occurredAt": "2023-01-06T11:00:00Z" }],
                    "pageInfo": { "hasNextPage": false, "endCursor": null }
                },
                "restrictedContributionsCount": 7,
                "contributionCalendar": { "totalContributions": 42, "weeks": [] }
            }}}
        }))
        .unwrap();

        let dates: Vec<_> = page.events.iter().map(|e| e.occurred_at.as_str()).collect();
        assert_eq!(
            dates,
            [
                "2023-01-02T10:00:00Z",
                "2023-01-03T10:00:00Z",
                "2023-01-04T10:00:00Z",
                "2023-01-05T10:00:00Z",
            ]
        );
        assert_eq!(page.next_cursor(), Some("c1"));
        assert!(page.issues.has_next_page);
        assert_eq!(page.summary.total_contributions, 42);
        assert_eq!(page.summary.restricted_contributions, 7);
    }

    #[test]
    fn no_repositories_means_no_more_pages() {
        let page = decode(json!({
            "data": { "user": { "contributionsCollection": {
                "commitContributionsByRepository": [],
                "issueContributions": { "nodes": [], "pageInfo": { "hasNextPage": true, "endCursor": "i" } },
                "pullRequestContributions": { "nodes": [] }
            }}}
        }))
        .unwrap();
        assert!(!page.has_more());
        assert_eq!(page.next_cursor(), None);
        assert!(page.events.is_empty());
    }

    #[test]
    fn errors_field_is_a_protocol_error() {
        let err = decode(json!({
            "errors": [{ "type": "NOT_FOUND", "message": "Could not resolve to a User" }],
            "data": { "user": null }
        }))
        .unwrap_err();
        assert!(err.is_protocol());
    }

    #[test]
    fn missing_user_is_malformed() {
        let err = decode(json!({ "data": { "user": null } })).unwrap_err();
        assert!(matches!(err, ContribError::MalformedResponse(_)));
    }
}
