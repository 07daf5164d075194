use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Error, Result};
use crate::models::{Company, Difficulty, Problem, SolvedStatus, Topic};
use crate::publisher::{ListApi, PublishError};

const BASE_URL: &str = "https://leetcode.com";
const RATINGS_URL: &str =
    "https://raw.githubusercontent.com/zerotrac/leetcode_problem_rating/main/ratings.txt";
const PAGE_SIZE: u32 = 100;
const PAGE_DELAY: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const PROBLEMSET_QUERY: &str = "
query problemsetQuestionList($categorySlug: String, $limit: Int, $skip: Int, $filters: QuestionListFilterInput) {
    problemsetQuestionList: questionList(
        categorySlug: $categorySlug
        limit: $limit
        skip: $skip
        filters: $filters
    ) {
        total: totalNum
        questions: data {
            questionId
            frontendQuestionId: questionFrontendId
            title
            titleSlug
            difficulty
            acRate
            freqBar
            paidOnly: isPaidOnly
            status
            likes
            dislikes
            topicTags { name id slug }
            companyTags { name slug }
        }
    }
}";

const USER_STATUS_QUERY: &str = "
query {
    userStatus {
        username
        isSignedIn
    }
}";

const QUESTION_ID_QUERY: &str = "
query questionData($titleSlug: String!) {
    question(titleSlug: $titleSlug) {
        questionId
        titleSlug
        title
    }
}";

const ADD_TO_FAVORITE_MUTATION: &str = "
mutation addQuestionToFavorite($favoriteIdHash: String!, $questionId: String!) {
    addQuestionToFavorite(favoriteIdHash: $favoriteIdHash, questionId: $questionId) {
        ok
        error
        favoriteIdHash
        questionId
    }
}";

pub struct ApiClient {
    http: Client,
    session: String,
    csrf: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct UserStatusData {
    #[serde(rename = "userStatus")]
    user_status: UserStatus,
}

#[derive(Debug, Deserialize)]
struct UserStatus {
    username: Option<String>,
    #[serde(rename = "isSignedIn")]
    is_signed_in: bool,
}

#[derive(Debug, Deserialize)]
struct ProblemsetData {
    #[serde(rename = "problemsetQuestionList")]
    problemset: Option<ProblemsetQuestionList>,
}

#[derive(Debug, Deserialize)]
struct ProblemsetQuestionList {
    total: u32,
    questions: Vec<RawProblem>,
}

#[derive(Debug, Deserialize)]
struct QuestionData {
    question: Option<RawQuestionRef>,
}

#[derive(Debug, Deserialize)]
struct RawQuestionRef {
    #[serde(rename = "questionId")]
    question_id: String,
}

#[derive(Debug, Deserialize)]
struct AddToFavoriteData {
    #[serde(rename = "addQuestionToFavorite")]
    result: Option<AddToFavoriteResult>,
}

#[derive(Debug, Deserialize)]
struct AddToFavoriteResult {
    ok: bool,
    error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTag {
    pub name: String,
    pub slug: String,
}

/// One catalog entry as the platform's GraphQL API reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProblem {
    pub question_id: String,
    pub frontend_question_id: String,
    pub title: String,
    pub title_slug: String,
    pub difficulty: String,
    pub ac_rate: f64,
    pub freq_bar: Option<f64>,
    pub paid_only: bool,
    pub status: Option<String>,
    pub likes: u32,
    pub dislikes: u32,
    #[serde(default)]
    pub topic_tags: Vec<RawTag>,
    #[serde(default)]
    pub company_tags: Option<Vec<RawTag>>,
}

impl RawProblem {
    /// Convert the raw record into domain types. Returns None when the
    /// question id is not numeric, which the catalog cannot represent.
    pub fn into_catalog(self, rating: f64) -> Option<(Problem, Vec<Topic>, Vec<Company>)> {
        let question_id: u32 = match self.question_id.parse() {
            Ok(id) => id,
            Err(_) => {
                warn!("skipping '{}': non-numeric id {}", self.title_slug, self.question_id);
                return None;
            }
        };

        let problem = Problem {
            question_id,
            frontend_id: self.frontend_question_id,
            title: self.title,
            url: Problem::canonical_url(&self.title_slug),
            difficulty: self.difficulty.parse().unwrap_or(Difficulty::Medium),
            acceptance_rate: self.ac_rate,
            frequency: self.freq_bar,
            likes: self.likes,
            dislikes: self.dislikes,
            rating,
            paid_only: self.paid_only,
            status: SolvedStatus::from_db(self.status.as_deref()),
            slug: self.title_slug,
        };

        let topics = self
            .topic_tags
            .into_iter()
            .map(|t| Topic { name: t.name, slug: t.slug })
            .collect();
        let companies = self
            .company_tags
            .unwrap_or_default()
            .into_iter()
            .map(|c| Company { name: c.name, slug: c.slug })
            .collect();

        Some((problem, topics, companies))
    }
}

impl ApiClient {
    pub fn new(session: &str, csrf: &str) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(ApiClient {
            http,
            session: session.to_string(),
            csrf: csrf.to_string(),
            base_url: BASE_URL.to_string(),
        })
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(
                "Cookie",
                format!("csrftoken={}; LEETCODE_SESSION={}", self.csrf, self.session),
            )
            .header("X-CSRFToken", &self.csrf)
            .header("Referer", format!("{}/", self.base_url))
            .header("Origin", &self.base_url)
    }

    fn graphql<T: serde::de::DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let url = format!("{}/graphql", self.base_url);
        let payload = json!({ "query": query, "variables": variables });

        let response = self.with_auth(self.http.post(&url)).json(&payload).send()?;
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::PublishAuthFailed(format!("HTTP {}", status)));
        }
        let response = response.error_for_status()?;

        let body: GraphQlResponse<T> = response.json()?;
        if let Some(errors) = body.errors {
            return Err(Error::DataUnavailable(format!("GraphQL error: {}", errors)));
        }
        body.data
            .ok_or_else(|| Error::DataUnavailable("empty GraphQL response".to_string()))
    }

    /// Check the stored tokens against the platform. Returns the
    /// authenticated username.
    pub fn verify_auth(&self) -> Result<String> {
        if self.session.is_empty() || self.csrf.is_empty() {
            return Err(Error::PublishAuthFailed(
                "authentication tokens not set; run `login` first".to_string(),
            ));
        }

        let data: UserStatusData = self.graphql(USER_STATUS_QUERY, json!({}))?;
        if data.user_status.is_signed_in {
            data.user_status.username.ok_or_else(|| {
                Error::PublishAuthFailed("signed in but no username returned".to_string())
            })
        } else {
            Err(Error::PublishAuthFailed(
                "session rejected; update your session and CSRF tokens".to_string(),
            ))
        }
    }

    /// Download the full problem catalog, one page at a time with a
    /// polite delay between requests.
    pub fn fetch_problems(&self) -> Result<Vec<RawProblem>> {
        let mut problems = Vec::new();
        let mut skip = 0u32;
        let mut total = 0u32;

        loop {
            let variables = json!({
                "categorySlug": "",
                "limit": PAGE_SIZE,
                "skip": skip,
                "filters": {}
            });
            let data: ProblemsetData = self.graphql(PROBLEMSET_QUERY, variables)?;
            let page = data
                .problemset
                .ok_or_else(|| Error::DataUnavailable("no problem data returned".to_string()))?;

            if total == 0 {
                total = page.total;
                info!("catalog reports {} problems", total);
            }

            let batch = page.questions.len();
            problems.extend(page.questions);
            debug!("fetched {} / {} problems", problems.len(), total);

            skip += PAGE_SIZE;
            if skip >= total || batch == 0 {
                break;
            }
            thread::sleep(PAGE_DELAY);
        }

        Ok(problems)
    }

    /// Download the community slug-to-rating table.
    pub fn fetch_rating_table(&self) -> Result<HashMap<String, f64>> {
        let response = self.http.get(RATINGS_URL).send()?.error_for_status()?;
        let text = response.text()?;
        let table = parse_rating_table(&text);
        info!("loaded {} problem ratings", table.len());
        Ok(table)
    }
}

/// Tab-separated lines: rating in the first column, slug in the fifth.
pub fn parse_rating_table(text: &str) -> HashMap<String, f64> {
    let mut table = HashMap::new();
    for line in text.lines() {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() >= 5 {
            if let Ok(rating) = fields[0].parse::<f64>() {
                table.insert(fields[4].to_string(), rating);
            }
        }
    }
    table
}

impl ListApi for ApiClient {
    fn resolve_problem_id(&self, problem: &str) -> std::result::Result<String, PublishError> {
        // Numeric input is already an id.
        if problem.chars().all(|c| c.is_ascii_digit()) && !problem.is_empty() {
            return Ok(problem.to_string());
        }

        let variables = json!({ "titleSlug": problem });
        let data: QuestionData = self
            .graphql(QUESTION_ID_QUERY, variables)
            .map_err(PublishError::from_api)?;
        match data.question {
            Some(q) => Ok(q.question_id),
            None => Err(PublishError::Item(format!(
                "no problem with slug '{}'",
                problem
            ))),
        }
    }

    fn add_to_list(&self, list_id: &str, question_id: &str) -> std::result::Result<(), PublishError> {
        let variables = json!({ "favoriteIdHash": list_id, "questionId": question_id });
        let data: AddToFavoriteData = self
            .graphql(ADD_TO_FAVORITE_MUTATION, variables)
            .map_err(PublishError::from_api)?;

        match data.result {
            Some(result) if result.ok => Ok(()),
            Some(result) => {
                let message = result.error.unwrap_or_else(|| "unknown error".to_string());
                let lowered = message.to_lowercase();
                if lowered.contains("not found") || lowered.contains("does not exist") {
                    Err(PublishError::ListNotFound(list_id.to_string()))
                } else {
                    Err(PublishError::Item(message))
                }
            }
            None => Err(PublishError::Item("empty mutation response".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_problem_converts_to_domain_types() {
        let raw: RawProblem = serde_json::from_str(
            r#"{
                "questionId": "200",
                "frontendQuestionId": "200",
                "title": "Number of Islands",
                "titleSlug": "number-of-islands",
                "difficulty": "Medium",
                "acRate": 57.3,
                "freqBar": 75.0,
                "paidOnly": false,
                "status": "notac",
                "likes": 20000,
                "dislikes": 450,
                "topicTags": [
                    {"name": "Graph", "slug": "graph"},
                    {"name": "Breadth-First Search", "slug": "breadth-first-search"}
                ],
                "companyTags": [{"name": "Google", "slug": "google"}]
            }"#,
        )
        .unwrap();

        let (problem, topics, companies) = raw.into_catalog(1900.0).unwrap();
        assert_eq!(problem.question_id, 200);
        assert_eq!(problem.difficulty, Difficulty::Medium);
        assert_eq!(problem.status, SolvedStatus::Attempted);
        assert_eq!(problem.rating, 1900.0);
        assert_eq!(problem.url, "https://leetcode.com/problems/number-of-islands/description/");
        assert_eq!(topics.len(), 2);
        assert_eq!(companies[0].name, "Google");
    }

    #[test]
    fn missing_optional_fields_deserialize() {
        let raw: RawProblem = serde_json::from_str(
            r#"{
                "questionId": "1",
                "frontendQuestionId": "1",
                "title": "Two Sum",
                "titleSlug": "two-sum",
                "difficulty": "Easy",
                "acRate": 49.1,
                "freqBar": null,
                "paidOnly": false,
                "status": null,
                "likes": 1,
                "dislikes": 0,
                "companyTags": null
            }"#,
        )
        .unwrap();

        let (problem, topics, companies) = raw.into_catalog(0.0).unwrap();
        assert_eq!(problem.frequency, None);
        assert_eq!(problem.status, SolvedStatus::Unsolved);
        assert!(topics.is_empty());
        assert!(companies.is_empty());
    }

    #[test]
    fn non_numeric_question_id_is_skipped() {
        let raw: RawProblem = serde_json::from_str(
            r#"{
                "questionId": "abc",
                "frontendQuestionId": "1",
                "title": "Weird",
                "titleSlug": "weird",
                "difficulty": "Easy",
                "acRate": 10.0,
                "freqBar": null,
                "paidOnly": false,
                "status": null,
                "likes": 0,
                "dislikes": 0
            }"#,
        )
        .unwrap();
        assert!(raw.into_catalog(0.0).is_none());
    }

    #[test]
    fn rating_table_parses_valid_lines_only() {
        let text = "1923.8\t200\tNumber of Islands\t200\tnumber-of-islands\n\
                    garbage line\n\
                    not-a-number\tx\ty\tz\tsome-slug\n\
                    2205.0\t4\tMedian\t4\tmedian-of-two-sorted-arrays\n";
        let table = parse_rating_table(text);
        assert_eq!(table.len(), 2);
        assert_eq!(table["number-of-islands"], 1923.8);
        assert_eq!(table["median-of-two-sorted-arrays"], 2205.0);
    }
}
