use super::{ScoreQuery, ScoreStore, StoreError};

use crate::{
    models::{NewScoreRecord, ScoreRecord},
    prelude::*,
};

use async_trait::async_trait;
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Response, Url,
};
use tracing::debug;

/// `high_scores` table behind a Supabase (PostgREST) endpoint.
#[derive(Clone, Debug)]
pub struct SupabaseStore {
    http_client: reqwest::Client,
    table_url: Url,
}

impl SupabaseStore {
    pub fn from_config(cfg: &Config) -> Result<Self, StoreError> {
        let url = cfg
            .supabase_url
            .as_deref()
            .ok_or(StoreError::NotConfigured("SUPABASE_URL"))?;
        let key = cfg
            .supabase_key
            .as_deref()
            .ok_or(StoreError::NotConfigured("SUPABASE_KEY"))?;

        return Self::new(url, key, &cfg.scores_table);
    }

    pub fn new(url: &str, key: &str, table: &str) -> Result<Self, StoreError> {
        let base: Url = url
            .parse()
            .map_err(|e| StoreError::InvalidUrl(format!("{url}: {e}")))?;

        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(StoreError::InvalidUrl(url.to_string()));
        }

        let table_url = base
            .join(&format!("rest/v1/{table}"))
            .map_err(|e| StoreError::InvalidUrl(format!("{url}: {e}")))?;

        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(key).map_err(|_| StoreError::InvalidKey)?;
        let bearer =
            HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| StoreError::InvalidKey)?;
        headers.insert("apikey", api_key);
        headers.insert(header::AUTHORIZATION, bearer);

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        return Ok(Self {
            http_client,
            table_url,
        });
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    pub fn query_url(&self, query: &ScoreQuery) -> Url {
        let mut url = self.table_url.clone();

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            if let Some(difficulty) = query.difficulty {
                pairs.append_pair("difficulty", &format!("eq.{difficulty}"));
            }
            pairs.append_pair("order", "attempts.asc,time_taken.asc");
            pairs.append_pair("limit", &query.limit.to_string());
        }

        return url;
    }
}

async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    return Err(StoreError::Rejected {
        status: status.as_u16(),
        body,
    });
}

#[async_trait]
impl ScoreStore for SupabaseStore {
    async fn insert(&self, record: &NewScoreRecord) -> Result<ScoreRecord, StoreError> {
        debug!(url = %self.table_url, "Inserting high score");

        let response = self
            .http_client
            .post(self.table_url.clone())
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;

        let rows: Vec<ScoreRecord> = check(response).await?.json().await?;

        return rows.into_iter().next().ok_or(StoreError::EmptyInsert);
    }

    async fn query(&self, query: &ScoreQuery) -> Result<Vec<ScoreRecord>, StoreError> {
        let url = self.query_url(query);
        debug!(%url, "Querying high scores");

        let response = self.http_client.get(url).send().await?;

        let rows: Vec<ScoreRecord> = check(response).await?.json().await?;

        return Ok(rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::Difficulty;

    #[test]
    fn builds_table_and_query_urls() {
        let store = SupabaseStore::new("https://abc.supabase.co", "key", "high_scores").unwrap();

        assert_eq!(
            store.table_url().as_str(),
            "https://abc.supabase.co/rest/v1/high_scores"
        );

        let url = store.query_url(&ScoreQuery {
            difficulty: Some(Difficulty::Hard),
            limit: 10,
        });
        assert_eq!(
            url.as_str(),
            "https://abc.supabase.co/rest/v1/high_scores?select=*&difficulty=eq.Hard&order=attempts.asc%2Ctime_taken.asc&limit=10"
        );

        let url = store.query_url(&ScoreQuery {
            difficulty: None,
            limit: 3,
        });
        assert!(!url.as_str().contains("difficulty"));
        assert!(url.as_str().ends_with("limit=3"));
    }

    #[test]
    fn rejects_bad_url() {
        assert!(matches!(
            SupabaseStore::new("not a url", "key", "high_scores"),
            Err(StoreError::InvalidUrl(_))
        ));
        assert!(matches!(
            SupabaseStore::new("mailto:someone@example.com", "key", "high_scores"),
            Err(StoreError::InvalidUrl(_))
        ));
    }

    #[test]
    fn rejects_key_that_cannot_be_a_header() {
        assert!(matches!(
            SupabaseStore::new("https://abc.supabase.co", "bad\nkey", "high_scores"),
            Err(StoreError::InvalidKey)
        ));
    }

    #[test]
    fn missing_secrets_are_reported_by_name() {
        let cfg = crate::config::build_from(|key| match key {
            "SUPABASE_URL" => Some("https://abc.supabase.co".to_string()),
            _ => None,
        });

        assert!(matches!(
            SupabaseStore::from_config(&cfg),
            Err(StoreError::NotConfigured("SUPABASE_KEY"))
        ));
    }
}
