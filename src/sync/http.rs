use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::RemoteConfig;
use crate::sync::remote::{
    DailyProgressRow, PhraseProgressRow, ProfileRow, RemoteError, RemoteStore, VocabularyRow,
};

/// PostgREST 约定的表名
mod tables {
    pub const PROFILES: &str = "profiles";
    pub const VOCABULARY: &str = "vocabulary";
    pub const PHRASE_PROGRESS: &str = "user_phrase_progress";
    pub const DAILY_PROGRESS: &str = "daily_progress";
}

/// HTTP implementation of [`RemoteStore`] speaking PostgREST conventions:
/// `?column=eq.value` filters for selects, `Prefer: resolution=merge-duplicates`
/// for upserts.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpRemoteStore {
    pub fn new(config: &RemoteConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    async fn upsert<T: Serialize + ?Sized>(&self, table: &str, body: &T) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "resolution=merge-duplicates")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, RemoteError> {
        let response = self
            .client
            .get(self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(filters)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    fn by_user(user_id: &str) -> Vec<(&'static str, String)> {
        vec![("user_id", format!("eq.{user_id}"))]
    }
}

#[async_trait::async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn upsert_profile(&self, row: &ProfileRow) -> Result<(), RemoteError> {
        // PostgREST upserts take arrays even for a single row
        self.upsert(tables::PROFILES, std::slice::from_ref(row)).await
    }

    async fn upsert_vocabulary(&self, rows: &[VocabularyRow]) -> Result<(), RemoteError> {
        if rows.is_empty() {
            return Ok(());
        }
        self.upsert(tables::VOCABULARY, rows).await
    }

    async fn upsert_phrase_progress(&self, rows: &[PhraseProgressRow]) -> Result<(), RemoteError> {
        if rows.is_empty() {
            return Ok(());
        }
        self.upsert(tables::PHRASE_PROGRESS, rows).await
    }

    async fn upsert_daily_progress(&self, row: &DailyProgressRow) -> Result<(), RemoteError> {
        self.upsert(tables::DAILY_PROGRESS, std::slice::from_ref(row))
            .await
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<ProfileRow>, RemoteError> {
        let rows: Vec<ProfileRow> = self
            .select(tables::PROFILES, &Self::by_user(user_id))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn fetch_vocabulary(&self, user_id: &str) -> Result<Vec<VocabularyRow>, RemoteError> {
        self.select(tables::VOCABULARY, &Self::by_user(user_id))
            .await
    }

    async fn fetch_phrase_progress(
        &self,
        user_id: &str,
    ) -> Result<Vec<PhraseProgressRow>, RemoteError> {
        self.select(tables::PHRASE_PROGRESS, &Self::by_user(user_id))
            .await
    }

    async fn fetch_daily_progress(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyProgressRow>, RemoteError> {
        let mut filters = Self::by_user(user_id);
        filters.push(("date", format!("eq.{date}")));
        let rows: Vec<DailyProgressRow> = self.select(tables::DAILY_PROGRESS, &filters).await?;
        Ok(rows.into_iter().next())
    }
}
