use async_trait::async_trait;
use reqwest::{header, Client, Response};

use super::types::*;
use crate::config::Config;
use crate::error::{BoardError, Result};

/// Backend REST contract. The board only talks to the backend through this
/// trait so commands can run against a recording double in tests.
#[async_trait]
pub trait BoardApi: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>>;
    async fn create_task(&self, task: &NewTask) -> Result<Task>;
    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> Result<Task>;
    async fn delete_task(&self, id: TaskId) -> Result<()>;

    async fn list_schedule(&self) -> Result<Vec<ScheduleEntry>>;
    async fn create_schedule_entry(&self, entry: &NewScheduleEntry) -> Result<ScheduleEntry>;
    async fn update_schedule_entry(&self, id: EntryId, update: &EntryUpdate) -> Result<ScheduleEntry>;
    async fn delete_schedule_entry(&self, id: EntryId) -> Result<()>;
    /// Replace today's schedule with copies of the planned tasks
    async fn sync_schedule(&self) -> Result<Vec<ScheduleEntry>>;

    async fn sunset(&self, latitude: f64, longitude: f64) -> Result<SunsetResponse>;
}

pub struct BoardClient {
    client: Client,
    base_url: String,
}

impl BoardClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn check(response: Response) -> Result<Response> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BoardError::Http { status, body });
        }
        Ok(response)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        tracing::debug!(endpoint, "GET");
        let response = self.client
            .get(self.url(endpoint))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let result = Self::check(response).await?.json::<T>().await?;
        Ok(result)
    }

    async fn post<T: serde::de::DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        tracing::debug!(endpoint, "POST");
        let response = self.client
            .post(self.url(endpoint))
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let result = Self::check(response).await?.json::<T>().await?;
        Ok(result)
    }

    async fn put<T: serde::de::DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        tracing::debug!(endpoint, "PUT");
        let response = self.client
            .put(self.url(endpoint))
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let result = Self::check(response).await?.json::<T>().await?;
        Ok(result)
    }

    async fn delete(&self, endpoint: &str) -> Result<()> {
        tracing::debug!(endpoint, "DELETE");
        let response = self.client
            .delete(self.url(endpoint))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl BoardApi for BoardClient {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.get("/tasks").await
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task> {
        self.post("/tasks", task).await
    }

    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> Result<Task> {
        self.put(&format!("/tasks/{}", id), update).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.delete(&format!("/tasks/{}", id)).await
    }

    async fn list_schedule(&self) -> Result<Vec<ScheduleEntry>> {
        self.get("/schedule").await
    }

    async fn create_schedule_entry(&self, entry: &NewScheduleEntry) -> Result<ScheduleEntry> {
        self.post("/schedule", entry).await
    }

    async fn update_schedule_entry(&self, id: EntryId, update: &EntryUpdate) -> Result<ScheduleEntry> {
        self.put(&format!("/schedule/{}", id), update).await
    }

    async fn delete_schedule_entry(&self, id: EntryId) -> Result<()> {
        self.delete(&format!("/schedule/{}", id)).await
    }

    async fn sync_schedule(&self) -> Result<Vec<ScheduleEntry>> {
        self.post("/schedule/sync", &serde_json::json!({})).await
    }

    async fn sunset(&self, latitude: f64, longitude: f64) -> Result<SunsetResponse> {
        self.get(&sunset_endpoint(latitude, longitude)).await
    }
}

fn sunset_endpoint(latitude: f64, longitude: f64) -> String {
    format!(
        "/sunset?lat={}&lng={}",
        urlencoding::encode(&latitude.to_string()),
        urlencoding::encode(&longitude.to_string())
    )
}
