//! This module provides a client to connect to the TODO backend

use std::error::Error;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Response;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ApiError;
use crate::task::{NewTask, Stats, Task, TaskId, TaskUpdate, DATE_FORMAT};
use crate::traits::{MonthTasks, TodoSource};


/// The reply to a deletion
#[derive(Debug, Deserialize)]
struct MessageReply {
    #[serde(default)]
    message: String,
    #[serde(default)]
    count: Option<usize>,
}


/// A [`TodoSource`] that fetches its data from the backend REST API
#[derive(Clone, Debug)]
pub struct Client {
    url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>>(url: S) -> Result<Self, Box<dyn Error>> {
        let mut url = Url::parse(url.as_ref())?;
        if url.cannot_be_a_base() {
            return Err(format!("{} cannot be used as a base URL", url).into());
        }
        // So that `join` appends to the path rather than replacing its last segment
        if url.path().ends_with('/') == false {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self{
            url,
            http: reqwest::Client::new(),
        })
    }

    /// Create a client for the URL set in [`crate::config::API_BASE_URL`]
    pub fn from_config() -> Result<Self, Box<dyn Error>> {
        Self::new(crate::config::get(&crate::config::API_BASE_URL))
    }

    /// The base URL of the backend
    pub fn url(&self) -> &Url {
        &self.url
    }

    fn endpoint(&self, path: &str) -> Result<Url, Box<dyn Error>> {
        Ok(self.url.join(path)?)
    }

    /// Turn a reply into a value, or into an [`ApiError`] in case it does not have a success status
    async fn parse_reply<T: DeserializeOwned>(response: Response) -> Result<T, Box<dyn Error>> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() == false {
            log::debug!("Request failed with status {}: {}", status, text);
            return Err(ApiError::from_reply(status.as_u16(), &text).into());
        }

        serde_json::from_str(&text)
            .map_err(|err| ApiError::InvalidPayload(err.to_string()).into())
    }
}

fn show_completed_query(show_completed: bool) -> (&'static str, &'static str) {
    ("show_completed", if show_completed { "true" } else { "false" })
}

#[async_trait]
impl TodoSource for Client {
    async fn get_todos(&self) -> Result<Vec<Task>, Box<dyn Error>> {
        let url = self.endpoint("api/todos")?;
        log::debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        Self::parse_reply(response).await
    }

    async fn get_todos_by_date(&self, date: NaiveDate, show_completed: bool) -> Result<Vec<Task>, Box<dyn Error>> {
        let url = self.endpoint("api/todos")?;
        let date = date.format(DATE_FORMAT).to_string();
        log::debug!("GET {} (date {})", url, date);
        let response = self.http.get(url)
            .query(&[("date", date.as_str()), show_completed_query(show_completed)])
            .send()
            .await?;
        Self::parse_reply(response).await
    }

    async fn get_month(&self, year: i32, month: u32, show_completed: bool) -> Result<MonthTasks, Box<dyn Error>> {
        let url = self.endpoint(&format!("api/calendar/{}/{}", year, month))?;
        log::debug!("GET {}", url);
        let response = self.http.get(url)
            .query(&[show_completed_query(show_completed)])
            .send()
            .await?;
        Self::parse_reply(response).await
    }

    async fn get_stats(&self) -> Result<Stats, Box<dyn Error>> {
        let url = self.endpoint("api/stats")?;
        log::debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        Self::parse_reply(response).await
    }

    async fn create_todo(&self, new_task: &NewTask) -> Result<Task, Box<dyn Error>> {
        let url = self.endpoint("api/todos")?;
        log::debug!("POST {}", url);
        let response = self.http.post(url)
            .json(new_task)
            .send()
            .await?;
        Self::parse_reply(response).await
    }

    async fn update_todo(&self, id: TaskId, update: &TaskUpdate) -> Result<Task, Box<dyn Error>> {
        let url = self.endpoint(&format!("api/todos/{}", id))?;
        log::debug!("PUT {}", url);
        let response = self.http.put(url)
            .json(update)
            .send()
            .await?;
        Self::parse_reply(response).await
    }

    async fn delete_todo(&self, id: TaskId) -> Result<(), Box<dyn Error>> {
        let url = self.endpoint(&format!("api/todos/{}", id))?;
        log::debug!("DELETE {}", url);
        let response = self.http.delete(url).send().await?;
        let _reply: MessageReply = Self::parse_reply(response).await?;
        Ok(())
    }

    async fn clear_completed(&self) -> Result<(usize, String), Box<dyn Error>> {
        let url = self.endpoint("api/todos/clear-completed")?;
        log::debug!("DELETE {}", url);
        let response = self.http.delete(url).send().await?;
        let reply: MessageReply = Self::parse_reply(response).await?;
        Ok((reply.count.unwrap_or(0), reply.message))
    }
}
