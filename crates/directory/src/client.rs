//! HTTP client for the directory API.

use crate::{
    action::{Action, ActionMethod},
    aggregate,
    config::DirectoryConfig,
    entry::{
        Change, ConnectionStatus, DeleteAck, DirectoryEntry, EntryUpdate, NewEntry,
        SearchFilters, Statistics,
    },
    error::{DirectoryError, RequestError},
};
use chrono::Utc;
use mcore::{RetryPolicy, Sleeper, TokioSleeper, retry};
use reqwest::{Client, Method, header};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

const ENTRIES: &str = "/api/annuaire";

/// Directory API client.
///
/// Requests are retried according to the configured [`RetryPolicy`];
/// any transport error or non-success status counts as a failed attempt.
pub struct DirectoryClient<Z = TokioSleeper> {
    http: Client,
    base_url: String,
    policy: RetryPolicy,
    sleeper: Z,
}

impl DirectoryClient {
    /// Create a client sleeping on the tokio timer between attempts.
    pub fn new(config: &DirectoryConfig) -> Result<Self, DirectoryError> {
        Self::with_sleeper(config, TokioSleeper)
    }
}

impl<Z: Sleeper> DirectoryClient<Z> {
    /// Create a client with a custom sleeper.
    pub fn with_sleeper(config: &DirectoryConfig, sleeper: Z) -> Result<Self, DirectoryError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(DirectoryError::Client)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            policy: RetryPolicy::new(config.retries),
            sleeper,
        })
    }

    /// Replace the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every entry.
    pub async fn all_entries(&self) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        self.get(ENTRIES, &[]).await
    }

    /// Search with server-side filters.
    pub async fn search_entries(
        &self,
        filters: &SearchFilters,
    ) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        self.get(ENTRIES, &filters.query_pairs()).await
    }

    pub async fn entry_by_id(&self, id: u64) -> Result<DirectoryEntry, DirectoryError> {
        self.get(&format!("{ENTRIES}/{id}"), &[]).await
    }

    pub async fn create_entry(&self, entry: &NewEntry) -> Result<DirectoryEntry, DirectoryError> {
        self.send(Method::POST, ENTRIES, &[], Some(to_value(entry)?))
            .await
    }

    pub async fn update_entry(
        &self,
        id: u64,
        update: &EntryUpdate,
    ) -> Result<DirectoryEntry, DirectoryError> {
        self.send(
            Method::PUT,
            &format!("{ENTRIES}/{id}"),
            &[],
            Some(to_value(update)?),
        )
        .await
    }

    pub async fn delete_entry(&self, id: u64) -> Result<DeleteAck, DirectoryError> {
        self.send(Method::DELETE, &format!("{ENTRIES}/{id}"), &[], None)
            .await
    }

    /// Distinct non-blank departments.
    pub async fn departments(&self) -> Result<Vec<String>, DirectoryError> {
        Ok(aggregate::departments(&self.all_entries().await?))
    }

    pub async fn entries_by_department(
        &self,
        departement: &str,
    ) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        Ok(aggregate::by_department(self.all_entries().await?, departement))
    }

    pub async fn entry_by_ip(&self, ip: &str) -> Result<Option<DirectoryEntry>, DirectoryError> {
        Ok(aggregate::by_ip(self.all_entries().await?, ip))
    }

    pub async fn statistics(&self) -> Result<Statistics, DirectoryError> {
        Ok(aggregate::statistics(&self.all_entries().await?, Utc::now()))
    }

    /// Entries missing an IP, email, phone, or position.
    pub async fn incomplete_entries(&self) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        let entries = self.search_entries(&SearchFilters::default()).await?;
        Ok(aggregate::incomplete(entries))
    }

    pub async fn recent_changes(&self, limit: usize) -> Result<Vec<Change>, DirectoryError> {
        let entries = self.search_entries(&SearchFilters::default()).await?;
        Ok(aggregate::recent_changes(entries, limit, Utc::now()))
    }

    /// Match any word of `query` against every text field.
    pub async fn search_natural_language(
        &self,
        query: &str,
    ) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        let entries = self.search_entries(&SearchFilters::default()).await?;
        Ok(aggregate::natural_language(entries, query))
    }

    /// Probe the service; never fails.
    pub async fn test_connection(&self) -> ConnectionStatus {
        match self.all_entries().await {
            Ok(entries) => ConnectionStatus {
                status: "success".to_owned(),
                message: format!("Connexion réussie. {} entrées trouvées.", entries.len()),
            },
            Err(e) => ConnectionStatus {
                status: "error".to_owned(),
                message: format!("Erreur de connexion: {e}"),
            },
        }
    }

    /// Run a catalog action with the given parameters.
    ///
    /// Parameters naming a `:segment` of the endpoint fill it; the rest go
    /// to the query string for GET actions and to the JSON body otherwise.
    /// Parameters the action does not declare are ignored.
    pub async fn execute_action(
        &self,
        action_id: &str,
        params: &Map<String, Value>,
    ) -> Result<Value, DirectoryError> {
        let action = Action::find(action_id)
            .ok_or_else(|| DirectoryError::UnknownAction(action_id.to_owned()))?;

        let mut endpoint = action.endpoint.to_owned();
        let mut query = Vec::new();
        let mut body = Map::new();
        for param in action.parameters {
            let Some(value) = params.get(param.name) else {
                continue;
            };
            let placeholder = format!(":{}", param.name);
            if endpoint.contains(&placeholder) {
                endpoint = endpoint.replace(&placeholder, &param_string(value));
            } else if action.method == ActionMethod::Get {
                query.push((param.name, param_string(value)));
            } else {
                body.insert(param.name.to_owned(), value.clone());
            }
        }

        if let Some(param) = action
            .parameters
            .iter()
            .find(|p| endpoint.contains(&format!(":{}", p.name)))
        {
            return Err(DirectoryError::MissingParameter {
                action: action.id.to_owned(),
                name: param.name.to_owned(),
            });
        }

        let body = (action.method != ActionMethod::Get && !body.is_empty())
            .then_some(Value::Object(body));
        self.send(action.method.as_reqwest(), &endpoint, &query, body)
            .await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, DirectoryError> {
        self.send(Method::GET, endpoint, query, None).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T, DirectoryError> {
        let url = format!("{}{endpoint}", self.base_url);
        tracing::debug!("directory {method} {url}");
        let value = retry(&self.policy, &self.sleeper, endpoint, |_| {
            let mut request = self
                .http
                .request(method.clone(), &url)
                .header(header::CONTENT_TYPE, "application/json");
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = &body {
                request = request.json(body);
            }
            attempt::<T>(request)
        })
        .await?;
        Ok(value)
    }
}

async fn attempt<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, RequestError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(RequestError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_owned(),
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn to_value(payload: &impl Serialize) -> Result<Value, DirectoryError> {
    serde_json::to_value(payload).map_err(DirectoryError::Encode)
}

fn param_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
