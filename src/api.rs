// API client module: a small blocking HTTP client for the Everybody Codes
// service. The auth token, the configured reqwest client and the user's
// seed are each resolved on first use and then kept for the lifetime of
// the `ApiClient`.

use std::cell::OnceCell;
use std::path::Path;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, USER_AGENT};
use reqwest::{Proxy, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::cache::Cache;
use crate::config::{user_agent, Config};
use crate::error::{EcdError, Result};
use crate::inputs::{get_inputs, Remote};
use crate::locate::quest_from_path;
use crate::types::{Answer, EncryptedInputs, Inputs, KeySet, Part, QuestId};

pub struct ApiClient {
    config: Config,
    cache: Cache,
    token: OnceCell<String>,
    http: OnceCell<Client>,
    seed: OnceCell<u64>,
}

#[derive(Deserialize)]
struct SeedResponse {
    seed: u64,
}

/// Raw result of an answer submission. Every HTTP status ends up here;
/// an incorrect or duplicate answer is not an error.
#[derive(Debug, Clone)]
pub struct Submission {
    pub url: String,
    pub answer: Answer,
    pub status: StatusCode,
    pub body: String,
}

/// How the service judged a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Correct(serde_json::Value),
    Incorrect(serde_json::Value),
    /// 409: the correct answer was probably submitted already.
    AlreadySubmitted,
    /// 423: a wrong answer was submitted too recently.
    Locked,
    Unexpected,
}

impl Submission {
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    pub fn outcome(&self) -> Outcome {
        match self.status {
            StatusCode::OK => match self.json() {
                Ok(data) if is_truthy(data.get("correct")) => Outcome::Correct(data),
                Ok(data) => Outcome::Incorrect(data),
                Err(_) => Outcome::Incorrect(serde_json::Value::String(self.body.clone())),
            },
            StatusCode::CONFLICT => Outcome::AlreadySubmitted,
            StatusCode::LOCKED => Outcome::Locked,
            _ => Outcome::Unexpected,
        }
    }
}

fn is_truthy(value: Option<&serde_json::Value>) -> bool {
    use serde_json::Value;
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

impl ApiClient {
    pub fn new(config: Config) -> Self {
        let cache = Cache::new(&config.dir);
        ApiClient {
            config,
            cache,
            token: OnceCell::new(),
            http: OnceCell::new(),
            seed: OnceCell::new(),
        }
    }

    /// Create an ApiClient configured from the process environment.
    pub fn from_env() -> Self {
        Self::new(Config::from_env())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Auth token from `ECD_TOKEN` or the token file.
    pub fn token(&self) -> Result<&str> {
        if let Some(token) = self.token.get() {
            return Ok(token);
        }
        let token = match &self.config.token {
            Some(token) => token.clone(),
            None => self.cache.load_token()?.ok_or(EcdError::MissingToken)?,
        };
        Ok(self.token.get_or_init(|| token))
    }

    /// The shared reqwest client, carrying the User-Agent and auth cookie.
    pub fn http(&self) -> Result<&Client> {
        if let Some(http) = self.http.get() {
            return Ok(http);
        }
        let client = self.build_http()?;
        Ok(self.http.get_or_init(|| client))
    }

    fn build_http(&self) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&user_agent()).map_err(|_| EcdError::InvalidToken)?,
        );
        let cookie = format!("everybody-codes={}", self.token()?);
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&cookie).map_err(|_| EcdError::InvalidToken)?,
        );

        let mut builder = Client::builder()
            .default_headers(headers)
            .timeout(self.config.timeout);
        builder = match &self.config.proxy {
            Some(url) => builder.proxy(Proxy::all(url)?),
            None => builder.no_proxy(),
        };
        Ok(builder.build()?)
    }

    /// GET `url`, retrying only when no response arrived at all. Any status
    /// other than 200 is returned as `EcdError::Http`.
    fn get(&self, url: &str) -> Result<Response> {
        let http = self.http()?;
        let mut attempt = 0;
        let res = loop {
            match http.get(url).send() {
                Ok(res) => break res,
                Err(e) if attempt < self.config.retries => {
                    attempt += 1;
                    debug!("GET {} failed ({}), retry {}", url, e, attempt);
                }
                Err(e) => return Err(e.into()),
            }
        };
        if res.status() != StatusCode::OK {
            return Err(EcdError::Http {
                status: res.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(res)
    }

    /// The user's seed: in-process memo, then the seed file, then the API.
    pub fn seed(&self) -> Result<u64> {
        if let Some(seed) = self.seed.get() {
            return Ok(*seed);
        }
        let seed = match self.cache.load_seed()? {
            Some(seed) => seed,
            None => {
                let res = self.get(&self.config.seed_url())?;
                let seed = res.json::<SeedResponse>()?.seed;
                self.cache.store_seed(seed)?;
                seed
            }
        };
        Ok(*self.seed.get_or_init(|| seed))
    }

    /// Part keys for a quest. A 200 without `key1` means the quest is still
    /// locked.
    pub fn keys(&self, id: QuestId) -> Result<KeySet> {
        let url = self.config.keys_url(id.quest, id.event);
        let data: serde_json::Map<String, serde_json::Value> = self.get(&url)?.json()?;
        if !data.contains_key("key1") {
            warn!("unexpected response from {}:\n{:?}", url, data);
            return Err(EcdError::MissingKeys);
        }
        Ok(KeySet::from_json(data))
    }

    pub fn encrypted_inputs(&self, id: QuestId, seed: u64) -> Result<EncryptedInputs> {
        let url = self.config.inputs_url(id.quest, id.event, seed);
        Ok(self.get(&url)?.json()?)
    }

    /// Decrypted inputs for a quest, from the local cache when possible.
    pub fn inputs(&self, id: QuestId, seed: Option<u64>) -> Result<Inputs> {
        get_inputs(self, &self.cache, id, seed)
    }

    /// Inputs for the quest named by a solution file path such as
    /// `ec2024/q01.rs`, typically `client.data(file!())`. `None` when the
    /// path does not name a quest.
    pub fn data(&self, source: impl AsRef<Path>) -> Result<Option<Inputs>> {
        match quest_from_path(source.as_ref()) {
            Some(id) => self.inputs(id, None).map(Some),
            None => {
                warn!("failed to infer quest/event from {}", source.as_ref().display());
                Ok(None)
            }
        }
    }

    /// POST an answer. Only token or transport failures are errors; the
    /// service's verdict is in the returned `Submission`.
    pub fn submit(&self, id: QuestId, part: Part, answer: Answer) -> Result<Submission> {
        let url = self.config.answer_url(id.quest, id.event, part.number());
        info!("submitting {} to {}", answer, url);
        let res = self
            .http()?
            .post(&url)
            .json(&json!({ "answer": answer }))
            .send()?;
        let status = res.status();
        let body = res.text().unwrap_or_default();
        let submission = Submission { url, answer, status, body };

        match submission.outcome() {
            Outcome::Correct(data) => info!("CORRECT: {}", pretty(&data)),
            Outcome::Incorrect(data) => warn!("INCORRECT: {}", pretty(&data)),
            Outcome::AlreadySubmitted => info!("{}", already_submitted_message(&submission)),
            Outcome::Locked => warn!(
                "HTTP {} - was a bad answer submitted too recently?",
                status.as_u16()
            ),
            Outcome::Unexpected => warn!("HTTP {}: {}", status.as_u16(), submission.body),
        }
        Ok(submission)
    }
}

impl Remote for ApiClient {
    fn seed(&self) -> Result<u64> {
        ApiClient::seed(self)
    }

    fn keys(&self, id: QuestId) -> Result<KeySet> {
        ApiClient::keys(self, id)
    }

    fn encrypted_inputs(&self, id: QuestId, seed: u64) -> Result<EncryptedInputs> {
        ApiClient::encrypted_inputs(self, id, seed)
    }
}

pub fn pretty(data: &serde_json::Value) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
}

/// Message for a 409, with the response body appended when there is one.
pub fn already_submitted_message(submission: &Submission) -> String {
    let mut msg = format!(
        "HTTP {} - was the correct answer already submitted?",
        submission.status.as_u16()
    );
    if !submission.body.is_empty() {
        msg.push('\n');
        msg.push_str(&submission.body);
    }
    msg
}
