// Runtime configuration: where the local files live, which service URLs to
// talk to, and how the HTTP client is set up. Everything comes from
// environment variables with fallbacks to the public service.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://everybody.codes";
pub const DEFAULT_CDN_URL: &str = "https://everybody-codes.b-cdn.net";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding `token`, `seed` and cached inputs.
    pub dir: PathBuf,
    /// Token from `ECD_TOKEN`; takes precedence over `<dir>/token`, even
    /// when set to an empty string.
    pub token: Option<String>,
    /// Proxy URL from `http_proxy` or `https_proxy`.
    pub proxy: Option<String>,
    pub api_url: String,
    pub cdn_url: String,
    pub timeout: Option<Duration>,
    /// Extra attempts for GET requests that fail before any response arrives.
    pub retries: u32,
}

impl Config {
    /// Build a config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup. Empty values are
    /// treated as unset, except for `ECD_TOKEN`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let dir = var("ECD_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_dir);
        let timeout = match var("ECD_TIMEOUT").and_then(|s| s.trim().parse::<u64>().ok()) {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(DEFAULT_TIMEOUT),
        };

        Config {
            dir,
            token: lookup("ECD_TOKEN"),
            proxy: var("http_proxy").or_else(|| var("https_proxy")),
            api_url: var("ECD_API_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.into()),
            cdn_url: var("ECD_CDN_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_CDN_URL.into()),
            timeout,
            retries: var("ECD_RETRIES")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0),
        }
    }

    /// A config rooted at `dir` with default endpoints and no overrides.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Config {
            dir: dir.into(),
            ..Self::from_lookup(|_| None)
        }
    }

    /// `GET` endpoint returning `{"seed": n}` for the logged-in user.
    pub fn seed_url(&self) -> String {
        format!("{}/api/user/me", self.api_url)
    }

    /// `GET` endpoint with the unlocked part keys of a quest.
    pub fn keys_url(&self, quest: u32, event: u32) -> String {
        format!("{}/api/event/{event}/quest/{quest}", self.api_url)
    }

    /// `POST` endpoint taking `{"answer": ...}` for one part.
    pub fn answer_url(&self, quest: u32, event: u32, part: u8) -> String {
        format!("{}/api/event/{event}/quest/{quest}/part/{part}/answer", self.api_url)
    }

    /// CDN asset with the encrypted inputs for a seed.
    pub fn inputs_url(&self, quest: u32, event: u32, seed: u64) -> String {
        format!("{}/assets/{event}/{quest}/input/{seed}.json", self.cdn_url)
    }
}

fn default_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("ecd")
}

/// User-Agent sent with every request.
pub fn user_agent() -> String {
    format!("everybody-codes-data-rs v{}", env!("CARGO_PKG_VERSION"))
}
