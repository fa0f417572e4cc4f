// Library root
// ------------
// Client for the Everybody Codes data API. The binary (`main.rs`) is a thin
// wrapper around `cli::run`.
//
// Module responsibilities:
// - `config`: endpoints, local directory, proxy and timeout from the env.
// - `cache`: files under the config directory (token, seed, inputs).
// - `api`: blocking HTTP calls (seed, keys, encrypted inputs, submit).
// - `crypto`: AES-CBC decryption of a part.
// - `inputs`: cache-or-fetch-and-decrypt for a whole quest.
// - `locate`: quest/event from a solution file path.
// - `ui` / `cli`: terminal output and argument handling.
pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod inputs;
pub mod locate;
pub mod types;
pub mod ui;

pub use api::{ApiClient, Outcome, Submission};
pub use config::Config;
pub use crypto::decrypt;
pub use error::{DecryptError, EcdError, Result};
pub use types::{Answer, Inputs, Part, QuestId};
