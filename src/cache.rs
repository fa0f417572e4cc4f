// Local files under the config directory: the auth token, the memoized
// seed, and fully decrypted inputs named `{event}-{quest:02}.{seed}.json`.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{EcdError, Result};
use crate::types::{Inputs, QuestId, ALL_PARTS};

#[derive(Debug, Clone)]
pub struct Cache {
    dir: PathBuf,
}

impl Cache {
    /// Cache rooted at `dir`; nothing is created until the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Cache { dir: dir.into() }
    }

    /// Directory all cache files live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/token`, the raw auth token.
    pub fn token_path(&self) -> PathBuf {
        self.dir.join("token")
    }

    /// `<dir>/seed`, the memoized seed as decimal text.
    pub fn seed_path(&self) -> PathBuf {
        self.dir.join("seed")
    }

    /// `<dir>/{event}-{quest:02}.{seed}.json`.
    pub fn inputs_path(&self, id: QuestId, seed: u64) -> PathBuf {
        self.dir
            .join(format!("{}-{:02}.{}.json", id.event, id.quest, seed))
    }

    /// First whitespace-separated word of the token file, if there is one.
    pub fn load_token(&self) -> Result<Option<String>> {
        match fs::read_to_string(self.token_path()) {
            Ok(text) => Ok(text.split_whitespace().next().map(str::to_string)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Save a token for later runs, replacing any previous one.
    pub fn store_token(&self, token: &str) -> Result<()> {
        self.write_atomic(&self.token_path(), token.trim().as_bytes())
    }

    /// Seed from the memo file. A file that is not an integer is an error.
    pub fn load_seed(&self) -> Result<Option<u64>> {
        let path = self.seed_path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let seed = text
            .trim()
            .parse()
            .map_err(|_| EcdError::InvalidSeed(text.trim().to_string()))?;
        debug!("got seed {} from memo {}", seed, path.display());
        Ok(Some(seed))
    }

    /// Memoize the seed for later runs.
    pub fn store_seed(&self, seed: u64) -> Result<()> {
        let path = self.seed_path();
        self.write_atomic(&path, seed.to_string().as_bytes())?;
        debug!("wrote seed {} to memo {}", seed, path.display());
        Ok(())
    }

    /// Cached inputs for `(id, seed)`, returned as stored.
    pub fn load_inputs(&self, id: QuestId, seed: u64) -> Result<Option<Inputs>> {
        let path = self.inputs_path(id, seed);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let inputs = serde_json::from_str(&text)?;
        debug!("got inputs from memo {}", path.display());
        Ok(Some(inputs))
    }

    /// Persist inputs once every part is present. Returns whether a file was
    /// written; partial inputs are never stored.
    pub fn store_inputs(&self, id: QuestId, seed: u64, inputs: &Inputs) -> Result<bool> {
        if !ALL_PARTS.iter().all(|p| inputs.contains_key(*p)) {
            return Ok(false);
        }
        let path = self.inputs_path(id, seed);
        let serialized = serde_json::to_string_pretty(inputs)?;
        self.write_atomic(&path, serialized.as_bytes())?;
        debug!("wrote {} bytes to memo {}", serialized.len(), path.display());
        Ok(true)
    }

    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(data)?;
        tmp.persist(path).map_err(|e| EcdError::Io(e.error))?;
        Ok(())
    }
}
