// Resolving decrypted inputs for a quest: local cache first, otherwise
// fetch keys and ciphertext, decrypt the unlocked parts and store the
// result once all three parts are available.

use tracing::debug;

use crate::cache::Cache;
use crate::crypto::decrypt;
use crate::error::Result;
use crate::types::{EncryptedInputs, Inputs, KeySet, QuestId};

/// The remote calls `get_inputs` depends on. `ApiClient` is the real one.
pub trait Remote {
    fn seed(&self) -> Result<u64>;
    fn keys(&self, id: QuestId) -> Result<KeySet>;
    fn encrypted_inputs(&self, id: QuestId, seed: u64) -> Result<EncryptedInputs>;
}

/// Decrypted inputs for `id`. A cache hit makes no remote calls and is not
/// checked against the current token.
pub fn get_inputs<R: Remote + ?Sized>(
    remote: &R,
    cache: &Cache,
    id: QuestId,
    seed: Option<u64>,
) -> Result<Inputs> {
    let seed = match seed {
        Some(seed) => seed,
        None => remote.seed()?,
    };
    if let Some(cached) = cache.load_inputs(id, seed)? {
        return Ok(cached);
    }

    let keys = remote.keys(id)?;
    let encrypted = remote.encrypted_inputs(id, seed)?;
    let result = decrypt_unlocked(&keys, &encrypted)?;
    if !cache.store_inputs(id, seed, &result)? {
        debug!("{} has {} of 3 parts unlocked, not caching", id, result.len());
    }
    Ok(result)
}

/// Decrypt every part whose key is present; locked parts are left out.
fn decrypt_unlocked(keys: &KeySet, encrypted: &EncryptedInputs) -> Result<Inputs> {
    let mut result = Inputs::new();
    for (label, cipher_hex) in encrypted {
        if let Some(key) = keys.for_label(label) {
            result.insert(label.clone(), decrypt(cipher_hex, key)?);
        }
    }
    Ok(result)
}
