// Error types shared by the library modules.
//
// `EcdError` covers everything that can go wrong while getting data from
// the service. Decryption problems keep their own `DecryptError` type and
// are only carried through `EcdError::Decrypt`, so a caller can still tell
// malformed ciphertext apart from a failed fetch.

use thiserror::Error;

pub type Result<T, E = EcdError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum EcdError {
    #[error(
        "Couldn't find everybody-codes auth token. Get the token from the browser \
         cookie storage after signing in at https://everybody.codes/login."
    )]
    MissingToken,

    #[error("auth token is not usable as a cookie value")]
    InvalidToken,

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("failed to get keys")]
    MissingKeys,

    #[error("invalid seed {0:?}")]
    InvalidSeed(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Decrypt(#[from] DecryptError),
}

/// Failures of the AES-CBC decoding pipeline.
#[derive(Debug, Error)]
pub enum DecryptError {
    #[error("ciphertext is not valid hex: {0}")]
    Format(#[from] hex::FromHexError),

    #[error("key is {0} bytes, expected 16, 24 or 32")]
    KeyLength(usize),

    #[error("ciphertext length {0} is not a multiple of the block size")]
    BlockAlignment(usize),

    #[error("invalid padding length {pad} for {len} decrypted bytes")]
    Padding { pad: usize, len: usize },

    #[error("plaintext is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
}
