// AES-CBC decryption of the per-part input blobs.
//
// The service encrypts each part with the part key as AES key and the
// first 16 bytes of that same key as IV. Padding is stripped by trusting
// the final byte as the pad length.

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, KeyIvInit};

use crate::error::DecryptError;

const BLOCK: usize = 16;

/// Decrypt a hex-encoded ciphertext with a part key.
pub fn decrypt(input_hex: &str, key: &str) -> Result<String, DecryptError> {
    let key = key.as_bytes();
    let mut buf = hex::decode(input_hex)?;

    let iv = key.get(..BLOCK).ok_or(DecryptError::KeyLength(key.len()))?;
    let len = buf.len();
    let plain_len = match key.len() {
        16 => cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| DecryptError::KeyLength(key.len()))?
            .decrypt_padded_mut::<NoPadding>(&mut buf)
            .map_err(|_| DecryptError::BlockAlignment(len))?
            .len(),
        24 => cbc::Decryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(|_| DecryptError::KeyLength(key.len()))?
            .decrypt_padded_mut::<NoPadding>(&mut buf)
            .map_err(|_| DecryptError::BlockAlignment(len))?
            .len(),
        32 => cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(|_| DecryptError::KeyLength(key.len()))?
            .decrypt_padded_mut::<NoPadding>(&mut buf)
            .map_err(|_| DecryptError::BlockAlignment(len))?
            .len(),
        n => return Err(DecryptError::KeyLength(n)),
    };
    buf.truncate(plain_len);

    let pad = buf.last().copied().unwrap_or(0) as usize;
    if pad == 0 || pad > buf.len() {
        return Err(DecryptError::Padding { pad, len: buf.len() });
    }
    buf.truncate(buf.len() - pad);

    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes::Aes256;
    use cbc::cipher::block_padding::Pkcs7;
    use cbc::cipher::BlockEncryptMut;

    const KEY: &str = "b^km1KO!&Yo?U9V0n8R=vm93Ax7Gif]6";

    fn encrypt(plain: &str, key: &str) -> String {
        let key = key.as_bytes();
        let ct = cbc::Encryptor::<Aes256>::new_from_slices(key, &key[..16])
            .expect("valid key")
            .encrypt_padded_vec_mut::<Pkcs7>(plain.as_bytes());
        hex::encode(ct)
    }

    #[test]
    fn decrypts_known_vector() {
        let input_hex = "82db5c7f5b709666d261a0a041b1f80212ab50ff0646e35112e4c99810d7128c";
        let plain = decrypt(input_hex, KEY).expect("decrypt should succeed");
        assert_eq!(plain, "17\n12\n7\n13\n17\n17\n19\n17\n10\n15\n16");
    }

    #[test]
    fn strips_full_padding_block() {
        let plain = "0123456789abcdef";
        let ct = encrypt(plain, KEY);
        assert_eq!(ct.len(), 64);
        assert_eq!(decrypt(&ct, KEY).unwrap(), plain);
    }

    #[test]
    fn rejects_bad_hex() {
        let err = decrypt("zz", KEY).unwrap_err();
        assert!(matches!(err, DecryptError::Format(_)));
        let err = decrypt("abc", KEY).unwrap_err();
        assert!(matches!(err, DecryptError::Format(_)));
    }

    #[test]
    fn rejects_bad_key_length() {
        let err = decrypt("00", "short").unwrap_err();
        assert!(matches!(err, DecryptError::KeyLength(5)));
        let err = decrypt("00", "seventeen-bytes!!").unwrap_err();
        assert!(matches!(err, DecryptError::KeyLength(17)));
    }

    #[test]
    fn rejects_unaligned_ciphertext() {
        let err = decrypt("00112233", KEY).unwrap_err();
        assert!(matches!(err, DecryptError::BlockAlignment(4)));
    }

    #[test]
    fn rejects_wrong_key() {
        let ct = encrypt("hello", KEY);
        let other = "0000000000000000000000000000000!";
        // A wrong key either produces an impossible pad length or garbage bytes.
        match decrypt(&ct, other) {
            Err(DecryptError::Padding { .. }) | Err(DecryptError::Decode(_)) => {}
            Ok(text) => assert_ne!(text, "hello"),
            Err(e) => panic!("unexpected error {e}"),
        }
    }
}
