//! Secret encryption for sensitive configuration stored at rest

mod cipher;
mod key;

pub use cipher::{SecretCipher, NONCE_SIZE, TAG_SIZE};
pub use key::{validate_key, CipherKey, KEY_SIZE};
