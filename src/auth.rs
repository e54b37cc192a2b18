use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use tracing::info;

use crate::models::{Credential, UserRecord};

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}

/// Hashes `password` under a fresh random salt.
pub fn hash_password(password: &str, iterations: u32) -> Credential {
    let iterations = iterations.max(1);
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let key = derive_key(password, &salt, iterations);
    Credential {
        salt: B64.encode(salt),
        hash: B64.encode(key),
        iterations,
    }
}

/// Checks `password` against a stored credential.
///
/// A credential whose salt or hash cannot be decoded never verifies.
pub fn verify_password(credential: &Credential, password: &str) -> bool {
    let Ok(salt) = B64.decode(credential.salt.as_bytes()) else {
        return false;
    };
    let Ok(expected) = B64.decode(credential.hash.as_bytes()) else {
        return false;
    };
    if salt.is_empty() || expected.len() != KEY_LEN {
        return false;
    }
    let key = derive_key(password, &salt, credential.iterations.max(1));
    // constant-time compare
    key.iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Verifies a login attempt against a record.
///
/// Records saved before hashing keep a plaintext `password`; a matching
/// attempt replaces it with a hashed credential.
pub fn check_record(record: &mut UserRecord, password: &str, iterations: u32) -> bool {
    if let Some(credential) = &record.credential {
        return verify_password(credential, password);
    }
    match &record.password {
        Some(legacy) if legacy == password => {
            record.credential = Some(hash_password(password, iterations));
            record.password = None;
            info!(user = %record.username, "upgraded plaintext password to a hashed credential");
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy(password: &str) -> UserRecord {
        UserRecord {
            username: "old".into(),
            credential: None,
            password: Some(password.into()),
            habits: Vec::new(),
            daily_history: Default::default(),
            theme: Default::default(),
        }
    }

    #[test]
    fn hash_verifies_only_the_same_password() {
        let credential = hash_password("secret", 10);
        assert!(verify_password(&credential, "secret"));
        assert!(!verify_password(&credential, "Secret"));
        assert!(!verify_password(&credential, ""));
        assert_ne!(credential.hash, "secret");
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("pw", 10);
        let b = hash_password("pw", 10);
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn mangled_credential_never_verifies() {
        let mut credential = hash_password("pw", 10);
        credential.hash = "!!not base64!!".into();
        assert!(!verify_password(&credential, "pw"));
    }

    #[test]
    fn legacy_plaintext_is_upgraded_on_match() {
        let mut record = legacy("pw1");
        assert!(!check_record(&mut record, "wrong", 10));
        assert!(record.password.is_some());

        assert!(check_record(&mut record, "pw1", 10));
        assert!(record.password.is_none());
        let upgraded = record.credential.clone().unwrap();
        assert!(check_record(&mut record, "pw1", 10));
        assert_eq!(record.credential.as_ref(), Some(&upgraded));
    }
}
