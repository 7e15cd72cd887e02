use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Argon2 PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Well-formed PHC string with default Argon2 parameters that no password
/// hashes to. Verifying against it costs the same as a real check.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$bGVhdmUtbWFuYWdlci1kbQ$AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8";

/// Runs a full verification that always fails, for login attempts against
/// accounts that do not exist.
pub fn verify_dummy_password(password: &str) {
    let _ = verify_password(password, DUMMY_HASH);
}

/// Constant-time check of `password` against a stored PHC string.
pub fn verify_password(password: &str, hashed: &str) -> Result<(), argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hashed)?;

    Argon2::default().verify_password(password.as_bytes(), &parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_hashed_password() {
        let hash = hash_password("password123").unwrap();

        assert_ne!(hash, "password123");
        assert!(verify_password("password123", &hash).is_ok());
        assert!(verify_password("password124", &hash).is_err());
    }

    #[test]
    fn same_password_gets_different_salts() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn plain_text_stored_value_is_rejected() {
        assert!(verify_password("password123", "password123").is_err());
    }

    #[test]
    fn dummy_hash_is_parsed_and_never_matches() {
        // a parse error would skip the argon2 work entirely
        assert!(matches!(
            verify_password("password123", DUMMY_HASH),
            Err(argon2::password_hash::Error::Password)
        ));
        assert!(matches!(
            verify_password("", DUMMY_HASH),
            Err(argon2::password_hash::Error::Password)
        ));
        verify_dummy_password("password123");
    }
}
