use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

use crate::{model::account::Account, models::Claims};

fn now() -> usize {
    Utc::now().timestamp().max(0) as usize
}

pub fn generate_access_token(account: &Account, secret: &str, ttl: usize) -> Result<String, Error> {
    let claims = Claims {
        account_id: account.id,
        sub: account.email.clone(),
        role: account.role,
        class_name: account.class_name.clone(),
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;

    fn faculty() -> Account {
        Account {
            id: 42,
            name: "Dr. Rao".into(),
            email: "rao@college.edu".into(),
            password_hash: String::new(),
            role: Role::Faculty,
            class_name: Some("CS-A".into()),
            casual_balance: 10,
            total_working_days: Some(100),
            absent_days: Some(0),
        }
    }

    #[test]
    fn token_carries_identity() {
        let token = generate_access_token(&faculty(), "secret", 900).unwrap();
        let claims = verify_token(&token, "secret").unwrap();

        assert_eq!(claims.account_id, 42);
        assert_eq!(claims.sub, "rao@college.edu");
        assert_eq!(claims.role, Role::Faculty);
        assert_eq!(claims.class_name.as_deref(), Some("CS-A"));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token(&faculty(), "secret", 900).unwrap();
        assert!(verify_token(&token, "other").is_err());
    }

    #[test]
    fn each_token_gets_a_fresh_jti() {
        let a = verify_token(&generate_access_token(&faculty(), "s", 900).unwrap(), "s").unwrap();
        let b = verify_token(&generate_access_token(&faculty(), "s", 900).unwrap(), "s").unwrap();
        assert_ne!(a.jti, b.jti);
    }
}
