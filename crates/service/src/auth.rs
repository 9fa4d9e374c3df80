//! Password hashing and bearer-token issue/verify for staff accounts.

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use models::errors::ValidationErrors;
use models::user;

use crate::errors::ServiceError;

pub const TOKEN_TTL_HOURS: i64 = 12;

/// Identity of the authenticated caller, decoded from the bearer token and
/// passed explicitly to every operation that records authorship.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    name: String,
    iat: usize,
    exp: usize,
}

pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServiceError::Db(format!("password hash failed: {}", e)))?
        .to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

pub fn issue_token(secret: &str, user: &user::Model) -> Result<String, ServiceError> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user.id.to_string(),
        name: user.name.clone(),
        iat: now.timestamp() as usize,
        exp: (now + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| ServiceError::Db(format!("token encode failed: {}", e)))
}

/// Decode and verify a bearer token into the caller's identity.
pub fn verify_token(secret: &str, token: &str) -> Result<AuthUser, ServiceError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| ServiceError::Unauthorized(format!("invalid token: {}", e)))?;
    let id = Uuid::parse_str(&data.claims.sub)
        .map_err(|_| ServiceError::Unauthorized("invalid token subject".into()))?;
    Ok(AuthUser { id, name: data.claims.name })
}

pub async fn register(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    password: &str,
) -> Result<user::Model, ServiceError> {
    let mut errs = ValidationErrors::new();
    errs.check("name", user::validate_name(name));
    errs.check("email", user::validate_email(email));
    if password.len() < 8 {
        errs.push("password", "password must be at least 8 characters");
    }
    errs.into_result().map_err(ServiceError::from)?;

    let hash = hash_password(password)?;
    let created = user::create(db, name, email, &hash).await?;
    info!(user_id = %created.id, email = %created.email, "user_registered");
    Ok(created)
}

/// Verify credentials and issue a token. Unknown email and wrong password
/// are indistinguishable to the caller.
pub async fn login(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    jwt_secret: &str,
) -> Result<(user::Model, String), ServiceError> {
    let user = user::find_by_email(db, email)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized("invalid email or password".into()))?;
    if !verify_password(password, &user.password_hash) {
        return Err(ServiceError::Unauthorized("invalid email or password".into()));
    }
    let token = issue_token(jwt_secret, &user)?;
    info!(user_id = %user.id, "user_logged_in");
    Ok((user, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fixture_user() -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            name: "Staff".into(),
            email: "staff@example.com".into(),
            password_hash: String::new(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn token_round_trip_carries_identity() {
        let user = fixture_user();
        let token = issue_token("test-secret", &user).unwrap();
        let decoded = verify_token("test-secret", &token).unwrap();
        assert_eq!(decoded.id, user.id);
        assert_eq!(decoded.name, user.name);
    }

    #[test]
    fn token_rejects_wrong_secret() {
        let user = fixture_user();
        let token = issue_token("test-secret", &user).unwrap();
        assert!(verify_token("other-secret", &token).is_err());
    }

    #[test]
    fn token_rejects_garbage() {
        assert!(verify_token("s", "not.a.token").is_err());
    }
}
