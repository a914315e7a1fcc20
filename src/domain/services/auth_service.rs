use std::sync::Arc;
use crate::domain::{
    models::{auth::{Claims, RefreshTokenRecord}, user::{Role, User}},
    ports::{AuthRepository, UserRepository}
};
use crate::error::AppError;
use crate::config::Config;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{encode, EncodingKey, Header, Algorithm};
use uuid::Uuid;
use chrono::{Utc, Duration};
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Sha256, Digest};
use tracing::{error, info, warn};

pub const TOKEN_AUDIENCE: &str = "marketplace-frontend";
const MIN_PASSWORD_LEN: usize = 8;

/// (access jwt, raw refresh token, csrf token)
pub type TokenPair = (String, String, String);

pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    user_repo: Arc<dyn UserRepository>,
    config: Config,
    encoding_key: EncodingKey,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthRepository>, user_repo: Arc<dyn UserRepository>, config: Config) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT private key PEM: {}", e)))?;

        Ok(Self { repo, user_repo, config, encoding_key })
    }

    pub fn hash_password(password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::InternalWithMsg(format!("Password hashing failed: {}", e)))
    }

    pub async fn register(&self, email: &str, name: &str, password: &str, confirm_password: &str, role: Role) -> Result<User, AppError> {
        if role == Role::Admin {
            return Err(AppError::Validation("Ugyldig kontotype".into()));
        }
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation("Ugyldig e-postadresse".into()));
        }
        if name.trim().is_empty() {
            return Err(AppError::Validation("Navn må fylles ut".into()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation("Passordet må være minst 8 tegn".into()));
        }
        if password != confirm_password {
            return Err(AppError::Validation("Passordene er ikke like".into()));
        }
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("E-postadressen er allerede registrert".into()));
        }

        let user = User::new(email, name.trim().to_string(), Self::hash_password(password)?, role);
        let created = self.user_repo.create(&user).await?;
        info!("User registered: {} ({:?})", created.id, created.role);
        Ok(created)
    }

    /// Verifies credentials. Unknown email and wrong password fail the same way.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self.user_repo.find_by_email(&email.trim().to_lowercase()).await?
            .ok_or(AppError::Unauthenticated)?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal)?;

        Argon2::default().verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| {
                warn!("Failed login for user {}", user.id);
                AppError::Unauthenticated
            })?;

        Ok(user)
    }

    pub async fn login(&self, user: &User) -> Result<TokenPair, AppError> {
        let family_id = Uuid::new_v4();
        self.issue_token_pair(user, family_id, 1).await
    }

    /// Rotates a refresh token. Presenting an unknown or expired token fails.
    pub async fn refresh(&self, raw_refresh_token: &str) -> Result<(User, TokenPair), AppError> {
        let token_hash = self.hash_token(raw_refresh_token);

        let record = self.repo.find_refresh_token(&token_hash).await?
            .ok_or(AppError::Unauthenticated)?;

        if record.expires_at < Utc::now() {
            self.repo.delete_refresh_family(record.family_id).await?;
            return Err(AppError::Unauthenticated);
        }

        let user = self.user_repo.find_by_id(&record.user_id).await?
            .ok_or(AppError::Unauthenticated)?;

        self.repo.delete_refresh_token(&token_hash).await?;
        let pair = self.issue_token_pair(&user, record.family_id, record.generation_id + 1).await?;
        Ok((user, pair))
    }

    pub async fn logout(&self, raw_refresh_token: &str) -> Result<(), AppError> {
        let token_hash = self.hash_token(raw_refresh_token);
        self.repo.delete_refresh_token(&token_hash).await
    }

    /// Ends every session the user has, on all devices.
    pub async fn logout_everywhere(&self, user_id: &str) -> Result<u64, AppError> {
        let revoked = self.repo.delete_refresh_tokens_for_user(user_id).await?;
        info!("Revoked {} refresh tokens for user {}", revoked, user_id);
        Ok(revoked)
    }

    async fn issue_token_pair(&self, user: &User, family_id: Uuid, generation_id: i32) -> Result<TokenPair, AppError> {
        let csrf_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect();
        let now = Utc::now();
        let exp = (now + Duration::minutes(15)).timestamp() as usize;

        let claims = Claims {
            iss: self.config.auth_issuer.clone(),
            sub: user.id.clone(),
            aud: TOKEN_AUDIENCE.to_string(),
            exp,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            role: user.role,
            csrf_token: csrf_token.clone(),
        };

        let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| {
                error!("JWT encoding failed: {}", e);
                AppError::Internal
            })?;

        let refresh_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect();
        let refresh_token_hash = self.hash_token(&refresh_token);

        let refresh_record = RefreshTokenRecord {
            token_hash: refresh_token_hash,
            user_id: user.id.clone(),
            family_id,
            generation_id,
            expires_at: now + Duration::days(7),
            created_at: now,
        };

        self.repo.create_refresh_token(&refresh_record).await?;
        Ok((access_token, refresh_token, csrf_token))
    }

    pub fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}
