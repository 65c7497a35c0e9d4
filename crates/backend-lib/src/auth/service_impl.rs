use async_trait::async_trait;
use metrics::counter;
use postboard_common::PublicUser;
use std::sync::Arc;
use zeroize::Zeroizing;

use super::password::{hash_password, verify_password, HashCost, PasswordDigest};
use super::service::{AuthOutcome, AuthService};
use super::SessionManager;
use crate::error::AppError;
use crate::metrics::{LOGIN_FAILED, LOGIN_SUCCEEDED, USER_REGISTERED};
use crate::models::User;
use crate::storage::UserStore;
use crate::validation::{validate_email, validate_password, ValidationError, MIN_PASSWORD_LENGTH};

/// Password rules and hashing cost
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub cost: HashCost,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            cost: HashCost::default(),
        }
    }
}

pub struct DefaultAuth {
    users: Arc<dyn UserStore>,
    sessions: SessionManager,
    policy: PasswordPolicy,
    // verified against when the email is unknown, so both login failures cost the same
    dummy: PasswordDigest,
}

impl DefaultAuth {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: SessionManager,
        policy: PasswordPolicy,
    ) -> anyhow::Result<Self> {
        let dummy = hash_password("postboard-dummy-password", policy.cost)?;
        Ok(Self {
            users,
            sessions,
            policy,
            dummy,
        })
    }

    /// Validate and persist a new account. Does not open a session.
    pub async fn create_account(&self, email: &str, password: &str) -> Result<PublicUser, AppError> {
        let email = validate_email(email)?;
        validate_password(password, self.policy.min_length)?;

        // Fast path only; the store's unique index is what guarantees one user per email.
        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::EmailTaken);
        }

        let digest = self.hash(password).await?;
        let user = User::new(email, digest.hash, digest.salt);
        self.users.insert_user(&user).await?;

        counter!(USER_REGISTERED).increment(1);
        tracing::info!(user_id = %user.id, "user registered");

        Ok(user.public())
    }

    /// Check credentials without opening a session
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<PublicUser, AppError> {
        let email = validate_email(email)?;
        if password.is_empty() {
            return Err(ValidationError::MissingPassword.into());
        }

        let user = self.users.find_user_by_email(&email).await?;
        let (hash, salt) = match &user {
            Some(user) => (user.password_hash.clone(), user.password_salt.clone()),
            None => (self.dummy.hash.clone(), self.dummy.salt.clone()),
        };
        let matches = self.verify(password, hash, salt).await?;

        match user {
            Some(user) if matches => {
                counter!(LOGIN_SUCCEEDED).increment(1);
                Ok(user.public())
            },
            _ => {
                counter!(LOGIN_FAILED).increment(1);
                tracing::warn!("login rejected");
                Err(AppError::InvalidCredentials)
            },
        }
    }

    async fn hash(&self, password: &str) -> Result<PasswordDigest, AppError> {
        let plain = Zeroizing::new(password.to_owned());
        let cost = self.policy.cost;
        tokio::task::spawn_blocking(move || hash_password(&plain, cost))
            .await?
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    async fn verify(&self, password: &str, hash: String, salt: String) -> Result<bool, AppError> {
        let plain = Zeroizing::new(password.to_owned());
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&plain, &hash, &salt)).await?;
        Ok(matches)
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn register(&self, email: &str, password: &str) -> Result<AuthOutcome, AppError> {
        let user = self.create_account(email, password).await?;
        let session = self.sessions.create(user.id).await?;
        Ok(AuthOutcome { user, session })
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, AppError> {
        let user = self.authenticate(email, password).await?;
        let session = self.sessions.create(user.id).await?;
        tracing::info!(user_id = %user.id, "user logged in");
        Ok(AuthOutcome { user, session })
    }

    async fn logout(&self, session_id: &str) -> Result<(), AppError> {
        self.sessions.destroy(session_id).await
    }

    async fn current_user(&self, session_id: &str) -> Result<PublicUser, AppError> {
        let user_id = self
            .sessions
            .resolve(session_id)
            .await?
            .ok_or(AppError::NotAuthenticated)?;

        let user = self
            .users
            .find_user_by_id(user_id)
            .await?
            .ok_or(AppError::NotAuthenticated)?;

        Ok(user.public())
    }
}
