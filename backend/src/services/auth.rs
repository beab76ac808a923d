//! Mock login against a user directory
//!
//! Only checks credentials. No sessions or tokens are issued.

use std::collections::HashMap;
use std::sync::Arc;

use bcrypt::{hash, verify};
use serde::Serialize;

use crate::config::AuthConfig;
use crate::error::{AppError, AppResult};

/// A stored account
#[derive(Debug, Clone)]
pub struct DirectoryUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

/// Public view of an authenticated user
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
}

/// Source of accounts for login
pub trait UserDirectory: Send + Sync {
    fn find_by_email(&self, email: &str) -> Option<DirectoryUser>;
}

/// Directory held in memory, keyed by exact email
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: HashMap<String, DirectoryUser>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the directory with the configured demo account
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        let mut directory = Self::new();
        directory.insert(
            &config.demo_email,
            &config.demo_name,
            &config.demo_password,
            config.bcrypt_cost,
        )?;
        Ok(directory)
    }

    /// Add or replace an account, hashing the password with bcrypt
    pub fn insert(&mut self, email: &str, name: &str, password: &str, cost: u32) -> AppResult<()> {
        let password_hash = hash(password, cost)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;
        self.users.insert(
            email.to_string(),
            DirectoryUser {
                email: email.to_string(),
                name: name.to_string(),
                password_hash,
            },
        );
        Ok(())
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn find_by_email(&self, email: &str) -> Option<DirectoryUser> {
        self.users.get(email).cloned()
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    directory: Arc<dyn UserDirectory>,
}

impl AuthService {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Verify credentials and return the matching profile
    pub fn login(&self, email: &str, password: &str) -> AppResult<UserProfile> {
        // Find user by email
        let user = self
            .directory
            .find_by_email(email)
            .ok_or(AppError::InvalidCredentials)?;

        // Verify password
        let valid = verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(email = %user.email, "User logged in");

        Ok(UserProfile {
            email: user.email,
            name: user.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the tests fast
    const TEST_COST: u32 = 4;

    fn service() -> AuthService {
        let mut directory = InMemoryUserDirectory::new();
        directory
            .insert("demo@cropsage.com", "Demo Farmer", "password123", TEST_COST)
            .unwrap();
        AuthService::new(Arc::new(directory))
    }

    #[test]
    fn stores_hash_not_password() {
        let mut directory = InMemoryUserDirectory::new();
        directory.insert("a@b.com", "A", "secret", TEST_COST).unwrap();
        let user = directory.find_by_email("a@b.com").unwrap();
        assert_ne!(user.password_hash, "secret");
        assert!(verify("secret", &user.password_hash).unwrap());
    }

    #[test]
    fn test_login_success() {
        let profile = service().login("demo@cropsage.com", "password123").unwrap();
        assert_eq!(profile.name, "Demo Farmer");
        assert_eq!(profile.email, "demo@cropsage.com");
    }

    #[test]
    fn test_login_wrong_password() {
        let err = service().login("demo@cropsage.com", "wrong").unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[test]
    fn test_login_unknown_email() {
        let err = service().login("nobody@cropsage.com", "password123").unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }
}
