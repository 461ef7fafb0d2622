//! # Account Service
//!
//! Signup, login and admin account management on top of the user
//! repository. Patient self-registration always lands on the PATIENT
//! role; staff accounts are created by administrators and can never be
//! PATIENT. Both flows check email and username uniqueness before
//! hashing, and rely on the repository to re-check under its write lock.

use std::sync::Arc;

use uuid::Uuid;

use super::crypto::{hash_password, PasswordPolicy};
use super::errors::{AuthError, AuthResult};
use super::jwt::JwtManager;
use super::role::Role;
use super::user::{
    CreateUserRequest, LoginRequest, SignupRequest, User, UserPage, UserRepository,
};
use crate::store::bounded;

/// Account service combining the repository, token manager and policy
pub struct AuthService<R: UserRepository> {
    users: Arc<R>,
    tokens: JwtManager,
    password_policy: PasswordPolicy,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(users: Arc<R>, tokens: JwtManager) -> Self {
        Self {
            users,
            tokens,
            password_policy: PasswordPolicy::default(),
        }
    }

    /// Register a new patient account.
    ///
    /// The role is forced to PATIENT regardless of anything in the request.
    pub async fn signup(&self, request: SignupRequest) -> AuthResult<User> {
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_string();
        let first_name = request.first_name.trim().to_string();
        let last_name = request.last_name.trim().to_string();
        let phone = normalize_phone(request.phone);

        self.validate_account_fields(&username, &email, &request.password, &first_name, &last_name)?;

        if bounded(self.users.email_exists(&email)).await? {
            return Err(AuthError::EmailAlreadyExists);
        }
        if bounded(self.users.username_exists(&username)).await? {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new(
            username,
            email,
            password_hash,
            first_name,
            last_name,
            phone,
            Role::Patient,
        );

        let user = bounded(self.users.create(user)).await?;
        tracing::info!(user_id = %user.id, "patient account registered");

        Ok(user)
    }

    /// Authenticate and issue a session token.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, request: LoginRequest) -> AuthResult<String> {
        let user = bounded(self.users.find_by_email(&request.email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.verify_password(&request.password)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id, user.role)?;
        tracing::info!(user_id = %user.id, role = %user.role, "login succeeded");

        Ok(token)
    }

    /// Create a staff account (admin operation)
    pub async fn create_user(&self, request: CreateUserRequest) -> AuthResult<User> {
        if request.role == Role::Patient {
            return Err(AuthError::InvalidInput(
                "patients must self-register using the patient signup endpoint".to_string(),
            ));
        }

        let username = request.username.trim().to_string();
        let email = request.email.trim().to_string();
        let first_name = request.first_name.trim().to_string();
        let last_name = request.last_name.trim().to_string();
        let phone = normalize_phone(request.phone);

        self.validate_account_fields(&username, &email, &request.password, &first_name, &last_name)?;

        if bounded(self.users.email_exists(&email)).await? {
            return Err(AuthError::EmailAlreadyExists);
        }
        if bounded(self.users.username_exists(&username)).await? {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new(
            username,
            email,
            password_hash,
            first_name,
            last_name,
            phone,
            request.role,
        );

        let user = bounded(self.users.create(user)).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "staff account created");

        Ok(user)
    }

    /// Get an account by ID
    pub async fn get_user(&self, user_id: Uuid) -> AuthResult<User> {
        bounded(self.users.find_by_id(user_id))
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// List accounts, one page at a time.
    ///
    /// Out-of-range paging values are normalized rather than rejected:
    /// page floors at 1, page_size falls back to 10 outside 1..=100.
    pub async fn list_users(&self, page: u32, page_size: u32) -> AuthResult<UserPage> {
        let page = page.max(1);
        let page_size = if page_size == 0 || page_size > 100 {
            10
        } else {
            page_size
        };
        let offset = (page as usize - 1) * page_size as usize;

        let users = bounded(self.users.list(offset, page_size as usize)).await?;
        let total = bounded(self.users.count()).await?;

        Ok(UserPage {
            users,
            total,
            page,
            page_size,
        })
    }

    fn validate_account_fields(
        &self,
        username: &str,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> AuthResult<()> {
        if username.is_empty() {
            return Err(AuthError::InvalidInput("username is required".to_string()));
        }
        if username.len() < 3 {
            return Err(AuthError::InvalidInput(
                "username must be at least 3 characters".to_string(),
            ));
        }

        if email.is_empty() {
            return Err(AuthError::InvalidInput("email is required".to_string()));
        }
        if !valid_email(email) {
            return Err(AuthError::InvalidInput("invalid email format".to_string()));
        }

        if password.is_empty() {
            return Err(AuthError::InvalidInput("password is required".to_string()));
        }
        self.password_policy.validate(password)?;

        if first_name.is_empty() {
            return Err(AuthError::InvalidInput(
                "first name is required".to_string(),
            ));
        }
        if last_name.is_empty() {
            return Err(AuthError::InvalidInput("last name is required".to_string()));
        }

        Ok(())
    }
}

fn normalize_phone(phone: Option<String>) -> Option<String> {
    phone.and_then(|p| {
        let p = p.trim();
        if p.is_empty() {
            None
        } else {
            Some(p.to_string())
        }
    })
}

/// Shape check only: one local part, one domain with an alphabetic TLD
/// of at least two characters.
fn valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
    {
        return false;
    }

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    if host.is_empty()
        || !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return false;
    }

    tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}
