//! Signed-in identity, login and password-change validation.

use crate::error::{AuthError, CredentialErrors};
use crate::record::Record;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use md5::{Digest, Md5};

pub const MIN_PASSWORD_LEN: usize = 6;

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("Invalid username regex"));

/// Lowercase hex MD5 digest sent in place of a plain password. The backend
/// stores and compares MD5 digests.
pub fn hash_password(password: &str) -> String {
    hex::encode(Md5::digest(password.as_bytes()))
}

/// User returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub name: String,
    pub role: String,
}

impl Identity {
    pub fn from_record(record: &Record) -> Result<Self, AuthError> {
        let uid = record.get("uid");
        let role = record.get("role");
        if uid.is_empty() || role.is_empty() {
            return Err(AuthError::MissingIdentity);
        }
        Ok(Self {
            uid: uid.normalized(),
            name: record.text("name"),
            role: role.normalized(),
        })
    }
}

/// Explicit session holder. Set at login, cleared at logout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    current: Option<Identity>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&mut self, identity: Identity) {
        self.current = Some(identity);
    }

    pub fn sign_out(&mut self) -> Option<Identity> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    /// The signed-in identity, provided it carries `role` (case-insensitive).
    pub fn require(&self, role: &str) -> Result<&Identity, AuthError> {
        let identity = self.current.as_ref().ok_or(AuthError::NotSignedIn)?;
        if identity.role.eq_ignore_ascii_case(role) {
            Ok(identity)
        } else {
            Err(AuthError::RoleMismatch {
                required: role.to_string(),
                actual: identity.role.clone(),
            })
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), CredentialErrors> {
        let mut errors = Vec::new();
        let username = self.username.trim();
        if username.is_empty() {
            errors.push("Username is required.".to_string());
        } else if !USERNAME_PATTERN.is_match(username) {
            errors.push("Username can only contain letters, numbers, and underscores.".to_string());
        }
        if self.password.trim().is_empty() {
            errors.push("Password is required.".to_string());
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(format!(
                "Password must be at least {} characters long.",
                MIN_PASSWORD_LEN
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CredentialErrors(errors))
        }
    }

    /// `login` payload with the password hashed.
    pub fn payload(&self) -> Record {
        Record::new()
            .with("username", self.username.trim())
            .with("password", hash_password(&self.password))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

impl PasswordChange {
    pub fn validate(&self) -> Result<(), CredentialErrors> {
        let mut errors = Vec::new();
        if self.current.trim().is_empty() {
            errors.push("Current password is required.".to_string());
        }
        if self.new.trim().is_empty() {
            errors.push("New password is required.".to_string());
        }
        if self.new == self.current {
            errors.push("New password cannot be the same as the current password.".to_string());
        }
        if self.new != self.confirm {
            errors.push("New password and confirm password do not match.".to_string());
        }
        if self.new.chars().count() < MIN_PASSWORD_LEN {
            errors.push(format!(
                "New password must be at least {} characters long.",
                MIN_PASSWORD_LEN
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CredentialErrors(errors))
        }
    }

    /// `changepassword` payload for the signed-in user, both passwords hashed.
    pub fn payload(&self, identity: &Identity) -> Record {
        let uid = identity
            .uid
            .parse::<i64>()
            .map(serde_json::Value::from)
            .unwrap_or_else(|_| serde_json::Value::from(identity.uid.clone()));
        Record::new()
            .with("uid", uid)
            .with("currentPassword", hash_password(&self.current))
            .with("newPassword", hash_password(&self.new))
    }
}
