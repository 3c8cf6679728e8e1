//! Signed-in session for the console, guarded by the configured role.

use aptime_core::{AuthContext, AuthError, Identity};

#[derive(Debug, Clone)]
pub struct Session {
    auth: AuthContext,
    required_role: String,
}

impl Session {
    pub fn new(required_role: impl Into<String>) -> Self {
        Self {
            auth: AuthContext::new(),
            required_role: required_role.into(),
        }
    }

    pub fn required_role(&self) -> &str {
        &self.required_role
    }

    pub fn sign_in(&mut self, identity: Identity) {
        tracing::info!(uid = %identity.uid, role = %identity.role, "signed in");
        self.auth.sign_in(identity);
    }

    pub fn sign_out(&mut self) -> Option<Identity> {
        let previous = self.auth.sign_out();
        if let Some(identity) = &previous {
            tracing::info!(uid = %identity.uid, "signed out");
        }
        previous
    }

    pub fn is_signed_in(&self) -> bool {
        self.auth.is_signed_in()
    }

    pub fn current(&self) -> Option<&Identity> {
        self.auth.current()
    }

    /// Identity allowed into management views.
    pub fn guard(&self) -> Result<&Identity, AuthError> {
        self.auth.require(&self.required_role)
    }

    /// Header text for the signed-in user.
    pub fn display_name(&self) -> String {
        match self.auth.current() {
            Some(identity) if !identity.name.trim().is_empty() => {
                format!("{} ({})", identity.name, identity.role)
            }
            Some(identity) => format!("uid {} ({})", identity.uid, identity.role),
            None => "not signed in".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: &str) -> Identity {
        Identity {
            uid: "1".into(),
            name: "Admin".into(),
            role: role.into(),
        }
    }

    #[test]
    fn test_guard_requires_configured_role() {
        let mut session = Session::new("admin");
        assert_eq!(session.guard(), Err(AuthError::NotSignedIn));

        session.sign_in(identity("faculty"));
        assert!(matches!(session.guard(), Err(AuthError::RoleMismatch { .. })));

        session.sign_in(identity("ADMIN"));
        assert!(session.guard().is_ok());
        assert_eq!(session.display_name(), "Admin (ADMIN)");
    }

    #[test]
    fn test_sign_out_clears_identity() {
        let mut session = Session::new("admin");
        session.sign_in(identity("admin"));
        assert!(session.sign_out().is_some());
        assert!(!session.is_signed_in());
        assert_eq!(session.display_name(), "not signed in");
    }
}
