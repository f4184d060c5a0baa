//! Static authentication: a fixed role and optional basic-auth credentials.
//!
//! The dashboard's login flow lives outside the store.  For the CLI the
//! answer to "who is this?" comes from the settings file or the command line
//! and does not change during a run.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::application::collaborators::AuthProvider;

/// The viewer's role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
    Guest,
}

/// An [`AuthProvider`] with fixed answers.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    role: Role,
    username: Option<String>,
    password: Option<String>,
}

impl StaticAuth {
    pub fn new(role: Role) -> Self {
        Self { role, ..Self::default() }
    }

    /// Adds credentials sent as an `Authorization: Basic` header.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl AuthProvider for StaticAuth {
    fn is_user_admin(&self) -> bool {
        self.role == Role::Admin
    }

    fn is_logged_in_as_guest(&self) -> bool {
        self.role == Role::Guest
    }

    fn make_auth_headers(&self) -> Vec<(String, String)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => {
                let token = STANDARD.encode(format!("{user}:{pass}"));
                vec![("Authorization".to_string(), format!("Basic {token}"))]
            }
            _ => Vec::new(),
        }
    }

    fn current_username(&self) -> Option<String> {
        self.username.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_flags() {
        assert!(StaticAuth::new(Role::Admin).is_user_admin());
        assert!(!StaticAuth::new(Role::User).is_user_admin());
        assert!(StaticAuth::new(Role::Guest).is_logged_in_as_guest());
        assert!(!StaticAuth::new(Role::Admin).is_logged_in_as_guest());
    }

    #[test]
    fn test_basic_auth_header() {
        let auth = StaticAuth::new(Role::User).with_credentials("alice", "s3cret");
        assert_eq!(
            auth.make_auth_headers(),
            vec![("Authorization".to_string(), "Basic YWxpY2U6czNjcmV0".to_string())]
        );
        assert_eq!(auth.current_username().as_deref(), Some("alice"));
    }

    #[test]
    fn test_no_credentials_means_no_headers() {
        assert!(StaticAuth::new(Role::Admin).make_auth_headers().is_empty());
    }

    #[test]
    fn test_role_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            role: Role,
        }
        let w: Wrapper = toml::from_str("role = \"guest\"").expect("parse");
        assert_eq!(w.role, Role::Guest);
    }
}
