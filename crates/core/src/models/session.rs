//! Session model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Role carried in the credential's claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(Error::Validation(format!("Unknown role '{}'", other))),
        }
    }
}

/// Client-held authentication state
///
/// Replaced wholesale on login and cleared wholesale on logout. The role is a
/// hint decoded from the unverified token payload; it drives UI affordances
/// only and is never an authorization boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub credential: Option<String>,
    pub identity: Option<String>,
    pub role: Option<Role>,
}

impl Session {
    pub fn new(credential: String, identity: String, role: Option<Role>) -> Self {
        Self {
            credential: Some(credential),
            identity: Some(identity),
            role,
        }
    }

    /// An empty, logged-out session
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    pub fn is_empty(&self) -> bool {
        self.credential.is_none() && self.identity.is_none() && self.role.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn test_session_flags() {
        let session = Session::new("tok".into(), "a@b.c".into(), Some(Role::Admin));
        assert!(session.is_authenticated());
        assert!(session.is_admin());

        let anonymous = Session::new("tok".into(), "a@b.c".into(), None);
        assert!(anonymous.is_authenticated());
        assert!(!anonymous.is_admin());

        assert!(Session::empty().is_empty());
        assert!(!Session::empty().is_authenticated());
    }
}
