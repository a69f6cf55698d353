//! Connection role value object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a client declares at connection time.
///
/// Used only for role-targeted fan-out (e.g. refreshing every admin
/// dashboard); it is not an authorization mechanism. Unknown role strings
/// from the handshake degrade to `User` rather than rejecting the
/// connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Driver,
    Warehouse,
    Admin,
}

impl Role {
    /// Parses a handshake role string, defaulting to `User`.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("admin") => Role::Admin,
            Some("driver") => Role::Driver,
            Some("warehouse") => Role::Warehouse,
            _ => Role::User,
        }
    }

    /// Returns the lowercase wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Driver => "driver",
            Role::Warehouse => "warehouse",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_role_defaults_to_user() {
        assert_eq!(Role::parse_or_default(None), Role::User);
    }

    #[test]
    fn unknown_role_defaults_to_user() {
        assert_eq!(Role::parse_or_default(Some("superuser")), Role::User);
    }

    #[test]
    fn known_roles_parse() {
        assert_eq!(Role::parse_or_default(Some("admin")), Role::Admin);
        assert_eq!(Role::parse_or_default(Some("driver")), Role::Driver);
        assert_eq!(Role::parse_or_default(Some("warehouse")), Role::Warehouse);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }
}
