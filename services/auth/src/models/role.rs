//! User roles
//!
//! A user holds exactly one role. Every gated operation checks against this
//! closed set rather than comparing raw strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three actor roles of the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Browses, purchases, and reads novels
    Reader,
    /// Authors novels and submits them for review
    Creator,
    /// Reviews novels and views aggregate statistics
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Reader => "reader",
            Role::Creator => "creator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reader" => Ok(Role::Reader),
            "creator" => Ok(Role::Creator),
            "admin" => Ok(Role::Admin),
            other => Err(anyhow::anyhow!("unknown role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_str_roundtrip() {
        for role in [Role::Reader, Role::Creator, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("superuser".parse::<Role>().is_err());
    }
}
