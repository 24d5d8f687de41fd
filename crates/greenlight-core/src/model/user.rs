use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::model::{normalize, ParseEnumError};

/// Collaborator roles in the production workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Agency,
    Designer,
    Editor,
    Client,
}

impl Role {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Agency => "agency",
            Self::Designer => "designer",
            Self::Editor => "editor",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "admin" => Ok(Self::Admin),
            "agency" => Ok(Self::Agency),
            "designer" => Ok(Self::Designer),
            "editor" => Ok(Self::Editor),
            "client" => Ok(Self::Client),
            _ => Err(ParseEnumError {
                expected: "role",
                got: s.to_string(),
            }),
        }
    }
}

/// The acting user, threaded explicitly into store-touching operations
/// instead of being read from ambient auth state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub brand_codes: Vec<String>,
    #[serde(default)]
    pub agency_id: Option<String>,
}

impl CurrentUser {
    /// Whether this user may see the given brand's groups.
    #[must_use]
    pub fn can_access_brand(&self, brand_code: &str) -> bool {
        matches!(self.role, Role::Admin) || self.brand_codes.iter().any(|code| code == brand_code)
    }
}

#[cfg(test)]
mod tests {
    use super::{CurrentUser, Role};
    use std::str::FromStr;

    #[test]
    fn role_display_parse_roundtrips() {
        for role in [
            Role::Admin,
            Role::Agency,
            Role::Designer,
            Role::Editor,
            Role::Client,
        ] {
            assert_eq!(Role::from_str(&role.to_string()).unwrap(), role);
        }
        assert!(Role::from_str("viewer").is_err());
    }

    #[test]
    fn brand_access_checks_codes_except_for_admin() {
        let mut user = CurrentUser {
            id: "u1".into(),
            name: None,
            role: Role::Designer,
            brand_codes: vec!["ACME".into()],
            agency_id: Some("ag1".into()),
        };
        assert!(user.can_access_brand("ACME"));
        assert!(!user.can_access_brand("OTHER"));

        user.role = Role::Admin;
        assert!(user.can_access_brand("OTHER"));
    }
}
