use std::str::FromStr;

use galley_core::{AppError, UserId};
use serde::{Deserialize, Serialize};

/// Portal role assigned to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Group-wide operator; sees every location and brand.
    Admin,
    /// Staff member scoped to granted locations and brands.
    Employee,
    /// External partner scoped to granted locations and brands.
    Partner,
}

impl Role {
    /// Returns the stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
            Self::Partner => "partner",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[Role::Admin, Role::Employee, Role::Partner];

        ALL
    }

    /// Whether this role bypasses grant rows and sees the whole catalog.
    #[must_use]
    pub fn sees_full_catalog(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "employee" => Ok(Self::Employee),
            "partner" => Ok(Self::Partner),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

/// Application profile row: role plus optional default assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    user_id: UserId,
    role: Role,
    default_location_id: Option<String>,
    default_brand_id: Option<String>,
}

impl Profile {
    /// Creates a profile; blank default references are treated as absent.
    #[must_use]
    pub fn new(
        user_id: UserId,
        role: Role,
        default_location_id: Option<String>,
        default_brand_id: Option<String>,
    ) -> Self {
        Self {
            user_id,
            role,
            default_location_id: non_blank(default_location_id),
            default_brand_id: non_blank(default_brand_id),
        }
    }

    /// Returns the owning user identifier.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the profile role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the stored default location reference.
    #[must_use]
    pub fn default_location_id(&self) -> Option<&str> {
        self.default_location_id.as_deref()
    }

    /// Returns the stored default brand reference.
    #[must_use]
    pub fn default_brand_id(&self) -> Option<&str> {
        self.default_brand_id.as_deref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use galley_core::UserId;
    use proptest::prelude::*;

    use super::{Profile, Role};

    #[test]
    fn role_roundtrip_storage_value() {
        for role in Role::all() {
            let restored = Role::from_str(role.as_str());
            assert!(restored.is_ok());
            assert_eq!(restored.unwrap_or(Role::Partner), *role);
        }
    }

    #[test]
    fn role_parsing_is_case_sensitive() {
        assert!(Role::from_str("Admin").is_err());
        assert!(Role::from_str(" admin").is_err());
    }

    #[test]
    fn only_admin_sees_full_catalog() {
        assert!(Role::Admin.sees_full_catalog());
        assert!(!Role::Employee.sees_full_catalog());
        assert!(!Role::Partner.sees_full_catalog());
    }

    #[test]
    fn blank_default_references_are_dropped() {
        let Ok(user_id) = UserId::new("u1") else {
            panic!("valid user id rejected");
        };
        let profile = Profile::new(user_id, Role::Employee, Some("  ".to_owned()), None);
        assert_eq!(profile.default_location_id(), None);
    }

    proptest! {
        #[test]
        fn unknown_role_values_are_rejected(value in "[a-z_]{0,12}") {
            prop_assume!(!matches!(value.as_str(), "admin" | "employee" | "partner"));
            prop_assert!(Role::from_str(value.as_str()).is_err());
        }
    }
}
