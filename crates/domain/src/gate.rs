//! Role-based routing for portal screen trees.

use std::str::FromStr;

use galley_core::AppError;
use serde::{Deserialize, Serialize};

use crate::Role;

/// Role-specific screen tree guarded by the access gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Portal {
    /// Group administration screens.
    Admin,
    /// Shift, checklist and location screens for staff.
    Employee,
    /// Screens exposed to external partners.
    Partner,
}

impl Portal {
    /// Returns the stable path segment for this portal.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
            Self::Partner => "partner",
        }
    }

    /// Roles allowed to render this portal.
    #[must_use]
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Self::Admin => &[Role::Admin],
            Self::Employee => &[Role::Employee],
            Self::Partner => &[Role::Partner],
        }
    }
}

impl FromStr for Portal {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "employee" => Ok(Self::Employee),
            "partner" => Ok(Self::Partner),
            _ => Err(AppError::NotFound(format!("portal '{value}' does not exist"))),
        }
    }
}

/// Navigation destination produced by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "role", rename_all = "snake_case")]
pub enum Route {
    /// Sign-in screen.
    SignIn,
    /// Default screen of a role's own portal.
    RoleHome(Role),
}

impl Route {
    /// Returns the navigation path.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::SignIn => "/sign-in",
            Self::RoleHome(Role::Admin) => "/admin",
            Self::RoleHome(Role::Employee) => "/employee",
            Self::RoleHome(Role::Partner) => "/partner",
        }
    }
}

/// Resolver state as seen by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Profile resolution has not finished.
    Loading,
    /// Resolution finished without a profile.
    SignedOut,
    /// Resolution finished with a profile of this role.
    SignedIn(Role),
}

/// Outcome of evaluating the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Show the loading indicator and nothing else.
    Loading,
    /// Render the guarded children.
    Render,
    /// Navigate away without rendering the children.
    Redirect(Route),
}

/// Pure access gate: no state and no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGate;

impl AccessGate {
    /// Decides whether a screen tree allowing `allowed` roles may render.
    #[must_use]
    pub fn evaluate(state: GateState, allowed: &[Role]) -> GateDecision {
        match state {
            GateState::Loading => GateDecision::Loading,
            GateState::SignedOut => GateDecision::Redirect(Route::SignIn),
            GateState::SignedIn(role) if allowed.contains(&role) => GateDecision::Render,
            GateState::SignedIn(role) => GateDecision::Redirect(Route::RoleHome(role)),
        }
    }

    /// Evaluates the gate for one portal.
    #[must_use]
    pub fn evaluate_portal(state: GateState, portal: Portal) -> GateDecision {
        Self::evaluate(state, portal.allowed_roles())
    }
}
