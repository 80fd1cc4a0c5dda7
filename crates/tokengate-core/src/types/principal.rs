//! Principal type enumeration and the canonical principal record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// The closed set of principal types that can hold a bearer token.
///
/// Each type has its own signing secret and claim schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "principal_type", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrincipalType {
    /// Platform operator.
    SuperAdmin,
    /// Administrator of a single organization.
    EntityAdmin,
    /// Mobile member of an organization.
    Subscriber,
}

impl PrincipalType {
    /// Wire name, as carried in `userType` claims and role strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::EntityAdmin => "ENTITY_ADMIN",
            Self::Subscriber => "SUBSCRIBER",
        }
    }

    /// Canonical role label exposed to downstream services.
    ///
    /// Subscribers are reported as `MEMBER`; admins keep their wire name.
    pub fn role_label(&self) -> &'static str {
        match self {
            Self::Subscriber => "MEMBER",
            other => other.as_str(),
        }
    }

    /// Granted authority string: `"ROLE_" + principal type`.
    pub fn authority(&self) -> String {
        format!("ROLE_{}", self.as_str())
    }

    /// Human-readable name used in client-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Admin",
            Self::EntityAdmin => "Entity Admin",
            Self::Subscriber => "Subscriber",
        }
    }
}

impl fmt::Display for PrincipalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PrincipalType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            "ENTITY_ADMIN" => Ok(Self::EntityAdmin),
            "SUBSCRIBER" => Ok(Self::Subscriber),
            _ => Err(AppError::validation(format!(
                "Invalid principal type: '{s}'. Expected one of: SUPER_ADMIN, ENTITY_ADMIN, SUBSCRIBER"
            ))),
        }
    }
}

/// The normalized, claim-shape independent identity of a validated token.
///
/// Only produced by the claim normalizer (or by a credential store at login);
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalPrincipal {
    /// Which scheme the identity belongs to.
    pub principal_type: PrincipalType,
    /// Token subject: admin username or subscriber mobile number.
    pub username: String,
    /// Owning organization (entity admins).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<i64>,
    /// Subscriber record id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber_id: Option<i64>,
    /// Entity code the subscriber belongs to (e.g. `MSD00001`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

impl CanonicalPrincipal {
    /// A principal with only a type and subject.
    pub fn new(principal_type: PrincipalType, username: impl Into<String>) -> Self {
        Self {
            principal_type,
            username: username.into(),
            organization_id: None,
            subscriber_id: None,
            entity_id: None,
        }
    }

    /// Sets the organization id.
    pub fn with_organization(mut self, organization_id: i64) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    /// Sets the subscriber id.
    pub fn with_subscriber(mut self, subscriber_id: i64) -> Self {
        self.subscriber_id = Some(subscriber_id);
        self
    }

    /// Sets the entity code.
    pub fn with_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Canonical role label (`MEMBER` for subscribers).
    pub fn role_label(&self) -> &'static str {
        self.principal_type.role_label()
    }

    /// Granted authority string for downstream role checks.
    pub fn authority(&self) -> String {
        self.principal_type.authority()
    }
}
