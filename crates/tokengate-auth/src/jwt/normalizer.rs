//! Claim shape detection and normalization to [`CanonicalPrincipal`].

use thiserror::Error;

use tokengate_core::types::{CanonicalPrincipal, PrincipalType};

use super::claims::{self, RawClaims, subscriber, token_type};

/// The payload did not match any known access-token shape for the scheme
/// that verified it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unrecognized claim shape")]
pub struct UnrecognizedShape;

impl UnrecognizedShape {
    pub fn as_code(&self) -> &'static str {
        "UNRECOGNIZED_CLAIM_SHAPE"
    }
}

/// The access-token payload shapes in circulation, in match priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimShape {
    /// `tokenType: "SUPER_ADMIN_ACCESS"`.
    SuperAdminAccess,
    /// `tokenType: "ENTITY_ADMIN_ACCESS"`, organization from `organizationId` or `orgId`.
    EntityAdminAccess { organization_id: Option<i64> },
    /// `type: "ACCESS"` with `role: "SUBSCRIBER"`.
    SubscriberAccess {
        subscriber_id: Option<i64>,
        entity_id: Option<String>,
    },
    /// Legacy `userType` discriminator with `tokenType: "ACCESS"`.
    UserTypeAccess {
        principal_type: PrincipalType,
        organization_id: Option<i64>,
        subscriber_id: Option<i64>,
        entity_id: Option<String>,
    },
}

impl ClaimShape {
    /// Matches the payload against each shape in priority order:
    /// `tokenType`, then `type` + `role`, then `userType`.
    pub fn detect(claims: &RawClaims) -> Option<Self> {
        let kind = claims::str_claim(claims, claims::TOKEN_TYPE);

        match kind {
            Some(token_type::SUPER_ADMIN_ACCESS) => return Some(Self::SuperAdminAccess),
            Some(token_type::ENTITY_ADMIN_ACCESS) => {
                return Some(Self::EntityAdminAccess {
                    organization_id: organization_id(claims),
                });
            }
            _ => {}
        }

        if claims::str_claim(claims, claims::TYPE) == Some(subscriber::ACCESS)
            && claims::str_claim(claims, claims::ROLE) == Some(subscriber::ROLE)
        {
            return Some(Self::SubscriberAccess {
                subscriber_id: subscriber_id(claims),
                entity_id: entity_id(claims),
            });
        }

        if kind == Some(token_type::ACCESS) {
            let principal_type = claims::str_claim(claims, claims::USER_TYPE)?
                .parse::<PrincipalType>()
                .ok()?;
            return Some(match principal_type {
                PrincipalType::SuperAdmin => Self::UserTypeAccess {
                    principal_type,
                    organization_id: None,
                    subscriber_id: None,
                    entity_id: None,
                },
                PrincipalType::EntityAdmin => Self::UserTypeAccess {
                    principal_type,
                    organization_id: organization_id(claims),
                    subscriber_id: None,
                    entity_id: None,
                },
                PrincipalType::Subscriber => Self::UserTypeAccess {
                    principal_type,
                    organization_id: None,
                    subscriber_id: subscriber_id(claims),
                    entity_id: entity_id(claims),
                },
            });
        }

        None
    }

    /// The principal type this shape denotes.
    pub fn principal_type(&self) -> PrincipalType {
        match self {
            Self::SuperAdminAccess => PrincipalType::SuperAdmin,
            Self::EntityAdminAccess { .. } => PrincipalType::EntityAdmin,
            Self::SubscriberAccess { .. } => PrincipalType::Subscriber,
            Self::UserTypeAccess { principal_type, .. } => *principal_type,
        }
    }

    fn into_principal(self, username: String) -> CanonicalPrincipal {
        let principal_type = self.principal_type();
        let (organization_id, subscriber_id, entity_id) = match self {
            Self::SuperAdminAccess => (None, None, None),
            Self::EntityAdminAccess { organization_id } => (organization_id, None, None),
            Self::SubscriberAccess {
                subscriber_id,
                entity_id,
            } => (None, subscriber_id, entity_id),
            Self::UserTypeAccess {
                organization_id,
                subscriber_id,
                entity_id,
                ..
            } => (organization_id, subscriber_id, entity_id),
        };

        CanonicalPrincipal {
            principal_type,
            username,
            organization_id,
            subscriber_id,
            entity_id,
        }
    }
}

fn organization_id(claims: &RawClaims) -> Option<i64> {
    claims::first_int_claim(claims, &[claims::ORGANIZATION_ID, claims::ORG_ID])
}

fn subscriber_id(claims: &RawClaims) -> Option<i64> {
    claims::first_int_claim(claims, &[claims::SUBSCRIBER_ID, claims::USER_ID])
}

fn entity_id(claims: &RawClaims) -> Option<String> {
    claims::non_empty_str_claim(claims, claims::ENTITY_ID).map(str::to_string)
}

/// Maps a verified payload to a [`CanonicalPrincipal`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimNormalizer;

impl ClaimNormalizer {
    /// Normalizes `claims` that verified under the `verified_as` scheme.
    ///
    /// The detected shape must denote the same principal type as the scheme,
    /// and `sub` must be a non-empty string.
    pub fn normalize(
        claims: &RawClaims,
        verified_as: PrincipalType,
    ) -> Result<CanonicalPrincipal, UnrecognizedShape> {
        let shape = ClaimShape::detect(claims).ok_or(UnrecognizedShape)?;
        if shape.principal_type() != verified_as {
            return Err(UnrecognizedShape);
        }
        let username = claims::non_empty_str_claim(claims, claims::SUB).ok_or(UnrecognizedShape)?;
        Ok(shape.into_principal(username.to_string()))
    }
}
