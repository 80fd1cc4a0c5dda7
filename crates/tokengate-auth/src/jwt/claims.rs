//! Claim names and typed accessors over a decoded claim map.
//!
//! Tokens from the three schemes carry incompatible payloads, so claims are
//! decoded into an untyped map and read through these helpers instead of a
//! single `#[derive(Deserialize)]` struct.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// A decoded token payload.
pub type RawClaims = Map<String, Value>;

pub const SUB: &str = "sub";
pub const EXP: &str = "exp";
pub const IAT: &str = "iat";
pub const JTI: &str = "jti";
pub const TOKEN_TYPE: &str = "tokenType";
pub const USER_TYPE: &str = "userType";
pub const TYPE: &str = "type";
pub const ROLE: &str = "role";
pub const SUBSCRIBER_ID: &str = "subscriberId";
pub const USER_ID: &str = "userId";
pub const ORGANIZATION_ID: &str = "organizationId";
pub const ORG_ID: &str = "orgId";
pub const ENTITY_ID: &str = "entityId";
pub const MOBILE_NUMBER: &str = "mobileNumber";
pub const REFRESH: &str = "refresh";
pub const PRINCIPAL_TYPE: &str = "principalType";

/// `tokenType` values.
pub mod token_type {
    pub const SUPER_ADMIN_ACCESS: &str = "SUPER_ADMIN_ACCESS";
    pub const ENTITY_ADMIN_ACCESS: &str = "ENTITY_ADMIN_ACCESS";
    pub const SUPER_ADMIN_REFRESH: &str = "SUPER_ADMIN_REFRESH";
    pub const ENTITY_ADMIN_REFRESH: &str = "ENTITY_ADMIN_REFRESH";
    pub const ACCESS: &str = "ACCESS";
    pub const REFRESH: &str = "REFRESH";
}

/// Subscriber `type` / `role` values.
pub mod subscriber {
    pub const ACCESS: &str = "ACCESS";
    pub const REFRESH: &str = "REFRESH";
    pub const ROLE: &str = "SUBSCRIBER";
}

/// A string claim, if present and a string.
pub fn str_claim<'a>(claims: &'a RawClaims, name: &str) -> Option<&'a str> {
    claims.get(name).and_then(Value::as_str)
}

/// A non-empty string claim.
pub fn non_empty_str_claim<'a>(claims: &'a RawClaims, name: &str) -> Option<&'a str> {
    str_claim(claims, name).filter(|s| !s.is_empty())
}

/// An integer claim written either as a JSON number or as a numeric string.
pub fn int_claim(claims: &RawClaims, name: &str) -> Option<i64> {
    match claims.get(name)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The first of `names` that yields an integer.
pub fn first_int_claim(claims: &RawClaims, names: &[&str]) -> Option<i64> {
    names.iter().find_map(|name| int_claim(claims, name))
}

/// The `exp` claim as an instant. `None` when absent or not a number.
pub fn expires_at(claims: &RawClaims) -> Option<DateTime<Utc>> {
    let exp = claims.get(EXP)?.as_i64()?;
    DateTime::from_timestamp(exp, 0)
}

/// Whether the payload carries any refresh-token marker.
///
/// Refresh tokens are recognized by `tokenType` ending in `REFRESH`, a
/// subscriber-style `type: "REFRESH"`, or `refresh: true`.
pub fn is_refresh_token(claims: &RawClaims) -> bool {
    let token_type_marks = str_claim(claims, TOKEN_TYPE).is_some_and(|t| {
        t == token_type::SUPER_ADMIN_REFRESH
            || t == token_type::ENTITY_ADMIN_REFRESH
            || t == token_type::REFRESH
    });
    let type_marks = str_claim(claims, TYPE) == Some(subscriber::REFRESH);
    let flag_marks = claims.get(REFRESH).and_then(Value::as_bool) == Some(true);

    token_type_marks || type_marks || flag_marks
}
