//! Per-scheme signing material, built once from configuration.

use chrono::Duration;
use jsonwebtoken::{DecodingKey, EncodingKey};

use tokengate_core::config::{AuthConfig, MIN_SECRET_BYTES};
use tokengate_core::error::AppError;
use tokengate_core::types::PrincipalType;

/// Signing keys and token lifetimes for one principal type.
#[derive(Clone)]
pub struct SchemeKey {
    principal_type: PrincipalType,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for SchemeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemeKey")
            .field("principal_type", &self.principal_type)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl SchemeKey {
    /// Builds a scheme from a raw HMAC secret.
    pub fn new(
        principal_type: PrincipalType,
        secret: &[u8],
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, AppError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(AppError::configuration(format!(
                "Signing secret for {principal_type} must be at least {MIN_SECRET_BYTES} bytes"
            )));
        }
        Ok(Self {
            principal_type,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_ttl,
            refresh_ttl,
        })
    }

    pub fn principal_type(&self) -> PrincipalType {
        self.principal_type
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}

/// The ordered list of schemes the validator tries.
#[derive(Debug, Clone)]
pub struct SchemeRegistry {
    schemes: Vec<SchemeKey>,
}

impl SchemeRegistry {
    /// Builds the registry in the configured priority order.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        let schemes = config
            .schemes
            .iter()
            .map(|s| {
                SchemeKey::new(
                    s.principal_type,
                    s.secret.as_bytes(),
                    config_duration(s.access_ttl_minutes(), Duration::try_minutes, "access_ttl_minutes")?,
                    config_duration(s.refresh_ttl_hours(), Duration::try_hours, "refresh_ttl_hours")?,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(schemes)
    }

    /// Builds a registry from explicit keys, rejecting empty or duplicate lists.
    pub fn new(schemes: Vec<SchemeKey>) -> Result<Self, AppError> {
        if schemes.is_empty() {
            return Err(AppError::configuration("At least one signing scheme is required"));
        }
        for (i, scheme) in schemes.iter().enumerate() {
            if schemes[..i]
                .iter()
                .any(|s| s.principal_type == scheme.principal_type)
            {
                return Err(AppError::configuration(format!(
                    "Signing scheme for {} is configured twice",
                    scheme.principal_type
                )));
            }
        }
        Ok(Self { schemes })
    }

    /// Schemes in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemeKey> {
        self.schemes.iter()
    }

    /// The scheme for `principal_type`.
    pub fn get(&self, principal_type: PrincipalType) -> Option<&SchemeKey> {
        self.schemes
            .iter()
            .find(|s| s.principal_type == principal_type)
    }

    /// Like [`get`](Self::get), but a missing scheme is a configuration error.
    pub fn require(&self, principal_type: PrincipalType) -> Result<&SchemeKey, AppError> {
        self.get(principal_type).ok_or_else(|| {
            AppError::configuration(format!("No signing scheme configured for {principal_type}"))
        })
    }
}

/// Converts a configured count of `unit`s to a duration, rejecting values
/// chrono cannot represent.
pub(crate) fn config_duration(
    value: u64,
    unit: fn(i64) -> Option<Duration>,
    field: &str,
) -> Result<Duration, AppError> {
    i64::try_from(value)
        .ok()
        .and_then(unit)
        .ok_or_else(|| AppError::configuration(format!("auth {field} is out of range: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(pt: PrincipalType) -> SchemeKey {
        SchemeKey::new(pt, &[7u8; 64], Duration::hours(1), Duration::days(7)).unwrap()
    }

    #[test]
    fn test_rejects_short_secret() {
        let result = SchemeKey::new(
            PrincipalType::SuperAdmin,
            b"too-short",
            Duration::hours(1),
            Duration::days(1),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_registry_keeps_order_and_rejects_duplicates() {
        let registry = SchemeRegistry::new(vec![
            key(PrincipalType::Subscriber),
            key(PrincipalType::EntityAdmin),
        ])
        .unwrap();
        let order: Vec<_> = registry.iter().map(|s| s.principal_type()).collect();
        assert_eq!(
            order,
            vec![PrincipalType::Subscriber, PrincipalType::EntityAdmin]
        );
        assert!(registry.get(PrincipalType::SuperAdmin).is_none());
        assert!(registry.require(PrincipalType::SuperAdmin).is_err());

        assert!(
            SchemeRegistry::new(vec![
                key(PrincipalType::Subscriber),
                key(PrincipalType::Subscriber)
            ])
            .is_err()
        );
    }

    #[test]
    fn test_out_of_range_ttl_is_a_configuration_error() {
        let config = AuthConfig {
            leeway_seconds: 0,
            schemes: vec![tokengate_core::config::SchemeConfig {
                principal_type: PrincipalType::EntityAdmin,
                secret: "x".repeat(64),
                access_ttl_minutes: Some(u64::MAX),
                refresh_ttl_hours: None,
            }],
            accounts: Vec::new(),
        };
        let err = SchemeRegistry::from_config(&config).unwrap_err();
        assert_eq!(err.kind, tokengate_core::error::ErrorKind::Configuration);

        assert!(config_duration(i64::MAX as u64, Duration::try_hours, "refresh_ttl_hours").is_err());
        assert_eq!(
            config_duration(72, Duration::try_hours, "refresh_ttl_hours").unwrap(),
            Duration::days(3)
        );
    }

    #[test]
    fn test_debug_hides_keys() {
        let rendered = format!("{:?}", key(PrincipalType::SuperAdmin));
        assert!(rendered.contains("SuperAdmin"));
        assert!(!rendered.contains("encoding_key"));
    }
}
