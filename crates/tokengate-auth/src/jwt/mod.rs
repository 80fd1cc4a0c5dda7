//! Token signing, verification, claim normalization, and issuance.

pub mod claims;
pub mod codec;
pub mod issuer;
pub mod keys;
pub mod normalizer;
pub mod validator;

pub use claims::RawClaims;
pub use codec::{CodecError, TokenCodec};
pub use issuer::{InvalidRefreshToken, IssuedToken, RefreshSubject, TokenIssuer, TokenPair};
pub use keys::{SchemeKey, SchemeRegistry};
pub use normalizer::{ClaimNormalizer, ClaimShape, UnrecognizedShape};
pub use validator::{AuthFailure, AuthResult, Authenticated, MultiSchemeValidator};
