//! Core type definitions used across the TokenGate workspace.

pub mod principal;

pub use principal::{CanonicalPrincipal, PrincipalType};
