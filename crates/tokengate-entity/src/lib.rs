//! # tokengate-entity
//!
//! Row models for the token store. Every struct in this crate maps to a
//! database table row and derives `sqlx::FromRow`; the `Create*` structs
//! carry the caller-supplied columns for inserts.

pub mod token;
