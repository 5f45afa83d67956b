//! Accounts and authentication.
//!
//! Credential sign up / sign in with peppered Argon2 hashes, JWT issuance
//! and verification, cookie management, onboarding and profile management.
//! Other crates consume this one through the `presentation::middleware`
//! layers, which resolve the bearer token into a [`kernel::actor::CurrentUser`]
//! request extension.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use error::{AuthError, AuthResult};
