//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, Base64, random bytes)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - JWT access/refresh token issuance and verification
//! - Cookie management
//! - In-memory rate limiting
//! - Client IP extraction
//! - Upload route configuration for the external upload service

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
pub mod rate_limit;
pub mod token;
pub mod upload;
