#![deny(missing_docs)]

//! # authgate-core — Token Domain for the Authgate Gateway
//!
//! This crate owns the stateless token protocol: creating signed bearer
//! tokens from an identity and validating them back into one. It is
//! framework-free — only `serde`, `thiserror`, `chrono`, `jsonwebtoken`,
//! and `zeroize` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Stateless tokens.** A token is a self-contained, expiring, signed
//!    credential. Nothing is stored server-side; validation is a pure
//!    function of (token, secret, clock).
//!
//! 2. **Misconfiguration fails at construction.** [`TokenProvider::new`]
//!    rejects an unusable secret once, at startup. Per-call token creation
//!    is infallible.
//!
//! 3. **Secrets never leak.** [`SecretString`] redacts its `Debug` output
//!    and zeroizes its memory on drop.

pub mod secret;
pub mod token;

pub use secret::SecretString;
pub use token::{Claims, InvalidTokenError, TokenConfigError, TokenCreationError, TokenProvider};
