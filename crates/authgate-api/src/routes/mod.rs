//! # API Route Modules
//!
//! Route modules for the gateway's HTTP surface:
//!
//! - `auth` — public credential exchange: `POST /login`, `POST /register`.
//!   Both return the user profile with a freshly issued bearer token.
//! - `users` — protected profile routes: `GET /v1/me` resolves the caller's
//!   own record from the verified token subject.

pub mod auth;
pub mod users;
