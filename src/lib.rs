//! # Porta (Auth Gateway)
//!
//! `porta` is a thin gateway in front of a hosted identity provider. It signs
//! users up and in through the provider's REST identity endpoints, verifies
//! the RS256 bearer tokens the provider issues, and keeps a per-user profile
//! document in the provider's managed document store.
//!
//! ## Composition
//!
//! The binary's `main` builds a single [`gateway::Gateway`] from the
//! credentials configuration and passes it to every operation; there is no
//! hidden process-wide state. The hard problems (password storage, token
//! issuance, replication) stay with the provider.
//!
//! ## Error contract
//!
//! - Credential exchange surfaces the provider's HTTP status and error
//!   message to the caller, never retried.
//! - Token verification is typed internally ([`token::Error`]) and collapses
//!   to `None` at the [`gateway::Gateway::verify`] boundary.
//! - A missing profile document is `Ok(None)`, not an error.
//! - A missing or unreadable service-account descriptor is fatal at startup.

pub mod cli;
pub mod credentials;
pub mod gateway;
pub mod identity;
pub mod profile;
pub mod rest;
pub mod token;

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
