//! Verification-token lifecycle for email-gated account activation.
//!
//! This crate orchestrates the signing primitives and the host's storage
//! into the full mint → embed → verify → re-mint cycle:
//! - [`VerifyConfig`] — deployment-wide settings, validated at startup
//! - [`RetryLedger`] — the replacement-link ceiling
//! - [`TokenManager`] — token minting, link building, link verification
//! - [`ActivationProcess`] — the one-way inactive → active transition
//!
//! # Design principles
//!
//! - **Stateless per call**: tokens are re-derived on verification, never
//!   persisted. Shared state is the immutable config plus the host store.
//! - **Typed failure taxonomy**: every way a link can be unusable is a
//!   distinct [`VerifyError`] variant, propagated unchanged to the host so
//!   its response layer can map each one deliberately.
//! - **Tamper vs stale stay distinct**: an altered link is never treated
//!   as merely expired, and an expired link is still usable to identify
//!   who to rate-limit — but only because its signature verified.

mod activation;
mod config;
mod error;
mod ledger;
mod manager;

pub use activation::ActivationProcess;
pub use config::{TimeInterval, VerifyConfig};
pub use error::{VerifyError, VerifyResult};
pub use ledger::RetryLedger;
pub use manager::{TokenManager, REQUEST_NEW_LINK_PATH_PREFIX, VERIFY_PATH_PREFIX};
