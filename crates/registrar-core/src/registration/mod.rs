//! Commit-reveal registration against the permanent registrar controller.
//!
//! A registration is two transactions. [`RegistrationClient::commit`] publishes a hash of
//! `(label, owner, secret)`; once the commitment is older than the controller's minimum age
//! and younger than its maximum, [`RegistrationClient::register`] reveals it and pays the rent.

pub mod client;
pub mod errors;

pub use client::{check_commitment_age, CommitReceipt, RegistrationClient};
pub use errors::RegistrationError;
