// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The contract between the webhook server and a DNS-01 solver.
//!
//! The server calls [`Solver::initialize`] once at startup, then
//! [`Solver::present`] and [`Solver::cleanup`] for every challenge, possibly
//! concurrently. Implementations must not serialize these calls themselves.

use crate::challenge::ChallengeRequest;
use crate::errors::SolverError;
use async_trait::async_trait;
use tokio::sync::watch;

/// A cert-manager DNS-01 webhook solver.
#[async_trait]
pub trait Solver: Send + Sync + 'static {
    /// Name under which the solver is registered; Issuers reference it as `solverName`.
    fn name(&self) -> &str;

    /// One-time setup before any challenge is served.
    ///
    /// `stop` flips to `true` when the process is shutting down.
    async fn initialize(
        &mut self,
        kube_config: kube::Config,
        stop: watch::Receiver<bool>,
    ) -> Result<(), SolverError>;

    /// Publish the challenge record described by `request`.
    async fn present(&self, request: &ChallengeRequest) -> Result<(), SolverError>;

    /// Remove the challenge record described by `request`.
    async fn cleanup(&self, request: &ChallengeRequest) -> Result<(), SolverError>;
}
