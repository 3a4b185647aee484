// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the roster membership system.
//!
//! This crate translates request structs into engine invocations:
//! handlers authorize the actor, load entities through the persistence
//! adapter, run the role transition engine or the invoice batch
//! generator, and return the engine's notifications alongside the
//! outcome. Errors follow a small API taxonomy ([`ApiError`]) distinct
//! from the engine's internal errors.
//!
//! Real authentication and session handling live outside this system;
//! the [`Actor`] gate only models write scopes.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{Actor, ActorScope};
pub use error::ApiError;
pub use handlers::{create_invoice_list, create_role, destroy_role, run_batch_job, update_role};
pub use request_response::{
    CreateInvoiceListRequest, CreateRoleRequest, InvoiceItemInput, InvoiceListResponse,
    JobRunOutcome, RoleChangeResponse, UpdateRoleRequest,
};
