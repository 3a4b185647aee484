// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Engine layer for the Roster membership system.
//!
//! Two engines live here:
//!
//! - the **role transition engine**: given an existing role and a
//!   requested mutation, it plans the correct persistence action
//!   (update in place, terminate and create, or hard-replace) as data,
//!   then applies the plan through the [`RoleStore`] seam while
//!   keeping the person's primary group consistent;
//! - the **invoice batch generator**: given an invoice list, it
//!   resolves the recipient set, clones the template invoice per
//!   recipient with re-materialized line items, persists each invoice
//!   individually, and defers the whole run to a queued job when the
//!   recipient count exceeds the synchronous limit.
//!
//! Both engines are storage-agnostic; the Diesel adapter lives in
//! `roster-persistence`.

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

mod apply;
mod batch_create;
mod error;
mod notification;
mod primary_group;
mod recipients;
mod role_change;
mod store;

#[cfg(test)]
mod tests;

pub use apply::{RoleChangeOutcome, apply_role_change};
pub use batch_create::{
    BATCH_CREATE_JOB_KIND, BatchCreate, BatchCreateJob, BatchOutcome, DEFAULT_SYNC_LIMIT,
    process_recipients,
};
pub use error::{CoreError, ErrorEntity};
pub use notification::{Notification, Notifications, Severity};
pub use primary_group::{PrimaryGroupOutcome, maintain_primary_group};
pub use recipients::resolve_recipients;
pub use role_change::{
    ChangeContext, RoleAttributes, RoleChangePlan, plan_role_create, plan_role_destroy,
    plan_role_update,
};
pub use store::{InvoiceStore, JobQueue, RecipientSource, RoleStore, StoreError};
