// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! All functions are monomorphic over `SqliteConnection` and use
//! Diesel DSL exclusively; the `SqlitePersistence` adapter in `lib.rs`
//! maps their results onto the engine storage traits.
//!
//! ## Module Organization
//!
//! - `people` — Person lookups
//! - `groups` — Group lookups and layer subtree expansion
//! - `roles` — Role lookups, active-role filters, and headcounts
//! - `subscriptions` — Mailing list subscription queries
//! - `invoices` — Invoice and invoice list reads
//! - `jobs` — Background job reads

pub mod groups;
pub mod invoices;
pub mod jobs;
pub mod people;
pub mod roles;
pub mod subscriptions;
