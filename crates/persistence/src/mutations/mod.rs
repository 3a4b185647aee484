// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! All mutations are monomorphic over `SqliteConnection` and use
//! Diesel DSL, with the `last_insert_rowid()` helper from the
//! `backend` module where an inserted id is needed.
//!
//! ## Module Organization
//!
//! - `people` — Person and group fixture mutations
//! - `roles` — Role lifecycle and add-request mutations
//! - `invoices` — Invoice and invoice list persistence
//! - `jobs` — Background job queue mutations

pub mod invoices;
pub mod jobs;
pub mod people;
pub mod roles;
