// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the roster membership system.
//!
//! This crate provides `SQLite` persistence for the membership domain:
//! people, groups, roles, add requests, mailing lists, invoices, and
//! the background job queue. It is built on Diesel with embedded
//! migrations.
//!
//! The public surface is the [`SqlitePersistence`] adapter, which
//! implements the engine-facing storage traits from the core crate
//! (`RoleStore`, `InvoiceStore`, `RecipientSource`, `JobQueue`) plus
//! inherent methods for seeding fixtures and driving the job worker.
//!
//! ## Testing Philosophy
//!
//! - Standard tests (`cargo test`) run against in-memory `SQLite`
//! - Each in-memory database gets a unique shared-cache name so tests
//!   are isolated deterministically, without time-based collisions
//! - Foreign key enforcement is verified at construction and tests
//!   fail fast if it is off

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

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use diesel::SqliteConnection;
use time::Date;

use roster::{ErrorEntity, InvoiceStore, JobQueue, RecipientSource, RoleStore, StoreError};
use roster_domain::{
    AddRequest, Group, Invoice, InvoiceList, MailingList, Person, Role, RoleKind, Subscription,
};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::JobRecord;
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique
/// sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

fn store_err(err: PersistenceError) -> StoreError {
    StoreError::Backend(err.to_string())
}

const fn missing(entity: ErrorEntity, id: i64) -> StoreError {
    StoreError::NotFound { entity, id }
}

/// Persistence adapter over a single `SQLite` connection.
pub struct SqlitePersistence {
    pub(crate) conn: SqliteConnection,
}

impl SqlitePersistence {
    /// Creates a new persistence adapter with an in-memory `SQLite`
    /// database.
    ///
    /// Each call receives a unique database instance via atomic
    /// counter, ensuring deterministic test isolation without
    /// time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        // Unique shared in-memory database name per call so tests are isolated.
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_test_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::initialize_database(&shared_memory_url)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite`
    /// database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or
    /// initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::initialize_database(path_str)?;

        // WAL mode for better read concurrency on file databases.
        backend::enable_wal_mode(&mut conn)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Inserts a new person and returns the assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_person(&mut self, person: &Person) -> Result<i64, PersistenceError> {
        mutations::people::insert_person(&mut self.conn, person)
    }

    /// Inserts a new group and returns the assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_group(&mut self, group: &Group) -> Result<i64, PersistenceError> {
        mutations::people::insert_group(&mut self.conn, group)
    }

    /// Inserts a new mailing list and returns the assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_mailing_list(&mut self, list: &MailingList) -> Result<i64, PersistenceError> {
        mutations::people::insert_mailing_list(&mut self.conn, list)
    }

    /// Inserts a new subscription and returns the assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_subscription(
        &mut self,
        subscription: &Subscription,
    ) -> Result<i64, PersistenceError> {
        mutations::people::insert_subscription(&mut self.conn, subscription)
    }

    /// Looks up an invoice with its items.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored value cannot be
    /// decoded.
    pub fn find_invoice(&mut self, invoice_id: i64) -> Result<Option<Invoice>, PersistenceError> {
        queries::invoices::find_invoice(&mut self.conn, invoice_id)
    }

    /// Returns all invoices of a billing group, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored value cannot be
    /// decoded.
    pub fn invoices_of_group(
        &mut self,
        group_id: i64,
    ) -> Result<Vec<Invoice>, PersistenceError> {
        queries::invoices::invoices_of_group(&mut self.conn, group_id)
    }

    /// Looks up a persisted invoice list by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored value cannot be
    /// decoded.
    pub fn find_invoice_list(
        &mut self,
        invoice_list_id: i64,
    ) -> Result<Option<InvoiceList>, PersistenceError> {
        queries::invoices::find_invoice_list(&mut self.conn, invoice_list_id)
    }

    /// Looks up a background job by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_job(&mut self, job_id: i64) -> Result<Option<JobRecord>, PersistenceError> {
        queries::jobs::find_job(&mut self.conn, job_id)
    }

    /// Returns the oldest pending background job, if any.
    ///
    /// The job stays `pending` until the worker reports the outcome
    /// via [`Self::complete_job`] or [`Self::fail_job`]; a single
    /// worker consumes the queue, so no claim marker is needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn claim_next_job(&mut self) -> Result<Option<JobRecord>, PersistenceError> {
        queries::jobs::next_pending_job(&mut self.conn)
    }

    /// Counts pending background jobs.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_pending_jobs(&mut self) -> Result<i64, PersistenceError> {
        queries::jobs::count_pending_jobs(&mut self.conn)
    }

    /// Marks a job as done.
    ///
    /// # Errors
    ///
    /// Returns an error if the job does not exist or the update fails.
    pub fn complete_job(&mut self, job_id: i64) -> Result<(), PersistenceError> {
        mutations::jobs::complete_job(&mut self.conn, job_id)
    }

    /// Marks a job as failed and records the failure description.
    ///
    /// # Errors
    ///
    /// Returns an error if the job does not exist or the update fails.
    pub fn fail_job(&mut self, job_id: i64, error: &str) -> Result<(), PersistenceError> {
        mutations::jobs::fail_job(&mut self.conn, job_id, error)
    }
}

impl RoleStore for SqlitePersistence {
    fn find_person(&mut self, person_id: i64) -> Result<Person, StoreError> {
        queries::people::find_person(&mut self.conn, person_id)
            .map_err(store_err)?
            .ok_or(missing(ErrorEntity::Person, person_id))
    }

    fn find_group(&mut self, group_id: i64) -> Result<Group, StoreError> {
        queries::groups::find_group(&mut self.conn, group_id)
            .map_err(store_err)?
            .ok_or(missing(ErrorEntity::Group, group_id))
    }

    fn find_role(&mut self, role_id: i64) -> Result<Role, StoreError> {
        queries::roles::find_role(&mut self.conn, role_id)
            .map_err(store_err)?
            .ok_or(missing(ErrorEntity::Role, role_id))
    }

    fn active_roles_of_person(&mut self, person_id: i64) -> Result<Vec<Role>, StoreError> {
        queries::roles::active_roles_of_person(&mut self.conn, person_id).map_err(store_err)
    }

    fn insert_role(&mut self, role: &Role) -> Result<i64, StoreError> {
        mutations::roles::insert_role(&mut self.conn, role).map_err(store_err)
    }

    fn update_role(&mut self, role: &Role) -> Result<(), StoreError> {
        match mutations::roles::update_role(&mut self.conn, role) {
            Err(PersistenceError::NotFound(_)) => Err(missing(
                ErrorEntity::Role,
                role.role_id.unwrap_or_default(),
            )),
            other => other.map_err(store_err),
        }
    }

    fn terminate_role(&mut self, role_id: i64, end_on: Date) -> Result<(), StoreError> {
        match mutations::roles::terminate_role(&mut self.conn, role_id, end_on) {
            Err(PersistenceError::NotFound(_)) => Err(missing(ErrorEntity::Role, role_id)),
            other => other.map_err(store_err),
        }
    }

    fn delete_role(&mut self, role_id: i64) -> Result<(), StoreError> {
        match mutations::roles::delete_role(&mut self.conn, role_id) {
            Err(PersistenceError::NotFound(_)) => Err(missing(ErrorEntity::Role, role_id)),
            other => other.map_err(store_err),
        }
    }

    fn set_primary_group(
        &mut self,
        person_id: i64,
        group_id: Option<i64>,
    ) -> Result<(), StoreError> {
        match mutations::people::set_primary_group(&mut self.conn, person_id, group_id) {
            Err(PersistenceError::NotFound(_)) => Err(missing(ErrorEntity::Person, person_id)),
            other => other.map_err(store_err),
        }
    }

    fn find_add_request(
        &mut self,
        person_id: i64,
        body_group_id: i64,
    ) -> Result<Option<AddRequest>, StoreError> {
        mutations::roles::find_add_request(&mut self.conn, person_id, body_group_id)
            .map_err(store_err)
    }

    fn insert_add_request(&mut self, request: &AddRequest) -> Result<i64, StoreError> {
        mutations::roles::insert_add_request(&mut self.conn, request).map_err(store_err)
    }
}

impl InvoiceStore for SqlitePersistence {
    fn save_invoice(&mut self, invoice: &Invoice) -> Result<i64, StoreError> {
        mutations::invoices::save_invoice(&mut self.conn, invoice).map_err(store_err)
    }

    fn save_invoice_list(&mut self, list: &InvoiceList) -> Result<i64, StoreError> {
        mutations::invoices::save_invoice_list(&mut self.conn, list).map_err(store_err)
    }

    fn layer_of_group(&mut self, group_id: i64) -> Result<Group, StoreError> {
        let group: Group = RoleStore::find_group(self, group_id)?;
        let layer_id: i64 = group
            .layer_group_id
            .ok_or(missing(ErrorEntity::Group, group_id))?;

        if group.group_id == Some(layer_id) {
            return Ok(group);
        }
        RoleStore::find_group(self, layer_id)
    }

    fn count_active_roles(
        &mut self,
        layer_group_id: i64,
        kind: RoleKind,
        day: Date,
    ) -> Result<i64, StoreError> {
        queries::roles::count_active_roles(&mut self.conn, layer_group_id, kind, day)
            .map_err(store_err)
    }
}

impl RecipientSource for SqlitePersistence {
    fn subscriptions_of(
        &mut self,
        mailing_list_id: i64,
    ) -> Result<Vec<Subscription>, StoreError> {
        queries::subscriptions::subscriptions_of(&mut self.conn, mailing_list_id)
            .map_err(store_err)
    }

    fn people_with_role_kinds(
        &mut self,
        group_id: i64,
        kinds: &[RoleKind],
        day: Date,
    ) -> Result<Vec<i64>, StoreError> {
        queries::roles::people_with_role_kinds(&mut self.conn, group_id, kinds, day)
            .map_err(store_err)
    }

    fn people_of_group(&mut self, group_id: i64, day: Date) -> Result<Vec<i64>, StoreError> {
        queries::roles::people_of_group(&mut self.conn, group_id, day).map_err(store_err)
    }
}

impl JobQueue for SqlitePersistence {
    fn enqueue(&mut self, kind: &str, payload_json: &str) -> Result<i64, StoreError> {
        mutations::jobs::enqueue_job(&mut self.conn, kind, payload_json).map_err(store_err)
    }
}
