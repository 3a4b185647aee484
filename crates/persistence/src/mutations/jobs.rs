// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Background job queue mutations.
//!
//! Jobs move `pending` -> `done` or `pending` -> `failed` in a single
//! attempt; there is no retry bookkeeping.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use crate::backend::get_last_insert_rowid;
use crate::diesel_schema::background_jobs;
use crate::error::PersistenceError;

fn now_rfc3339() -> Result<String, PersistenceError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::Other(format!("Cannot format timestamp: {e}")))
}

/// Enqueues a new pending job and returns the assigned id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `kind` - The job kind tag
/// * `payload_json` - The serialized job payload
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn enqueue_job(
    conn: &mut SqliteConnection,
    kind: &str,
    payload_json: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(background_jobs::table)
        .values((
            background_jobs::kind.eq(kind),
            background_jobs::payload_json.eq(payload_json),
            background_jobs::status.eq("pending"),
            background_jobs::created_at.eq(now_rfc3339()?),
        ))
        .execute(conn)?;

    let job_id: i64 = get_last_insert_rowid(conn)?;
    debug!(job_id, kind, "Enqueued job");
    Ok(job_id)
}

/// Marks a job as done.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `job_id` - The job id
///
/// # Errors
///
/// Returns an error if the job does not exist or the update fails.
pub fn complete_job(conn: &mut SqliteConnection, job_id: i64) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(background_jobs::table.find(job_id))
        .set((
            background_jobs::status.eq("done"),
            background_jobs::completed_at.eq(Some(now_rfc3339()?)),
        ))
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Job {job_id} does not exist"
        )));
    }

    debug!(job_id, "Completed job");
    Ok(())
}

/// Marks a job as failed and records the failure description.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `job_id` - The job id
/// * `error` - The failure description
///
/// # Errors
///
/// Returns an error if the job does not exist or the update fails.
pub fn fail_job(
    conn: &mut SqliteConnection,
    job_id: i64,
    error: &str,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(background_jobs::table.find(job_id))
        .set((
            background_jobs::status.eq("failed"),
            background_jobs::completed_at.eq(Some(now_rfc3339()?)),
            background_jobs::error.eq(Some(error)),
        ))
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Job {job_id} does not exist"
        )));
    }

    debug!(job_id, error, "Failed job");
    Ok(())
}
