// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::JobRecord;
use crate::diesel_schema::background_jobs;
use crate::error::PersistenceError;

type JobRow = (
    i64,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
);

fn decode_job(row: JobRow) -> JobRecord {
    let (job_id, kind, payload_json, status, created_at, completed_at, error) = row;
    JobRecord {
        job_id,
        kind,
        payload_json,
        status,
        created_at,
        completed_at,
        error,
    }
}

/// Looks up a background job by id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `job_id` - The job id
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_job(
    conn: &mut SqliteConnection,
    job_id: i64,
) -> Result<Option<JobRecord>, PersistenceError> {
    let row: Option<JobRow> = background_jobs::table
        .find(job_id)
        .first::<JobRow>(conn)
        .optional()?;

    Ok(row.map(decode_job))
}

/// Returns the oldest pending job, if any.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn next_pending_job(
    conn: &mut SqliteConnection,
) -> Result<Option<JobRecord>, PersistenceError> {
    let row: Option<JobRow> = background_jobs::table
        .filter(background_jobs::status.eq("pending"))
        .order(background_jobs::job_id.asc())
        .first::<JobRow>(conn)
        .optional()?;

    Ok(row.map(decode_job))
}

/// Counts pending background jobs.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_pending_jobs(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(background_jobs::table
        .filter(background_jobs::status.eq("pending"))
        .count()
        .get_result::<i64>(conn)?)
}
