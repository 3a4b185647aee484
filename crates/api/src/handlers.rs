// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for role mutations and invoice batches.
//!
//! Each handler authorizes the actor, translates its request into
//! domain types, runs the engine against the persistence adapter, and
//! returns the engine's notifications with the outcome.

use time::Date;
use tracing::{info, warn};

use roster::{
    BATCH_CREATE_JOB_KIND, BatchCreate, BatchCreateJob, BatchOutcome, ChangeContext, CoreError,
    InvoiceStore, Notifications, RoleAttributes, RoleChangeOutcome, RoleChangePlan, RoleStore,
    StoreError, apply_role_change, plan_role_create, plan_role_destroy, plan_role_update,
};
use roster_domain::{
    FeeSchedule, Group, Invoice, InvoiceItem, InvoiceList, Person, Receiver, Role, RoleKind,
};
use roster_persistence::SqlitePersistence;

use crate::auth::Actor;
use crate::error::ApiError;
use crate::request_response::{
    CreateInvoiceListRequest, CreateRoleRequest, InvoiceListResponse, JobRunOutcome,
    RoleChangeResponse, UpdateRoleRequest,
};

fn store<T>(result: Result<T, StoreError>) -> Result<T, ApiError> {
    result.map_err(|err| ApiError::from(CoreError::from(err)))
}

fn parse_kind(kind: Option<&str>) -> Result<Option<RoleKind>, ApiError> {
    kind.map(RoleKind::parse)
        .transpose()
        .map_err(|err| ApiError::ValidationFailed {
            entity: "role".to_string(),
            field: "kind".to_string(),
            message: err.to_string(),
        })
}

fn role_change_response(
    outcome: RoleChangeOutcome,
    notifications: Notifications,
) -> RoleChangeResponse {
    RoleChangeResponse {
        role_id: outcome.role_id,
        removed_role_id: outcome.removed_role_id,
        add_request_id: outcome.add_request_id,
        primary_group_id: outcome.primary_group_id,
        notifications: notifications.into_entries(),
    }
}

/// Creates a role for a person in a group.
///
/// In layers requiring person add requests, an actor who cannot see
/// the target person files an add request instead of creating a role.
///
/// # Arguments
///
/// * `persistence` - The storage adapter
/// * `group_id` - The target group
/// * `request` - The role creation request
/// * `actor` - The authenticated actor
/// * `today` - The current calendar day
///
/// # Errors
///
/// Returns an error if the actor's scope does not cover the group,
/// a referenced entity is missing, or validation rejects the role.
pub fn create_role(
    persistence: &mut SqlitePersistence,
    group_id: i64,
    request: CreateRoleRequest,
    actor: &Actor,
    today: Date,
) -> Result<RoleChangeResponse, ApiError> {
    actor.authorize_group_write(group_id, "create_role")?;

    let person: Person = store(RoleStore::find_person(persistence, request.person_id))?;
    let group: Group = store(RoleStore::find_group(persistence, group_id))?;
    let layer: Group = store(InvoiceStore::layer_of_group(persistence, group_id))?;

    let attrs: RoleAttributes = RoleAttributes {
        kind: parse_kind(request.kind.as_deref())?,
        group_id: Some(group_id),
        label: request.label,
        start_on: request.start_on,
        end_on: request.end_on,
    };
    let mut ctx: ChangeContext = ChangeContext::new(today, actor.person_id);
    ctx.actor_sees_person = request.actor_sees_person;

    let plan: RoleChangePlan = plan_role_create(&person, &group, &layer, &attrs, &ctx)?;
    let mut notifications: Notifications = Notifications::new();
    let outcome: RoleChangeOutcome = apply_role_change(plan, persistence, &mut notifications)?;

    info!(
        group_id,
        person_id = request.person_id,
        role_id = ?outcome.role_id,
        add_request_id = ?outcome.add_request_id,
        "create_role handled"
    );
    Ok(role_change_response(outcome, notifications))
}

/// Mutates an existing role.
///
/// Cosmetic edits update in place; kind or group changes replace the
/// role per the engine's grace-window rules; an end date in the past
/// destroys it.
///
/// # Arguments
///
/// * `persistence` - The storage adapter
/// * `role_id` - The role to mutate
/// * `request` - The mutation request
/// * `actor` - The authenticated actor
/// * `today` - The current calendar day
///
/// # Errors
///
/// Returns an error if the actor's scope does not cover the role's
/// group (group-scoped actors additionally may not move the role into
/// another group), the role is missing, or validation rejects the
/// mutation.
pub fn update_role(
    persistence: &mut SqlitePersistence,
    role_id: i64,
    request: UpdateRoleRequest,
    actor: &Actor,
    today: Date,
) -> Result<RoleChangeResponse, ApiError> {
    let existing: Role = store(RoleStore::find_role(persistence, role_id))?;
    let target_group_id: i64 = request.group_id.unwrap_or(existing.group_id);
    actor.authorize_role_move(existing.group_id, target_group_id, "update_role")?;

    let target_group: Group = store(RoleStore::find_group(persistence, target_group_id))?;
    let attrs: RoleAttributes = RoleAttributes {
        kind: parse_kind(request.kind.as_deref())?,
        group_id: Some(target_group_id),
        label: request.label,
        start_on: request.start_on,
        end_on: request.end_on,
    };
    let ctx: ChangeContext = ChangeContext::new(today, actor.person_id);

    let plan: RoleChangePlan = plan_role_update(&existing, &target_group, &attrs, &ctx)?;
    let mut notifications: Notifications = Notifications::new();
    let outcome: RoleChangeOutcome = apply_role_change(plan, persistence, &mut notifications)?;

    info!(role_id, role_id_after = ?outcome.role_id, "update_role handled");
    Ok(role_change_response(outcome, notifications))
}

/// Destroys a role.
///
/// Old roles terminate with a recorded end date; recently created or
/// future roles are removed without trace. A storage-level veto
/// surfaces as [`ApiError::DestroyVetoed`].
///
/// # Arguments
///
/// * `persistence` - The storage adapter
/// * `role_id` - The role to destroy
/// * `actor` - The authenticated actor
/// * `today` - The current calendar day
///
/// # Errors
///
/// Returns an error if the actor's scope does not cover the role's
/// group, the role is missing, or the deletion is vetoed.
pub fn destroy_role(
    persistence: &mut SqlitePersistence,
    role_id: i64,
    actor: &Actor,
    today: Date,
) -> Result<RoleChangeResponse, ApiError> {
    let existing: Role = store(RoleStore::find_role(persistence, role_id))?;
    actor.authorize_group_write(existing.group_id, "destroy_role")?;

    let ctx: ChangeContext = ChangeContext::new(today, actor.person_id);
    let plan: RoleChangePlan = plan_role_destroy(&existing, &ctx)?;
    let mut notifications: Notifications = Notifications::new();
    let outcome: RoleChangeOutcome = apply_role_change(plan, persistence, &mut notifications)?;

    info!(role_id, "destroy_role handled");
    Ok(role_change_response(outcome, notifications))
}

fn decode_request_receiver(
    request: &CreateInvoiceListRequest,
) -> Result<Option<Receiver>, ApiError> {
    let invalid = |message: String| ApiError::ValidationFailed {
        entity: "invoice_list".to_string(),
        field: "receiver_type".to_string(),
        message,
    };

    match (request.receiver_type.as_deref(), request.receiver_id) {
        (None, _) => Ok(None),
        (Some("mailing_list"), Some(id)) => Ok(Some(Receiver::MailingList(id))),
        (Some("group"), Some(id)) => Ok(Some(Receiver::Group(id))),
        (Some(tag), None) => Err(invalid(format!("Receiver '{tag}' needs a receiver_id"))),
        (Some(tag), Some(_)) => Err(invalid(format!("Unknown receiver type '{tag}'"))),
    }
}

/// Creates an invoice list and runs the batch.
///
/// Small batches run synchronously; batches above `sync_limit`
/// recipients are serialized into the job queue and picked up by the
/// background worker.
///
/// # Arguments
///
/// * `persistence` - The storage adapter
/// * `request` - The invoice list request
/// * `actor` - The authenticated actor
/// * `today` - The current calendar day
/// * `sync_limit` - Largest recipient count still run synchronously
///
/// # Errors
///
/// Returns an error if the actor's scope does not cover the billing
/// group, the request is invalid, or recipient resolution fails.
/// Per-recipient persistence failures do not error; they are reported
/// in `invalid_recipient_ids`.
pub fn create_invoice_list(
    persistence: &mut SqlitePersistence,
    request: CreateInvoiceListRequest,
    actor: &Actor,
    today: Date,
    sync_limit: usize,
) -> Result<InvoiceListResponse, ApiError> {
    actor.authorize_group_write(request.group_id, "create_invoice_list")?;

    let receiver: Option<Receiver> = decode_request_receiver(&request)?;

    let mut template: Invoice = Invoice::new(request.title.clone(), request.group_id);
    for item in &request.items {
        template.items.push(InvoiceItem::with_count(
            item.name.clone(),
            item.unit_cost,
            item.count,
        ));
    }

    let mut list: InvoiceList =
        InvoiceList::new(request.title, request.group_id, receiver, template);

    if let Some(name) = &request.fixed_fee {
        let schedule: FeeSchedule =
            FeeSchedule::named(name).map_err(|err| ApiError::ValidationFailed {
                entity: "invoice_list".to_string(),
                field: "fixed_fee".to_string(),
                message: err.to_string(),
            })?;
        schedule.prepare(&mut list);
    }

    if let Some(ids) = &request.recipient_ids {
        list.set_recipient_ids(ids)
            .map_err(|err| ApiError::ValidationFailed {
                entity: "invoice_list".to_string(),
                field: "recipient_ids".to_string(),
                message: err.to_string(),
            })?;
    }

    let outcome: BatchOutcome = BatchCreate::with_limit(list, sync_limit)
        .call(persistence, today)?;

    match outcome {
        BatchOutcome::Completed { list } => {
            info!(
                group_id = list.group_id,
                recipients_total = list.recipients_total,
                amount_total = list.amount_total,
                "invoice batch completed"
            );
            Ok(InvoiceListResponse {
                deferred: false,
                job_id: None,
                recipient_count: None,
                invoice_list_id: list.invoice_list_id,
                recipients_total: list.recipients_total,
                recipients_paid: list.recipients_paid,
                recipients_processed: list.recipients_processed,
                amount_total: list.amount_total,
                amount_paid: list.amount_paid,
                invalid_recipient_ids: list.invalid_recipient_ids,
            })
        }
        BatchOutcome::Deferred {
            job_id,
            recipient_count,
        } => {
            info!(job_id, recipient_count, "invoice batch deferred");
            Ok(InvoiceListResponse {
                deferred: true,
                job_id: Some(job_id),
                recipient_count: Some(recipient_count),
                invoice_list_id: None,
                recipients_total: 0,
                recipients_paid: 0,
                recipients_processed: 0,
                amount_total: 0,
                amount_paid: 0,
                invalid_recipient_ids: Vec::new(),
            })
        }
    }
}

/// Runs one pending background job, if any.
///
/// A job gets a single attempt: success marks it `done`, any failure
/// marks it `failed` with the error recorded on the row. Unknown job
/// kinds fail immediately.
///
/// # Arguments
///
/// * `persistence` - The storage adapter
/// * `today` - The current calendar day
///
/// # Errors
///
/// Returns an error only if the queue itself cannot be read or
/// updated; job-level failures are reported in the outcome.
pub fn run_batch_job(
    persistence: &mut SqlitePersistence,
    today: Date,
) -> Result<JobRunOutcome, ApiError> {
    let Some(job) = persistence.claim_next_job()? else {
        return Ok(JobRunOutcome::Idle);
    };
    let job_id: i64 = job.job_id;

    if job.kind != BATCH_CREATE_JOB_KIND {
        let error: String = format!("Unknown job kind '{}'", job.kind);
        warn!(job_id, kind = %job.kind, "unknown job kind");
        persistence.fail_job(job_id, &error)?;
        return Ok(JobRunOutcome::Failed { job_id, error });
    }

    let payload: BatchCreateJob = match serde_json::from_str(&job.payload_json) {
        Ok(payload) => payload,
        Err(err) => {
            let error: String = format!("Payload does not deserialize: {err}");
            warn!(job_id, error = %error, "job payload rejected");
            persistence.fail_job(job_id, &error)?;
            return Ok(JobRunOutcome::Failed { job_id, error });
        }
    };

    match payload.perform(persistence, today) {
        Ok(BatchOutcome::Completed { list }) => {
            persistence.complete_job(job_id)?;
            info!(
                job_id,
                recipients_total = list.recipients_total,
                "background batch completed"
            );
            Ok(JobRunOutcome::Completed {
                job_id,
                recipients_total: list.recipients_total,
            })
        }
        // perform never defers again; treat it as unreachable data.
        Ok(BatchOutcome::Deferred { .. }) => {
            let error: String = "Job deferred itself".to_string();
            persistence.fail_job(job_id, &error)?;
            Ok(JobRunOutcome::Failed { job_id, error })
        }
        Err(err) => {
            let error: String = err.to_string();
            warn!(job_id, error = %error, "background batch failed");
            persistence.fail_job(job_id, &error)?;
            Ok(JobRunOutcome::Failed { job_id, error })
        }
    }
}
