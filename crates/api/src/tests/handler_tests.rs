// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Handler behavior end to end: request translation, engine
//! invocation, and notification passthrough.

use super::{Fixture, TODAY, fixture, seed_old_role, seed_person};
use crate::auth::Actor;
use crate::error::ApiError;
use crate::handlers::{create_invoice_list, create_role, destroy_role, run_batch_job, update_role};
use crate::request_response::{
    CreateInvoiceListRequest, CreateRoleRequest, InvoiceItemInput, InvoiceListResponse,
    JobRunOutcome, RoleChangeResponse, UpdateRoleRequest,
};
use roster::{RoleStore, Severity};
use roster_domain::{Group, Invoice, Role, RoleKind, RoleStatus};
use roster_persistence::SqlitePersistence;

const ACTOR_ID: i64 = 999;

fn admin() -> Actor {
    Actor::admin(ACTOR_ID)
}

#[test]
fn test_create_role_defaults_start_to_today() {
    let Fixture {
        mut db, group_id, ..
    } = fixture();
    let person_id: i64 = seed_person(&mut db, "Ada");

    let request: CreateRoleRequest = CreateRoleRequest {
        person_id,
        kind: Some("Leader".to_string()),
        label: None,
        start_on: None,
        end_on: None,
        actor_sees_person: true,
    };
    let response: RoleChangeResponse =
        create_role(&mut db, group_id, request, &admin(), TODAY).expect("created");

    let role: Role =
        RoleStore::find_role(&mut db, response.role_id.expect("id")).expect("find");
    assert_eq!(role.kind, RoleKind::Leader);
    assert_eq!(role.start_on, Some(TODAY));
    assert_eq!(role.status, RoleStatus::Active);
}

#[test]
fn test_create_role_without_kind_fails_validation() {
    let Fixture {
        mut db, group_id, ..
    } = fixture();
    let person_id: i64 = seed_person(&mut db, "Ada");

    let request: CreateRoleRequest = CreateRoleRequest {
        person_id,
        kind: None,
        label: None,
        start_on: None,
        end_on: None,
        actor_sees_person: true,
    };
    let err: ApiError =
        create_role(&mut db, group_id, request, &admin(), TODAY).expect_err("no kind");

    assert!(matches!(
        err,
        ApiError::ValidationFailed { ref entity, ref field, .. }
            if entity == "role" && field == "kind"
    ));
}

#[test]
fn test_create_role_with_unknown_kind_fails_validation() {
    let Fixture {
        mut db, group_id, ..
    } = fixture();
    let person_id: i64 = seed_person(&mut db, "Ada");

    let request: CreateRoleRequest = CreateRoleRequest {
        person_id,
        kind: Some("Wizard".to_string()),
        label: None,
        start_on: None,
        end_on: None,
        actor_sees_person: true,
    };
    let err: ApiError =
        create_role(&mut db, group_id, request, &admin(), TODAY).expect_err("bad kind");

    assert!(matches!(err, ApiError::ValidationFailed { ref field, .. } if field == "kind"));
}

#[test]
fn test_create_role_for_hidden_person_files_add_request() {
    let mut db: SqlitePersistence =
        SqlitePersistence::new_in_memory().expect("in-memory database");
    let mut layer: Group = Group::new_layer("Guarded".to_string());
    layer.require_person_add_requests = true;
    let layer_id: i64 = db.insert_group(&layer).expect("layer inserted");
    let person_id: i64 = seed_person(&mut db, "Ada");

    let request: CreateRoleRequest = CreateRoleRequest {
        person_id,
        kind: Some("Member".to_string()),
        label: None,
        start_on: None,
        end_on: None,
        actor_sees_person: false,
    };
    let response: RoleChangeResponse =
        create_role(&mut db, layer_id, request, &admin(), TODAY).expect("request filed");

    assert!(response.role_id.is_none());
    assert!(response.add_request_id.is_some());
    assert_eq!(response.notifications[0].severity, Severity::Alert);
    assert!(response.notifications[0].message.contains("was sent"));
}

#[test]
fn test_update_kind_replaces_the_old_role() {
    let Fixture {
        mut db, group_id, ..
    } = fixture();
    let person_id: i64 = seed_person(&mut db, "Ada");
    let role_id: i64 = seed_old_role(&mut db, person_id, group_id, RoleKind::Member);

    let request: UpdateRoleRequest = UpdateRoleRequest {
        kind: Some("Leader".to_string()),
        group_id: None,
        label: None,
        start_on: None,
        end_on: None,
    };
    let response: RoleChangeResponse =
        update_role(&mut db, role_id, request, &admin(), TODAY).expect("replaced");

    assert_eq!(response.removed_role_id, Some(role_id));
    let old: Role = RoleStore::find_role(&mut db, role_id).expect("old kept");
    assert_eq!(old.status, RoleStatus::Terminated);
    let new_role: Role =
        RoleStore::find_role(&mut db, response.role_id.expect("id")).expect("new");
    assert_eq!(new_role.kind, RoleKind::Leader);
}

#[test]
fn test_destroy_recent_role_leaves_no_row() {
    let Fixture {
        mut db, group_id, ..
    } = fixture();
    let person_id: i64 = seed_person(&mut db, "Ada");
    let role: Role = Role::new(person_id, group_id, RoleKind::Member, TODAY);
    let role_id: i64 = RoleStore::insert_role(&mut db, &role).expect("insert");

    let response: RoleChangeResponse =
        destroy_role(&mut db, role_id, &admin(), TODAY).expect("destroyed");

    assert_eq!(response.removed_role_id, Some(role_id));
    assert!(RoleStore::find_role(&mut db, role_id).is_err());
}

fn batch_request(group_id: i64) -> CreateInvoiceListRequest {
    CreateInvoiceListRequest {
        title: "Camp".to_string(),
        group_id,
        receiver_type: Some("group".to_string()),
        receiver_id: Some(group_id),
        recipient_ids: None,
        items: vec![InvoiceItemInput {
            name: "Camp fee".to_string(),
            unit_cost: 4200,
            count: 1,
        }],
        fixed_fee: None,
    }
}

#[test]
fn test_invoice_list_runs_synchronously_under_the_limit() {
    let Fixture {
        mut db, group_id, ..
    } = fixture();
    let ada: i64 = seed_person(&mut db, "Ada");
    let grace: i64 = seed_person(&mut db, "Grace");
    seed_old_role(&mut db, ada, group_id, RoleKind::Member);
    seed_old_role(&mut db, grace, group_id, RoleKind::Member);

    let response: InvoiceListResponse =
        create_invoice_list(&mut db, batch_request(group_id), &admin(), TODAY, 25)
            .expect("batch");

    assert!(!response.deferred);
    assert_eq!(response.recipients_total, 2);
    assert_eq!(response.amount_total, 8400);
    assert!(response.invoice_list_id.is_some());
}

#[test]
fn test_invoice_list_rejects_unknown_receiver_type() {
    let Fixture {
        mut db, group_id, ..
    } = fixture();
    let mut request: CreateInvoiceListRequest = batch_request(group_id);
    request.receiver_type = Some("carrier_pigeon".to_string());

    let err: ApiError = create_invoice_list(&mut db, request, &admin(), TODAY, 25)
        .expect_err("bad receiver");

    assert!(matches!(
        err,
        ApiError::ValidationFailed { ref field, .. } if field == "receiver_type"
    ));
}

#[test]
fn test_invoice_list_rejects_unknown_fee_schedule() {
    let Fixture {
        mut db, group_id, ..
    } = fixture();
    let mut request: CreateInvoiceListRequest = batch_request(group_id);
    request.fixed_fee = Some("imaginary".to_string());

    let err: ApiError = create_invoice_list(&mut db, request, &admin(), TODAY, 25)
        .expect_err("bad schedule");

    assert!(matches!(
        err,
        ApiError::ValidationFailed { ref field, .. } if field == "fixed_fee"
    ));
}

#[test]
fn test_adhoc_run_with_explicit_ids_persists_no_list() {
    let Fixture {
        mut db, group_id, ..
    } = fixture();
    let ada: i64 = seed_person(&mut db, "Ada");
    let grace: i64 = seed_person(&mut db, "Grace");

    let request: CreateInvoiceListRequest = CreateInvoiceListRequest {
        title: "One-off".to_string(),
        group_id,
        receiver_type: None,
        receiver_id: None,
        recipient_ids: Some(format!("{ada}, {grace}")),
        items: vec![InvoiceItemInput {
            name: "Donation".to_string(),
            unit_cost: 100,
            count: 1,
        }],
        fixed_fee: None,
    };
    let response: InvoiceListResponse =
        create_invoice_list(&mut db, request, &admin(), TODAY, 25).expect("batch");

    assert_eq!(response.recipients_total, 2);
    assert!(response.invoice_list_id.is_none());
}

#[test]
fn test_deferred_batch_is_drained_by_the_worker() {
    let Fixture {
        mut db, group_id, ..
    } = fixture();
    let ada: i64 = seed_person(&mut db, "Ada");
    let grace: i64 = seed_person(&mut db, "Grace");
    seed_old_role(&mut db, ada, group_id, RoleKind::Member);
    seed_old_role(&mut db, grace, group_id, RoleKind::Member);

    let response: InvoiceListResponse =
        create_invoice_list(&mut db, batch_request(group_id), &admin(), TODAY, 1)
            .expect("batch");
    assert!(response.deferred);
    assert_eq!(response.recipient_count, Some(2));
    let job_id: i64 = response.job_id.expect("job id");

    let outcome: JobRunOutcome = run_batch_job(&mut db, TODAY).expect("worker pass");
    assert_eq!(
        outcome,
        JobRunOutcome::Completed {
            job_id,
            recipients_total: 2,
        }
    );

    let invoices: Vec<Invoice> = db.invoices_of_group(group_id).expect("query");
    assert_eq!(invoices.len(), 2);

    // A second pass finds nothing to do.
    assert_eq!(run_batch_job(&mut db, TODAY).expect("idle pass"), JobRunOutcome::Idle);
}

#[test]
fn test_worker_marks_undecodable_payloads_failed() {
    let Fixture { mut db, .. } = fixture();
    let job_id: i64 =
        roster::JobQueue::enqueue(&mut db, roster::BATCH_CREATE_JOB_KIND, "not json")
            .expect("enqueue");

    let outcome: JobRunOutcome = run_batch_job(&mut db, TODAY).expect("worker pass");
    assert!(matches!(outcome, JobRunOutcome::Failed { job_id: failed, .. } if failed == job_id));

    let job: roster_persistence::JobRecord =
        db.find_job(job_id).expect("query").expect("present");
    assert_eq!(job.status, "failed");
    assert!(job.error.is_some());
}

#[test]
fn test_fixed_fee_request_builds_schedule_items() {
    let Fixture {
        mut db,
        layer_id,
        group_id,
    } = fixture();
    let ada: i64 = seed_person(&mut db, "Ada");
    seed_old_role(&mut db, ada, layer_id, RoleKind::Leader);
    let grace: i64 = seed_person(&mut db, "Grace");
    seed_old_role(&mut db, grace, group_id, RoleKind::Member);

    let request: CreateInvoiceListRequest = CreateInvoiceListRequest {
        title: "Membership 2026".to_string(),
        group_id: layer_id,
        receiver_type: Some("group".to_string()),
        receiver_id: Some(layer_id),
        recipient_ids: None,
        items: Vec::new(),
        fixed_fee: Some("membership".to_string()),
    };
    let response: InvoiceListResponse =
        create_invoice_list(&mut db, request, &admin(), TODAY, 25).expect("batch");
    assert_eq!(response.recipients_total, 1);

    let invoice: Invoice = db
        .invoices_of_group(layer_id)
        .expect("query")
        .pop()
        .expect("one invoice");
    assert_eq!(invoice.title, "Membership 2026 - Top");
    // Leader headcount 1 at 1500, member headcount 1 at 2000.
    assert_eq!(invoice.total(), 3500);
}
