// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API boundary.
//!
//! Requests carry plain strings and ids; translation into domain
//! types (and the validation that goes with it) happens in the
//! handlers. Responses carry the engine's notifications verbatim.

use serde::{Deserialize, Serialize};
use time::Date;

use roster::Notification;

const fn default_true() -> bool {
    true
}

/// Request to create a role in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoleRequest {
    /// The person receiving the role.
    pub person_id: i64,
    /// The role kind, e.g. `"Member"`. Absent kinds fail validation.
    pub kind: Option<String>,
    /// Optional free-text label.
    #[serde(default)]
    pub label: Option<String>,
    /// First day the role is in effect; defaults to today.
    #[serde(default)]
    pub start_on: Option<Date>,
    /// Last day the role is in effect.
    #[serde(default)]
    pub end_on: Option<Date>,
    /// Whether the actor can already see the target person. Layers
    /// requiring add requests fall back to a request when this is
    /// false.
    #[serde(default = "default_true")]
    pub actor_sees_person: bool,
}

/// Request to mutate an existing role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    /// The role kind. Absent kinds fail validation.
    pub kind: Option<String>,
    /// The target group; defaults to the role's current group.
    #[serde(default)]
    pub group_id: Option<i64>,
    /// Optional free-text label.
    #[serde(default)]
    pub label: Option<String>,
    /// First day the role is in effect.
    #[serde(default)]
    pub start_on: Option<Date>,
    /// Last day the role is in effect. An end date in the past
    /// destroys the role; one targeting the actor's own role is
    /// silently dropped.
    #[serde(default)]
    pub end_on: Option<Date>,
}

/// One template line item of an invoice list request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItemInput {
    /// Item name.
    pub name: String,
    /// Cost per unit in cents.
    pub unit_cost: i64,
    /// Unit count.
    #[serde(default = "default_count")]
    pub count: i64,
}

const fn default_count() -> i64 {
    1
}

/// Request to create an invoice list and run the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInvoiceListRequest {
    /// Display title of the batch.
    pub title: String,
    /// The billing group.
    pub group_id: i64,
    /// Receiver type: `"mailing_list"` or `"group"`. `None` together
    /// with `recipient_ids` makes this a transient ad-hoc run.
    #[serde(default)]
    pub receiver_type: Option<String>,
    /// Id of the receiving mailing list or group.
    #[serde(default)]
    pub receiver_id: Option<i64>,
    /// Explicit recipient person ids as comma-separated text, used
    /// when no receiver is given.
    #[serde(default)]
    pub recipient_ids: Option<String>,
    /// Static template line items.
    #[serde(default)]
    pub items: Vec<InvoiceItemInput>,
    /// Name of a fee schedule to attach, e.g. `"membership"`.
    #[serde(default)]
    pub fixed_fee: Option<String>,
}

/// Response to a role mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleChangeResponse {
    /// Id of the created or updated role, if any.
    pub role_id: Option<i64>,
    /// Id of the terminated or removed role, if any.
    pub removed_role_id: Option<i64>,
    /// Id of the created add request, if any.
    pub add_request_id: Option<i64>,
    /// The person's primary group pointer after the change.
    pub primary_group_id: Option<i64>,
    /// User-facing messages emitted by the engine.
    pub notifications: Vec<Notification>,
}

/// Response to an invoice list creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceListResponse {
    /// Whether the batch was handed to the job queue.
    pub deferred: bool,
    /// Id of the enqueued job, when deferred.
    pub job_id: Option<i64>,
    /// Number of resolved recipients, when deferred.
    pub recipient_count: Option<usize>,
    /// Id of the persisted list, when the run completed and the list
    /// has a receiver.
    pub invoice_list_id: Option<i64>,
    /// Number of successfully created invoices.
    pub recipients_total: i64,
    /// Number of created invoices already in a paid state.
    pub recipients_paid: i64,
    /// Number of recipients processed (successes and failures).
    pub recipients_processed: i64,
    /// Sum of created invoice amounts in cents.
    pub amount_total: i64,
    /// Sum of created invoice amounts already paid, in cents.
    pub amount_paid: i64,
    /// Person ids whose invoice could not be persisted.
    pub invalid_recipient_ids: Vec<i64>,
}

/// The outcome of one worker pass over the job queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobRunOutcome {
    /// No pending job was found.
    Idle,
    /// A job ran to completion.
    Completed {
        /// The job id.
        job_id: i64,
        /// Invoices created by the job.
        recipients_total: i64,
    },
    /// A job failed; the failure is recorded on its row.
    Failed {
        /// The job id.
        job_id: i64,
        /// The recorded failure description.
        error: String,
    },
}
