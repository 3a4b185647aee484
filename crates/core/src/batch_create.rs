// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The invoice batch generator.
//!
//! Expands an invoice list into one invoice per recipient. Runs where
//! the recipient count exceeds the synchronous limit are serialized
//! into a queued job; the worker executes [`process_recipients`], the
//! same routine the synchronous path uses.

use crate::error::{CoreError, ErrorEntity};
use crate::recipients::resolve_recipients;
use crate::store::{InvoiceStore, JobQueue, RecipientSource, StoreError};
use roster_domain::{FeeSchedule, Group, Invoice, InvoiceItem, InvoiceList, PaymentState};
use serde::{Deserialize, Serialize};
use time::Date;
use tracing::{info, warn};

/// Default recipient count up to which a batch runs synchronously.
pub const DEFAULT_SYNC_LIMIT: usize = 25;

/// Job kind tag under which deferred batches are enqueued.
pub const BATCH_CREATE_JOB_KIND: &str = "invoice_batch_create";

/// Serializable payload of a deferred batch run.
///
/// Carries the full list (including the template invoice) plus the
/// already-resolved recipient set so the consumer performs the
/// identical deterministic procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchCreateJob {
    /// The invoice list to expand.
    pub list: InvoiceList,
    /// The resolved recipient person ids.
    pub recipient_ids: Vec<i64>,
}

impl BatchCreateJob {
    /// Executes the deferred batch.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails beyond the per-recipient
    /// accounting.
    pub fn perform(
        self,
        store: &mut dyn InvoiceStore,
        today: Date,
    ) -> Result<BatchOutcome, CoreError> {
        process_recipients(self.list, &self.recipient_ids, store, today)
    }
}

/// The result of a batch invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The batch ran synchronously; the returned list carries the
    /// final aggregate counters.
    Completed {
        /// The list after generation.
        list: InvoiceList,
    },
    /// The batch was handed to the job queue; no aggregates were
    /// touched.
    Deferred {
        /// Id of the enqueued job.
        job_id: i64,
        /// Number of resolved recipients.
        recipient_count: usize,
    },
}

/// One batch invoice-generation run.
#[derive(Debug, Clone)]
pub struct BatchCreate {
    list: InvoiceList,
    limit: usize,
}

impl BatchCreate {
    /// Creates a batch run with the default synchronous limit.
    #[must_use]
    pub const fn new(list: InvoiceList) -> Self {
        Self {
            list,
            limit: DEFAULT_SYNC_LIMIT,
        }
    }

    /// Creates a batch run with an explicit synchronous limit.
    #[must_use]
    pub const fn with_limit(list: InvoiceList, limit: usize) -> Self {
        Self { list, limit }
    }

    /// Resolves recipients and either processes them synchronously or
    /// enqueues a single deferred job carrying the list and recipient
    /// set.
    ///
    /// Re-running a batch is not idempotent: it always creates new
    /// invoices. Callers guard against duplicate invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if recipient resolution, job submission, or
    /// list persistence fails. Per-recipient invoice failures are
    /// accounted in `invalid_recipient_ids`, not returned.
    pub fn call<S>(self, store: &mut S, today: Date) -> Result<BatchOutcome, CoreError>
    where
        S: InvoiceStore + RecipientSource + JobQueue,
    {
        let recipients: Vec<i64> = resolve_recipients(&self.list, &mut *store, today)?;

        if recipients.len() > self.limit {
            let recipient_count: usize = recipients.len();
            let job: BatchCreateJob = BatchCreateJob {
                list: self.list,
                recipient_ids: recipients,
            };
            let payload: String = serde_json::to_string(&job)
                .map_err(|err| CoreError::Store(StoreError::Backend(err.to_string())))?;
            let job_id: i64 = store.enqueue(BATCH_CREATE_JOB_KIND, &payload)?;
            info!(job_id, recipient_count, "batch deferred to job queue");
            return Ok(BatchOutcome::Deferred {
                job_id,
                recipient_count,
            });
        }

        process_recipients(self.list, &recipients, &mut *store, today)
    }
}

/// Processes the resolved recipient set of a batch, synchronously or
/// inside the deferred job.
///
/// Per recipient: the template invoice is cloned, fixed-fee items are
/// re-materialized from live role headcounts, and the invoice is
/// persisted in one unit. A persistence failure records the person id
/// in `invalid_recipient_ids` and the run continues; earlier successes
/// stay committed. The list's own counters are persisted afterwards
/// only when the list has a receiver.
///
/// # Errors
///
/// Returns an error if headcount queries, layer lookup, or final list
/// persistence fail.
pub fn process_recipients(
    mut list: InvoiceList,
    recipients: &[i64],
    store: &mut dyn InvoiceStore,
    today: Date,
) -> Result<BatchOutcome, CoreError> {
    let layer: Option<Group> = if list.fixed_fee.is_some() {
        Some(store.layer_of_group(list.group_id)?)
    } else {
        None
    };

    for &person_id in recipients {
        let invoice: Invoice = materialize_invoice(&list, layer.as_ref(), person_id, store, today)?;
        let amount: i64 = invoice.total();
        match store.save_invoice(&invoice) {
            Ok(invoice_id) => {
                info!(invoice_id, person_id, amount, "invoice created");
                list.recipients_total += 1;
                list.amount_total += amount;
                if invoice.state == PaymentState::Payed {
                    list.recipients_paid += 1;
                    list.amount_paid += amount;
                }
            }
            Err(err) => {
                warn!(person_id, error = %err, "invoice rejected, continuing batch");
                list.invalid_recipient_ids.push(person_id);
            }
        }
        list.recipients_processed += 1;
    }

    if list.is_persistable() {
        let list_id: i64 = store.save_invoice_list(&list)?;
        list.invoice_list_id = Some(list_id);
    }

    Ok(BatchOutcome::Completed { list })
}

/// Clones the template invoice for one recipient.
///
/// Static items copy as-is. Fixed-fee items recompute count and cost
/// from the current headcount of their role kind within the billing
/// layer's subtree, priced by the named schedule; roles outside the
/// subtree never count. The title gains the layer's display name when
/// the list derives from a fee schedule.
fn materialize_invoice(
    list: &InvoiceList,
    layer: Option<&Group>,
    person_id: i64,
    store: &mut dyn InvoiceStore,
    today: Date,
) -> Result<Invoice, CoreError> {
    let mut invoice: Invoice = list.invoice.clone();
    invoice.invoice_id = None;
    invoice.recipient_id = Some(person_id);

    if let Some(layer) = layer {
        invoice.title = format!("{} - {}", list.invoice.title, layer.name);

        let layer_id: i64 = layer.group_id.ok_or(CoreError::NotFound {
            entity: ErrorEntity::Group,
            id: 0,
        })?;

        let mut items: Vec<InvoiceItem> = Vec::with_capacity(invoice.items.len());
        for item in invoice.items {
            match (&item.fixed_fee, item.fee_kind) {
                (Some(schedule_name), Some(kind)) => {
                    let schedule: FeeSchedule = FeeSchedule::named(schedule_name)
                        .map_err(|error| CoreError::Validation {
                            entity: ErrorEntity::Invoice,
                            error,
                        })?;
                    let count: i64 = store.count_active_roles(layer_id, kind, today)?;
                    let mut fee_item: InvoiceItem = item;
                    fee_item.count = count;
                    fee_item.unit_cost = schedule.cost_for(kind).unwrap_or(fee_item.unit_cost);
                    items.push(fee_item);
                }
                _ => items.push(item),
            }
        }
        invoice.items = items;
    }

    Ok(invoice)
}
