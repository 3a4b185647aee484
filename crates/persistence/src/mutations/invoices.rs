// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Invoice and invoice list mutations.
//!
//! `save_invoice` writes the invoice row and its items in one
//! transaction so a failed item insert never leaves a headless
//! invoice behind.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::backend::get_last_insert_rowid;
use crate::data_models::{encode_date_opt, encode_id_list, encode_receiver};
use crate::diesel_schema::{invoice_items, invoice_lists, invoices};
use crate::error::PersistenceError;
use roster_domain::{Invoice, InvoiceItem, InvoiceList, RoleKind};

/// Persists an invoice together with its items and returns the
/// assigned invoice id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `invoice` - The invoice to persist
///
/// # Errors
///
/// Returns an error if a date cannot be encoded or any insert in the
/// transaction fails.
pub fn save_invoice(
    conn: &mut SqliteConnection,
    invoice: &Invoice,
) -> Result<i64, PersistenceError> {
    let issued_on: Option<String> = encode_date_opt(invoice.issued_on)?;

    let invoice_id: i64 = conn.transaction::<i64, PersistenceError, _>(|conn| {
        diesel::insert_into(invoices::table)
            .values((
                invoices::title.eq(&invoice.title),
                invoices::group_id.eq(invoice.group_id),
                invoices::recipient_id.eq(invoice.recipient_id),
                invoices::state.eq(invoice.state.as_str()),
                invoices::issued_on.eq(issued_on.as_deref()),
            ))
            .execute(conn)?;

        let invoice_id: i64 = get_last_insert_rowid(conn)?;

        for item in &invoice.items {
            insert_item(conn, invoice_id, item)?;
        }

        Ok(invoice_id)
    })?;

    debug!(
        invoice_id,
        group_id = invoice.group_id,
        recipient_id = ?invoice.recipient_id,
        "Saved invoice"
    );
    Ok(invoice_id)
}

fn insert_item(
    conn: &mut SqliteConnection,
    invoice_id: i64,
    item: &InvoiceItem,
) -> Result<(), PersistenceError> {
    diesel::insert_into(invoice_items::table)
        .values((
            invoice_items::invoice_id.eq(invoice_id),
            invoice_items::name.eq(&item.name),
            invoice_items::unit_cost.eq(item.unit_cost),
            invoice_items::count.eq(item.count),
            invoice_items::fixed_fee.eq(item.fixed_fee.as_deref()),
            invoice_items::fee_kind.eq(item.fee_kind.as_ref().map(RoleKind::as_str)),
        ))
        .execute(conn)?;
    Ok(())
}

/// Persists an invoice list with its aggregate counters, inserting a
/// new row or updating the existing one, and returns its id.
///
/// Only the batch description and counters are stored; the template
/// invoice lives in the serialized job payload while a deferred batch
/// is in flight.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `list` - The invoice list to persist
///
/// # Errors
///
/// Returns an error if the insert or update fails.
pub fn save_invoice_list(
    conn: &mut SqliteConnection,
    list: &InvoiceList,
) -> Result<i64, PersistenceError> {
    let (receiver_type, receiver_id) = encode_receiver(list.receiver);
    let invalid: String = encode_id_list(&list.invalid_recipient_ids);

    if let Some(invoice_list_id) = list.invoice_list_id {
        let affected: usize = diesel::update(invoice_lists::table.find(invoice_list_id))
            .set((
                invoice_lists::title.eq(&list.title),
                invoice_lists::receiver_type.eq(receiver_type),
                invoice_lists::receiver_id.eq(receiver_id),
                invoice_lists::fixed_fee.eq(list.fixed_fee.as_deref()),
                invoice_lists::recipients_total.eq(list.recipients_total),
                invoice_lists::recipients_paid.eq(list.recipients_paid),
                invoice_lists::recipients_processed.eq(list.recipients_processed),
                invoice_lists::amount_total.eq(list.amount_total),
                invoice_lists::amount_paid.eq(list.amount_paid),
                invoice_lists::invalid_recipient_ids.eq(&invalid),
            ))
            .execute(conn)?;

        if affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Invoice list {invoice_list_id} does not exist"
            )));
        }

        debug!(invoice_list_id, "Updated invoice list");
        return Ok(invoice_list_id);
    }

    diesel::insert_into(invoice_lists::table)
        .values((
            invoice_lists::title.eq(&list.title),
            invoice_lists::group_id.eq(list.group_id),
            invoice_lists::receiver_type.eq(receiver_type),
            invoice_lists::receiver_id.eq(receiver_id),
            invoice_lists::fixed_fee.eq(list.fixed_fee.as_deref()),
            invoice_lists::recipients_total.eq(list.recipients_total),
            invoice_lists::recipients_paid.eq(list.recipients_paid),
            invoice_lists::recipients_processed.eq(list.recipients_processed),
            invoice_lists::amount_total.eq(list.amount_total),
            invoice_lists::amount_paid.eq(list.amount_paid),
            invoice_lists::invalid_recipient_ids.eq(&invalid),
        ))
        .execute(conn)?;

    let invoice_list_id: i64 = get_last_insert_rowid(conn)?;
    debug!(invoice_list_id, group_id = list.group_id, "Inserted invoice list");
    Ok(invoice_list_id)
}
