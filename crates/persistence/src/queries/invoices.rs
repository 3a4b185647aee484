// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::{decode_date_opt, decode_id_list, decode_receiver};
use crate::diesel_schema::{invoice_items, invoice_lists, invoices};
use crate::error::PersistenceError;
use roster_domain::{Invoice, InvoiceItem, InvoiceList, PaymentState, RoleKind};

type InvoiceRow = (i64, String, i64, Option<i64>, String, Option<String>);
type InvoiceItemRow = (i64, String, i64, i64, Option<String>, Option<String>);
type InvoiceListRow = (
    i64,
    String,
    i64,
    Option<String>,
    Option<i64>,
    Option<String>,
    i64,
    i64,
    i64,
    i64,
    i64,
    String,
);

fn decode_invoice(
    conn: &mut SqliteConnection,
    row: InvoiceRow,
) -> Result<Invoice, PersistenceError> {
    let (invoice_id, title, group_id, recipient_id, state, issued_on) = row;

    let item_rows: Vec<InvoiceItemRow> = invoice_items::table
        .select((
            invoice_items::invoice_id,
            invoice_items::name,
            invoice_items::unit_cost,
            invoice_items::count,
            invoice_items::fixed_fee,
            invoice_items::fee_kind,
        ))
        .filter(invoice_items::invoice_id.eq(invoice_id))
        .order(invoice_items::invoice_item_id.asc())
        .load::<InvoiceItemRow>(conn)?;

    let mut invoice: Invoice = Invoice::new(title, group_id);
    invoice.invoice_id = Some(invoice_id);
    invoice.recipient_id = recipient_id;
    invoice.state = PaymentState::from_str(&state)?;
    invoice.issued_on = decode_date_opt(issued_on.as_deref())?;

    for (_, name, unit_cost, count, fixed_fee, fee_kind) in item_rows {
        let mut item: InvoiceItem = InvoiceItem::with_count(name, unit_cost, count);
        item.fixed_fee = fixed_fee;
        item.fee_kind = fee_kind.as_deref().map(RoleKind::parse).transpose()?;
        invoice.items.push(item);
    }

    Ok(invoice)
}

/// Looks up an invoice with its items.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `invoice_id` - The invoice id
///
/// # Errors
///
/// Returns an error if the query fails or a stored value cannot be
/// decoded.
pub fn find_invoice(
    conn: &mut SqliteConnection,
    invoice_id: i64,
) -> Result<Option<Invoice>, PersistenceError> {
    let row: Option<InvoiceRow> = invoices::table
        .find(invoice_id)
        .first::<InvoiceRow>(conn)
        .optional()?;

    row.map(|row| decode_invoice(conn, row)).transpose()
}

/// Returns all invoices of a billing group with their items, ordered
/// by id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `group_id` - The billing group id
///
/// # Errors
///
/// Returns an error if the query fails or a stored value cannot be
/// decoded.
pub fn invoices_of_group(
    conn: &mut SqliteConnection,
    group_id: i64,
) -> Result<Vec<Invoice>, PersistenceError> {
    let rows: Vec<InvoiceRow> = invoices::table
        .filter(invoices::group_id.eq(group_id))
        .order(invoices::invoice_id.asc())
        .load::<InvoiceRow>(conn)?;

    rows.into_iter()
        .map(|row| decode_invoice(conn, row))
        .collect()
}

/// Looks up an invoice list by id.
///
/// The stored row carries the batch description and its aggregate
/// counters, not the template invoice; the returned list holds an
/// empty template with the stored title.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `invoice_list_id` - The invoice list id
///
/// # Errors
///
/// Returns an error if the query fails or a stored value cannot be
/// decoded.
pub fn find_invoice_list(
    conn: &mut SqliteConnection,
    invoice_list_id: i64,
) -> Result<Option<InvoiceList>, PersistenceError> {
    let row: Option<InvoiceListRow> = invoice_lists::table
        .find(invoice_list_id)
        .first::<InvoiceListRow>(conn)
        .optional()?;

    let Some((
        invoice_list_id,
        title,
        group_id,
        receiver_type,
        receiver_id,
        fixed_fee,
        recipients_total,
        recipients_paid,
        recipients_processed,
        amount_total,
        amount_paid,
        invalid_recipient_ids,
    )) = row
    else {
        return Ok(None);
    };

    let template: Invoice = Invoice::new(title.clone(), group_id);
    let mut list: InvoiceList = InvoiceList::new(
        title,
        group_id,
        decode_receiver(receiver_type.as_deref(), receiver_id)?,
        template,
    );
    list.invoice_list_id = Some(invoice_list_id);
    list.fixed_fee = fixed_fee;
    list.recipients_total = recipients_total;
    list.recipients_paid = recipients_paid;
    list.recipients_processed = recipients_processed;
    list.amount_total = amount_total;
    list.amount_paid = amount_paid;
    list.invalid_recipient_ids = decode_id_list(&invalid_recipient_ids)?;

    Ok(Some(list))
}
