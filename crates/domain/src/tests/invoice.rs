// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, FeeSchedule, Invoice, InvoiceItem, InvoiceList, Receiver, RoleKind,
};

fn sample_invoice() -> Invoice {
    let mut invoice: Invoice = Invoice::new(String::from("invoice"), 1);
    invoice.items.push(InvoiceItem::new(String::from("pens"), 150));
    invoice
        .items
        .push(InvoiceItem::with_count(String::from("pins"), 50, 2));
    invoice
}

#[test]
fn test_invoice_total_sums_line_items() {
    let invoice: Invoice = sample_invoice();
    assert_eq!(invoice.total(), 250);
}

#[test]
fn test_item_total_multiplies_count() {
    let item: InvoiceItem = InvoiceItem::with_count(String::from("pins"), 50, 2);
    assert_eq!(item.total(), 100);
}

#[test]
fn test_recipient_id_parsing() {
    let mut list: InvoiceList =
        InvoiceList::new(String::from("title"), 1, None, sample_invoice());
    list.set_recipient_ids("3, 5,8").unwrap();
    assert_eq!(list.recipient_ids, vec![3, 5, 8]);
}

#[test]
fn test_recipient_id_parsing_rejects_garbage() {
    let mut list: InvoiceList =
        InvoiceList::new(String::from("title"), 1, None, sample_invoice());
    let result: Result<(), DomainError> = list.set_recipient_ids("3,x");
    assert!(matches!(result, Err(DomainError::InvalidRecipientId(_))));
}

#[test]
fn test_list_without_receiver_is_not_persistable() {
    let list: InvoiceList =
        InvoiceList::new(String::from("title"), 1, None, sample_invoice());
    assert!(!list.is_persistable());

    let list: InvoiceList = InvoiceList::new(
        String::from("title"),
        1,
        Some(Receiver::Group(1)),
        sample_invoice(),
    );
    assert!(list.is_persistable());
}

#[test]
fn test_membership_schedule_prepares_fixed_fee_items() {
    let mut list: InvoiceList =
        InvoiceList::new(String::from("title"), 1, None, Invoice::new(String::from("invoice"), 1));
    FeeSchedule::membership().prepare(&mut list);

    assert_eq!(list.fixed_fee.as_deref(), Some("membership"));
    assert_eq!(list.invoice.items.len(), 2);

    let leaders: &crate::InvoiceItem = &list.invoice.items[0];
    assert_eq!(leaders.name, "Membership fee - Leaders");
    assert_eq!(leaders.unit_cost, 1500);
    assert_eq!(leaders.count, 0);
    assert_eq!(leaders.fixed_fee.as_deref(), Some("membership"));
    assert_eq!(leaders.fee_kind, Some(RoleKind::Leader));

    let members: &crate::InvoiceItem = &list.invoice.items[1];
    assert_eq!(members.name, "Membership fee - Members");
    assert_eq!(members.unit_cost, 2000);
}

#[test]
fn test_unknown_schedule_is_rejected() {
    let result: Result<FeeSchedule, DomainError> = FeeSchedule::named("donations");
    assert!(matches!(result, Err(DomainError::UnknownFeeSchedule(_))));
}

#[test]
fn test_schedule_cost_lookup() {
    let schedule: FeeSchedule = FeeSchedule::membership();
    assert_eq!(schedule.cost_for(RoleKind::Leader), Some(1500));
    assert_eq!(schedule.cost_for(RoleKind::Member), Some(2000));
    assert_eq!(schedule.cost_for(RoleKind::Guest), None);
}
