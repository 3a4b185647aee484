// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::store::RecipientSource;
use roster_domain::{InvoiceList, Receiver, Subscription};
use std::collections::BTreeSet;
use time::Date;

/// Resolves the recipient set of an invoice list.
///
/// - a mailing-list receiver expands to the union of people matching
///   every subscription attached to the list;
/// - a group receiver yields the distinct people across all current
///   roles in that group;
/// - without a receiver, the explicit recipient id list is used as-is.
///
/// Order is first-seen; duplicates are dropped.
///
/// # Errors
///
/// Returns an error if a recipient query fails.
pub fn resolve_recipients(
    list: &InvoiceList,
    source: &mut dyn RecipientSource,
    today: Date,
) -> Result<Vec<i64>, CoreError> {
    match list.receiver {
        Some(Receiver::MailingList(mailing_list_id)) => {
            let subscriptions: Vec<Subscription> = source.subscriptions_of(mailing_list_id)?;
            let mut seen: BTreeSet<i64> = BTreeSet::new();
            let mut recipients: Vec<i64> = Vec::new();
            for subscription in &subscriptions {
                let people: Vec<i64> = source.people_with_role_kinds(
                    subscription.subscriber_group_id,
                    &subscription.role_kinds,
                    today,
                )?;
                for person_id in people {
                    if seen.insert(person_id) {
                        recipients.push(person_id);
                    }
                }
            }
            Ok(recipients)
        }
        Some(Receiver::Group(group_id)) => {
            // The role-to-person relation is not distinct.
            let people: Vec<i64> = source.people_of_group(group_id, today)?;
            let mut seen: BTreeSet<i64> = BTreeSet::new();
            let mut recipients: Vec<i64> = Vec::new();
            for person_id in people {
                if seen.insert(person_id) {
                    recipients.push(person_id);
                }
            }
            Ok(recipients)
        }
        None => Ok(list.recipient_ids.clone()),
    }
}
