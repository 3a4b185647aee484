// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::decode_role_kinds;
use crate::diesel_schema::subscriptions;
use crate::error::PersistenceError;
use roster_domain::Subscription;

/// Returns the subscriptions attached to a mailing list, ordered by id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `mailing_list_id` - The mailing list id
///
/// # Errors
///
/// Returns an error if the query fails or a stored role kind cannot be
/// decoded.
pub fn subscriptions_of(
    conn: &mut SqliteConnection,
    mailing_list_id: i64,
) -> Result<Vec<Subscription>, PersistenceError> {
    let rows: Vec<(i64, i64, i64, String)> = subscriptions::table
        .filter(subscriptions::mailing_list_id.eq(mailing_list_id))
        .order(subscriptions::subscription_id.asc())
        .load::<(i64, i64, i64, String)>(conn)?;

    rows.into_iter()
        .map(|(subscription_id, mailing_list_id, subscriber_group_id, role_kinds)| {
            let mut subscription: Subscription = Subscription::new(
                mailing_list_id,
                subscriber_group_id,
                decode_role_kinds(&role_kinds)?,
            );
            subscription.subscription_id = Some(subscription_id);
            Ok(subscription)
        })
        .collect()
}
