// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily sign-in records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One sign-in per user per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SignInEvent {
    /// `{user_id}_{YYYY-MM-DD}`, so a second sign-in on the same day collides
    pub id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    /// Calendar day of the sign-in (in the configured day offset)
    pub sign_in_date: NaiveDate,
    /// Exact time of the request
    pub signed_in_at: DateTime<Utc>,
}

impl SignInEvent {
    pub fn new(user_id: u64, sign_in_date: NaiveDate, signed_in_at: DateTime<Utc>) -> Self {
        Self {
            id: Self::key(user_id, sign_in_date),
            user_id,
            sign_in_date,
            signed_in_at,
        }
    }

    /// Document key for a (user, day) pair.
    pub fn key(user_id: u64, day: NaiveDate) -> String {
        format!("{}_{}", user_id, day.format("%Y-%m-%d"))
    }
}
