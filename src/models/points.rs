// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Point ledger records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Point category for sign-in bonuses.
pub const SIGN_IN_POINTS_TYPE: &str = "sign_in";

/// An immutable point-earning event.
///
/// Records are only ever appended. A user's total is the sum of
/// `points` over all of their records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PointRecord {
    /// Store-assigned record ID (also used as document ID)
    pub id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points: i64,
    /// Category tag: "sign_in", "game", ...
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A point record before the store has assigned it an ID.
#[derive(Debug, Clone)]
pub struct NewPointRecord {
    pub user_id: u64,
    pub points: i64,
    pub kind: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewPointRecord {
    pub fn with_id(self, id: String) -> PointRecord {
        PointRecord {
            id,
            user_id: self.user_id,
            points: self.points,
            kind: self.kind,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

impl PointRecord {
    /// ID of the bonus record paid for a user's sign-in on `day`. One per day.
    pub fn sign_in_key(user_id: u64, day: NaiveDate) -> String {
        format!("{}_sign_in_{}", user_id, day)
    }
}

/// Sum the points of a set of records.
pub fn total_points(records: &[PointRecord]) -> i64 {
    records.iter().map(|r| r.points).sum()
}
