// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Achievement catalog entries and per-user grants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Points-threshold achievement (static catalog data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Achievement {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub icon: String,
    /// Granted once total points reach this value
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub required_points: i64,
}

/// Grant of an achievement to a user. Created once, never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserAchievement {
    /// `{user_id}_{achievement_id}`
    pub id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub achievement_id: u32,
    pub achieved_at: DateTime<Utc>,
}

impl UserAchievement {
    pub fn new(user_id: u64, achievement_id: u32, achieved_at: DateTime<Utc>) -> Self {
        Self {
            id: Self::key(user_id, achievement_id),
            user_id,
            achievement_id,
            achieved_at,
        }
    }

    pub fn key(user_id: u64, achievement_id: u32) -> String {
        format!("{}_{}", user_id, achievement_id)
    }
}
