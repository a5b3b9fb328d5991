// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Badge catalog entries and per-user grants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Which metric a badge threshold is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum BadgeCategory {
    /// Number of flashcards marked learned
    Learning,
    /// Current consecutive-day sign-in streak
    SignIn,
}

impl BadgeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeCategory::Learning => "learning",
            BadgeCategory::SignIn => "sign_in",
        }
    }
}

impl fmt::Display for BadgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Badge catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Badge {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: BadgeCategory,
    /// Threshold, interpreted per category
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub required_value: i64,
}

/// Grant of a badge to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserBadge {
    /// `{user_id}_{badge_id}`
    pub id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub badge_id: u32,
    pub obtained_at: DateTime<Utc>,
}

impl UserBadge {
    pub fn new(user_id: u64, badge_id: u32, obtained_at: DateTime<Utc>) -> Self {
        Self {
            id: Self::key(user_id, badge_id),
            user_id,
            badge_id,
            obtained_at,
        }
    }

    pub fn key(user_id: u64, badge_id: u32) -> String {
        format!("{}_{}", user_id, badge_id)
    }
}
