// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user flashcard learning progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Whether a user has learned a flashcard. One row per (user, flashcard).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LearningProgress {
    /// `{user_id}_{flashcard_id}`
    pub id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub flashcard_id: u32,
    pub is_learned: bool,
    #[serde(default)]
    pub learned_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl LearningProgress {
    pub fn key(user_id: u64, flashcard_id: u32) -> String {
        format!("{}_{}", user_id, flashcard_id)
    }
}
