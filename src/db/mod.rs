// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! [`Db`] is the persistence handle passed to every service. It is opened
//! once in `main` and cloned cheaply; the variant decides where records live.

pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::config::{Config, StorageBackend};
use crate::error::AppError;
use crate::models::{
    LearningProgress, NewPointRecord, PointRecord, SignInEvent, UserAchievement, UserBadge,
};
use chrono::NaiveDate;

/// Collection names as constants.
pub mod collections {
    pub const POINT_RECORDS: &str = "point_records";
    pub const SIGN_INS: &str = "sign_ins";
    pub const USER_ACHIEVEMENTS: &str = "user_achievements";
    pub const USER_BADGES: &str = "user_badges";
    pub const LEARNING_PROGRESS: &str = "learning_progress";
}

/// Persistence handle.
///
/// Inserts of sign-ins and grants are create-if-absent on a deterministic
/// key and report `false` when the key already exists. Lists come back in
/// the order the API presents them.
#[derive(Clone)]
pub enum Db {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

macro_rules! dispatch {
    ($self:ident, $db:ident => $call:expr) => {
        match $self {
            Db::Firestore($db) => $call,
            Db::Memory($db) => $call,
        }
    };
}

impl Db {
    /// Open the backend selected in the configuration.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        match config.storage_backend {
            StorageBackend::Firestore => {
                Ok(Db::Firestore(FirestoreDb::new(&config.gcp_project_id).await?))
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; records are lost on restart");
                Ok(Db::Memory(MemoryDb::new()))
            }
        }
    }

    // ─── Points ──────────────────────────────────────────────────

    /// Append a point record; the store assigns its ID.
    pub async fn insert_point_record(&self, record: NewPointRecord) -> Result<PointRecord, AppError> {
        dispatch!(self, db => db.insert_point_record(record).await)
    }

    pub async fn get_point_record(
        &self,
        user_id: u64,
        id: &str,
    ) -> Result<Option<PointRecord>, AppError> {
        dispatch!(self, db => db.get_point_record(user_id, id).await)
    }

    /// Create a point record under a caller-chosen ID. Returns `false` if
    /// a record with that ID already exists.
    pub async fn insert_point_record_once(&self, record: &PointRecord) -> Result<bool, AppError> {
        dispatch!(self, db => db.insert_point_record_once(record).await)
    }

    /// All point records of a user, newest first.
    pub async fn point_records_for_user(&self, user_id: u64) -> Result<Vec<PointRecord>, AppError> {
        dispatch!(self, db => db.point_records_for_user(user_id).await)
    }

    // ─── Sign-ins ────────────────────────────────────────────────

    pub async fn get_sign_in(
        &self,
        user_id: u64,
        day: NaiveDate,
    ) -> Result<Option<SignInEvent>, AppError> {
        dispatch!(self, db => db.get_sign_in(user_id, day).await)
    }

    /// Returns `false` if the user already has a sign-in on that day.
    pub async fn insert_sign_in(&self, event: &SignInEvent) -> Result<bool, AppError> {
        dispatch!(self, db => db.insert_sign_in(event).await)
    }

    /// All sign-ins of a user, most recent day first.
    pub async fn sign_ins_for_user(&self, user_id: u64) -> Result<Vec<SignInEvent>, AppError> {
        dispatch!(self, db => db.sign_ins_for_user(user_id).await)
    }

    // ─── Achievements ────────────────────────────────────────────

    pub async fn get_user_achievement(
        &self,
        user_id: u64,
        achievement_id: u32,
    ) -> Result<Option<UserAchievement>, AppError> {
        dispatch!(self, db => db.get_user_achievement(user_id, achievement_id).await)
    }

    /// Returns `false` if the achievement was already granted.
    pub async fn insert_user_achievement(&self, grant: &UserAchievement) -> Result<bool, AppError> {
        dispatch!(self, db => db.insert_user_achievement(grant).await)
    }

    /// Achievement grants of a user, most recent first.
    pub async fn user_achievements(&self, user_id: u64) -> Result<Vec<UserAchievement>, AppError> {
        dispatch!(self, db => db.user_achievements(user_id).await)
    }

    // ─── Badges ──────────────────────────────────────────────────

    pub async fn get_user_badge(
        &self,
        user_id: u64,
        badge_id: u32,
    ) -> Result<Option<UserBadge>, AppError> {
        dispatch!(self, db => db.get_user_badge(user_id, badge_id).await)
    }

    /// Returns `false` if the badge was already granted.
    pub async fn insert_user_badge(&self, grant: &UserBadge) -> Result<bool, AppError> {
        dispatch!(self, db => db.insert_user_badge(grant).await)
    }

    /// Badge grants of a user, most recent first.
    pub async fn user_badges(&self, user_id: u64) -> Result<Vec<UserBadge>, AppError> {
        dispatch!(self, db => db.user_badges(user_id).await)
    }

    // ─── Learning progress ───────────────────────────────────────

    pub async fn upsert_progress(&self, progress: &LearningProgress) -> Result<(), AppError> {
        dispatch!(self, db => db.upsert_progress(progress).await)
    }

    /// Progress rows of a user ordered by flashcard ID.
    pub async fn progress_for_user(&self, user_id: u64) -> Result<Vec<LearningProgress>, AppError> {
        dispatch!(self, db => db.progress_for_user(user_id).await)
    }
}
