// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store for local development and tests.
//!
//! Each user's records live in one `DashMap` entry, so a check-then-insert
//! runs under that entry's lock and cannot interleave with another request
//! for the same user.

use crate::error::AppError;
use crate::models::{
    LearningProgress, NewPointRecord, PointRecord, SignInEvent, UserAchievement, UserBadge,
};
use chrono::NaiveDate;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct UserTables {
    /// Insertion order
    points: Vec<PointRecord>,
    sign_ins: BTreeMap<NaiveDate, SignInEvent>,
    achievements: BTreeMap<u32, UserAchievement>,
    badges: BTreeMap<u32, UserBadge>,
    progress: BTreeMap<u32, LearningProgress>,
}

/// Process-local store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryDb {
    users: Arc<DashMap<u64, UserTables>>,
    next_point_id: Arc<AtomicU64>,
    reject_grants: Arc<AtomicBool>,
    reject_points: Arc<AtomicBool>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make achievement and badge inserts fail as if the store were down.
    pub fn set_reject_grant_writes(&self, reject: bool) {
        self.reject_grants.store(reject, Ordering::SeqCst);
    }

    /// Make point record inserts fail as if the store were down.
    pub fn set_reject_point_writes(&self, reject: bool) {
        self.reject_points.store(reject, Ordering::SeqCst);
    }

    fn check_point_writes(&self) -> Result<(), AppError> {
        if self.reject_points.load(Ordering::SeqCst) {
            return Err(AppError::Database(
                "Point writes rejected (simulated outage)".to_string(),
            ));
        }
        Ok(())
    }

    fn check_grant_writes(&self) -> Result<(), AppError> {
        if self.reject_grants.load(Ordering::SeqCst) {
            return Err(AppError::Database(
                "Grant writes rejected (simulated outage)".to_string(),
            ));
        }
        Ok(())
    }

    /// Run `f` against a user's tables, creating them on first write.
    fn with_user_mut<R>(&self, user_id: u64, f: impl FnOnce(&mut UserTables) -> R) -> R {
        let mut entry = self.users.entry(user_id).or_default();
        f(entry.value_mut())
    }

    /// Run `f` against a user's tables, or return `default` if there are none.
    fn with_user<R>(&self, user_id: u64, default: R, f: impl FnOnce(&UserTables) -> R) -> R {
        match self.users.get(&user_id) {
            Some(entry) => f(entry.value()),
            None => default,
        }
    }

    // ─── Points ──────────────────────────────────────────────────

    pub async fn insert_point_record(&self, record: NewPointRecord) -> Result<PointRecord, AppError> {
        self.check_point_writes()?;
        let id = self.next_point_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = record.with_id(id.to_string());
        self.with_user_mut(record.user_id, |t| t.points.push(record.clone()));
        Ok(record)
    }

    pub async fn get_point_record(
        &self,
        user_id: u64,
        id: &str,
    ) -> Result<Option<PointRecord>, AppError> {
        Ok(self.with_user(user_id, None, |t| {
            t.points.iter().find(|r| r.id == id).cloned()
        }))
    }

    pub async fn insert_point_record_once(&self, record: &PointRecord) -> Result<bool, AppError> {
        self.check_point_writes()?;
        Ok(self.with_user_mut(record.user_id, |t| {
            if t.points.iter().any(|r| r.id == record.id) {
                return false;
            }
            t.points.push(record.clone());
            true
        }))
    }

    pub async fn point_records_for_user(&self, user_id: u64) -> Result<Vec<PointRecord>, AppError> {
        let mut records = self.with_user(user_id, Vec::new(), |t| {
            t.points.iter().rev().cloned().collect::<Vec<_>>()
        });
        // Stable: equal timestamps stay newest-inserted first
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    // ─── Sign-ins ────────────────────────────────────────────────

    pub async fn get_sign_in(
        &self,
        user_id: u64,
        day: NaiveDate,
    ) -> Result<Option<SignInEvent>, AppError> {
        Ok(self.with_user(user_id, None, |t| t.sign_ins.get(&day).cloned()))
    }

    pub async fn insert_sign_in(&self, event: &SignInEvent) -> Result<bool, AppError> {
        Ok(self.with_user_mut(event.user_id, |t| {
            if t.sign_ins.contains_key(&event.sign_in_date) {
                return false;
            }
            t.sign_ins.insert(event.sign_in_date, event.clone());
            true
        }))
    }

    pub async fn sign_ins_for_user(&self, user_id: u64) -> Result<Vec<SignInEvent>, AppError> {
        Ok(self.with_user(user_id, Vec::new(), |t| {
            t.sign_ins.values().rev().cloned().collect()
        }))
    }

    // ─── Achievements ────────────────────────────────────────────

    pub async fn get_user_achievement(
        &self,
        user_id: u64,
        achievement_id: u32,
    ) -> Result<Option<UserAchievement>, AppError> {
        Ok(self.with_user(user_id, None, |t| {
            t.achievements.get(&achievement_id).cloned()
        }))
    }

    pub async fn insert_user_achievement(&self, grant: &UserAchievement) -> Result<bool, AppError> {
        self.check_grant_writes()?;
        Ok(self.with_user_mut(grant.user_id, |t| {
            if t.achievements.contains_key(&grant.achievement_id) {
                return false;
            }
            t.achievements.insert(grant.achievement_id, grant.clone());
            true
        }))
    }

    pub async fn user_achievements(&self, user_id: u64) -> Result<Vec<UserAchievement>, AppError> {
        let mut grants = self.with_user(user_id, Vec::new(), |t| {
            t.achievements.values().cloned().collect::<Vec<_>>()
        });
        grants.sort_by(|a, b| b.achieved_at.cmp(&a.achieved_at));
        Ok(grants)
    }

    // ─── Badges ──────────────────────────────────────────────────

    pub async fn get_user_badge(
        &self,
        user_id: u64,
        badge_id: u32,
    ) -> Result<Option<UserBadge>, AppError> {
        Ok(self.with_user(user_id, None, |t| t.badges.get(&badge_id).cloned()))
    }

    pub async fn insert_user_badge(&self, grant: &UserBadge) -> Result<bool, AppError> {
        self.check_grant_writes()?;
        Ok(self.with_user_mut(grant.user_id, |t| {
            if t.badges.contains_key(&grant.badge_id) {
                return false;
            }
            t.badges.insert(grant.badge_id, grant.clone());
            true
        }))
    }

    pub async fn user_badges(&self, user_id: u64) -> Result<Vec<UserBadge>, AppError> {
        let mut grants = self.with_user(user_id, Vec::new(), |t| {
            t.badges.values().cloned().collect::<Vec<_>>()
        });
        grants.sort_by(|a, b| b.obtained_at.cmp(&a.obtained_at));
        Ok(grants)
    }

    // ─── Learning progress ───────────────────────────────────────

    pub async fn upsert_progress(&self, progress: &LearningProgress) -> Result<(), AppError> {
        self.with_user_mut(progress.user_id, |t| {
            t.progress.insert(progress.flashcard_id, progress.clone());
        });
        Ok(())
    }

    pub async fn progress_for_user(&self, user_id: u64) -> Result<Vec<LearningProgress>, AppError> {
        Ok(self.with_user(user_id, Vec::new(), |t| {
            t.progress.values().cloned().collect()
        }))
    }
}
