// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Point records (append-only ledger)
//! - Sign-ins (one document per user per day)
//! - Achievement and badge grants (one document per user per catalog entry)
//! - Learning progress (one document per user per flashcard)
//!
//! Per-user lists are fetched with a single equality filter and sorted in
//! memory. They are small, and this avoids composite indexes.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{
    LearningProgress, NewPointRecord, PointRecord, SignInEvent, UserAchievement, UserBadge,
};
use chrono::NaiveDate;
use firestore::errors::FirestoreError;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
    /// Disambiguates point record IDs created in the same microsecond
    point_seq: Arc<AtomicU64>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self::with_client(Some(client)))
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self::with_client(Some(client)))
    }

    /// Create an offline client. Every operation returns a database error.
    pub fn new_offline() -> Self {
        Self::with_client(None)
    }

    fn with_client(client: Option<firestore::FirestoreDb>) -> Self {
        Self {
            client,
            point_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Generic helpers ─────────────────────────────────────────

    async fn get_by_id<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a document, failing softly if the ID is taken.
    ///
    /// Returns `Ok(false)` on a conflict so callers can treat the write as
    /// already done.
    async fn insert_if_absent<T>(&self, collection: &str, id: &str, obj: &T) -> Result<bool, AppError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        let result: Result<T, FirestoreError> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collection)
            .document_id(id)
            .object(obj)
            .execute()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(FirestoreError::DataConflictError(_)) => {
                tracing::debug!(collection, id, "Document already exists");
                Ok(false)
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    async fn list_for_user<T>(&self, collection: &str, user_id: u64) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| q.for_all([q.field("userId").eq(user_id)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Points ──────────────────────────────────────────────────

    /// Append a point record under a fresh document ID.
    pub async fn insert_point_record(&self, record: NewPointRecord) -> Result<PointRecord, AppError> {
        let seq = self.point_seq.fetch_add(1, Ordering::Relaxed);
        let id = format!(
            "{}_{}_{}",
            record.user_id,
            record.created_at.timestamp_micros(),
            seq
        );
        let record = record.with_id(id);

        if !self
            .insert_if_absent(collections::POINT_RECORDS, &record.id, &record)
            .await?
        {
            return Err(AppError::Database(format!(
                "Point record ID collision: {}",
                record.id
            )));
        }

        Ok(record)
    }

    pub async fn get_point_record(
        &self,
        _user_id: u64,
        id: &str,
    ) -> Result<Option<PointRecord>, AppError> {
        self.get_by_id(collections::POINT_RECORDS, id).await
    }

    /// Create a point record under its own ID; `false` if that ID exists.
    pub async fn insert_point_record_once(&self, record: &PointRecord) -> Result<bool, AppError> {
        self.insert_if_absent(collections::POINT_RECORDS, &record.id, record)
            .await
    }

    pub async fn point_records_for_user(&self, user_id: u64) -> Result<Vec<PointRecord>, AppError> {
        let mut records: Vec<PointRecord> =
            self.list_for_user(collections::POINT_RECORDS, user_id).await?;
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(records)
    }

    // ─── Sign-ins ────────────────────────────────────────────────

    pub async fn get_sign_in(
        &self,
        user_id: u64,
        day: NaiveDate,
    ) -> Result<Option<SignInEvent>, AppError> {
        self.get_by_id(collections::SIGN_INS, &SignInEvent::key(user_id, day))
            .await
    }

    pub async fn insert_sign_in(&self, event: &SignInEvent) -> Result<bool, AppError> {
        self.insert_if_absent(collections::SIGN_INS, &event.id, event)
            .await
    }

    pub async fn sign_ins_for_user(&self, user_id: u64) -> Result<Vec<SignInEvent>, AppError> {
        let mut events: Vec<SignInEvent> =
            self.list_for_user(collections::SIGN_INS, user_id).await?;
        events.sort_by(|a, b| b.sign_in_date.cmp(&a.sign_in_date));
        Ok(events)
    }

    // ─── Achievements ────────────────────────────────────────────

    pub async fn get_user_achievement(
        &self,
        user_id: u64,
        achievement_id: u32,
    ) -> Result<Option<UserAchievement>, AppError> {
        self.get_by_id(
            collections::USER_ACHIEVEMENTS,
            &UserAchievement::key(user_id, achievement_id),
        )
        .await
    }

    pub async fn insert_user_achievement(&self, grant: &UserAchievement) -> Result<bool, AppError> {
        self.insert_if_absent(collections::USER_ACHIEVEMENTS, &grant.id, grant)
            .await
    }

    pub async fn user_achievements(&self, user_id: u64) -> Result<Vec<UserAchievement>, AppError> {
        let mut grants: Vec<UserAchievement> = self
            .list_for_user(collections::USER_ACHIEVEMENTS, user_id)
            .await?;
        grants.sort_by(|a, b| b.achieved_at.cmp(&a.achieved_at));
        Ok(grants)
    }

    // ─── Badges ──────────────────────────────────────────────────

    pub async fn get_user_badge(
        &self,
        user_id: u64,
        badge_id: u32,
    ) -> Result<Option<UserBadge>, AppError> {
        self.get_by_id(collections::USER_BADGES, &UserBadge::key(user_id, badge_id))
            .await
    }

    pub async fn insert_user_badge(&self, grant: &UserBadge) -> Result<bool, AppError> {
        self.insert_if_absent(collections::USER_BADGES, &grant.id, grant)
            .await
    }

    pub async fn user_badges(&self, user_id: u64) -> Result<Vec<UserBadge>, AppError> {
        let mut grants: Vec<UserBadge> =
            self.list_for_user(collections::USER_BADGES, user_id).await?;
        grants.sort_by(|a, b| b.obtained_at.cmp(&a.obtained_at));
        Ok(grants)
    }

    // ─── Learning progress ───────────────────────────────────────

    pub async fn upsert_progress(&self, progress: &LearningProgress) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::LEARNING_PROGRESS)
            .document_id(&progress.id)
            .object(progress)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn progress_for_user(&self, user_id: u64) -> Result<Vec<LearningProgress>, AppError> {
        let mut rows: Vec<LearningProgress> = self
            .list_for_user(collections::LEARNING_PROGRESS, user_id)
            .await?;
        rows.sort_by_key(|p| p.flashcard_id);
        Ok(rows)
    }
}
