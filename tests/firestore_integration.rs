// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running and
//! FIRESTORE_EMULATOR_HOST to point at it. Without it they are skipped.

use chrono::{Duration, NaiveDate, Utc};
use hanzi_garden::models::{
    LearningProgress, NewPointRecord, PointRecord, SignInEvent, UserAchievement, UserBadge,
};

mod common;
use common::{test_db, unique_user_id};

fn new_record(user_id: u64, points: i64, kind: &str) -> NewPointRecord {
    NewPointRecord {
        user_id,
        points,
        kind: kind.to_string(),
        description: None,
        created_at: Utc::now(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// POINT RECORD TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_point_records_roundtrip_newest_first() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();

    let first = db.insert_point_record(new_record(user_id, 10, "sign_in")).await.unwrap();
    let second = db.insert_point_record(new_record(user_id, 25, "game")).await.unwrap();
    assert_ne!(first.id, second.id);

    let records = db.point_records_for_user(user_id).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, second.id);
    assert_eq!(records[0].kind, "game");

    // Other users' records are not included
    let other = db.point_records_for_user(unique_user_id()).await.unwrap();
    assert!(other.is_empty());
}

#[tokio::test]
async fn test_keyed_point_record_written_once() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let day = NaiveDate::from_ymd_opt(2026, 5, 11).unwrap();
    let record = new_record(user_id, 30, "sign_in").with_id(PointRecord::sign_in_key(user_id, day));

    assert!(db.insert_point_record_once(&record).await.unwrap());
    assert!(!db.insert_point_record_once(&record).await.unwrap());
    assert!(db.get_point_record(user_id, &record.id).await.unwrap().is_some());
    assert_eq!(db.point_records_for_user(user_id).await.unwrap().len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// SIGN-IN TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_sign_in_insert_is_unique_per_day() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let day = NaiveDate::from_ymd_opt(2026, 5, 11).unwrap();
    let event = SignInEvent::new(user_id, day, Utc::now());

    assert!(db.insert_sign_in(&event).await.unwrap());
    assert!(!db.insert_sign_in(&event).await.unwrap());

    let stored = db.get_sign_in(user_id, day).await.unwrap();
    assert_eq!(stored.map(|s| s.sign_in_date), Some(day));
}

#[tokio::test]
async fn test_sign_ins_listed_most_recent_first() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let today = Utc::now().date_naive();

    for back in [2, 0, 1] {
        let day = today - Duration::days(back);
        db.insert_sign_in(&SignInEvent::new(user_id, day, Utc::now()))
            .await
            .unwrap();
    }

    let days: Vec<NaiveDate> = db
        .sign_ins_for_user(user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.sign_in_date)
        .collect();
    assert_eq!(
        days,
        vec![today, today - Duration::days(1), today - Duration::days(2)]
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// GRANT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_grants_are_unique() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();

    let achievement = UserAchievement::new(user_id, 1, Utc::now());
    assert!(db.insert_user_achievement(&achievement).await.unwrap());
    assert!(!db.insert_user_achievement(&achievement).await.unwrap());
    assert!(db.get_user_achievement(user_id, 1).await.unwrap().is_some());
    assert_eq!(db.user_achievements(user_id).await.unwrap().len(), 1);

    let badge = UserBadge::new(user_id, 4, Utc::now());
    assert!(db.insert_user_badge(&badge).await.unwrap());
    assert!(!db.insert_user_badge(&badge).await.unwrap());
    assert!(db.get_user_badge(user_id, 5).await.unwrap().is_none());
    assert_eq!(db.user_badges(user_id).await.unwrap().len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// PROGRESS TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_progress_upsert_overwrites() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let now = Utc::now();

    let mut progress = LearningProgress {
        id: LearningProgress::key(user_id, 3),
        user_id,
        flashcard_id: 3,
        is_learned: true,
        learned_at: Some(now),
        updated_at: now,
    };
    db.upsert_progress(&progress).await.unwrap();

    progress.is_learned = false;
    progress.learned_at = None;
    db.upsert_progress(&progress).await.unwrap();

    let rows = db.progress_for_user(user_id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].is_learned);
    assert!(rows[0].learned_at.is_none());
}
