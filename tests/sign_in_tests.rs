// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in workflow tests against the service layer.
//!
//! Prior sign-ins are written straight to the store so streaks can be
//! built up without waiting for real days to pass.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use hanzi_garden::error::AppError;
use hanzi_garden::models::{PointRecord, SignInEvent};

mod common;

fn noon(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

async fn seed_sign_ins(state: &hanzi_garden::AppState, user_id: u64, days: &[NaiveDate]) {
    for &day in days {
        let at = day.and_hms_opt(9, 0, 0).unwrap().and_utc();
        let inserted = state
            .db
            .insert_sign_in(&SignInEvent::new(user_id, day, at))
            .await
            .unwrap();
        assert!(inserted);
    }
}

#[tokio::test]
async fn test_streak_continues_from_previous_days() {
    let (state, _) = common::test_state();
    let now = noon(2026, 5, 11);
    let today = now.date_naive();

    seed_sign_ins(
        &state,
        1,
        &[
            today - Duration::days(3),
            today - Duration::days(2),
            today - Duration::days(1),
        ],
    )
    .await;

    let outcome = state.sign_in.sign_in(1, now).await.unwrap();
    assert_eq!(outcome.consecutive_days, 4);
    assert_eq!(outcome.sign_in_points, 30);
    assert_eq!(outcome.sign_in.sign_in_date, today);

    // 3-day sign-in badge unlocked, 7-day one not yet
    let badge_ids: Vec<u32> = outcome.new_badges.iter().map(|b| b.badge_id).collect();
    assert_eq!(badge_ids, vec![4]);

    let summary = state.ledger.history(1).await.unwrap();
    assert_eq!(summary.total_points, 30);
    assert_eq!(
        summary.records[0].description.as_deref(),
        Some("Sign-in streak: 4 days")
    );
}

#[tokio::test]
async fn test_gap_resets_streak() {
    let (state, _) = common::test_state();
    let now = noon(2026, 5, 11);
    let today = now.date_naive();

    seed_sign_ins(
        &state,
        2,
        &[today - Duration::days(4), today - Duration::days(3), today - Duration::days(2)],
    )
    .await;

    let outcome = state.sign_in.sign_in(2, now).await.unwrap();
    assert_eq!(outcome.consecutive_days, 1);
    assert_eq!(outcome.sign_in_points, 10);
    assert!(outcome.new_badges.is_empty());
}

#[tokio::test]
async fn test_week_long_streak_pays_top_tier() {
    let (state, _) = common::test_state();
    let start = noon(2026, 5, 1);

    let mut last = None;
    for offset in 0..7 {
        last = Some(
            state
                .sign_in
                .sign_in(3, start + Duration::days(offset))
                .await
                .unwrap(),
        );
    }
    let last = last.unwrap();

    assert_eq!(last.consecutive_days, 7);
    assert_eq!(last.sign_in_points, 50);
    let badge_ids: Vec<u32> = last.new_badges.iter().map(|b| b.badge_id).collect();
    assert_eq!(badge_ids, vec![5]);

    // 10 + 10 + 30 + 30 + 30 + 30 + 50
    assert_eq!(state.ledger.total_points(3).await.unwrap(), 190);
    let achievements = state.db.user_achievements(3).await.unwrap();
    assert_eq!(achievements.len(), 1);
    assert_eq!(achievements[0].achievement_id, 1);
}

#[tokio::test]
async fn test_second_sign_in_same_day_is_rejected() {
    let (state, _) = common::test_state();
    let morning = Utc.with_ymd_and_hms(2026, 5, 11, 1, 0, 0).unwrap();
    let evening = Utc.with_ymd_and_hms(2026, 5, 11, 23, 0, 0).unwrap();

    state.sign_in.sign_in(4, morning).await.unwrap();
    let err = state.sign_in.sign_in(4, evening).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadySignedInToday));

    assert_eq!(state.db.sign_ins_for_user(4).await.unwrap().len(), 1);
    assert_eq!(state.db.point_records_for_user(4).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_sign_ins_pay_once() {
    let (state, _) = common::test_state();
    let now = noon(2026, 5, 11);

    let (a, b) = tokio::join!(state.sign_in.sign_in(5, now), state.sign_in.sign_in(5, now));
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);

    assert_eq!(state.db.sign_ins_for_user(5).await.unwrap().len(), 1);
    assert_eq!(state.ledger.total_points(5).await.unwrap(), 10);
}

#[tokio::test]
async fn test_sign_in_unlocks_achievement_from_prior_points() {
    let (state, _) = common::test_state();

    state
        .ledger
        .record_points(6, 95, "game", None)
        .await
        .unwrap();

    let outcome = state.sign_in.sign_in(6, noon(2026, 5, 11)).await.unwrap();
    let ids: Vec<u32> = outcome
        .new_achievements
        .iter()
        .map(|a| a.achievement_id)
        .collect();
    assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn test_grant_failures_do_not_fail_sign_in() {
    let (state, memory) = common::test_state();
    let now = noon(2026, 5, 11);
    let today = now.date_naive();

    seed_sign_ins(&state, 7, &[today - Duration::days(2), today - Duration::days(1)]).await;
    state
        .ledger
        .record_points(7, 500, "game", None)
        .await
        .unwrap();

    memory.set_reject_grant_writes(true);
    let outcome = state.sign_in.sign_in(7, now).await.unwrap();

    assert_eq!(outcome.consecutive_days, 3);
    assert!(outcome.new_achievements.is_empty());
    assert!(outcome.new_badges.is_empty());
    // Sign-in and its points are kept
    assert_eq!(state.ledger.total_points(7).await.unwrap(), 530);

    // Grants that were missed are picked up by the next evaluation
    memory.set_reject_grant_writes(false);
    let granted = state.evaluator.evaluate_achievements(7).await.unwrap();
    assert_eq!(granted.len(), 2);
}

#[tokio::test]
async fn test_status_reports_open_streak() {
    let (state, _) = common::test_state();
    let now = noon(2026, 5, 11);
    let today = now.date_naive();

    seed_sign_ins(&state, 8, &[today - Duration::days(2), today - Duration::days(1)]).await;

    let status = state.sign_in.status(8, now).await.unwrap();
    assert!(!status.signed_in_today);
    assert_eq!(status.current_streak, 2);

    state.sign_in.sign_in(8, now).await.unwrap();
    let status = state.sign_in.status(8, now).await.unwrap();
    assert!(status.signed_in_today);
    assert_eq!(status.current_streak, 3);

    // Missing a day breaks it
    let status = state
        .sign_in
        .status(8, now + Duration::days(2))
        .await
        .unwrap();
    assert_eq!(status.current_streak, 0);
}

#[tokio::test]
async fn test_status_with_later_dated_row() {
    let (state, _) = common::test_state();
    let now = noon(2026, 5, 11);
    let today = now.date_naive();

    state.sign_in.sign_in(9, now).await.unwrap();
    // Left behind by a day offset change
    seed_sign_ins(&state, 9, &[today + Duration::days(1)]).await;

    let status = state.sign_in.status(9, now).await.unwrap();
    assert!(status.signed_in_today);
    assert_eq!(status.current_streak, 1);

    let err = state.sign_in.sign_in(9, now).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadySignedInToday));
}

#[tokio::test]
async fn test_failed_bonus_is_paid_on_retry() {
    let (state, memory) = common::test_state();
    let now = noon(2026, 5, 11);
    let today = now.date_naive();

    seed_sign_ins(&state, 10, &[today - Duration::days(1)]).await;

    memory.set_reject_point_writes(true);
    let err = state.sign_in.sign_in(10, now).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));
    assert!(state.db.get_sign_in(10, today).await.unwrap().is_some());
    assert_eq!(state.ledger.total_points(10).await.unwrap(), 0);

    // The retry on the same day completes the sign-in instead of a 409
    memory.set_reject_point_writes(false);
    let outcome = state.sign_in.sign_in(10, now).await.unwrap();
    assert_eq!(outcome.consecutive_days, 2);
    assert_eq!(outcome.sign_in_points, 10);

    let err = state.sign_in.sign_in(10, now).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadySignedInToday));

    let records = state.db.point_records_for_user(10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, PointRecord::sign_in_key(10, today));
    assert_eq!(state.db.sign_ins_for_user(10).await.unwrap().len(), 2);
}
