// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod achievement;
pub mod badge;
pub mod points;
pub mod progress;
pub mod sign_in;

pub use achievement::{Achievement, UserAchievement};
pub use badge::{Badge, BadgeCategory, UserBadge};
pub use points::{NewPointRecord, PointRecord};
pub use progress::LearningProgress;
pub use sign_in::SignInEvent;
