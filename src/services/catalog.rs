// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Achievement and badge catalogs.
//!
//! The catalogs are reference data: loaded once at startup (built-in seed or
//! a JSON file) and never changed by user actions.

use crate::models::{Achievement, Badge, BadgeCategory};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    achievements: Vec<Achievement>,
    #[serde(default)]
    badges: Vec<Badge>,
}

/// Read-only achievement and badge catalog.
#[derive(Debug, Default, Clone)]
pub struct CatalogService {
    achievements: Vec<Achievement>,
    badges: Vec<Badge>,
}

impl CatalogService {
    pub fn new(achievements: Vec<Achievement>, badges: Vec<Badge>) -> Result<Self, CatalogError> {
        ensure_unique("achievement", achievements.iter().map(|a| a.id))?;
        ensure_unique("badge", badges.iter().map(|b| b.id))?;
        Ok(Self {
            achievements,
            badges,
        })
    }

    /// The catalog the app ships with.
    pub fn seeded() -> Self {
        let achievement = |id, name: &str, description: &str, icon: &str, required_points| {
            Achievement {
                id,
                name: name.to_string(),
                description: description.to_string(),
                icon: icon.to_string(),
                required_points,
            }
        };
        let badge = |id,
                     name: &str,
                     description: &str,
                     icon: &str,
                     category,
                     required_value| Badge {
            id,
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            category,
            required_value,
        };

        Self {
            achievements: vec![
                achievement(1, "初学者", "获得100积分", "🌟", 100),
                achievement(2, "学习者", "获得500积分", "⭐", 500),
                achievement(3, "汉字达人", "获得1000积分", "🏆", 1000),
                achievement(4, "积分大师", "获得5000积分", "👑", 5000),
            ],
            badges: vec![
                badge(1, "初学者", "学习10个汉字", "📚", BadgeCategory::Learning, 10),
                badge(2, "学习者", "学习50个汉字", "📖", BadgeCategory::Learning, 50),
                badge(3, "汉字达人", "学习100个汉字", "🎓", BadgeCategory::Learning, 100),
                badge(4, "签到新星", "连续签到3天", "✨", BadgeCategory::SignIn, 3),
                badge(5, "签到达人", "连续签到7天", "🏅", BadgeCategory::SignIn, 7),
            ],
        }
    }

    /// Load a catalog from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| CatalogError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load a catalog from a JSON string:
    /// `{ "achievements": [...], "badges": [...] }`.
    pub fn load_from_json(json_data: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_json::from_str(json_data).map_err(|e| CatalogError::ParseError(e.to_string()))?;

        let catalog = Self::new(file.achievements, file.badges)?;
        tracing::info!(
            achievements = catalog.achievements.len(),
            badges = catalog.badges.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// All achievements, in catalog order.
    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    /// All badges, in catalog order.
    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    /// Badges measured against `category`, in catalog order.
    pub fn badges_in(&self, category: BadgeCategory) -> impl Iterator<Item = &Badge> {
        self.badges.iter().filter(move |b| b.category == category)
    }

    pub fn achievement(&self, id: u32) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn badge(&self, id: u32) -> Option<&Badge> {
        self.badges.iter().find(|b| b.id == id)
    }
}

fn ensure_unique(kind: &'static str, ids: impl Iterator<Item = u32>) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId(kind, id));
        }
    }
    Ok(())
}

/// Errors from catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse catalog JSON: {0}")]
    ParseError(String),

    #[error("Duplicate {0} id: {1}")]
    DuplicateId(&'static str, u32),
}
