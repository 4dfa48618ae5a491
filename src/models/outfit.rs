// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Outfit and lookup-table schemas.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Saved combination of wardrobe items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outfit {
    pub id: u64,
    pub name: String,
    pub item_ids: Vec<u64>,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewOutfit {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "An outfit needs at least one item"))]
    pub item_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
}

/// Entry of a metadata lookup table (category, style, season, occasion).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
}

/// Metadata lookup tables served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    Categories,
    Styles,
    Seasons,
    Occasions,
}

impl MetadataKind {
    pub fn path(self) -> &'static str {
        match self {
            MetadataKind::Categories => "/categories",
            MetadataKind::Styles => "/styles",
            MetadataKind::Seasons => "/seasons",
            MetadataKind::Occasions => "/occasions",
        }
    }
}

impl std::str::FromStr for MetadataKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "categories" | "category" => Ok(MetadataKind::Categories),
            "styles" | "style" => Ok(MetadataKind::Styles),
            "seasons" | "season" => Ok(MetadataKind::Seasons),
            "occasions" | "occasion" => Ok(MetadataKind::Occasions),
            other => Err(format!("unknown metadata kind: {}", other)),
        }
    }
}
