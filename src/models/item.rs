// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Wardrobe item schemas.

use super::Rgb;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Clothing item stored in the user's wardrobe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardrobeItem {
    pub id: u64,
    pub name: String,
    pub category: String,
    /// Hex string or color name
    pub color: String,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub fabric: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub seasons: Vec<String>,
    #[serde(default)]
    pub occasions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl WardrobeItem {
    /// Date label shown next to the item, e.g. "Jan 5, 2026".
    pub fn added_on(&self) -> String {
        crate::time_utils::format_added_on(self.created_at)
    }
}

/// Structured attributes returned by the AI image-analysis endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAttributes {
    pub color: String,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub fabric: Option<String>,
    pub category: String,
    #[serde(default)]
    pub seasons: Vec<String>,
    #[serde(default)]
    pub occasions: Vec<String>,
}

impl ItemAttributes {
    /// Parsed color, if the analysis returned a hex or `rgb()` value.
    pub fn rgb(&self) -> Option<Rgb> {
        Rgb::parse(&self.color)
    }

    /// Start a new item from the analysis result.
    pub fn into_new_item(self, name: impl Into<String>, image_url: Option<String>) -> NewItem {
        NewItem {
            name: name.into(),
            category: self.category,
            color: self.color,
            pattern: self.pattern,
            fabric: self.fabric,
            image_url,
            seasons: self.seasons,
            occasions: self.occasions,
        }
    }
}

/// Item creation request.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "Color is required"))]
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fabric: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
    pub seasons: Vec<String>,
    pub occasions: Vec<String>,
}

/// Photo to upload as a multipart file field.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Build an upload, guessing the MIME type from the file extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_for(&file_name).to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}
