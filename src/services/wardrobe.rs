// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wardrobe items, AI image analysis, outfits and metadata lookups.

use crate::error::ApiError;
use crate::models::{
    ImageUpload, ItemAttributes, MetadataKind, NewItem, NewOutfit, Outfit, Tag, WardrobeItem,
};
use crate::services::auth::validate;
use crate::services::endpoints;
use crate::services::http::{ApiClient, FormField};

/// Multipart field name the analysis endpoint reads the photo from.
const IMAGE_FIELD: &str = "file";

/// Wardrobe API wrapper.
#[derive(Clone)]
pub struct WardrobeService {
    client: ApiClient,
}

impl WardrobeService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List the signed-in user's items.
    pub async fn list_items(&self) -> Result<Vec<WardrobeItem>, ApiError> {
        let user_id = self.user_id()?;
        self.client
            .get_json(&format!("{}/user/{}", endpoints::ITEMS, user_id))
            .await
    }

    pub async fn get_item(&self, item_id: u64) -> Result<WardrobeItem, ApiError> {
        self.client
            .get_json(&format!("{}/{}", endpoints::ITEMS, item_id))
            .await
    }

    pub async fn create_item(&self, item: &NewItem) -> Result<WardrobeItem, ApiError> {
        validate(item)?;
        let item: WardrobeItem = self.client.post_json(endpoints::ITEMS, item).await?;
        tracing::info!(item_id = item.id, category = %item.category, "Item added");
        Ok(item)
    }

    pub async fn delete_item(&self, item_id: u64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", endpoints::ITEMS, item_id))
            .await?;
        tracing::info!(item_id, "Item deleted");
        Ok(())
    }

    /// Send a photo for AI analysis and return the detected attributes.
    pub async fn analyze_image(&self, image: ImageUpload) -> Result<ItemAttributes, ApiError> {
        if image.bytes.is_empty() {
            return Err(ApiError::BadRequest("Image is empty".to_string()));
        }

        tracing::debug!(file = %image.file_name, bytes = image.bytes.len(), "Uploading image for analysis");

        let fields = vec![FormField::File {
            name: IMAGE_FIELD.to_string(),
            upload: image,
        }];
        self.client
            .post_multipart(endpoints::ANALYZE_IMAGE, fields)
            .await
    }

    pub async fn list_outfits(&self) -> Result<Vec<Outfit>, ApiError> {
        let user_id = self.user_id()?;
        self.client
            .get_json(&format!("{}/user/{}", endpoints::OUTFITS, user_id))
            .await
    }

    pub async fn create_outfit(&self, outfit: &NewOutfit) -> Result<Outfit, ApiError> {
        validate(outfit)?;
        self.client.post_json(endpoints::OUTFITS, outfit).await
    }

    /// Fetch a metadata lookup table.
    pub async fn metadata(&self, kind: MetadataKind) -> Result<Vec<Tag>, ApiError> {
        self.client.get_json(kind.path()).await
    }

    fn user_id(&self) -> Result<u64, ApiError> {
        self.client
            .tokens()
            .user_id()?
            .ok_or(ApiError::Unauthorized)
    }
}
