//! Create/update/delete operations per resource
//!
//! Every payload passes the schema-driven sanitization pass before it goes
//! out. Mutations are never retried automatically: a duplicate create is
//! worse than a surfaced failure. A successful mutation invalidates every
//! cached read of the touched kind; a failed one leaves all caches alone.

use crate::api::{ApiClient, ApiError, FieldError};
use crate::query::QueryCache;
use crate::resources::{GalleryItem, ResourceKind};
use crate::schema::{sanitize_payload, schema_for};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// Mutation layer bound to the query cache it invalidates
pub struct ResourceWriter {
    client: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl ResourceWriter {
    pub fn new(client: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        Self { client, cache }
    }

    /// Create a record; returns it with its server-assigned id.
    pub async fn create<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        mut payload: Value,
    ) -> Result<T, ApiError> {
        sanitize_payload(schema_for(kind), &mut payload);
        let record: T = self.client.post(kind.path(), payload).await?;
        self.after_write(kind, "created");
        Ok(record)
    }

    /// Update an existing record
    pub async fn update<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        id: &str,
        mut payload: Value,
    ) -> Result<T, ApiError> {
        sanitize_payload(schema_for(kind), &mut payload);
        let path = format!("{}/{}", kind.path(), id);
        let record: T = self.client.put(&path, payload).await?;
        self.after_write(kind, "updated");
        Ok(record)
    }

    /// Delete a record
    pub async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), ApiError> {
        let path = format!("{}/{}", kind.path(), id);
        self.client.delete(&path).await?;
        self.after_write(kind, "deleted");
        Ok(())
    }

    /// Upload a gallery item: multipart with either a local image file or a
    /// remote image URL, plus metadata fields.
    pub async fn upload_gallery(&self, upload: GalleryUpload) -> Result<GalleryItem, ApiError> {
        let mut form = Form::new()
            .text("title", upload.title.trim().to_string())
            .text("order", upload.order.to_string())
            .text("featured", upload.featured.to_string())
            .text("active", upload.active.to_string());
        if let Some(category) = upload.category {
            form = form.text("category", category.trim().to_string());
        }
        form = match upload.image {
            ImageSource::File(path) => {
                let bytes = tokio::fs::read(&path).await.map_err(|e| {
                    ApiError::Request(format!("cannot read {}: {}", path.display(), e))
                })?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "upload".to_string());
                form.part("image", Part::bytes(bytes).file_name(file_name))
            }
            ImageSource::Url(url) => form.text("imageUrl", url),
        };

        let item: GalleryItem = self.client.post_multipart("gallery/upload", form).await?;
        self.after_write(ResourceKind::Gallery, "uploaded");
        Ok(item)
    }

    fn after_write(&self, kind: ResourceKind, verb: &str) {
        self.cache.invalidate(kind);
        self.client
            .notifier()
            .success(&format!("{} record {}", kind, verb));
    }
}

/// Exactly one image source must be present on an upload.
#[derive(Debug, Clone)]
pub enum ImageSource {
    File(PathBuf),
    Url(String),
}

impl ImageSource {
    /// Resolve the two optional upload inputs into the mandatory single
    /// source, rejecting both-present and neither-present.
    pub fn from_options(file: Option<PathBuf>, url: Option<String>) -> Result<Self, ApiError> {
        match (file, url) {
            (Some(file), None) => Ok(ImageSource::File(file)),
            (None, Some(url)) => Ok(ImageSource::Url(url)),
            (Some(_), Some(_)) => Err(ApiError::Validation(vec![FieldError {
                field: "image".to_string(),
                message: "Provide an image file or an image URL, not both".to_string(),
            }])),
            (None, None) => Err(ApiError::Validation(vec![FieldError {
                field: "image".to_string(),
                message: "An image file or an image URL is required".to_string(),
            }])),
        }
    }
}

/// Metadata for one gallery upload
#[derive(Debug, Clone)]
pub struct GalleryUpload {
    pub title: String,
    pub category: Option<String>,
    pub order: i32,
    pub featured: bool,
    pub active: bool,
    pub image: ImageSource,
}
