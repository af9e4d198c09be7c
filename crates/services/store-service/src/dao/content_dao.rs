//! Gallery content DAO.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    Collection,
};

use common::{AppError, AppResult};
use domain::{Content, ContentInput};

use super::{documents::ContentDocument, WriteOutcome};
use crate::infra::{collections::CONTENT_COLLECTION, Database};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ContentDao: Send + Sync {
    /// Every gallery entry, newest first
    async fn get_all(&self) -> AppResult<Vec<Content>>;

    async fn get_object(&self, content_id: &str) -> AppResult<Option<Content>>;

    async fn create(&self, content: Content) -> AppResult<Content>;

    /// Overwrite name, description, keywords and image
    async fn update(&self, content_id: String, changes: ContentInput) -> AppResult<WriteOutcome>;
}

pub struct ContentStore {
    content: Collection<ContentDocument>,
}

impl ContentStore {
    pub fn new(db: &Database) -> Self {
        Self {
            content: db.collection(CONTENT_COLLECTION),
        }
    }
}

fn content_update(changes: &ContentInput) -> Document {
    doc! {
        "$set": {
            "name": changes.name.trim(),
            "description": changes.description.as_str(),
            "keywords": changes.clean_keywords(),
            "image": changes.image.as_str(),
        }
    }
}

#[async_trait]
impl ContentDao for ContentStore {
    async fn get_all(&self) -> AppResult<Vec<Content>> {
        let content: Vec<Content> = self
            .content
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?
            .map_ok(Content::from)
            .try_collect()
            .await?;

        Ok(content)
    }

    async fn get_object(&self, content_id: &str) -> AppResult<Option<Content>> {
        let content = self
            .content
            .find_one(doc! { "contentId": content_id })
            .await?
            .map(Content::from);
        Ok(content)
    }

    async fn create(&self, content: Content) -> AppResult<Content> {
        self.content
            .insert_one(ContentDocument::from(content.clone()))
            .await
            .map_err(|e| AppError::from_write(e, format!("Content {}", content.content_id)))?;

        tracing::info!("Inserted content {} ({})", content.content_id, content.name);
        Ok(content)
    }

    async fn update(&self, content_id: String, changes: ContentInput) -> AppResult<WriteOutcome> {
        let result = self
            .content
            .update_one(
                doc! { "contentId": content_id.as_str() },
                content_update(&changes),
            )
            .await?;

        let outcome = WriteOutcome::from(&result);
        if outcome == WriteOutcome::Modified {
            tracing::info!("Updated content {}", content_id);
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_stores_cleaned_keywords() {
        let changes = ContentInput {
            name: " Hada ".to_string(),
            description: "Figura".to_string(),
            keywords: vec!["Bosque".to_string(), "bosque".to_string()],
            image: "img-2".to_string(),
        };

        let update = content_update(&changes);
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get_str("name").unwrap(), "Hada");
        assert_eq!(set.get_array("keywords").unwrap().len(), 1);
        assert!(!set.contains_key("contentId"));
    }
}
