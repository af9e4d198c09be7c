//! Gallery content service.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult, OptionExt};
use domain::{Content, ContentInput};

use crate::dao::ContentDao;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ContentService: Send + Sync {
    async fn list_content(&self) -> AppResult<Vec<Content>>;

    async fn get_content(&self, content_id: &str) -> AppResult<Content>;

    async fn add_content(&self, input: ContentInput) -> AppResult<Content>;

    async fn update_content(&self, content_id: String, input: ContentInput) -> AppResult<Content>;
}

pub struct ContentManager {
    content: Arc<dyn ContentDao>,
}

impl ContentManager {
    pub fn new(content: Arc<dyn ContentDao>) -> Self {
        Self { content }
    }
}

#[async_trait]
impl ContentService for ContentManager {
    async fn list_content(&self) -> AppResult<Vec<Content>> {
        self.content.get_all().await
    }

    async fn get_content(&self, content_id: &str) -> AppResult<Content> {
        self.content.get_object(content_id).await?.ok_or_not_found()
    }

    async fn add_content(&self, input: ContentInput) -> AppResult<Content> {
        input.validate()?;
        self.content.create(input.into_content()).await
    }

    async fn update_content(&self, content_id: String, input: ContentInput) -> AppResult<Content> {
        input.validate()?;

        if self
            .content
            .update(content_id.clone(), input)
            .await?
            .is_missing()
        {
            return Err(AppError::NotFound);
        }

        self.get_content(&content_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::{MockContentDao, WriteOutcome};

    fn input() -> ContentInput {
        ContentInput {
            name: "Hada del bosque".to_string(),
            description: "Figura pintada a mano".to_string(),
            keywords: vec!["Hada".to_string()],
            image: "img-9".to_string(),
        }
    }

    #[tokio::test]
    async fn add_assigns_an_id() {
        let mut dao = MockContentDao::new();
        dao.expect_create()
            .withf(|content| !content.content_id.is_empty() && content.keywords == vec!["hada"])
            .returning(|content| Ok(content));

        let content = ContentManager::new(Arc::new(dao))
            .add_content(input())
            .await
            .unwrap();

        assert_eq!(content.name, "Hada del bosque");
    }

    #[tokio::test]
    async fn update_missing_content_is_not_found() {
        let mut dao = MockContentDao::new();
        dao.expect_update()
            .returning(|_, _| Ok(WriteOutcome::Missing));
        dao.expect_get_object().never();

        let result = ContentManager::new(Arc::new(dao))
            .update_content("missing".to_string(), input())
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn get_missing_content_is_not_found() {
        let mut dao = MockContentDao::new();
        dao.expect_get_object().returning(|_| Ok(None));

        let result = ContentManager::new(Arc::new(dao)).get_content("x").await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
