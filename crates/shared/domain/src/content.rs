//! Gallery content entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Gallery entry shown on the storefront
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Content {
    /// UUID string
    pub content_id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Image URL or storage id
    pub image: String,
    pub created_at: DateTime<Utc>,
}

/// Gallery fields supplied on create and update
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentInput {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub image: String,
}

impl ContentInput {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Content name cannot be empty"));
        }
        if self.image.trim().is_empty() {
            return Err(DomainError::validation("Content image cannot be empty"));
        }
        Ok(())
    }

    /// Keywords trimmed, without blanks or repeats
    pub fn clean_keywords(&self) -> Vec<String> {
        let mut keywords: Vec<String> = Vec::new();
        for keyword in &self.keywords {
            let keyword = keyword.trim().to_lowercase();
            if !keyword.is_empty() && !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        }
        keywords
    }

    /// Build a new gallery entry with a fresh id
    pub fn into_content(self) -> Content {
        let keywords = self.clean_keywords();
        Content {
            content_id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            description: self.description,
            keywords,
            image: self.image,
            created_at: Utc::now(),
        }
    }
}

/// Split a comma separated keyword field, as typed in the gallery form
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_cleaned() {
        let input = ContentInput {
            name: "Hada".to_string(),
            description: String::new(),
            keywords: split_keywords("Fantasía, duende, , DUENDE"),
            image: "img-1".to_string(),
        };
        assert_eq!(input.clean_keywords(), vec!["fantasía", "duende"]);
    }

    #[test]
    fn validate_requires_name_and_image() {
        let input = ContentInput {
            name: " ".to_string(),
            description: String::new(),
            keywords: vec![],
            image: "img".to_string(),
        };
        assert!(input.validate().is_err());
    }
}
