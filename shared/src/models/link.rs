//! Link Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::orderable::Orderable;

/// Maximum title length shown on link cards
pub const MAX_TITLE_LEN: u64 = 200;

/// URLs / image paths
pub const MAX_URL_LEN: u64 = 2048;

/// Link entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Persisted position; `None` sorts after every ordered link
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Orderable for Link {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }

    fn order(&self) -> Option<i64> {
        self.order
    }

    fn set_order(&mut self, order: Option<i64>) {
        self.order = order;
    }
}

/// Create link payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LinkCreate {
    #[validate(length(min = 1, max = MAX_TITLE_LEN))]
    pub title: String,
    #[validate(url, length(max = MAX_URL_LEN))]
    pub url: String,
    #[validate(url, length(max = MAX_URL_LEN))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Filled in by the append-at-end policy when left empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Update link payload
///
/// Only descriptive fields and `active`; ordering goes through batch reorder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct LinkUpdate {
    #[validate(length(min = 1, max = MAX_TITLE_LEN))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[validate(url, length(max = MAX_URL_LEN))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[validate(url, length(max = MAX_URL_LEN))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl LinkUpdate {
    /// Payload that only flips the `active` flag
    pub fn active(active: bool) -> Self {
        Self {
            active: Some(active),
            ..Default::default()
        }
    }

    /// Apply the present fields onto an existing link
    pub fn apply_to(&self, link: &mut Link) {
        if let Some(title) = &self.title {
            link.title = title.clone();
        }
        if let Some(url) = &self.url {
            link.url = url.clone();
        }
        if let Some(image) = &self.image {
            link.image = Some(image.clone());
        }
        if let Some(description) = &self.description {
            link.description = Some(description.clone());
        }
        if let Some(active) = self.active {
            link.active = active;
        }
    }
}

impl From<LinkCreate> for LinkUpdate {
    fn from(create: LinkCreate) -> Self {
        Self {
            title: Some(create.title),
            url: Some(create.url),
            image: create.image,
            description: create.description,
            active: create.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(title: &str, url: &str) -> LinkCreate {
        LinkCreate {
            title: title.to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_link_deserialize_defaults() {
        let json = r#"{"id":7,"title":"Blog","url":"https://example.com"}"#;
        let link: Link = serde_json::from_str(json).unwrap();
        assert_eq!(link.id, 7);
        assert!(link.order.is_none());
        assert!(link.active);
        assert!(link.image.is_none());
    }

    #[test]
    fn test_create_validation() {
        assert!(create("Podcast", "https://example.com/pod").validate().is_ok());

        let err = create("Podcast", "not a url").validate().unwrap_err();
        assert!(err.field_errors().contains_key("url"));

        let err = create("", "https://example.com").validate().unwrap_err();
        assert!(err.field_errors().contains_key("title"));
    }

    #[test]
    fn test_update_validation_skips_absent_fields() {
        assert!(LinkUpdate::active(false).validate().is_ok());

        let update = LinkUpdate {
            url: Some("ftp//broken".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_update_serializes_only_present_fields() {
        let json = serde_json::to_string(&LinkUpdate::active(true)).unwrap();
        assert_eq!(json, r#"{"active":true}"#);
    }

    #[test]
    fn test_apply_to_never_touches_order() {
        let mut link = Link {
            id: 1,
            title: "Old".to_string(),
            url: "https://old.example".to_string(),
            image: None,
            description: None,
            order: Some(300),
            active: true,
            created_at: None,
        };
        let update = LinkUpdate {
            title: Some("New".to_string()),
            active: Some(false),
            ..Default::default()
        };
        update.apply_to(&mut link);

        assert_eq!(link.title, "New");
        assert!(!link.active);
        assert_eq!(link.order, Some(300));
    }
}
