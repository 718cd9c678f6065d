use serde::Deserialize;

use crate::tasks::repo::{ServiceCategory, TaskStatus};

pub const MIN_DESCRIPTION_LEN: usize = 10;
const TITLE_MAX_CHARS: usize = 50;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub category: ServiceCategory,
    pub description: String,
    pub address: String,
    pub scheduled_date: String,
    pub price: Option<f64>,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub category: Option<ServiceCategory>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub scheduled_date: Option<String>,
    pub price: Option<f64>,
    pub photos: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct TaskFilterQuery {
    pub category: Option<ServiceCategory>,
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Deserialize)]
pub struct AvailableQuery {
    pub category: Option<ServiceCategory>,
}

/// A task has no separate title field on the wire; the first words of the
/// description serve as one. Char-based so Cyrillic text never splits
/// mid-character.
pub fn derive_title(description: &str) -> String {
    description.chars().take(TITLE_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_description_is_its_own_title() {
        assert_eq!(derive_title("Собрать шкаф"), "Собрать шкаф");
    }

    #[test]
    fn long_description_is_cut_at_fifty_chars() {
        let description = "a".repeat(120);
        let title = derive_title(&description);
        assert_eq!(title.chars().count(), 50);
    }

    #[test]
    fn cut_is_char_safe_for_cyrillic() {
        let description = "ф".repeat(120);
        let title = derive_title(&description);
        assert_eq!(title.chars().count(), 50);
    }

    #[test]
    fn create_request_defaults_photos_to_empty() {
        let req: CreateTaskRequest = serde_json::from_str(
            r#"{"category": "cleaning", "description": "Помыть окна в квартире",
                "address": "Москва", "scheduled_date": "2026-09-01"}"#,
        )
        .unwrap();
        assert!(req.photos.is_empty());
        assert!(req.price.is_none());
        assert_eq!(req.category, ServiceCategory::Cleaning);
    }

    #[test]
    fn update_request_with_no_fields_is_valid() {
        let req: UpdateTaskRequest = serde_json::from_str("{}").unwrap();
        assert!(req.category.is_none());
        assert!(req.description.is_none());
        assert!(req.photos.is_none());
    }

    #[test]
    fn status_parses_snake_case() {
        let q: TaskFilterQuery =
            serde_json::from_str(r#"{"status": "in_progress"}"#).unwrap();
        assert_eq!(q.status, Some(TaskStatus::InProgress));
    }
}
