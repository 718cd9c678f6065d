use serde::Deserialize;

use crate::responses::repo::ResponseStatus;

#[derive(Debug, Deserialize)]
pub struct SubmitResponseRequest {
    pub offer_price: f64,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ResponseStatus,
}

const SNIPPET_CHARS: usize = 30;

/// Short task reference embedded in notification texts.
pub fn task_snippet(description: &str) -> String {
    let head: String = description.chars().take(SNIPPET_CHARS).collect();
    format!("\"{head}...\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_truncates_long_descriptions() {
        let long = "собрать кухонный гарнитур из сорока двух модулей";
        let snippet = task_snippet(long);
        // 30 chars + quotes + ellipsis
        assert_eq!(snippet.chars().count(), 30 + 5);
        assert!(snippet.starts_with('"'));
        assert!(snippet.ends_with("...\""));
    }

    #[test]
    fn snippet_keeps_short_descriptions_whole() {
        assert_eq!(task_snippet("помыть окна"), "\"помыть окна...\"");
    }

    #[test]
    fn submit_request_message_is_optional() {
        let req: SubmitResponseRequest =
            serde_json::from_str(r#"{"offer_price": 500.0}"#).unwrap();
        assert_eq!(req.offer_price, 500.0);
        assert!(req.message.is_none());
    }
}
