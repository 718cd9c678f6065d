use serde::Deserialize;

use crate::tasks::repo::ServiceCategory;

/// Create-or-replace payload: the category list fully describes the
/// performer's offer set after the call.
#[derive(Debug, Deserialize)]
pub struct ReplaceOffersRequest {
    pub categories: Vec<ServiceCategory>,
    pub description: Option<String>,
    pub hourly_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOfferRequest {
    pub description: Option<String>,
    pub hourly_rate: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_parse_from_snake_case() {
        let req: ReplaceOffersRequest = serde_json::from_str(
            r#"{"categories": ["computer_help", "cleaning"], "hourly_rate": 700.0}"#,
        )
        .unwrap();
        assert_eq!(
            req.categories,
            vec![ServiceCategory::ComputerHelp, ServiceCategory::Cleaning]
        );
        assert!(req.description.is_none());
    }

    #[test]
    fn unknown_category_is_rejected() {
        let parsed: Result<ReplaceOffersRequest, _> =
            serde_json::from_str(r#"{"categories": ["astrology"]}"#);
        assert!(parsed.is_err());
    }
}
