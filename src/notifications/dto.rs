use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

impl ListQuery {
    /// Boundary check: a non-positive limit is malformed input, not a
    /// store error.
    pub fn validated_limit(&self) -> Result<i64, ApiError> {
        if self.limit < 1 {
            return Err(ApiError::Validation("limit must be positive".into()));
        }
        Ok(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_to_fifty() {
        let q: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.limit, 50);
        assert_eq!(q.validated_limit().unwrap(), 50);
    }

    #[test]
    fn explicit_limit_wins() {
        let q: ListQuery = serde_json::from_str(r#"{"limit": 10}"#).unwrap();
        assert_eq!(q.validated_limit().unwrap(), 10);
    }

    #[test]
    fn non_positive_limit_is_a_validation_error() {
        for bad in [r#"{"limit": 0}"#, r#"{"limit": -5}"#] {
            let q: ListQuery = serde_json::from_str(bad).unwrap();
            assert!(matches!(
                q.validated_limit(),
                Err(ApiError::Validation(_))
            ));
        }
    }
}
