//! Pagination primitives for list endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

// Query-string values arrive as strings when the params struct is flattened
// into a filter struct; deserialize through String to cope.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PaginationParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
}

impl PaginationParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

impl PaginationMeta {
    pub fn new(total: i64, params: &PaginationParams, returned: usize) -> Self {
        let offset = params.offset();
        Self {
            total,
            limit: params.limit(),
            offset,
            has_more: offset + (returned as i64) < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.limit(), 20);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_limit_is_clamped() {
        let params = PaginationParams {
            limit: Some(500),
            offset: Some(-3),
        };
        assert_eq!(params.limit(), 100);
        assert_eq!(params.offset(), 0);

        let params = PaginationParams {
            limit: Some(0),
            offset: None,
        };
        assert_eq!(params.limit(), 1);
    }

    #[test]
    fn test_meta_has_more() {
        let params = PaginationParams {
            limit: Some(10),
            offset: Some(0),
        };
        let meta = PaginationMeta::new(25, &params, 10);
        assert!(meta.has_more);

        let params = PaginationParams {
            limit: Some(10),
            offset: Some(20),
        };
        let meta = PaginationMeta::new(25, &params, 5);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_deserialize_from_strings() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"limit":"25","offset":"50"}"#).unwrap();
        assert_eq!(params.limit(), 25);
        assert_eq!(params.offset(), 50);

        let params: PaginationParams = serde_json::from_str(r#"{"limit":"","offset":""}"#).unwrap();
        assert_eq!(params.limit(), 20);
        assert_eq!(params.offset(), 0);

        let params: PaginationParams = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(params.limit(), 20);
    }
}
