//! Query parameter parsing
//!
//! Parses raw query-string pairs into filter, sort, and pagination specs.
//! Two filter syntaxes and two sort syntaxes are accepted simultaneously:
//!
//! - `field__op=value` and `filter[field][op]=value`
//! - `sort=a,-b` and `sort[field]=asc|desc`
//!
//! Reserved keys (`sort`, `page`, `size`) never become filters, and
//! `sort[...]` keys are consumed by the sort parser only.

use crate::api::types::ApiError;
use crate::core::config::PaginationConfig;

use super::operators::FilterOp;
use super::types::{FilterSpec, FilterValue, PaginationRequest, SortDirection, SortSpec};

/// Keys claimed by sorting and pagination
const RESERVED_KEYS: &[&str] = &["sort", "page", "size"];

/// Check a field against an endpoint allow-list (`None` allows everything)
fn ensure_allowed(
    field: &str,
    allowed: Option<&[&str]>,
    operation: &str,
) -> Result<(), ApiError> {
    if let Some(allowed) = allowed
        && !allowed.contains(&field)
    {
        return Err(ApiError::validation(format!(
            "{} on field '{}' is not allowed. Allowed fields: {}",
            operation,
            field,
            allowed.join(", ")
        )));
    }
    Ok(())
}

/// Parse filter conditions from query pairs
///
/// Bracketed keys missing their closing `]` (e.g. `filter[name`) are
/// silently skipped rather than rejected; tightening this would break
/// requests that currently succeed.
pub fn parse_filters(
    pairs: &[(String, String)],
    allowed: Option<&[&str]>,
) -> Result<Vec<FilterSpec>, ApiError> {
    let mut filters = Vec::new();

    for (key, raw_value) in pairs {
        if RESERVED_KEYS.contains(&key.as_str()) || key.starts_with("sort[") {
            continue;
        }

        let (field, op_str) = if let Some(inner) = key.strip_prefix("filter[") {
            let Some(inner) = inner.strip_suffix(']') else {
                tracing::debug!(key = %key, "Skipping malformed filter key");
                continue;
            };
            match inner.split_once("][") {
                Some((field, op)) => (field, op),
                None => (inner, "=="),
            }
        } else {
            match key.split_once("__") {
                Some((field, op)) => (field, op),
                None => (key.as_str(), "=="),
            }
        };

        if field.is_empty() {
            tracing::debug!(key = %key, "Skipping filter key with empty field");
            continue;
        }

        ensure_allowed(field, allowed, "Filtering")?;
        let op = FilterOp::parse(op_str)?;

        let value = if op.is_unary() {
            FilterValue::None
        } else if op.takes_list() {
            if raw_value.is_empty() {
                FilterValue::List(Vec::new())
            } else {
                FilterValue::List(raw_value.split(',').map(str::to_string).collect())
            }
        } else {
            FilterValue::Scalar(raw_value.clone())
        };

        filters.push(FilterSpec {
            field: field.to_string(),
            op,
            value,
        });
    }

    Ok(filters)
}

/// Parse sort terms from query pairs
///
/// Terms from `sort=a,-b` come first, then `sort[field]=direction` keys
/// in their query-string order.
pub fn parse_sorts(
    pairs: &[(String, String)],
    allowed: Option<&[&str]>,
) -> Result<Vec<SortSpec>, ApiError> {
    let mut sorts = Vec::new();

    if let Some((_, value)) = pairs.iter().find(|(key, _)| key == "sort") {
        for term in value.split(',') {
            let term = term.trim();
            if term.is_empty() {
                continue;
            }

            let (field, direction) = match term.strip_prefix('-') {
                Some(field) => (field, SortDirection::Desc),
                None => (term, SortDirection::Asc),
            };

            ensure_allowed(field, allowed, "Sorting")?;
            sorts.push(SortSpec {
                field: field.to_string(),
                direction,
            });
        }
    }

    for (key, value) in pairs {
        let Some(inner) = key.strip_prefix("sort[") else {
            continue;
        };
        let Some(field) = inner.strip_suffix(']') else {
            tracing::debug!(key = %key, "Skipping malformed sort key");
            continue;
        };

        let direction = match value.to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => {
                return Err(ApiError::validation(format!(
                    "Invalid sort direction '{}'. Must be 'asc' or 'desc'",
                    value
                )));
            }
        };

        ensure_allowed(field, allowed, "Sorting")?;
        sorts.push(SortSpec {
            field: field.to_string(),
            direction,
        });
    }

    Ok(sorts)
}

/// Parse and validate pagination parameters
///
/// Out-of-range values are rejected, never clamped.
pub fn parse_pagination(
    pairs: &[(String, String)],
    config: &PaginationConfig,
) -> Result<PaginationRequest, ApiError> {
    let page = match pairs.iter().find(|(key, _)| key == "page") {
        Some((_, raw)) => raw.parse::<u32>().map_err(|_| {
            ApiError::validation(format!(
                "Invalid page parameter: '{}' is not a valid integer",
                raw
            ))
        })?,
        None => config.default_page,
    };

    if page < 1 {
        return Err(ApiError::validation("Page number must be greater than 0"));
    }

    let size = match pairs.iter().find(|(key, _)| key == "size") {
        Some((_, raw)) => raw.parse::<u32>().map_err(|_| {
            ApiError::validation(format!(
                "Invalid size parameter: '{}' is not a valid integer",
                raw
            ))
        })?,
        None => config.default_size,
    };

    if size < 1 {
        return Err(ApiError::validation("Page size must be greater than 0"));
    }

    if size > config.max_size {
        return Err(ApiError::validation(format!(
            "Page size cannot exceed {}",
            config.max_size
        )));
    }

    Ok(PaginationRequest { page, size })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(input: &[(&str, &str)]) -> Vec<(String, String)> {
        input
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const FIELDS: &[&str] = &["name", "price", "quantity", "category_id"];

    #[test]
    fn filters_double_underscore_syntax() {
        let parsed = parse_filters(&pairs(&[("price__gte", "10.50")]), Some(FIELDS)).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].field, "price");
        assert_eq!(parsed[0].op, FilterOp::Gte);
        assert_eq!(parsed[0].value, FilterValue::Scalar("10.50".to_string()));
    }

    #[test]
    fn filters_bare_key_defaults_to_equality() {
        let parsed = parse_filters(&pairs(&[("name", "Laptop")]), Some(FIELDS)).unwrap();
        assert_eq!(parsed[0].op, FilterOp::Eq);
        assert_eq!(parsed[0].value, FilterValue::Scalar("Laptop".to_string()));
    }

    #[test]
    fn filters_bracket_syntax() {
        let parsed =
            parse_filters(&pairs(&[("filter[name][like]", "top")]), Some(FIELDS)).unwrap();
        assert_eq!(parsed[0].field, "name");
        assert_eq!(parsed[0].op, FilterOp::Like);
    }

    #[test]
    fn filters_bracket_syntax_without_operator() {
        let parsed = parse_filters(&pairs(&[("filter[name]", "Mouse")]), Some(FIELDS)).unwrap();
        assert_eq!(parsed[0].field, "name");
        assert_eq!(parsed[0].op, FilterOp::Eq);
    }

    #[test]
    fn filters_malformed_bracket_key_is_skipped() {
        let parsed = parse_filters(&pairs(&[("filter[name", "Mouse")]), Some(FIELDS)).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn filters_both_syntaxes_mix() {
        let parsed = parse_filters(
            &pairs(&[("price__lt", "100"), ("filter[quantity][gte]", "5")]),
            Some(FIELDS),
        )
        .unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn filters_in_splits_on_commas() {
        let parsed =
            parse_filters(&pairs(&[("category_id__in", "1,2,3")]), Some(FIELDS)).unwrap();
        assert_eq!(
            parsed[0].value,
            FilterValue::List(vec!["1".to_string(), "2".to_string(), "3".to_string()])
        );
    }

    #[test]
    fn filters_in_empty_value_is_empty_list() {
        let parsed = parse_filters(&pairs(&[("category_id__in", "")]), Some(FIELDS)).unwrap();
        assert_eq!(parsed[0].value, FilterValue::List(Vec::new()));
    }

    #[test]
    fn filters_unary_ignores_value() {
        let parsed =
            parse_filters(&pairs(&[("category_id__is_null", "whatever")]), Some(FIELDS)).unwrap();
        assert_eq!(parsed[0].value, FilterValue::None);
    }

    #[test]
    fn filters_skip_reserved_and_sort_keys() {
        let parsed = parse_filters(
            &pairs(&[
                ("sort", "name"),
                ("page", "2"),
                ("size", "5"),
                ("sort[price]", "desc"),
                ("name", "Laptop"),
            ]),
            Some(FIELDS),
        )
        .unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].field, "name");
    }

    #[test]
    fn filters_disallowed_field_is_rejected() {
        let err = parse_filters(&pairs(&[("secret", "x")]), Some(FIELDS)).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Filtering on field 'secret' is not allowed"));
        assert!(message.contains("name, price, quantity, category_id"));
    }

    #[test]
    fn filters_no_allow_list_permits_any_field() {
        let parsed = parse_filters(&pairs(&[("anything", "x")]), None).unwrap();
        assert_eq!(parsed[0].field, "anything");
    }

    #[test]
    fn filters_unknown_operator_is_rejected() {
        let err = parse_filters(&pairs(&[("price__foo", "5")]), Some(FIELDS)).unwrap_err();
        assert!(err.to_string().contains("Unsupported operator 'foo'"));
    }

    #[test]
    fn sorts_comma_list_with_prefix() {
        let parsed = parse_sorts(&pairs(&[("sort", "name,-price")]), Some(FIELDS)).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].field, "name");
        assert_eq!(parsed[0].direction, SortDirection::Asc);
        assert_eq!(parsed[1].field, "price");
        assert_eq!(parsed[1].direction, SortDirection::Desc);
    }

    #[test]
    fn sorts_bracket_syntax() {
        let parsed = parse_sorts(
            &pairs(&[("sort[name]", "asc"), ("sort[price]", "DESC")]),
            Some(FIELDS),
        )
        .unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].direction, SortDirection::Desc);
    }

    #[test]
    fn sorts_mixed_syntaxes_keep_comma_terms_first() {
        let parsed = parse_sorts(
            &pairs(&[("sort[price]", "desc"), ("sort", "name")]),
            Some(FIELDS),
        )
        .unwrap();
        assert_eq!(parsed[0].field, "name");
        assert_eq!(parsed[1].field, "price");
    }

    #[test]
    fn sorts_invalid_direction_is_rejected() {
        let err = parse_sorts(&pairs(&[("sort[name]", "up")]), Some(FIELDS)).unwrap_err();
        assert!(
            err.to_string()
                .contains("Invalid sort direction 'up'. Must be 'asc' or 'desc'")
        );
    }

    #[test]
    fn sorts_disallowed_field_is_rejected() {
        let err = parse_sorts(&pairs(&[("sort", "secret")]), Some(FIELDS)).unwrap_err();
        assert!(err.to_string().contains("Sorting on field 'secret'"));
    }

    #[test]
    fn sorts_empty_terms_are_skipped() {
        let parsed = parse_sorts(&pairs(&[("sort", "name,,")]), Some(FIELDS)).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn pagination_defaults() {
        let request = parse_pagination(&pairs(&[]), &PaginationConfig::default()).unwrap();
        assert_eq!(request.page, 1);
        assert_eq!(request.size, 10);
    }

    #[test]
    fn pagination_explicit_values() {
        let request = parse_pagination(
            &pairs(&[("page", "3"), ("size", "25")]),
            &PaginationConfig::default(),
        )
        .unwrap();
        assert_eq!(request.page, 3);
        assert_eq!(request.size, 25);
    }

    #[test]
    fn pagination_rejects_non_integer_page() {
        let err =
            parse_pagination(&pairs(&[("page", "abc")]), &PaginationConfig::default()).unwrap_err();
        assert!(
            err.to_string()
                .contains("Invalid page parameter: 'abc' is not a valid integer")
        );
    }

    #[test]
    fn pagination_rejects_zero_page() {
        let err =
            parse_pagination(&pairs(&[("page", "0")]), &PaginationConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Page number must be greater than 0"));
    }

    #[test]
    fn pagination_rejects_negative_page() {
        // u32 parse fails on the sign, surfacing the integer message
        let err =
            parse_pagination(&pairs(&[("page", "-1")]), &PaginationConfig::default()).unwrap_err();
        assert!(err.to_string().contains("not a valid integer"));
    }

    #[test]
    fn pagination_rejects_zero_size() {
        let err =
            parse_pagination(&pairs(&[("size", "0")]), &PaginationConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Page size must be greater than 0"));
    }

    #[test]
    fn pagination_rejects_oversized_page() {
        let err =
            parse_pagination(&pairs(&[("size", "101")]), &PaginationConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Page size cannot exceed 100"));
    }

    #[test]
    fn pagination_accepts_max_size() {
        let request =
            parse_pagination(&pairs(&[("size", "100")]), &PaginationConfig::default()).unwrap();
        assert_eq!(request.size, 100);
    }
}
