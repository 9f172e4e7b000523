//! SQL fragment composition
//!
//! Builds WHERE and ORDER BY clauses from validated filter and sort specs.
//! Column names are never interpolated from user input; every field is
//! resolved against an enumerated column table first, and values travel
//! as positional placeholders.

use crate::api::types::ApiError;
use crate::utils::sql::escape_like_pattern;

use super::operators::FilterOp;
use super::types::{FilterSpec, FilterValue, SortSpec};

/// Enumerated column table for one SQL table
///
/// The column list is the single source of truth for which identifiers may
/// appear in generated SQL.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub table: &'static str,
    pub columns: &'static [&'static str],
}

impl TableSchema {
    /// Resolve a field name to its static column identifier
    pub fn column(&self, field: &str) -> Option<&'static str> {
        self.columns.iter().find(|c| **c == field).copied()
    }
}

/// Positional bind values accumulated while building a clause
#[derive(Debug, Default)]
pub struct SqlParams {
    pub values: Vec<String>,
}

fn resolve_column(schema: &TableSchema, field: &str) -> Result<&'static str, ApiError> {
    schema.column(field).ok_or_else(|| {
        ApiError::validation(format!(
            "Field '{}' does not exist on table '{}'",
            field, schema.table
        ))
    })
}

fn scalar_value<'a>(spec: &'a FilterSpec) -> Result<&'a str, ApiError> {
    match &spec.value {
        FilterValue::Scalar(v) => Ok(v),
        _ => Err(ApiError::validation(format!(
            "Missing value for operator '{}' on field '{}'",
            spec.op.as_str(),
            spec.field
        ))),
    }
}

fn list_value<'a>(spec: &'a FilterSpec) -> Result<&'a [String], ApiError> {
    match &spec.value {
        FilterValue::List(v) => Ok(v),
        _ => Err(ApiError::validation(format!(
            "Missing value for operator '{}' on field '{}'",
            spec.op.as_str(),
            spec.field
        ))),
    }
}

/// Compose a WHERE clause from filter specs
///
/// Returns an empty string when there are no filters, otherwise a leading
/// `" WHERE ..."` fragment with conditions joined by AND. Bind values are
/// appended to `params` in placeholder order.
pub fn build_where_clause(
    schema: &TableSchema,
    filters: &[FilterSpec],
    params: &mut SqlParams,
) -> Result<String, ApiError> {
    if filters.is_empty() {
        return Ok(String::new());
    }

    let mut conditions = Vec::with_capacity(filters.len());
    for spec in filters {
        let column = resolve_column(schema, &spec.field)?;

        if let Some(cmp) = spec.op.comparison_sql() {
            params.values.push(scalar_value(spec)?.to_string());
            conditions.push(format!("{} {} ?", column, cmp));
            continue;
        }

        match spec.op {
            FilterOp::Like => {
                let value = scalar_value(spec)?;
                params
                    .values
                    .push(format!("%{}%", escape_like_pattern(value)));
                conditions.push(format!("{} LIKE ? ESCAPE '\\'", column));
            }
            FilterOp::Ilike => {
                let value = scalar_value(spec)?;
                params
                    .values
                    .push(format!("%{}%", escape_like_pattern(&value.to_lowercase())));
                conditions.push(format!("LOWER({}) LIKE ? ESCAPE '\\'", column));
            }
            FilterOp::In | FilterOp::NotIn => {
                let values = list_value(spec)?;
                if values.is_empty() {
                    // Empty membership lists short-circuit: nothing is in the
                    // empty set, everything is outside it.
                    conditions.push(if spec.op == FilterOp::In {
                        "1=0".to_string()
                    } else {
                        "1=1".to_string()
                    });
                } else {
                    let placeholders = vec!["?"; values.len()].join(", ");
                    params.values.extend(values.iter().cloned());
                    let keyword = if spec.op == FilterOp::In {
                        "IN"
                    } else {
                        "NOT IN"
                    };
                    conditions.push(format!("{} {} ({})", column, keyword, placeholders));
                }
            }
            FilterOp::IsNull => conditions.push(format!("{} IS NULL", column)),
            FilterOp::IsNotNull => conditions.push(format!("{} IS NOT NULL", column)),
            _ => unreachable!("binary comparisons handled above"),
        }
    }

    Ok(format!(" WHERE {}", conditions.join(" AND ")))
}

/// Compose an ORDER BY clause from sort specs
///
/// Returns an empty string when there are no sorts. No implicit tie-break
/// column is appended; callers that need stable ordering add one explicitly.
pub fn build_order_clause(schema: &TableSchema, sorts: &[SortSpec]) -> Result<String, ApiError> {
    if sorts.is_empty() {
        return Ok(String::new());
    }

    let mut terms = Vec::with_capacity(sorts.len());
    for spec in sorts {
        let column = resolve_column(schema, &spec.field)?;
        terms.push(format!("{} {}", column, spec.direction.as_sql()));
    }

    Ok(format!(" ORDER BY {}", terms.join(", ")))
}
