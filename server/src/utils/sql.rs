//! SQL utility functions

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// Substring searches embed user text inside a LIKE pattern, so the
/// text's own wildcards must be neutralized first. Pair the result
/// with `ESCAPE '\'` in the query.
///
/// # Example
///
/// ```
/// use stockroom_server::utils::sql::escape_like_pattern;
///
/// let user_input = "50% off_sale";
/// let pattern = format!("%{}%", escape_like_pattern(user_input));
/// assert_eq!(pattern, "%50\\% off\\_sale%");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
