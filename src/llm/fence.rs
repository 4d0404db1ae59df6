//! Markdown code-fence stripping.

const FENCE: &str = "```";

/// Extract the body of the first fenced block in `text`.
///
/// With an opening and a closing fence present, returns the text strictly
/// between them with a leading language tag (`sql`, `SQL`, `postgresql`, ...)
/// removed. Without a complete pair, returns the trimmed input unchanged.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();

    let Some(open) = trimmed.find(FENCE) else {
        return trimmed.to_string();
    };
    let after_open = &trimmed[open + FENCE.len()..];
    let Some(close) = after_open.find(FENCE) else {
        return trimmed.to_string();
    };

    drop_language_tag(&after_open[..close]).trim().to_string()
}

/// The info string is whatever directly follows the opening fence on the same
/// line. A single word there is a language tag, not SQL. A `sql` tag may also
/// share its line with the start of the query.
fn drop_language_tag(body: &str) -> &str {
    let (first_line, rest) = match body.find('\n') {
        Some(idx) => (&body[..idx], &body[idx + 1..]),
        None => (body, ""),
    };

    let tag = first_line.trim();
    if tag.is_empty() || (!rest.is_empty() && is_language_tag(tag)) {
        return rest;
    }
    // "```sql SELECT *\nFROM ...```", "```sql SELECT 1```" or "```SELECT 1```"
    strip_sql_prefix(body)
}

fn is_language_tag(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        && !s.eq_ignore_ascii_case("select")
        && !s.eq_ignore_ascii_case("with")
}

fn strip_sql_prefix(line: &str) -> &str {
    let trimmed = line.trim_start();
    match trimmed.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("sql") => {
            let rest = &trimmed[3..];
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                rest
            } else {
                trimmed
            }
        }
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_sql_fence() {
        assert_eq!(strip_code_fence("```sql\nSELECT 1;\n```"), "SELECT 1;");
    }

    #[test]
    fn test_plain_text_passes_through_trimmed() {
        assert_eq!(strip_code_fence("SELECT 1;"), "SELECT 1;");
        assert_eq!(strip_code_fence("  SELECT 1;\n"), "SELECT 1;");
    }

    #[test]
    fn test_fence_without_language_tag() {
        assert_eq!(
            strip_code_fence("```\nSELECT * FROM \"Vendor\";\n```"),
            "SELECT * FROM \"Vendor\";"
        );
    }

    #[test]
    fn test_uppercase_and_other_tags() {
        assert_eq!(strip_code_fence("```SQL\nSELECT 2;\n```"), "SELECT 2;");
        assert_eq!(strip_code_fence("```postgresql\nSELECT 3;\n```"), "SELECT 3;");
    }

    #[test]
    fn test_surrounding_prose_is_dropped() {
        let text = "Here is your query:\n```sql\nSELECT COUNT(*) FROM \"Invoice\";\n```\nIt counts invoices.";
        assert_eq!(strip_code_fence(text), "SELECT COUNT(*) FROM \"Invoice\";");
    }

    #[test]
    fn test_only_first_block_is_used() {
        let text = "```sql\nSELECT 1;\n```\nor\n```sql\nSELECT 2;\n```";
        assert_eq!(strip_code_fence(text), "SELECT 1;");
    }

    #[test]
    fn test_unterminated_fence_passes_through() {
        assert_eq!(strip_code_fence("```sql\nSELECT 1;"), "```sql\nSELECT 1;");
    }

    #[test]
    fn test_single_line_block() {
        assert_eq!(strip_code_fence("```sql SELECT 1;```"), "SELECT 1;");
        assert_eq!(strip_code_fence("```SELECT 1;```"), "SELECT 1;");
    }

    #[test]
    fn test_tag_sharing_line_with_multiline_query() {
        assert_eq!(
            strip_code_fence("```sql SELECT *\nFROM \"Vendor\";\n```"),
            "SELECT *\nFROM \"Vendor\";"
        );
        assert_eq!(
            strip_code_fence("```SQL  SELECT id\nFROM \"Invoice\"\nWHERE paid;```"),
            "SELECT id\nFROM \"Invoice\"\nWHERE paid;"
        );
    }

    #[test]
    fn test_sql_prefixed_identifier_is_not_a_tag() {
        assert_eq!(
            strip_code_fence("```sqlite_master_count\n```"),
            "sqlite_master_count"
        );
    }

    #[test]
    fn test_sql_on_first_line_is_kept() {
        assert_eq!(
            strip_code_fence("```SELECT id\nFROM \"Vendor\";\n```"),
            "SELECT id\nFROM \"Vendor\";"
        );
    }

    #[test]
    fn test_multiline_query_preserved() {
        let text = "```sql\nSELECT v.\"name\"\nFROM \"Vendor\" v\nORDER BY 1;\n```";
        assert_eq!(
            strip_code_fence(text),
            "SELECT v.\"name\"\nFROM \"Vendor\" v\nORDER BY 1;"
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(strip_code_fence(""), "");
        assert_eq!(strip_code_fence("   "), "");
        assert_eq!(strip_code_fence("```sql\n```"), "");
    }
}
