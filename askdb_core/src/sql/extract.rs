//! Pulls a single candidate query out of free-form model output.
//!
//! Two response shapes are recognised, in order:
//!
//! 1. A fenced block opened with ```` ```sql ```` and closed with the next
//!    ```` ``` ````. Only the first such block is used.
//! 2. A bare statement: accumulation starts at the first line whose trimmed
//!    text begins with `SELECT` (any case) and stops at the first line that
//!    ends with `;`. Without a terminator the accumulated text is returned
//!    as a best-effort match.

/// Opening fence that marks a query block.
pub const OPEN_FENCE: &str = "```sql";
/// Closing fence for a query block.
pub const CLOSE_FENCE: &str = "```";

const READ_KEYWORD: &str = "SELECT";
const TERMINATOR: char = ';';

pub struct QueryExtractor;

impl QueryExtractor {
    pub fn extract(response: &str) -> Option<String> {
        if let Some(fenced) = Self::extract_fenced(response) {
            return Some(fenced);
        }
        Self::extract_statement(response)
    }

    /// Content between the first opening fence and the next closing fence.
    /// An unclosed fence yields `None` so the caller can fall back.
    pub fn extract_fenced(response: &str) -> Option<String> {
        let start = response.find(OPEN_FENCE)? + OPEN_FENCE.len();
        let rest = &response[start..];
        let end = rest.find(CLOSE_FENCE)?;
        Some(rest[..end].trim().to_string())
    }

    pub fn extract_statement(response: &str) -> Option<String> {
        let mut query = String::new();
        let mut in_query = false;

        for line in response.split('\n') {
            let trimmed = line.trim();
            if !in_query && starts_with_keyword(trimmed) {
                in_query = true;
            }
            if in_query {
                query.push_str(line);
                query.push(' ');
                if trimmed.ends_with(TERMINATOR) {
                    return Some(query.trim().to_string());
                }
            }
        }

        if in_query {
            Some(query.trim().to_string())
        } else {
            None
        }
    }
}

fn starts_with_keyword(line: &str) -> bool {
    line.get(..READ_KEYWORD.len())
        .map(|head| head.eq_ignore_ascii_case(READ_KEYWORD))
        .unwrap_or(false)
}
