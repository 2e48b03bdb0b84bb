//! Read-only safety policy for candidate queries.
//!
//! The check is a plain substring match over the upper-cased text, not a
//! parse. A denylisted word inside a string literal, a comment or an
//! identifier such as `created_at` also rejects the query.

use thiserror::Error;

const READ_KEYWORD: &str = "SELECT";

/// Keywords whose presence anywhere in a candidate rejects it. `EXEC` also
/// covers `EXECUTE`.
pub const DENYLIST: &[&str] = &[
    "DROP", "DELETE", "INSERT", "UPDATE", "ALTER", "CREATE", "TRUNCATE", "EXEC",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("query is empty")]
    Empty,

    #[error("query does not start with SELECT")]
    NotARead,

    #[error("query contains forbidden keyword {0}")]
    Denylisted(&'static str),
}

pub struct QueryValidator;

impl QueryValidator {
    pub fn validate(candidate: &str) -> bool {
        Self::check(candidate).is_ok()
    }

    pub fn check(candidate: &str) -> Result<(), Rejection> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return Err(Rejection::Empty);
        }

        let upper = trimmed.to_uppercase();
        if !upper.starts_with(READ_KEYWORD) {
            return Err(Rejection::NotARead);
        }

        match DENYLIST.iter().find(|keyword| upper.contains(*keyword)) {
            Some(keyword) => Err(Rejection::Denylisted(keyword)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_select() {
        assert!(QueryValidator::validate("SELECT name FROM players LIMIT 5;"));
        assert!(QueryValidator::validate("  select * from plays where week = 3"));
    }

    #[test]
    fn test_rejects_empty_and_whitespace() {
        assert_eq!(QueryValidator::check(""), Err(Rejection::Empty));
        assert_eq!(QueryValidator::check(" \n\t "), Err(Rejection::Empty));
    }

    #[test]
    fn test_rejects_non_select_statements() {
        assert_eq!(
            QueryValidator::check("WITH t AS (SELECT 1) SELECT * FROM t"),
            Err(Rejection::NotARead)
        );
        assert_eq!(QueryValidator::check("PRAGMA table_info(plays)"), Err(Rejection::NotARead));
    }

    #[test]
    fn test_rejects_denylisted_keyword_after_select() {
        assert_eq!(
            QueryValidator::check("SELECT * FROM users; DROP TABLE users;"),
            Err(Rejection::Denylisted("DROP"))
        );
        assert_eq!(
            QueryValidator::check("select 1; delete from users"),
            Err(Rejection::Denylisted("DELETE"))
        );
        assert_eq!(
            QueryValidator::check("SELECT 1; EXECUTE sp_who"),
            Err(Rejection::Denylisted("EXEC"))
        );
    }

    #[test]
    fn test_substring_match_is_over_broad() {
        assert!(!QueryValidator::validate("SELECT created_at FROM users"));
        assert!(!QueryValidator::validate("SELECT * FROM plays WHERE desc LIKE '%dropped%'"));
    }
}
