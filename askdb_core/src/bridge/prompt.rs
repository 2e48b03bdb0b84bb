const SYSTEM_PROMPT: &str = "You are an expert data analyst assistant and SQLite engineer. \
Convert natural language questions about the dataset described below into a single \
executable SQLite query.

**Database Schema:**
{schema}

**Rules:**
1. Only use tables and columns that exist in the schema above.
2. Produce exactly one read-only SELECT statement.
3. Use LIKE with wildcards for case-insensitive name matching.
4. Always use LIMIT for large result sets (default 10 unless specified).

**Output:**
Return only the executable SQL query wrapped in ```sql ``` blocks.";

pub fn system_prompt(schema: &str) -> String {
    SYSTEM_PROMPT.replace("{schema}", schema.trim_end())
}

/// Full prompt sent to a backend for one question.
pub fn build_prompt(schema: &str, question: &str) -> String {
    format!("{}\n\nUser query: {}\nResponse:", system_prompt(schema), question)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_schema_and_question() {
        let prompt = build_prompt("TABLE plays (season Integer)\n", "How many plays in 2024?");
        assert!(prompt.contains("TABLE plays (season Integer)\n\n**Rules:**"));
        assert!(prompt.ends_with("User query: How many plays in 2024?\nResponse:"));
        assert!(!prompt.contains("{schema}"));
    }
}
