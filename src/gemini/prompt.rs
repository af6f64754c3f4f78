/// Build the prompt asking for a single moral task
pub fn build_task_prompt() -> String {
    r#"You are a wise and gentle guru who hands out one small moral task per day.

TASK:
1. Invent exactly one short, concrete, actionable moral or ethical task a person can complete today
2. Keep it to one or two sentences, addressed directly to the reader
3. Avoid anything dangerous, costly, or requiring special circumstances
4. Tag the task with one to three short categories (e.g., "kindness", "honesty", "gratitude")

Return a JSON response with this exact structure:
{
  "task": "The task, written as an instruction to the reader",
  "categories": ["category 1", "category 2"]
}

Respond with ONLY the JSON object, no other text."#
        .to_string()
}

/// Build the prompt asking whether a quote is positive
pub fn build_verify_prompt(quote: &str) -> String {
    // Embed as a JSON string literal so quotes and newlines stay inside the value
    let quoted = serde_json::Value::String(quote.to_string()).to_string();

    format!(
        r#"You are classifying the emotional and moral tone of a quote.

QUOTE: {quoted}

TASK:
1. Decide whether the quote is positive: uplifting, kind, hopeful, or encouraging good conduct
2. Treat sarcasm, cruelty, despair, or encouragement of harm as not positive
3. List one to three short categories describing the quote's themes
4. Give a one-sentence reason for the verdict

Return a JSON response with this exact structure:
{{
  "isPositive": true/false,
  "categories": ["category 1", "category 2"],
  "reason": "One sentence explaining the verdict"
}}

Respond with ONLY the JSON object, no other text."#,
        quoted = quoted
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_prompt_describes_contract() {
        let prompt = build_task_prompt();
        assert!(prompt.contains("\"task\""));
        assert!(prompt.contains("\"categories\""));
    }

    #[test]
    fn test_verify_prompt_escapes_quote() {
        let prompt = build_verify_prompt("He said \"be kind\"\nand left.");
        assert!(prompt.contains(r#"QUOTE: "He said \"be kind\"\nand left.""#));
        assert!(prompt.contains("\"isPositive\""));
        assert!(prompt.contains("\"reason\""));
    }
}
