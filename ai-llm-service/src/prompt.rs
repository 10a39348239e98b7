//! Prompt pieces shared by the free-text (chat) backends.

/// System instruction sent with every question.
pub const DEFAULT_SYSTEM: &str = "You are a helpful assistant.";

/// User message that carries the context window.
pub fn context_message(context: &str) -> String {
    format!("Context: {context}")
}

/// User message that carries the question.
pub fn question_message(question: &str) -> String {
    format!("Question: {question}")
}

/// Single-prompt form for providers without a messages array.
pub fn single_prompt(question: &str, context: &str) -> String {
    format!(
        "{}\n\n{}",
        context_message(context),
        question_message(question)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_prompt_puts_context_first() {
        let p = single_prompt("What are cats?", "Cats are mammals");
        assert_eq!(p, "Context: Cats are mammals\n\nQuestion: What are cats?");
    }
}
