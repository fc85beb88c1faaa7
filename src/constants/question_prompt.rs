pub const QUESTION_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that generates multiple-choice questions based on given content.";

/// Builds the user message for a generation call. The output-format directive
/// is part of the message so any OpenAI-compatible model can follow it.
pub fn question_user_prompt(question_count: u32, content: &str) -> String {
    format!(
        "Generate {question_count} multiple-choice questions based on the following content. \
         Each question should have 4 options. Format the output as a JSON array of objects, \
         where each object represents a question with 'text', 'options' (array of strings), \
         and 'correctAnswer' (index of the correct option) properties: {content}"
    )
}
