pub mod question_prompt;
