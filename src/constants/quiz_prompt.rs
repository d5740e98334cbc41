pub const QUIZ_SYSTEM_PROMPT: &str = "You are a quiz generation agent. You turn a lecture or video transcript into a multiple-choice quiz for downstream machine consumption.

### Core Objectives:

1. **Grounded Questions:** Every question must be answerable from the transcript alone. Do not introduce outside knowledge or unsupported inferences.
2. **Exact Shape:** Produce exactly the number of questions requested, each with exactly 4 distinct answer options and exactly one correct answer.
3. **Plausible Distractors:** Incorrect options must be plausible given the transcript but clearly wrong to an attentive viewer.
4. **Output Discipline:** Return a single JSON object and nothing else. No markdown fences, no prose, no commentary, no trailing explanations.

### Accuracy Requirements:

- Preserve technical terminology, numerical data and proper nouns exactly as they appear in the transcript.
- The correct answer must appear verbatim in the question's options list.
- Never repeat an option within a question, including variants differing only in letter case or spacing.";

/// User-turn prompt for one synthesis call. The embedded JSON Schema is the
/// machine-checkable version of the contract in the system prompt.
pub fn quiz_user_prompt(transcript: &str, num_questions: usize, schema_json: &str) -> String {
    format!(
        r#"Based on the following transcript, generate a quiz in valid JSON format.

The quiz must follow this exact structure:

{{
  "title": "Create a concise quiz title based on the topic of the transcript.",
  "description": "Summarize the transcript in no more than 150 characters. Do not include any quiz questions or answers.",
  "questions": [
    {{
      "question_title": "The question goes here.",
      "question_options": ["Option A", "Option B", "Option C", "Option D"],
      "answer": "The correct answer from the above options"
    }}
  ]
}}

The output must conform to this JSON Schema:

{schema}

Requirements:
- Exactly {count} questions in total.
- Each question must have exactly 4 distinct answer options.
- Only one correct answer per question, and it must be present in "question_options".
- The output must be valid JSON and parsable as-is. Do NOT include markdown fences or explanations.

Transcript:
"""{transcript}""""#,
        schema = schema_json,
        count = num_questions,
        transcript = transcript,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_embeds_inputs() {
        let prompt = quiz_user_prompt("the transcript body", 10, "{\"type\":\"object\"}");

        assert!(prompt.contains("the transcript body"));
        assert!(prompt.contains("Exactly 10 questions"));
        assert!(prompt.contains("{\"type\":\"object\"}"));
    }
}
