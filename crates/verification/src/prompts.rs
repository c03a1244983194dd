//! Stage Prompts
//!
//! Prompt builders for the three verification stages. Each system prompt
//! states the stage's task and the exact JSON shape it must return; each
//! user message carries the findings (and prior stage output) as
//! pretty-printed JSON alongside the original review context.

use groundcheck_core::{CoreResult, ReviewIssue};

use crate::schema::{AnswersOutput, QuestionsOutput};

/// System prompt for the question generation stage.
pub fn questions_system_prompt(review_system_prompt: &str) -> String {
    format!(
        r#"You are verifying findings from an automated code review. For every finding, write the concrete questions whose answers would confirm or refute it. Good questions point at specific code: does a guard exist, is a value checked before use, does the cited line still exist.

You must cover every finding. Respond with JSON in this exact shape:
{{
  "issues": [
    {{
      "issue_id": 0,
      "questions": ["Is the variable checked for null before line 10?"]
    }}
  ]
}}

`issue_id` is the zero-based index of the finding in the list you are given.

The findings were produced under these review instructions:

{review_system_prompt}"#
    )
}

/// User message for the question generation stage.
pub fn questions_user_message(
    findings: &[ReviewIssue],
    review_context: &str,
) -> CoreResult<String> {
    let findings_json = serde_json::to_string_pretty(findings)?;
    Ok(format!(
        "## Findings to verify\n\n{findings_json}\n\n## Change context\n\n{review_context}"
    ))
}

/// System prompt for the grounded answering stage.
pub fn answers_system_prompt() -> String {
    r#"You are verifying findings from an automated code review. Answer each verification question using the evidence tools available to you: list the changed files, read the relevant line ranges, and search the repository. Ground every answer in what the tools actually return. If a tool fails or the evidence is missing, say so in the answer instead of guessing.

Respond with JSON in this exact shape:
{
  "issues": [
    {
      "issue_id": 0,
      "answers": [
        {
          "question": "Is the variable checked for null before line 10?",
          "answer": "No. Lines 5-10 of main.py contain no null check."
        }
      ]
    }
  ]
}"#
    .to_string()
}

/// User message for the grounded answering stage.
pub fn answers_user_message(
    findings: &[ReviewIssue],
    questions: &QuestionsOutput,
    review_context: &str,
) -> CoreResult<String> {
    let findings_json = serde_json::to_string_pretty(findings)?;
    let questions_json = serde_json::to_string_pretty(questions)?;
    Ok(format!(
        "## Findings\n\n{findings_json}\n\n## Questions to answer\n\n{questions_json}\n\n## Change context\n\n{review_context}"
    ))
}

/// System prompt for the confidence scoring stage.
pub fn scoring_system_prompt() -> String {
    r#"You are scoring findings from an automated code review against the evidence gathered for them. For each finding, assign a confidence from 0 to 10 that the finding is real and actionable: 0 means the evidence refutes it, 10 means the evidence confirms it beyond doubt. Answers that report missing or failed evidence should lower confidence, not raise it.

Respond with JSON in this exact shape:
{
  "issues": [
    {
      "issue_id": 0,
      "confidence": 9,
      "rationale": "The cited lines contain no null check; the finding is confirmed."
    }
  ]
}

Cover every finding. Confidence must be an integer between 0 and 10 inclusive."#
        .to_string()
}

/// User message for the confidence scoring stage.
pub fn scoring_user_message(
    findings: &[ReviewIssue],
    answers: &AnswersOutput,
) -> CoreResult<String> {
    let findings_json = serde_json::to_string_pretty(findings)?;
    let answers_json = serde_json::to_string_pretty(answers)?;
    Ok(format!(
        "## Findings\n\n{findings_json}\n\n## Evidence gathered\n\n{answers_json}"
    ))
}
