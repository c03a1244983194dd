//! Verification Pipeline
//!
//! The three-stage state machine that annotates review findings with an
//! evidence-grounded confidence score:
//!
//! ```text
//! QuestionGeneration -> GroundedAnswering -> ConfidenceScoring -> Merged
//! ```
//!
//! Stages run strictly sequentially; each stage's batched call must
//! complete before the next begins. No stage is retried. A stage failure
//! aborts the whole verification with no partial results, so callers can
//! fall back to showing unverified findings instead of a partially
//! verified mix. The one deliberate exception is inside the answering
//! stage, where evidence-tool failures become tool output the model can
//! reason about.

use std::path::Path;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use groundcheck_core::tool::ToolContext;
use groundcheck_core::{CoreError, CoreResult, ReviewIssue, VerifiedIssue};
use groundcheck_llm::structured::{run_structured, StructuredRequest, ToolAccess};
use groundcheck_llm::{LlmProvider, UsageStats};
use groundcheck_tools::evidence_registry;

use crate::merger;
use crate::prompts;
use crate::schema::{AnswersOutput, QuestionsOutput, VerificationOutput};

/// Pipeline stages, in execution order. `Merged` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyStage {
    QuestionGeneration,
    GroundedAnswering,
    ConfidenceScoring,
    Merged,
}

impl std::fmt::Display for VerifyStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyStage::QuestionGeneration => write!(f, "question_generation"),
            VerifyStage::GroundedAnswering => write!(f, "grounded_answering"),
            VerifyStage::ConfidenceScoring => write!(f, "confidence_scoring"),
            VerifyStage::Merged => write!(f, "merged"),
        }
    }
}

/// Options for a verification run.
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// Maximum tool-invocation rounds per answering call
    pub max_tool_rounds: u32,
    /// Emit progress lines on stderr
    pub show_progress: bool,
    /// Cancellation, honored at stage boundaries and between tool rounds
    pub cancellation_token: CancellationToken,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            max_tool_rounds: 8,
            show_progress: false,
            cancellation_token: CancellationToken::new(),
        }
    }
}

fn enter_stage(stage: VerifyStage, session_id: &str, options: &VerifyOptions) -> CoreResult<()> {
    if options.cancellation_token.is_cancelled() {
        return Err(CoreError::Cancelled);
    }
    tracing::info!(session = session_id, stage = %stage, "entering verification stage");
    if options.show_progress {
        eprintln!("[groundcheck] stage {}", stage);
    }
    Ok(())
}

/// Run the full verification pipeline over `findings`.
///
/// `system_prompt` and `user_message` are the upstream review's prompt and
/// change context; they ground the stage prompts. Returns the findings in
/// their original order, each annotated with confidence and rationale,
/// together with the token usage accumulated across all stage calls.
pub async fn run_verification(
    provider: &dyn LlmProvider,
    findings: &[ReviewIssue],
    system_prompt: &str,
    user_message: &str,
    repo_path: &Path,
    base_ref: &str,
    options: &VerifyOptions,
) -> CoreResult<(Vec<VerifiedIssue>, UsageStats)> {
    if findings.is_empty() {
        return Ok((Vec::new(), UsageStats::default()));
    }

    let session_id = Uuid::new_v4().to_string();
    let mut usage = UsageStats::default();
    let registry = evidence_registry();
    let tool_ctx = ToolContext::new(session_id.clone(), repo_path, base_ref);

    // Stage 1: generate verification questions for every finding. No tools;
    // the questions come from the findings and the change context alone.
    enter_stage(VerifyStage::QuestionGeneration, &session_id, options)?;
    let (questions, stage_usage) = run_structured::<QuestionsOutput>(
        provider,
        StructuredRequest {
            system_prompt: prompts::questions_system_prompt(system_prompt),
            user_message: prompts::questions_user_message(findings, user_message)?,
            tools: None,
            max_tool_rounds: 0,
            cancellation_token: options.cancellation_token.clone(),
            show_progress: options.show_progress,
        },
    )
    .await?;
    usage.add(&stage_usage);
    questions.ensure_complete(findings.len())?;

    // Stage 2: answer the questions against the repository. The evidence
    // tools are available here and only here.
    enter_stage(VerifyStage::GroundedAnswering, &session_id, options)?;
    let (answers, stage_usage) = run_structured::<AnswersOutput>(
        provider,
        StructuredRequest {
            system_prompt: prompts::answers_system_prompt(),
            user_message: prompts::answers_user_message(findings, &questions, user_message)?,
            tools: Some(ToolAccess {
                registry: &registry,
                context: &tool_ctx,
            }),
            max_tool_rounds: options.max_tool_rounds,
            cancellation_token: options.cancellation_token.clone(),
            show_progress: options.show_progress,
        },
    )
    .await?;
    usage.add(&stage_usage);

    // Stage 3: score each finding against the gathered evidence. No tools.
    enter_stage(VerifyStage::ConfidenceScoring, &session_id, options)?;
    let (verification, stage_usage) = run_structured::<VerificationOutput>(
        provider,
        StructuredRequest {
            system_prompt: prompts::scoring_system_prompt(),
            user_message: prompts::scoring_user_message(findings, &answers)?,
            tools: None,
            max_tool_rounds: 0,
            cancellation_token: options.cancellation_token.clone(),
            show_progress: options.show_progress,
        },
    )
    .await?;
    usage.add(&stage_usage);
    verification.validate()?;

    let merged = merger::merge(findings, &verification.issues)?;
    tracing::info!(
        session = %session_id,
        stage = %VerifyStage::Merged,
        findings = merged.len(),
        "verification complete"
    );
    Ok((merged, usage))
}
