//! Result verification: decide the overall status from the step results and
//! have the model turn the successful payloads into a readable report.

pub mod local;
pub mod prompt;
pub mod types;

pub use local::format_locally;
pub use types::{FormattedResult, ReportStatus, VerificationReport};

use crate::config::LlmErrorPolicy;
use crate::error::VerifyError;
use crate::executor::StepResult;
use crate::llm::LlmClient;
use prompt::{VERIFIER_SYSTEM_PROMPT, build_verification_prompt};

const ALL_STEPS_FAILED: &str = "All steps failed";

pub struct Verifier {
    llm: LlmClient,
    temperature: f64,
    on_llm_error: LlmErrorPolicy,
}

impl Verifier {
    pub fn new(llm: LlmClient, temperature: f64, on_llm_error: LlmErrorPolicy) -> Self {
        Self {
            llm,
            temperature,
            on_llm_error,
        }
    }

    /// Build the final report for `task`.
    ///
    /// When every step failed the report is `failed` with no formatted result
    /// and the model is not called. Otherwise the status is computed here and
    /// the model only formats; its failure is handled per the configured
    /// [`LlmErrorPolicy`].
    pub async fn verify_and_format(
        &self,
        task: &str,
        results: &[StepResult],
    ) -> Result<VerificationReport, VerifyError> {
        let failed_steps: Vec<StepResult> =
            results.iter().filter(|r| !r.success).cloned().collect();
        let succeeded = results.len() - failed_steps.len();
        let status = ReportStatus::from_counts(succeeded, failed_steps.len());

        if status == ReportStatus::Failed {
            tracing::warn!(failed = failed_steps.len(), "All steps failed, skipping formatting");
            return Ok(VerificationReport {
                status,
                task: task.to_string(),
                error: Some(ALL_STEPS_FAILED.to_string()),
                failed_steps,
                formatted_result: None,
            });
        }

        let prompt = build_verification_prompt(task, results);
        tracing::debug!(%prompt, "Verification prompt");

        let formatted = match self
            .llm
            .generate_json(VERIFIER_SYSTEM_PROMPT, &prompt, self.temperature)
            .await
        {
            Ok(raw) => FormattedResult::from_map(raw),
            Err(e) => match self.on_llm_error {
                LlmErrorPolicy::Fallback => {
                    tracing::warn!(error = %e, "Result formatting failed, formatting locally");
                    format_locally(results, &format!("{e:#}"))
                }
                LlmErrorPolicy::Propagate => {
                    return Err(VerifyError::Formatting(format!("{e:#}")));
                }
            },
        };

        tracing::info!(%status, failed = failed_steps.len(), "Verification complete");
        Ok(VerificationReport {
            status,
            task: task.to_string(),
            error: None,
            failed_steps,
            formatted_result: Some(formatted),
        })
    }
}
