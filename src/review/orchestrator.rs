use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::config::ReviewConfig;
use crate::error::Result;
use crate::llm::parse_review_score;
use crate::llm::prompts::EMPTY_REVIEW_MARKER;
use crate::llm::{ChatCompletion, CompletionRequest, PromptKind};
use crate::models::{RepoRef, ReviewOutcome};
use crate::repo::RepositoryClient;

/// Drives one review: fetch the diff, run each enabled pass, write results back.
pub struct ReviewOrchestrator {
    repository: Box<dyn RepositoryClient>,
    llm: Box<dyn ChatCompletion>,
    config: ReviewConfig,
}

impl ReviewOrchestrator {
    pub fn new(
        repository: Box<dyn RepositoryClient>,
        llm: impl ChatCompletion + 'static,
        config: ReviewConfig,
    ) -> Self {
        Self {
            repository,
            llm: Box::new(llm),
            config,
        }
    }

    /// Only a failed diff fetch is an error; failed passes and write-backs
    /// are logged and reflected in the returned outcome.
    pub async fn run(&self, repo: &RepoRef, pull_request_id: u64) -> Result<ReviewOutcome> {
        // Step 1: Fetch the diff
        tracing::info!(
            "Fetching changes for {} pull request {}#{}...",
            self.repository.name(),
            repo,
            pull_request_id
        );
        let diff = match self.repository.fetch_diff(repo, pull_request_id).await {
            Ok(diff) => diff,
            Err(e) => {
                tracing::error!("Failed to retrieve changes: {}", e);
                return Err(e);
            }
        };
        tracing::info!("Fetched diff ({} bytes), analyzing code changes...", diff.len());

        let mut outcome = ReviewOutcome::default();

        // Step 2: Summary into the description
        if let Some(summary) = self.analyze(PromptKind::Summary, &diff).await {
            let result = self
                .repository
                .append_description(repo, pull_request_id, &summary, Some(&self.config.anchors))
                .await;
            outcome.description_updated = log_write(result, "description");
        }

        // Step 3: Review feedback
        if self.config.review {
            if let Some(review) = self.analyze(PromptKind::Review, &diff).await {
                if review.trim() == EMPTY_REVIEW_MARKER {
                    tracing::info!("No bugs or critical issues found, skipping review comment");
                } else {
                    let result = self.repository.post_comment(repo, pull_request_id, &review).await;
                    outcome.review_posted = log_write(result, "review comment");
                }
            }
        }

        // Step 4: Missing code comments
        if self.config.code_comments {
            if let Some(comments) = self.analyze(PromptKind::CodeComments, &diff).await {
                let result = self.repository.post_comment(repo, pull_request_id, &comments).await;
                outcome.code_comments_posted = log_write(result, "code comments");
            }
        }

        // Step 5: Structured score
        if self.config.score {
            if let Some(answer) = self.analyze(PromptKind::Score, &diff).await {
                match parse_review_score(&answer) {
                    Ok(score) => {
                        tracing::info!("Review score: {}/10", score.score);
                        let result = self
                            .repository
                            .post_comment(repo, pull_request_id, &score.to_markdown())
                            .await;
                        log_write(result, "score comment");
                        outcome.score = Some(score);
                    }
                    Err(e) => tracing::warn!("Discarding score answer: {}", e),
                }
            }
        }

        Ok(outcome)
    }

    async fn analyze(&self, kind: PromptKind, diff: &str) -> Option<String> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            temperature: kind.temperature(),
            prompt: kind.render(diff),
            json_output: kind.wants_json(),
        };

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Waiting for {} {}...", self.llm.name(), kind.label()));
        spinner.enable_steady_tick(Duration::from_millis(120));

        let result = self.llm.complete(request).await;
        spinner.finish_and_clear();

        match result {
            Ok(text) => {
                tracing::debug!("{} pass returned {} chars", kind.label(), text.len());
                Some(text)
            }
            Err(e) => {
                tracing::warn!("Skipping {} pass: {}", kind.label(), e);
                None
            }
        }
    }
}

fn log_write(result: Result<()>, what: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Failed to write {}: {}", what, e);
            false
        }
    }
}
