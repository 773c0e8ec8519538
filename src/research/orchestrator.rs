use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

use crate::events::SubmissionEvent;
use crate::llm::ModelChain;
use crate::research::collector::ResearchCollector;
use crate::research::pipeline::TopicPipeline;
use crate::research::progress::ProgressReporter;
use crate::research::PipelineConfig;
use crate::tools::extract::HtmlExtractor;
use crate::tools::search::create_gateway;
use crate::types::{split_topics, AppError, Result, SubmissionResult};
use crate::utils::submission_log::SubmissionLog;

/// States a submission moves through.
///
/// `Translating`, `Collecting` and `Summarizing` repeat once per topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Splitting,
    Translating,
    Collecting,
    Summarizing,
    Aggregating,
    Done,
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionStage::Splitting => "Splitting",
            SubmissionStage::Translating => "Translating",
            SubmissionStage::Collecting => "Collecting",
            SubmissionStage::Summarizing => "Summarizing",
            SubmissionStage::Aggregating => "Aggregating",
            SubmissionStage::Done => "Done",
        };
        f.write_str(name)
    }
}

/// Runs every topic of one submission through the [`TopicPipeline`], strictly
/// in input order, one topic at a time.
pub struct SubmissionOrchestrator {
    pipeline: TopicPipeline,
    log_dir: Option<PathBuf>,
}

impl SubmissionOrchestrator {
    pub fn new(pipeline: TopicPipeline, log_dir: Option<PathBuf>) -> Self {
        Self { pipeline, log_dir }
    }

    /// Wire up the production collaborators described by `config`
    pub async fn from_config(config: &PipelineConfig) -> Result<Self> {
        let generator = ModelChain::ollama(
            &config.generation_endpoint,
            &config.model_preference_order,
            config.generation_timeout,
        )
        .await?;

        let collector = ResearchCollector::new(
            create_gateway(config),
            Arc::new(HtmlExtractor::new(
                config.extraction_timeout,
                config.excerpt_max_chars,
            )),
            config.collector_settings(),
        );

        Ok(Self::new(
            TopicPipeline::new(generator, collector, config.summary_mode),
            config.submission_log_dir.clone(),
        ))
    }

    fn reporter(&self, events: Option<UnboundedSender<SubmissionEvent>>) -> ProgressReporter {
        let progress = ProgressReporter::new(events, SubmissionLog::create(self.log_dir.as_deref()));
        if let Some(path) = progress.log().path() {
            info!("Submission log: {}", path.display());
        }
        progress
    }

    /// Process a whole submission, reporting progress through `progress`.
    ///
    /// Blank input fails with [`AppError::NoTopics`] before any event is sent
    /// or any network call is made. The terminal outcome is left to the caller.
    async fn run(&self, input: &str, progress: &ProgressReporter) -> Result<SubmissionResult> {
        let topics = split_topics(input);
        if topics.is_empty() {
            return Err(AppError::NoTopics);
        }

        let total = topics.len();
        progress.stage(
            SubmissionStage::Splitting,
            format!("Split input into {} topic(s)", total),
        );

        let mut results = Vec::with_capacity(total);
        for (i, topic) in topics.iter().enumerate() {
            results.push(self.pipeline.run(topic, i + 1, total, progress).await);
        }

        progress.stage(
            SubmissionStage::Aggregating,
            format!("Aggregating {} result(s)", results.len()),
        );
        let result = SubmissionResult::from(results);

        progress.log().record(&format!("stage={}", SubmissionStage::Done));
        info!(topics = result.len(), "Submission complete");
        Ok(result)
    }

    /// Run to completion without progress events
    pub async fn submit(&self, input: &str) -> Result<SubmissionResult> {
        let progress = self.reporter(None);
        let outcome = self.run(input, &progress).await;
        match &outcome {
            Ok(result) => progress.finish(SubmissionEvent::Result(result.clone())),
            Err(e) => progress.finish(SubmissionEvent::failure(e.to_string())),
        };
        outcome
    }

    /// Run on a background task and return the event stream.
    ///
    /// The stream carries progress events followed by exactly one terminal
    /// event, also when the worker fails or panics. Dropping the receiver does
    /// not stop the work.
    pub fn spawn(self, input: String) -> UnboundedReceiver<SubmissionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let progress = Arc::new(self.reporter(Some(tx)));
        let worker_progress = Arc::clone(&progress);

        let worker = tokio::spawn(async move { self.run(&input, &worker_progress).await });

        tokio::spawn(async move {
            let terminal = match worker.await {
                Ok(Ok(result)) => SubmissionEvent::Result(result),
                Ok(Err(e)) => {
                    info!("Submission ended without result: {}", e);
                    SubmissionEvent::Failure(e.to_string())
                }
                Err(join_error) => {
                    error!("Submission worker failed: {}", join_error);
                    SubmissionEvent::Failure(
                        AppError::Internal("submission worker aborted".to_string()).to_string(),
                    )
                }
            };
            progress.finish(terminal);
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display() {
        assert_eq!(SubmissionStage::Splitting.to_string(), "Splitting");
        assert_eq!(SubmissionStage::Done.to_string(), "Done");
    }
}
