use crate::llm::{ModelChain, PromptTemplate};
use crate::research::collector::ResearchCollector;
use crate::research::progress::ProgressReporter;
use crate::research::{SubmissionStage, SummaryMode};
use crate::types::TopicResult;

/// translate → collect → summarize for a single topic.
///
/// Each run only reads its inputs and returns a fresh [`TopicResult`]; nothing
/// carries over between topics.
pub struct TopicPipeline {
    generator: ModelChain,
    collector: ResearchCollector,
    summary_mode: SummaryMode,
}

impl TopicPipeline {
    pub fn new(generator: ModelChain, collector: ResearchCollector, summary_mode: SummaryMode) -> Self {
        Self {
            generator,
            collector,
            summary_mode,
        }
    }

    /// Research one topic. Upstream failures degrade the result, they never fail it.
    ///
    /// `index` is 1-based.
    pub async fn run(
        &self,
        topic: &str,
        index: usize,
        total: usize,
        progress: &ProgressReporter,
    ) -> TopicResult {
        progress.stage(
            SubmissionStage::Translating,
            format!("Translating topic {} of {}: {}", index, total, topic),
        );
        let translate = PromptTemplate::Translate { text: topic };
        progress.snippet("translate prompt", &translate.render());
        let translated = self.generator.generate(&translate).await;

        progress.stage(
            SubmissionStage::Collecting,
            format!("Collecting sources for topic {} of {}: {}", index, total, translated),
        );
        let content = self.collector.collect(&translated).await;
        progress.progress(format!(
            "Collected {} words from {} source(s) for topic {} of {}",
            content.word_count(),
            content.fragment_count(),
            index,
            total
        ));

        progress.stage(
            SubmissionStage::Summarizing,
            format!("Summarizing topic {} of {}: {}", index, total, translated),
        );
        let text = content.text();
        let template = match (self.summary_mode, content.is_empty()) {
            (_, true) => PromptTemplate::SummarizeTopic {
                topic: &translated,
                content: None,
            },
            (SummaryMode::Topic, false) => PromptTemplate::SummarizeTopic {
                topic: &translated,
                content: Some(&text),
            },
            (SummaryMode::Content, false) => PromptTemplate::SummarizeContent { content: &text },
        };
        progress.snippet("summary prompt", &template.render());
        let summary = self.generator.generate(&template).await;

        TopicResult {
            topic: topic.to_string(),
            translated,
            summary,
            sources: content.sources(),
        }
    }
}
