//! Prompt templates for translation and summarization
//!
//! Each template asks for bare prose: no greeting, no markup, no remarks about
//! the request itself. Every template also knows what to return when no model
//! produced anything usable.

/// Returned by the summarization templates when every model failed
pub const NO_SUMMARY_SENTINEL: &str = "No summary generated.";

/// A prompt template together with its arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate<'a> {
    /// Topic in any language → single-line English equivalent
    Translate { text: &'a str },
    /// Raw or HTML-ish extracted text → professional summary
    SummarizeContent { content: &'a str },
    /// Topic label plus accumulated research, or `None` when nothing was retrieved
    SummarizeTopic {
        topic: &'a str,
        content: Option<&'a str>,
    },
}

impl<'a> PromptTemplate<'a> {
    /// Short identifier used in logs
    pub fn id(&self) -> &'static str {
        match self {
            PromptTemplate::Translate { .. } => "translate",
            PromptTemplate::SummarizeContent { .. } => "summarize-content",
            PromptTemplate::SummarizeTopic { .. } => "summarize-topic",
        }
    }

    /// Render the full prompt text
    pub fn render(&self) -> String {
        match self {
            PromptTemplate::Translate { text } => format!(
                r#"Translate the following study topic into English.

Rules:
- Output only the English topic on a single line.
- Do not add quotes, explanations, notes or any other text.
- If the topic is already in English, output it unchanged.

Topic: {}"#,
                text
            ),
            PromptTemplate::SummarizeContent { content } => format!(
                r#"Summarize the following text in one or two paragraphs of clear, professional English.

Rules:
- Write plain prose only. No markdown, no HTML, no bullet points, no headings.
- Do not mention the website, page or source the text came from.
- Do not greet the reader or comment on the task.
- Ignore navigation menus, cookie notices, advertisements and leftover markup.

Text:
{}"#,
                content
            ),
            PromptTemplate::SummarizeTopic {
                topic,
                content: Some(content),
            } => format!(
                r#"Write a summary of the study topic "{}" in one or two paragraphs of clear, professional English, based on the research material below.

Rules:
- Write plain prose only. No markdown, no HTML, no bullet points, no headings.
- Do not mention websites or sources by name.
- Do not greet the reader or comment on the task.

Research material:
{}"#,
                topic, content
            ),
            PromptTemplate::SummarizeTopic {
                topic,
                content: None,
            } => format!(
                r#"No research material could be retrieved for the study topic "{}".

Write one or two paragraphs of clear, professional English giving a general overview of the topic from your own knowledge. Begin with the sentence "No web sources were available for this topic." so the reader knows the summary is not backed by retrieved content.

Rules:
- Write plain prose only. No markdown, no HTML, no bullet points, no headings.
- Do not greet the reader or comment on the task."#,
                topic
            ),
        }
    }

    /// Value returned when no model produced usable output
    ///
    /// Translation falls back to the untouched source text so a failed
    /// translation never feeds a placeholder into search.
    pub fn fallback(&self) -> String {
        match self {
            PromptTemplate::Translate { text } => text.trim().to_string(),
            PromptTemplate::SummarizeContent { .. } | PromptTemplate::SummarizeTopic { .. } => {
                NO_SUMMARY_SENTINEL.to_string()
            }
        }
    }

    /// Clean a raw model answer; an empty return means "unusable"
    pub fn postprocess(&self, raw: &str) -> String {
        match self {
            PromptTemplate::Translate { .. } => raw
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(|line| line.trim_matches(|c: char| c == '"' || c == '\'' || c == '`').trim())
                .unwrap_or_default()
                .to_string(),
            PromptTemplate::SummarizeContent { .. } | PromptTemplate::SummarizeTopic { .. } => {
                raw.trim().to_string()
            }
        }
    }
}
