//! Conversation state for one chat pane.
//!
//! A [`ChatSession`] owns the message history and the prompt layout sent to
//! the text-generation service, and attaches slide context on request.
//! Document-content requests on one session are serialized: a second request
//! waits until the one in flight has finished.

use crate::assemble::SlideContextAssembler;
use crate::container::{ArchiveDecoder, ZipDecoder};
use crate::detect::PackageKind;
use crate::host::HostDocument;
use crate::options::ExtractOptions;
use crate::pptx::{SlideExtractor, StructuredExtractor};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

const DEFAULT_SYSTEM_PROMPT: &str = "The assistant is a writing and analysis helper embedded in \
an Office application. It gives concise answers to simple questions and thorough answers to \
complex, open-ended ones.";

const CLOSING_SENTENCE: &str = "It uses markdown for code. It does not mention this information \
about itself unless it is directly pertinent to the user's query.";

/// Office application hosting the chat pane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostApp {
    Word,
    PowerPoint,
    Excel,
    /// Running outside any Office host
    #[default]
    Standalone,
}

impl HostApp {
    fn prompt_sentence(&self) -> Option<&'static str> {
        match self {
            HostApp::Word => Some(
                "The user is currently working in Microsoft Word. It is happy to help with \
                 document writing, formatting, and content creation.",
            ),
            HostApp::PowerPoint => Some(
                "The user is currently working in Microsoft PowerPoint. It is happy to help with \
                 presentation content, slide design, and creating compelling narratives.",
            ),
            HostApp::Excel => Some(
                "The user is currently working in Microsoft Excel. It is happy to help with data \
                 analysis, formulas, and VBA code.",
            ),
            HostApp::Standalone => None,
        }
    }

    /// Heading placed above attached document content.
    pub fn attachment_heading(&self) -> &'static str {
        match self {
            HostApp::PowerPoint => "# Attached slide:",
            _ => "# Attached document:",
        }
    }
}

impl From<PackageKind> for HostApp {
    fn from(kind: PackageKind) -> Self {
        match kind {
            PackageKind::Presentation => HostApp::PowerPoint,
            PackageKind::WordDocument => HostApp::Word,
            PackageKind::Workbook => HostApp::Excel,
        }
    }
}

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// One entry of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Prompt configuration, fixed for the life of a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Opening paragraph of the system prompt
    pub system_prompt: String,
    /// Application the pane runs in
    pub host: HostApp,
    /// Date string inserted into the system prompt
    pub current_date: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            host: HostApp::default(),
            current_date: None,
        }
    }
}

impl SessionConfig {
    /// Config for a pane hosted in `host`.
    pub fn for_host(host: HostApp) -> Self {
        Self {
            host,
            ..Default::default()
        }
    }

    /// Set the date mentioned in the system prompt.
    pub fn with_current_date(mut self, date: impl Into<String>) -> Self {
        self.current_date = Some(date.into());
        self
    }

    /// Replace the opening paragraph of the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}

/// A conversation plus the machinery to attach slide context to it.
pub struct ChatSession<D = ZipDecoder, X = StructuredExtractor> {
    config: SessionConfig,
    history: Vec<ChatMessage>,
    assembler: SlideContextAssembler<D, X>,
    in_flight: Mutex<()>,
}

impl ChatSession {
    /// Session using the default assembler.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_assembler(config, SlideContextAssembler::new(ExtractOptions::default()))
    }
}

impl<D: ArchiveDecoder, X: SlideExtractor> ChatSession<D, X> {
    /// Session using a caller-built assembler.
    pub fn with_assembler(config: SessionConfig, assembler: SlideContextAssembler<D, X>) -> Self {
        Self {
            config,
            history: Vec::new(),
            assembler,
            in_flight: Mutex::new(()),
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Messages so far, oldest first.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Record a user message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.history.push(ChatMessage {
            role: Role::User,
            content: content.into(),
        });
    }

    /// Record an assistant reply.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.history.push(ChatMessage {
            role: Role::Assistant,
            content: content.into(),
        });
    }

    /// Start a new conversation.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// The system prompt for this session's host.
    pub fn system_prompt(&self) -> String {
        let mut prompt = self.config.system_prompt.trim().to_string();
        if let Some(ref date) = self.config.current_date {
            prompt.push_str(&format!(" The current date is {}.", date));
        }
        if let Some(sentence) = self.config.host.prompt_sentence() {
            prompt.push(' ');
            prompt.push_str(sentence);
        }
        prompt.push(' ');
        prompt.push_str(CLOSING_SENTENCE);
        prompt
    }

    /// Lay out the full prompt: system text, history, then any attachment.
    pub fn format_prompt(&self, document_content: Option<&str>) -> String {
        let mut prompt = format!("System: {}\n\n", self.system_prompt());
        for message in &self.history {
            prompt.push_str(&format!("{}: {}\n", message.role.label(), message.content));
        }
        if let Some(content) = document_content.filter(|c| !c.is_empty()) {
            prompt.push_str(&format!(
                "\n{}\n{}\n\n",
                self.config.host.attachment_heading(),
                content
            ));
        }
        prompt
    }

    /// Assemble slide context for the host's current slide.
    ///
    /// Overlapping calls on the same session run one after another.
    pub async fn attach_document_context(&self, host: &dyn HostDocument) -> String {
        let _guard = self.in_flight.lock().await;
        self.assembler.assemble_text(host).await
    }
}
