use chrono::Local;

use crate::constants::{ASSISTANT_NAME, THINKING_PLACEHOLDER, USER_NAME, WELCOME_MESSAGE};
use crate::session::{parse_timestamp, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::User => USER_NAME,
            Self::Assistant => ASSISTANT_NAME,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Part of the conversation
    Message,
    /// Greeting shown for a conversation without turns
    Welcome,
    /// Stand-in for a reply that has not arrived
    Thinking,
}

/// One line of the message pane
#[derive(Debug, Clone, PartialEq)]
pub struct PaneLine {
    pub speaker: Speaker,
    pub text: String,
    /// Local `HH:MM`; absent when the timestamp cannot be read
    pub time: Option<String>,
    pub kind: LineKind,
}

impl PaneLine {
    fn message(speaker: Speaker, text: &str, timestamp: &str) -> Self {
        Self {
            speaker,
            text: text.to_string(),
            time: format_time(timestamp),
            kind: LineKind::Message,
        }
    }

    fn fixed(text: &str, kind: LineKind) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.to_string(),
            time: None,
            kind,
        }
    }
}

/// Full contents of the message pane for the current conversation
pub fn pane_lines(state: &SessionState) -> Vec<PaneLine> {
    let turns = state.current_turns();
    if turns.is_empty() {
        return vec![PaneLine::fixed(WELCOME_MESSAGE, LineKind::Welcome)];
    }

    let mut lines = Vec::with_capacity(turns.len() * 2);
    for turn in turns {
        if let Some(question) = turn.question.as_deref().filter(|q| !q.is_empty()) {
            lines.push(PaneLine::message(Speaker::User, question, &turn.timestamp));
        }
        if let Some(answer) = turn.answer.as_deref().filter(|a| !a.is_empty()) {
            lines.push(PaneLine::message(Speaker::Assistant, answer, &turn.timestamp));
        }
    }

    if let Some(current) = state.current_id() {
        for _ in state.pending_in(current) {
            lines.push(PaneLine::fixed(THINKING_PLACEHOLDER, LineKind::Thinking));
        }
    }

    lines
}

/// `HH:MM` in local time
pub fn format_time(timestamp: &str) -> Option<String> {
    parse_timestamp(timestamp).map(|dt| dt.with_timezone(&Local).format("%H:%M").to_string())
}
