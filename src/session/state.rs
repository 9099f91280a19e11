use std::collections::HashMap;
use std::ops::BitOrAssign;

use super::turn::{last_activity, ConversationId, Turn};

/// Which parts of the display a transition invalidated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderRequest {
    pub sidebar: bool,
    pub pane: bool,
    pub focus_composer: bool,
}

impl RenderRequest {
    pub const NONE: Self = Self {
        sidebar: false,
        pane: false,
        focus_composer: false,
    };

    /// Sidebar and pane, composer keeps focus where it is
    pub const BOTH: Self = Self {
        sidebar: true,
        pane: true,
        focus_composer: false,
    };

    /// Sidebar and pane, then hand focus back to the composer
    pub const FULL: Self = Self {
        sidebar: true,
        pane: true,
        focus_composer: true,
    };

    pub const SIDEBAR: Self = Self {
        sidebar: true,
        pane: false,
        focus_composer: false,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl BitOrAssign for RenderRequest {
    fn bitor_assign(&mut self, rhs: Self) {
        self.sidebar |= rhs.sidebar;
        self.pane |= rhs.pane;
        self.focus_composer |= rhs.focus_composer;
    }
}

/// Identifies one in-flight send and the "thinking" placeholder it owns.
/// It never links an answer to a particular question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SendTicket(u64);

impl SendTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PendingSend {
    ticket: SendTicket,
    conversation_id: ConversationId,
}

/// A question accepted by [`SessionState::begin_send`], ready to go to the server
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub ticket: SendTicket,
    pub conversation_id: ConversationId,
    pub text: String,
    pub render: RenderRequest,
}

/// In-memory cache of the user's conversations.
///
/// Every mutation is a plain method returning the [`RenderRequest`] it causes;
/// nothing here performs I/O.
#[derive(Debug, Default)]
pub struct SessionState {
    conversations: HashMap<ConversationId, Vec<Turn>>,
    current: Option<ConversationId>,
    pending: Vec<PendingSend>,
    next_ticket: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache with the server's history and select the most recent
    /// conversation. Returns `None` for an empty history; the caller starts a
    /// fresh conversation instead.
    pub fn load_history(
        &mut self,
        history: HashMap<ConversationId, Vec<Turn>>,
    ) -> Option<RenderRequest> {
        if history.is_empty() {
            return None;
        }

        self.conversations = history;
        let most_recent = self.ids_by_recency().first().map(|id| (*id).clone());
        self.current = most_recent;
        Some(RenderRequest::BOTH)
    }

    /// Register a server-created conversation and make it current
    pub fn register_conversation(&mut self, id: ConversationId) -> RenderRequest {
        self.conversations.entry(id.clone()).or_default();
        self.current = Some(id);
        RenderRequest::FULL
    }

    /// Switch the current conversation. Selecting the current one, or an
    /// unknown id, changes nothing.
    pub fn select(&mut self, id: &ConversationId) -> RenderRequest {
        if self.current.as_ref() == Some(id) || !self.conversations.contains_key(id) {
            return RenderRequest::NONE;
        }

        self.current = Some(id.clone());
        RenderRequest::FULL
    }

    /// Record a new question on the current conversation before the server
    /// has seen it. Blank input, or no current conversation, is ignored.
    pub fn begin_send(&mut self, text: &str, timestamp: String) -> Option<OutgoingMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let conversation_id = self.current.clone()?;
        let turns = self.conversations.get_mut(&conversation_id)?;
        turns.push(Turn::question(text, timestamp));

        self.next_ticket += 1;
        let ticket = SendTicket(self.next_ticket);
        self.pending.push(PendingSend {
            ticket,
            conversation_id: conversation_id.clone(),
        });

        Some(OutgoingMessage {
            ticket,
            conversation_id,
            text: text.to_string(),
            render: RenderRequest::BOTH,
        })
    }

    /// Settle an in-flight send: drop its placeholder and record `answer` on
    /// the most recent unanswered turn of `conversation_id`, or append an
    /// answer-only turn when none is pending. A conversation that no longer
    /// exists only loses the placeholder.
    pub fn complete_send(
        &mut self,
        ticket: SendTicket,
        conversation_id: &ConversationId,
        answer: String,
        timestamp: String,
    ) -> RenderRequest {
        self.pending.retain(|p| p.ticket != ticket);

        let is_current = self.current.as_ref() == Some(conversation_id);
        let Some(turns) = self.conversations.get_mut(conversation_id) else {
            return RenderRequest {
                pane: is_current,
                ..RenderRequest::NONE
            };
        };

        match turns.iter_mut().rev().find(|t| t.is_pending()) {
            Some(turn) => turn.answer = Some(answer),
            None => turns.push(Turn::answer_only(answer, timestamp)),
        }

        RenderRequest {
            sidebar: true,
            pane: is_current,
            focus_composer: false,
        }
    }

    /// Drop the current conversation from the cache. Returns its id, or
    /// `None` when nothing is selected.
    pub fn remove_current(&mut self) -> Option<(ConversationId, RenderRequest)> {
        let id = self.current.take()?;
        self.conversations.remove(&id);
        Some((id, RenderRequest::BOTH))
    }

    pub fn current_id(&self) -> Option<&ConversationId> {
        self.current.as_ref()
    }

    pub fn current_turns(&self) -> &[Turn] {
        self.current
            .as_ref()
            .and_then(|id| self.conversations.get(id))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn turns(&self, id: &ConversationId) -> Option<&[Turn]> {
        self.conversations.get(id).map(Vec::as_slice)
    }

    pub fn contains(&self, id: &ConversationId) -> bool {
        self.conversations.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Conversation ids, most recently active first. Ties go to the smaller id.
    pub fn ids_by_recency(&self) -> Vec<&ConversationId> {
        let mut ids: Vec<&ConversationId> = self.conversations.keys().collect();
        ids.sort_by(|a, b| {
            let recency_a = last_activity(&self.conversations[*a]);
            let recency_b = last_activity(&self.conversations[*b]);
            recency_b.cmp(&recency_a).then_with(|| a.cmp(b))
        });
        ids
    }

    /// Placeholders still waiting in `id`, oldest first
    pub fn pending_in<'a>(
        &'a self,
        id: &'a ConversationId,
    ) -> impl Iterator<Item = SendTicket> + 'a {
        self.pending
            .iter()
            .filter(move |p| &p.conversation_id == id)
            .map(|p| p.ticket)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
