use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::state::{RenderRequest, SendTicket, SessionState};
use super::templates::TemplateSet;
use super::turn::{now_timestamp, ConversationId, Turn};
use crate::constants::{
    DELETE_NOTHING_TOAST, DELETE_SUCCESS_TOAST, NO_CURRENT_CHAT_TOAST, SEND_FAILED_MESSAGE,
    UNEXPECTED_REPLY_MESSAGE,
};
use crate::remote::ConversationApi;
use crate::utils::ChatError;

/// Result of a remote call, delivered back to the controller's task
#[derive(Debug)]
pub enum Completion {
    HistoryLoaded(Result<HashMap<ConversationId, Vec<Turn>>, ChatError>),
    ConversationCreated(Result<ConversationId, ChatError>),
    AnswerReceived {
        ticket: SendTicket,
        conversation_id: ConversationId,
        reply: Result<String, ChatError>,
    },
    DeleteAcknowledged {
        conversation_id: ConversationId,
        result: Result<(), ChatError>,
    },
    UserTypeLoaded(Result<Option<String>, ChatError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

/// Transient notification for the status bar
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub level: ToastLevel,
    pub text: String,
}

impl Toast {
    fn success(text: &str) -> Self {
        Self {
            level: ToastLevel::Success,
            text: text.to_string(),
        }
    }

    fn error(text: &str) -> Self {
        Self {
            level: ToastLevel::Error,
            text: text.to_string(),
        }
    }
}

/// Owns one conversation session and keeps it in sync with the server.
///
/// Operations never block: each remote call runs as its own task and its
/// [`Completion`] is applied by [`SessionController::handle`] on whatever task
/// drives the controller, so all mutation happens in one place. Failures are
/// logged and turned into fallback state; none escape to the caller.
pub struct SessionController {
    api: Arc<dyn ConversationApi>,
    state: SessionState,
    templates: TemplateSet,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    render: RenderRequest,
    toast: Option<Toast>,
    in_flight: usize,
}

impl SessionController {
    pub fn new(api: Arc<dyn ConversationApi>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            state: SessionState::new(),
            templates: TemplateSet::default(),
            tx,
            rx,
            render: RenderRequest::NONE,
            toast: None,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Remote calls started but not yet handled
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // The receiver lives as long as the controller
            let _ = tx.send(task.await);
        });
    }

    /// Load the full history; an empty or failed load starts a fresh conversation
    pub fn initialize(&mut self) {
        let api = self.api.clone();
        self.spawn(async move { Completion::HistoryLoaded(api.fetch_history().await) });
    }

    /// Resolve the sample questions for the signed-in user's category
    pub fn load_templates(&mut self) {
        let api = self.api.clone();
        self.spawn(async move { Completion::UserTypeLoaded(api.user_type().await) });
    }

    pub fn start_new_conversation(&mut self) {
        let api = self.api.clone();
        self.spawn(async move { Completion::ConversationCreated(api.create_conversation().await) });
    }

    pub fn select(&mut self, id: &ConversationId) {
        let render = self.state.select(id);
        if !render.is_empty() {
            debug!(conversation_id = %id, "Switched conversation");
        }
        self.render |= render;
    }

    /// Record the question locally and post it. Returns `false` when nothing
    /// was sent (blank text or no current conversation), in which case the
    /// composer should keep its contents.
    pub fn submit(&mut self, text: &str) -> bool {
        let Some(outgoing) = self.state.begin_send(text, now_timestamp()) else {
            if !text.trim().is_empty() {
                warn!("No current conversation, message not sent");
                self.toast = Some(Toast::error(NO_CURRENT_CHAT_TOAST));
            }
            return false;
        };

        self.render |= outgoing.render;
        debug!(
            conversation_id = %outgoing.conversation_id,
            ticket = outgoing.ticket.value(),
            "Sending message"
        );

        let api = self.api.clone();
        self.spawn(async move {
            let reply = api
                .send_message(&outgoing.conversation_id, &outgoing.text)
                .await;
            Completion::AnswerReceived {
                ticket: outgoing.ticket,
                conversation_id: outgoing.conversation_id,
                reply,
            }
        });
        true
    }

    /// Soft-delete the current conversation and replace it with a new one.
    /// Callers must have obtained the user's confirmation.
    pub fn delete_current(&mut self) {
        let Some((id, render)) = self.state.remove_current() else {
            self.toast = Some(Toast::error(DELETE_NOTHING_TOAST));
            return;
        };

        info!(conversation_id = %id, "Deleting conversation");
        let api = self.api.clone();
        let conversation_id = id.clone();
        self.spawn(async move {
            let result = api.delete_conversation(&conversation_id).await;
            Completion::DeleteAcknowledged {
                conversation_id,
                result,
            }
        });

        self.render |= render;
        self.start_new_conversation();
        self.toast = Some(Toast::success(DELETE_SUCCESS_TOAST));
    }

    /// Apply one remote result to the session
    pub fn handle(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match completion {
            Completion::HistoryLoaded(Ok(history)) => {
                let count = history.len();
                match self.state.load_history(history) {
                    Some(render) => {
                        info!(conversations = count, "Loaded conversation history");
                        self.render |= render;
                    }
                    None => {
                        info!("No previous conversations, starting a new one");
                        self.start_new_conversation();
                    }
                }
            }
            Completion::HistoryLoaded(Err(e)) => {
                warn!("Failed to load history, starting fresh: {}", e);
                self.start_new_conversation();
            }
            Completion::ConversationCreated(Ok(id)) => {
                info!(conversation_id = %id, "Started new conversation");
                self.render |= self.state.register_conversation(id);
            }
            Completion::ConversationCreated(Err(e)) => {
                error!("Failed to start a new conversation: {}", e);
            }
            Completion::AnswerReceived {
                ticket,
                conversation_id,
                reply,
            } => {
                let answer = answer_text(reply);
                if !self.state.contains(&conversation_id) {
                    warn!(
                        conversation_id = %conversation_id,
                        ticket = ticket.value(),
                        "Answer arrived for a deleted conversation, dropping it"
                    );
                }
                self.render |=
                    self.state
                        .complete_send(ticket, &conversation_id, answer, now_timestamp());
            }
            Completion::DeleteAcknowledged {
                conversation_id,
                result,
            } => match result {
                Ok(()) => debug!(conversation_id = %conversation_id, "Server marked conversation inactive"),
                Err(e) => warn!(conversation_id = %conversation_id, "Soft delete failed: {}", e),
            },
            Completion::UserTypeLoaded(result) => {
                let user_type = result.unwrap_or_else(|e| {
                    warn!("Failed to fetch user type: {}", e);
                    None
                });
                self.templates = TemplateSet::for_user_type(user_type.as_deref());
                debug!(user_type = %self.templates.user_type, "Loaded question templates");
            }
        }
    }

    /// Apply every completion that is already available. Returns how many.
    pub fn try_process(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(completion) = self.rx.try_recv() {
            self.handle(completion);
            handled += 1;
        }
        handled
    }

    /// Wait for the next completion and apply it. `false` when nothing is in flight.
    pub async fn process_next(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(completion) => {
                self.handle(completion);
                true
            }
            None => false,
        }
    }

    /// Process completions until no remote call is outstanding
    pub async fn settle(&mut self) {
        while self.process_next().await {}
    }

    /// Render work accumulated since the last call
    pub fn take_render(&mut self) -> RenderRequest {
        std::mem::take(&mut self.render)
    }

    pub fn take_toast(&mut self) -> Option<Toast> {
        self.toast.take()
    }
}

/// Text recorded as the assistant's answer for a settled send
fn answer_text(reply: Result<String, ChatError>) -> String {
    match reply {
        Ok(text) => text,
        Err(ChatError::Server(message)) => {
            warn!("Server reported an error: {}", message);
            message
        }
        Err(e @ (ChatError::EmptyReply(_) | ChatError::Status { .. })) => {
            warn!("Unexpected reply: {}", e);
            UNEXPECTED_REPLY_MESSAGE.to_string()
        }
        Err(e) => {
            error!("Failed to send message: {}", e);
            SEND_FAILED_MESSAGE.to_string()
        }
    }
}
