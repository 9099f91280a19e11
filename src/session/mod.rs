/// Session management module - Gateway

mod controller;
mod state;
mod templates;
mod turn;

pub use controller::{Completion, SessionController, Toast, ToastLevel};
pub use state::{OutgoingMessage, RenderRequest, SendTicket, SessionState};
pub use templates::{TemplateSet, DEFAULT_USER_TYPE};
pub use turn::{last_activity, now_timestamp, parse_timestamp, ConversationId, Turn};
