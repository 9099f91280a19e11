pub mod app;
pub mod cli;
pub mod constants;
pub mod remote;
pub mod runtime;
pub mod session;
pub mod tui;
pub mod utils;
pub mod view;

pub use app::{load_config, Config};
pub use remote::{ConversationApi, HttpConversationApi};
pub use session::{ConversationId, SessionController, SessionState, Turn};
pub use tui::run_ui;
pub use utils::ChatError;
