// Gateway module for remote - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod http;
mod traits;
mod types;

// Public re-exports - the ONLY way to access remote functionality
pub use http::HttpConversationApi;
pub use traits::ConversationApi;
#[cfg(test)]
pub use traits::MockConversationApi;
pub use types::{
    CreateConversationResponse, HistoryResponse, SendMessageRequest, SendMessageResponse,
    UserTypeResponse,
};
