/// Constants module to avoid magic strings in the codebase

// Network Configuration
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

// Server endpoints
pub const HISTORY_PATH: &str = "/chat/historial/todo";
pub const CREATE_CONVERSATION_PATH: &str = "/chat/nueva_conversacion";
pub const SEND_MESSAGE_PATH: &str = "/chat";
pub const DELETE_CONVERSATION_PATH: &str = "/chat/eliminar/{id}";
pub const USER_TYPE_PATH: &str = "/api/usuario_tipo";

// Speakers
pub const USER_NAME: &str = "Usuario";
pub const ASSISTANT_NAME: &str = "EcoSmart";

// Fixed assistant texts
pub const WELCOME_MESSAGE: &str =
    "¡Hola! Soy EcoSmart, tu asistente experto en agricultura. ¿En qué puedo ayudarte hoy?";
pub const THINKING_PLACEHOLDER: &str = "EcoSmart está pensando...";
pub const SEND_FAILED_MESSAGE: &str = "Error al enviar mensaje. Intenta de nuevo.";
pub const UNEXPECTED_REPLY_MESSAGE: &str = "Ocurrió un error inesperado.";

// Notifications
pub const DELETE_SUCCESS_TOAST: &str =
    "Chat actual eliminado. Los datos se mantienen en la base de datos.";
pub const DELETE_NOTHING_TOAST: &str = "No hay chat actual para eliminar.";
pub const NO_CURRENT_CHAT_TOAST: &str =
    "Todavía no hay un chat activo. Espera un momento e intenta de nuevo.";
pub const NO_TEMPLATES_MESSAGE: &str = "No hay plantillas disponibles para tu tipo de usuario.";

// Sidebar labels
pub const SIDEBAR_LABEL_CHARS: usize = 25;
pub const SIDEBAR_FALLBACK_ID_CHARS: usize = 4;

// UI Configuration
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
pub const UI_SCROLL_LINES: u16 = 3;
pub const DEFAULT_TOAST_SECS: u64 = 4;
