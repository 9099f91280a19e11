use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::session::{ConversationId, Turn};

/// `GET /chat/historial/todo`
#[derive(Debug, Default, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub conversations: Option<HashMap<ConversationId, Vec<Turn>>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `POST /chat/nueva_conversacion`
#[derive(Debug, Default, Deserialize)]
pub struct CreateConversationResponse {
    #[serde(default)]
    pub conversacion_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `POST /chat` body
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub mensaje: &'a str,
    pub conversacion_id: &'a str,
}

/// `POST /chat` reply
#[derive(Debug, Default, Deserialize)]
pub struct SendMessageResponse {
    #[serde(default)]
    pub respuesta: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /api/usuario_tipo`
#[derive(Debug, Default, Deserialize)]
pub struct UserTypeResponse {
    #[serde(default)]
    pub tipo_usuario: Option<String>,
}

/// Non-empty string or nothing; the server treats `""` like an absent field
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
