use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::traits::ConversationApi;
use super::types::{
    non_empty, CreateConversationResponse, HistoryResponse, SendMessageRequest,
    SendMessageResponse, UserTypeResponse,
};
use crate::app::{EndpointsConfig, ServerConfig};
use crate::session::{ConversationId, Turn};
use crate::utils::ChatError;

/// `ConversationApi` over the web application's JSON endpoints
pub struct HttpConversationApi {
    client: Client,
    base_url: String,
    endpoints: EndpointsConfig,
}

impl HttpConversationApi {
    pub fn new(server: &ServerConfig, endpoints: &EndpointsConfig) -> Result<Self, ChatError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &server.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| ChatError::Config(format!("invalid session cookie: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(server.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ChatError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: server.base_url.trim_end_matches('/').to_string(),
            endpoints: endpoints.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn delete_url(&self, id: &ConversationId) -> String {
        self.url(&self.endpoints.delete.replace("{id}", id.as_str()))
    }

    /// Read a JSON body whatever the status; the server puts error markers in
    /// 4xx bodies too.
    async fn json_body<T: DeserializeOwned>(response: Response) -> Result<(u16, T), ChatError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        let parsed = serde_json::from_str(&body).map_err(|e| {
            debug!(status, "Unparseable body: {}", body);
            ChatError::Decode(e.to_string())
        })?;
        Ok((status, parsed))
    }
}

#[async_trait]
impl ConversationApi for HttpConversationApi {
    async fn fetch_history(&self) -> Result<HashMap<ConversationId, Vec<Turn>>, ChatError> {
        let response = self.client.get(self.url(&self.endpoints.history)).send().await?;
        let (_, body) = Self::json_body::<HistoryResponse>(response).await?;

        if let Some(error) = non_empty(body.error) {
            return Err(ChatError::Server(error));
        }
        Ok(body.conversations.unwrap_or_default())
    }

    async fn create_conversation(&self) -> Result<ConversationId, ChatError> {
        let response = self.client.post(self.url(&self.endpoints.create)).send().await?;
        let (status, body) = Self::json_body::<CreateConversationResponse>(response).await?;

        if let Some(error) = non_empty(body.error) {
            return Err(ChatError::Server(error));
        }
        non_empty(body.conversacion_id)
            .map(ConversationId::new)
            .ok_or(ChatError::EmptyReply(status))
    }

    async fn send_message(
        &self,
        conversation_id: &ConversationId,
        message: &str,
    ) -> Result<String, ChatError> {
        let request = SendMessageRequest {
            mensaje: message,
            conversacion_id: conversation_id.as_str(),
        };
        let response = self
            .client
            .post(self.url(&self.endpoints.send))
            .json(&request)
            .send()
            .await?;
        let (status, body) = Self::json_body::<SendMessageResponse>(response).await?;

        if let Some(reply) = non_empty(body.respuesta) {
            return Ok(reply);
        }
        if let Some(error) = non_empty(body.error) {
            return Err(ChatError::Server(error));
        }
        Err(ChatError::EmptyReply(status))
    }

    async fn delete_conversation(&self, conversation_id: &ConversationId) -> Result<(), ChatError> {
        let response = self.client.post(self.delete_url(conversation_id)).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ChatError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn user_type(&self) -> Result<Option<String>, ChatError> {
        let response = self.client.get(self.url(&self.endpoints.user_type)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body: UserTypeResponse = response.json().await?;
        Ok(non_empty(body.tipo_usuario).map(|t| t.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(server: &MockServer, cookie: Option<&str>) -> HttpConversationApi {
        let config = ServerConfig {
            base_url: format!("{}/", server.uri()),
            timeout_secs: 5,
            session_cookie: cookie.map(str::to_string),
        };
        HttpConversationApi::new(&config, &EndpointsConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_history_groups_turns() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chat/historial/todo"))
            .and(header("cookie", "session=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "conversations": {
                    "c-1": [
                        {"pregunta": "hola", "respuesta": "buenas", "fecha": "2024-05-01 10:00:00", "estado": 1}
                    ],
                    "c-2": []
                }
            })))
            .mount(&server)
            .await;

        let history = api_for(&server, Some("session=abc")).fetch_history().await.unwrap();
        assert_eq!(history.len(), 2);
        let turns = &history[&ConversationId::new("c-1")];
        assert_eq!(turns[0].answer.as_deref(), Some("buenas"));
    }

    #[tokio::test]
    async fn test_fetch_history_error_marker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chat/historial/todo"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "No has iniciado sesión"})),
            )
            .mount(&server)
            .await;

        let err = api_for(&server, None).fetch_history().await.unwrap_err();
        assert!(matches!(err, ChatError::Server(msg) if msg == "No has iniciado sesión"));
    }

    #[tokio::test]
    async fn test_create_conversation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/nueva_conversacion"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"conversacion_id": "f00d-beef"})),
            )
            .mount(&server)
            .await;

        let id = api_for(&server, None).create_conversation().await.unwrap();
        assert_eq!(id, ConversationId::new("f00d-beef"));
    }

    #[tokio::test]
    async fn test_send_message_posts_body_and_reads_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({
                "mensaje": "¿Cada cuánto debería regar mis plantas?",
                "conversacion_id": "c-1"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"respuesta": "Riega cada 2 días"})),
            )
            .mount(&server)
            .await;

        let reply = api_for(&server, None)
            .send_message(&ConversationId::new("c-1"), "¿Cada cuánto debería regar mis plantas?")
            .await
            .unwrap();
        assert_eq!(reply, "Riega cada 2 días");
    }

    #[tokio::test]
    async fn test_send_message_classifies_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({"mensaje": "a", "conversacion_id": "c"})))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Mensaje vacío"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({"mensaje": "b", "conversacion_id": "c"})))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({"mensaje": "c", "conversacion_id": "c"})))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let api = api_for(&server, None);
        let id = ConversationId::new("c");

        let err = api.send_message(&id, "a").await.unwrap_err();
        assert!(matches!(err, ChatError::Server(msg) if msg == "Mensaje vacío"));

        let err = api.send_message(&id, "b").await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyReply(500)));

        let err = api.send_message(&id, "c").await.unwrap_err();
        assert!(matches!(err, ChatError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_network_error() {
        let config = ServerConfig {
            // Reserved port, nothing listens there
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            session_cookie: None,
        };
        let api = HttpConversationApi::new(&config, &EndpointsConfig::default()).unwrap();
        let err = api
            .send_message(&ConversationId::new("c"), "hola")
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_delete_uses_conversation_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/eliminar/c-9"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"mensaje": "Conversación eliminada correctamente."})),
            )
            .expect(1)
            .mount(&server)
            .await;

        api_for(&server, None)
            .delete_conversation(&ConversationId::new("c-9"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_user_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/usuario_tipo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tipo_usuario": "Agronomo"})))
            .mount(&server)
            .await;

        let user_type = api_for(&server, None).user_type().await.unwrap();
        assert_eq!(user_type.as_deref(), Some("agronomo"));
    }

    #[test]
    fn test_invalid_cookie_is_a_config_error() {
        let config = ServerConfig {
            session_cookie: Some("bad\nvalue".to_string()),
            ..ServerConfig::default()
        };
        let result = HttpConversationApi::new(&config, &EndpointsConfig::default());
        assert!(matches!(result, Err(ChatError::Config(_))));
    }
}
