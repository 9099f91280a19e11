use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Server-assigned, opaque conversation identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last `n` characters, used for the sidebar fallback label
    pub fn tail(&self, n: usize) -> String {
        let count = self.0.chars().count();
        self.0.chars().skip(count.saturating_sub(n)).collect()
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One question/answer exchange. Field names follow the server's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(rename = "pregunta", default)]
    pub question: Option<String>,
    #[serde(rename = "respuesta", default)]
    pub answer: Option<String>,
    /// ISO-8601 string as stored by the server; empty when it sent null
    #[serde(rename = "fecha", default, deserialize_with = "null_as_empty")]
    pub timestamp: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Turn {
    /// A freshly asked question, waiting for its answer
    pub fn question(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            question: Some(text.into()),
            answer: None,
            timestamp: timestamp.into(),
        }
    }

    /// An answer with no question to attach to
    pub fn answer_only(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            question: None,
            answer: Some(text.into()),
            timestamp: timestamp.into(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.question.is_some() && self.answer.is_none()
    }

    /// Parsed timestamp; unparseable values sort as the epoch
    pub fn instant(&self) -> DateTime<Utc> {
        parse_timestamp(&self.timestamp).unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// Current time in the same shape the client sends (`2024-05-01T10:00:00.000Z`)
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Accepts RFC 3339 and SQLite's `CURRENT_TIMESTAMP` (`YYYY-MM-DD HH:MM:SS`, UTC)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Recency of a conversation: timestamp of its last turn, epoch when empty
pub fn last_activity(turns: &[Turn]) -> DateTime<Utc> {
    turns
        .last()
        .map(Turn::instant)
        .unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_and_sqlite_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01T10:30:00.000Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01 10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T12:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("ayer"), None);
    }

    #[test]
    fn test_last_activity_of_empty_is_epoch() {
        assert_eq!(last_activity(&[]), DateTime::UNIX_EPOCH);
        let turns = vec![Turn::question("hola", "garbage")];
        assert_eq!(last_activity(&turns), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_turn_deserializes_server_shape() {
        let turn: Turn = serde_json::from_str(
            r#"{"pregunta": "¿Qué pH?", "respuesta": null, "fecha": "2024-05-01 10:00:00", "estado": 1}"#,
        )
        .unwrap();
        assert_eq!(turn.question.as_deref(), Some("¿Qué pH?"));
        assert!(turn.is_pending());
        assert_eq!(turn.timestamp, "2024-05-01 10:00:00");
    }

    #[test]
    fn test_null_fecha_sorts_as_epoch() {
        let history: std::collections::HashMap<ConversationId, Vec<Turn>> = serde_json::from_str(
            r#"{"c1": [{"pregunta": "hola", "respuesta": "buenas", "fecha": null}, {"pregunta": "¿riego?"}]}"#,
        )
        .unwrap();
        let turns = &history[&ConversationId::new("c1")];
        assert_eq!(turns[0].timestamp, "");
        assert_eq!(turns[0].instant(), DateTime::UNIX_EPOCH);
        assert_eq!(last_activity(turns), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_id_tail_counts_characters() {
        let id = ConversationId::new("0b4e-ñaba");
        assert_eq!(id.tail(4), "ñaba");
        assert_eq!(ConversationId::new("ab").tail(4), "ab");
    }

    #[test]
    fn test_now_timestamp_round_trips_through_parser() {
        assert!(parse_timestamp(&now_timestamp()).is_some());
    }
}
