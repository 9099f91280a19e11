use crate::constants::{SIDEBAR_FALLBACK_ID_CHARS, SIDEBAR_LABEL_CHARS};
use crate::session::{ConversationId, SessionState, Turn};

/// One row of the conversation list
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarEntry {
    pub id: ConversationId,
    pub label: String,
    pub active: bool,
}

/// Conversation list, most recently active first
pub fn sidebar_entries(state: &SessionState) -> Vec<SidebarEntry> {
    let current = state.current_id();
    state
        .ids_by_recency()
        .into_iter()
        .map(|id| SidebarEntry {
            id: id.clone(),
            label: sidebar_label(id, state.turns(id).unwrap_or_default()),
            active: Some(id) == current,
        })
        .collect()
}

/// First characters of the opening question, or a label built from the id
pub fn sidebar_label(id: &ConversationId, turns: &[Turn]) -> String {
    let opening = turns
        .first()
        .and_then(|t| t.question.as_deref())
        .filter(|q| !q.is_empty());

    let text: String = match opening {
        Some(question) => question.chars().take(SIDEBAR_LABEL_CHARS).collect(),
        None => format!("Conversación {}", id.tail(SIDEBAR_FALLBACK_ID_CHARS)),
    };

    if text.chars().count() >= SIDEBAR_LABEL_CHARS {
        format!("{}...", text)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn q(text: &str, at: &str) -> Turn {
        Turn::question(text, at)
    }

    #[test]
    fn test_short_question_is_used_as_is() {
        let id = ConversationId::new("abc");
        assert_eq!(sidebar_label(&id, &[q("¿Qué pH?", "t")]), "¿Qué pH?");
    }

    #[test]
    fn test_long_question_is_truncated_with_ellipsis() {
        let id = ConversationId::new("abc");
        let label = sidebar_label(&id, &[q("¿Cuál es la mejor época para sembrar maíz?", "t")]);
        assert_eq!(label, "¿Cuál es la mejor época p...");
        assert_eq!(label.chars().count(), 28);
    }

    #[test]
    fn test_exactly_25_chars_still_gets_ellipsis() {
        let id = ConversationId::new("abc");
        let text = "a".repeat(25);
        assert_eq!(sidebar_label(&id, &[q(&text, "t")]), format!("{}...", text));
    }

    #[test]
    fn test_empty_conversation_uses_id_tail() {
        let id = ConversationId::new("5f1c9a2e-77b0-4c3e-9d1a-0e2f4b6c7d81");
        assert_eq!(sidebar_label(&id, &[]), "Conversación 7d81");

        let answer_only = Turn::answer_only("hola", "t");
        assert_eq!(sidebar_label(&id, &[answer_only]), "Conversación 7d81");
    }

    #[test]
    fn test_newer_conversation_is_listed_first() {
        let mut state = SessionState::new();
        state.load_history(HashMap::from([
            (ConversationId::new("A"), vec![q("antes", "2024-05-01T08:00:00.000Z")]),
            (ConversationId::new("B"), vec![q("después", "2024-05-01T09:00:00.000Z")]),
            (ConversationId::new("C-empty"), vec![]),
        ]));

        let entries = sidebar_entries(&state);
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C-empty"]);
        assert!(entries[0].active);
        assert!(!entries[1].active);
        assert_eq!(entries[2].label, "Conversación mpty");
    }
}
