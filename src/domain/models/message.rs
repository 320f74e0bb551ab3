//! Inbound chat events and the payloads forwarded downstream.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::row::Row;

/// One inbound chat event, immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    /// Caller-assigned identifier, unique per inbound event
    pub message_id: String,

    /// Messenger the event came from (telegram, whatsapp, ...)
    pub source_name: String,

    pub chat_id: String,

    #[serde(default)]
    pub text: String,

    /// Key of the per-sender agent state
    #[serde(default)]
    pub sender_id: String,

    #[serde(default)]
    pub sender_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Transcribed voice note, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,

    /// Direct message (true) or group chat (false)
    #[serde(default)]
    pub is_private: bool,
}

impl NewMessage {
    /// Text the pipeline works on: typed text followed by any transcription.
    pub fn content(&self) -> String {
        match self.voice.as_deref().map(str::trim) {
            Some(voice) if !voice.is_empty() => {
                if self.text.trim().is_empty() {
                    voice.to_string()
                } else {
                    format!("{}\n{}", self.text, voice)
                }
            }
            _ => self.text.clone(),
        }
    }
}

/// Payload of the "new message with extracted data" sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForwardPayload {
    pub message_id: String,
    pub source_name: String,
    pub chat_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    pub sender_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Row>>,
    pub is_private: bool,
}

impl ForwardPayload {
    /// Verbatim forward sent before any extraction happens.
    pub fn initial(message: &NewMessage) -> Self {
        Self {
            message_id: message.message_id.clone(),
            source_name: message.source_name.clone(),
            chat_id: message.chat_id.clone(),
            text: message.text.clone(),
            sender_id: Some(message.sender_id.clone()).filter(|s| !s.is_empty()),
            sender_name: message.sender_name.clone(),
            image: message.image.clone(),
            data: None,
            is_private: message.is_private,
        }
    }

    /// Forward carrying rows, bound to `message`'s identity.
    pub fn with_rows(message: &NewMessage, rows: Vec<Row>) -> Self {
        Self {
            data: Some(rows),
            ..Self::initial(message)
        }
    }
}

/// Record submitted to the pending-message store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingMessage {
    pub sender_phone_number: String,
    pub sender_name: String,
    pub sender_id: String,
    pub original_message_text: String,
    /// Rows packed column-wise, every column padded to the row count
    pub formatted_message_text: BTreeMap<String, Vec<String>>,
    pub images: Vec<String>,
    pub extra: serde_json::Value,
}

impl PendingMessage {
    /// Packs `rows` column-wise. With no `columns` the union of row keys is used.
    pub fn from_rows(message: &NewMessage, columns: &[String], rows: &[Row]) -> Self {
        let columns: Vec<String> = if columns.is_empty() {
            let mut seen: Vec<String> = Vec::new();
            for key in rows.iter().flat_map(Row::keys) {
                if !seen.iter().any(|k| k == key) {
                    seen.push(key.to_string());
                }
            }
            seen
        } else {
            columns.to_vec()
        };

        let formatted_message_text = columns
            .into_iter()
            .map(|column| {
                let values = rows
                    .iter()
                    .map(|row| row.get(&column).unwrap_or_default().to_string())
                    .collect();
                (column, values)
            })
            .collect();

        Self {
            sender_phone_number: message.sender_id.clone(),
            sender_name: message.sender_name.clone(),
            sender_id: message.sender_id.clone(),
            original_message_text: message.content(),
            formatted_message_text,
            images: message.image.iter().cloned().collect(),
            extra: serde_json::json!({
                "message_id": message.message_id,
                "chat_id": message.chat_id,
                "source_name": message.source_name,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> NewMessage {
        NewMessage {
            message_id: "m-1".to_string(),
            source_name: "whatsapp".to_string(),
            chat_id: "chat-1".to_string(),
            text: "Пахота 120 га".to_string(),
            sender_id: "79990001122".to_string(),
            sender_name: "Иван".to_string(),
            image: None,
            voice: None,
            is_private: true,
        }
    }

    #[test]
    fn test_deserialize_minimal_event() {
        let json = r#"{"message_id":"1","source_name":"telegram","chat_id":"c","text":"hi"}"#;
        let msg: NewMessage = serde_json::from_str(json).unwrap();
        assert!(!msg.is_private);
        assert!(msg.sender_id.is_empty());
        assert_eq!(msg.image, None);
    }

    #[test]
    fn test_content_appends_transcription() {
        let mut msg = message();
        msg.voice = Some("Диск 40 га".to_string());
        assert_eq!(msg.content(), "Пахота 120 га\nДиск 40 га");

        msg.text = String::new();
        assert_eq!(msg.content(), "Диск 40 га");
    }

    #[test]
    fn test_initial_forward_omits_data() {
        let payload = ForwardPayload::initial(&message());
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("data").is_none());
        assert!(json.get("image").is_none());
        assert_eq!(json["sender_id"], "79990001122");
        assert_eq!(json["is_private"], true);
    }

    #[test]
    fn test_forward_with_rows() {
        let rows = vec![Row::from_pairs([("a", "1")])];
        let payload = ForwardPayload::with_rows(&message(), rows);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["data"], serde_json::json!([{"a": "1"}]));
        assert_eq!(json["message_id"], "m-1");
    }

    #[test]
    fn test_pending_message_packs_columns() {
        let columns = vec!["a".to_string(), "b".to_string()];
        let rows = vec![
            Row::from_pairs([("a", "1"), ("b", "2")]),
            Row::from_pairs([("a", "3")]),
        ];

        let pending = PendingMessage::from_rows(&message(), &columns, &rows);
        assert_eq!(pending.formatted_message_text["a"], vec!["1", "3"]);
        assert_eq!(pending.formatted_message_text["b"], vec!["2", ""]);
        assert!(pending.images.is_empty());
    }

    #[test]
    fn test_pending_message_without_columns_uses_row_keys() {
        let rows = vec![
            Row::from_pairs([("x", "1")]),
            Row::from_pairs([("y", "2")]),
        ];
        let pending = PendingMessage::from_rows(&message(), &[], &rows);
        assert_eq!(pending.formatted_message_text["x"], vec!["1", ""]);
        assert_eq!(pending.formatted_message_text["y"], vec!["", "2"]);
    }
}
