//! Conversion between the in-memory conversation and its JSON wire shape.
//!
//! Only the timestamp changes representation: instants leave as ISO-8601 UTC
//! strings with millisecond precision and come back parsed. A string that does
//! not parse is an error, never a silent "now".

use chrono::{ DateTime, NaiveDateTime, SecondsFormat, Utc };

use crate::error::ClientError;
use crate::models::chat::{ Conversation, Message };
use crate::models::wire::{ WireConversation, WireMessage };

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Accepts RFC 3339 (any offset, normalised to UTC) and zone-less
/// `YYYY-MM-DDTHH:MM:SS[.fff]`, which is read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ClientError> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(naive.and_utc());
        }
    }
    Err(ClientError::MalformedTimestamp(raw.to_string()))
}

pub fn serialize_message(message: &Message) -> WireMessage {
    WireMessage {
        text: message.text.clone(),
        sender: message.sender,
        timestamp: format_timestamp(&message.timestamp),
    }
}

pub fn deserialize_message(message: &WireMessage) -> Result<Message, ClientError> {
    Ok(Message {
        text: message.text.clone(),
        sender: message.sender,
        timestamp: parse_timestamp(&message.timestamp)?,
    })
}

pub fn serialize(conversation: &Conversation) -> WireConversation {
    WireConversation {
        messages: conversation.messages.iter().map(serialize_message).collect(),
    }
}

/// Keeps wire order; callers sort before display.
pub fn deserialize(conversation: &WireConversation) -> Result<Conversation, ClientError> {
    let messages = conversation.messages
        .iter()
        .map(deserialize_message)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Conversation::new(messages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Sender;
    use chrono::TimeZone;

    fn sample() -> Conversation {
        Conversation::new(vec![
            Message::at("hello", Sender::User, Utc.timestamp_millis_opt(1_734_271_200_123).unwrap()),
            Message::at("hi there", Sender::Coach, Utc.timestamp_millis_opt(1_734_271_201_456).unwrap()),
        ])
    }

    #[test]
    fn formats_like_iso_strings_with_millis() {
        let stamp = Utc.timestamp_millis_opt(1_734_271_200_123).unwrap();
        assert_eq!(format_timestamp(&stamp), "2024-12-15T14:00:00.123Z");
    }

    #[test]
    fn round_trip_preserves_conversation() {
        let conv = sample();
        let back = deserialize(&serialize(&conv)).unwrap();
        assert_eq!(back, conv);
    }

    #[test]
    fn empty_conversation_round_trips() {
        let wire = serialize(&Conversation::default());
        assert!(wire.messages.is_empty());
        assert_eq!(deserialize(&wire).unwrap(), Conversation::default());
    }

    #[test]
    fn locally_stamped_message_round_trips() {
        let conv = Conversation::new(vec![Message::now("just typed", Sender::User)]);
        assert_eq!(deserialize(&serialize(&conv)).unwrap(), conv);
    }

    #[test]
    fn offset_stamps_come_back_in_utc() {
        let wire = WireConversation {
            messages: vec![WireMessage {
                text: "from new york".into(),
                sender: Sender::User,
                timestamp: "2025-12-15T10:00:00.500-05:00".into(),
            }],
        };
        let again = serialize(&deserialize(&wire).unwrap());
        assert_eq!(again.messages[0].timestamp, "2025-12-15T15:00:00.500Z");
    }

    #[test]
    fn parses_offsets_and_zoneless_stamps() {
        let expected = Utc.with_ymd_and_hms(2025, 12, 15, 15, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2025-12-15T15:00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-12-15T10:00:00-05:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-12-15T15:00:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2025-12-15T15:00:00.250000").unwrap(),
            expected + chrono::Duration::milliseconds(250)
        );
    }

    #[test]
    fn malformed_timestamp_is_an_error() {
        let wire = WireConversation {
            messages: vec![WireMessage {
                text: "x".into(),
                sender: Sender::User,
                timestamp: "yesterday-ish".into(),
            }],
        };
        assert_eq!(
            deserialize(&wire),
            Err(ClientError::MalformedTimestamp("yesterday-ish".into()))
        );
    }

    #[test]
    fn deserialize_keeps_wire_order() {
        let mut wire = serialize(&sample());
        wire.messages.reverse();
        let conv = deserialize(&wire).unwrap();
        assert_eq!(conv.messages[0].text, "hi there");
        assert!(!conv.is_sorted());
    }
}
