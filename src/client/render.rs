use chrono::{ DateTime, Local, TimeZone, Utc };

use crate::models::chat::{ Conversation, Message, Sender };

pub const EMPTY_TITLE: &str = "Start a conversation with your coach";
pub const EMPTY_HINT: &str = "Type a message below to get started";
pub const TYPING_INDICATOR: &str = "Coach is typing...";

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    format_timestamp_in(timestamp, &Local)
}

pub fn format_timestamp_in<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
    where Tz::Offset: std::fmt::Display
{
    timestamp.with_timezone(tz).format("%H:%M").to_string()
}

/// User lines are indented to read as right-hand bubbles.
pub fn render_message_in<Tz: TimeZone>(message: &Message, tz: &Tz) -> String
    where Tz::Offset: std::fmt::Display
{
    let indent = match message.sender {
        Sender::User => "        ",
        Sender::Coach => "",
    };
    let mut out = format!("{}{} [{}]\n", indent, message.sender, format_timestamp_in(&message.timestamp, tz));
    for line in message.text.lines() {
        out.push_str(indent);
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Renders in timestamp order regardless of the order held.
pub fn render_conversation_in<Tz: TimeZone>(conversation: &Conversation, tz: &Tz, sending: bool) -> String
    where Tz::Offset: std::fmt::Display
{
    let mut out = String::new();
    if conversation.is_empty() {
        out.push_str(EMPTY_TITLE);
        out.push('\n');
        out.push_str(EMPTY_HINT);
        out.push('\n');
    } else {
        for message in conversation.clone().sorted().messages.iter() {
            out.push_str(&render_message_in(message, tz));
        }
    }
    if sending {
        out.push_str(TYPING_INDICATOR);
        out.push('\n');
    }
    out
}

pub fn render_conversation(conversation: &Conversation, sending: bool) -> String {
    render_conversation_in(conversation, &Local, sending)
}
