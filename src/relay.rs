//! The send-message operation, independent of the HTTP layer.
//!
//! The relay is stateless: the caller supplies the whole conversation on every
//! call and receives a new one with the user message and the coach reply
//! appended at the end. Prior messages pass through untouched, so the returned
//! array is only sorted if the input was; callers re-sort.

use log::{ error, info, warn };

use crate::error::RelayError;
use crate::llm::chat::ChatClient;
use crate::models::chat::{ now_millis, Role, Sender, TranscriptTurn };
use crate::models::wire::{ SendMessageRequest, SendMessageResponse, WireConversation, WireMessage };
use crate::transport::format_timestamp;

pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const EMPTY_COMPLETION: &str = "Provider returned an empty completion";

/// Rejects absent and whitespace-only messages. The accepted text is returned untrimmed.
pub fn validate_message(message: Option<&str>) -> Result<&str, RelayError> {
    match message {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(RelayError::InvalidRequest(MESSAGE_REQUIRED.to_string())),
    }
}

/// Prior messages in their original order, then the new message as a user turn.
pub fn build_transcript(conversation: &WireConversation, message: &str) -> Vec<TranscriptTurn> {
    conversation.messages
        .iter()
        .map(|msg| TranscriptTurn::new(msg.sender.role(), msg.text.clone()))
        .chain(std::iter::once(TranscriptTurn::new(Role::User, message)))
        .collect()
}

pub async fn send_message(
    client: &dyn ChatClient,
    model: &str,
    chat_id: &str,
    request: SendMessageRequest
) -> Result<SendMessageResponse, RelayError> {
    let text = match validate_message(request.message.as_deref()) {
        Ok(text) => text.to_string(),
        Err(e) => {
            warn!("Rejected send for chat {}: {}", chat_id, e);
            return Err(e);
        }
    };

    let received_at = now_millis();
    let transcript = build_transcript(&request.conversation, &text);
    info!(
        "Relaying chat {}: {} prior message(s), model {}",
        chat_id,
        request.conversation.messages.len(),
        model
    );

    let completion = client.complete(model, &transcript).await.map_err(|e| {
        error!("Error handling chat message for {}: {}", chat_id, e);
        RelayError::ProcessingFailure(e.to_string())
    })?;
    if completion.response.trim().is_empty() {
        error!("Empty completion for chat {} from model {}", chat_id, model);
        return Err(RelayError::ProcessingFailure(EMPTY_COMPLETION.to_string()));
    }

    let replied_at = now_millis().max(received_at);
    let user_message = WireMessage {
        text,
        sender: Sender::User,
        timestamp: format_timestamp(&received_at),
    };
    let coach_message = WireMessage {
        text: completion.response,
        sender: Sender::Coach,
        timestamp: format_timestamp(&replied_at),
    };

    let mut messages = request.conversation.messages;
    messages.push(user_message);
    messages.push(coach_message.clone());
    info!("Chat {} now holds {} message(s)", chat_id, messages.len());

    Ok(SendMessageResponse {
        message: coach_message,
        conversation: WireConversation { messages },
    })
}
