//! Client-side conversation state with optimistic sends.
//!
//! `Idle -> Sending -> Idle`. Entering `Sending` appends the user's message
//! locally and keeps a snapshot of the conversation as it was before. Success
//! replaces the whole conversation with the server's copy; failure restores the
//! snapshot exactly. The optimistic message and the server's echo are never
//! merged.

use log::{ debug, info, warn };

use super::RelayTransport;
use crate::error::ClientError;
use crate::models::chat::{ Conversation, Message, Sender };
use crate::models::wire::{ SendMessageRequest, SendMessageResponse };
use crate::transport;

pub const FAILURE_NOTICE: &str = "Failed to send message. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendState {
    Idle,
    Sending {
        snapshot: Conversation,
    },
}

/// What to put on the wire for a send that has just been started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingSend {
    pub chat_id: String,
    pub request: SendMessageRequest,
}

#[derive(Debug)]
pub struct ChatController {
    chat_id: String,
    conversation: Conversation,
    state: SendState,
    last_failure: Option<String>,
}

impl ChatController {
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self::with_conversation(chat_id, Conversation::default())
    }

    pub fn with_conversation(chat_id: impl Into<String>, conversation: Conversation) -> Self {
        Self {
            chat_id: chat_id.into(),
            conversation: conversation.sorted(),
            state: SendState::Idle,
            last_failure: None,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn state(&self) -> &SendState {
        &self.state
    }

    pub fn is_sending(&self) -> bool {
        matches!(self.state, SendState::Sending { .. })
    }

    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Starts a send. Returns `None` without touching state when the text is
    /// blank or a send is already in flight.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingSend> {
        if text.trim().is_empty() {
            debug!("Ignoring blank message");
            return None;
        }
        if self.is_sending() {
            debug!("Ignoring send while another is in flight");
            return None;
        }

        let snapshot = self.conversation.clone();
        let request = SendMessageRequest {
            message: Some(text.to_string()),
            conversation: transport::serialize(&snapshot),
        };

        self.conversation.push_sorted(Message::now(text, Sender::User));
        self.state = SendState::Sending { snapshot };

        Some(PendingSend {
            chat_id: self.chat_id.clone(),
            request,
        })
    }

    /// Settles the in-flight send. On success returns the coach's reply.
    pub fn finish_send(
        &mut self,
        result: Result<SendMessageResponse, ClientError>
    ) -> Result<Message, ClientError> {
        let snapshot = match std::mem::replace(&mut self.state, SendState::Idle) {
            SendState::Sending { snapshot } => snapshot,
            SendState::Idle => {
                return Err(ClientError::NotSending);
            }
        };

        let applied = result.and_then(|resp| {
            let reply = transport::deserialize_message(&resp.message)?;
            let conversation = transport::deserialize(&resp.conversation)?.sorted();
            Ok((reply, conversation))
        });

        match applied {
            Ok((reply, conversation)) => {
                info!("Send completed; conversation has {} message(s)", conversation.len());
                self.conversation = conversation;
                self.last_failure = None;
                Ok(reply)
            }
            Err(e) => {
                warn!("Send failed, restoring previous conversation: {}", e);
                self.conversation = snapshot;
                self.last_failure = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Runs a full send. `Ok(None)` means the send was refused as a no-op.
    pub async fn send<T: RelayTransport + ?Sized>(
        &mut self,
        transport: &T,
        text: &str
    ) -> Result<Option<Message>, ClientError> {
        let pending = match self.begin_send(text) {
            Some(p) => p,
            None => {
                return Ok(None);
            }
        };
        let result = transport.send_message(&pending.chat_id, &pending.request).await;
        self.finish_send(result).map(Some)
    }

    /// Empties the conversation. Refused while a send is in flight.
    pub fn clear(&mut self) -> bool {
        if self.is_sending() {
            return false;
        }
        self.conversation = Conversation::default();
        self.last_failure = None;
        true
    }
}
