use chrono::{ DateTime, SubsecRound, Utc };
use serde::{ Deserialize, Serialize };
use std::cmp::Ordering;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Coach,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "User",
            Sender::Coach => "Coach",
        }
    }

    /// Role this sender takes in a completion transcript.
    pub fn role(&self) -> Role {
        match self {
            Sender::User => Role::User,
            Sender::Coach => Role::Assistant,
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Stamps the message with the current time at wire precision (milliseconds).
    pub fn now(text: impl Into<String>, sender: Sender) -> Self {
        Self::at(text, sender, now_millis())
    }

    pub fn at(text: impl Into<String>, sender: Sender, timestamp: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp,
        }
    }
}

/// Current UTC time truncated to milliseconds.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Ascending by timestamp. Ties compare equal; callers rely on a stable sort
/// so equal stamps keep their arrival order.
pub fn compare(a: &Message, b: &Message) -> Ordering {
    a.timestamp.cmp(&b.timestamp)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Conversation {
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn sort(&mut self) {
        self.messages.sort_by(compare);
    }

    pub fn sorted(mut self) -> Self {
        self.sort();
        self
    }

    pub fn is_sorted(&self) -> bool {
        self.messages.windows(2).all(|w| compare(&w[0], &w[1]) != Ordering::Greater)
    }

    /// Appends and re-sorts.
    pub fn push_sorted(&mut self, message: Message) {
        self.messages.push(message);
        self.sort();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One role-tagged unit of the transcript handed to the completion provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub role: Role,
    pub content: String,
}

impl TranscriptTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}
