use std::collections::VecDeque;

use crate::shared::message::Message;

/// Bounded, ordered message log for one session
///
/// Ids are assigned monotonically; once the configured cap is exceeded the
/// oldest messages are dropped. The log lives only as long as the session.
#[derive(Debug)]
pub struct MessageLog {
    messages: VecDeque<Message>,
    next_id: u64,
    cap: usize,
}

impl MessageLog {
    pub fn new(cap: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            next_id: 1,
            cap,
        }
    }

    /// Append a chat message, assigning the next id
    pub fn append_chat(
        &mut self,
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
        body: impl Into<String>,
    ) -> Message {
        let message = Message::chat(self.take_id(), sender_id, sender_name, body);
        self.push(message.clone());
        message
    }

    /// Append a system notice, assigning the next id
    pub fn append_system(&mut self, body: impl Into<String>) -> Message {
        let message = Message::system(self.take_id(), body);
        self.push(message.clone());
        message
    }

    /// Snapshot of all retained messages, oldest first
    pub fn messages(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push(&mut self, message: Message) {
        self.messages.push_back(message);
        while self.messages.len() > self.cap {
            self.messages.pop_front();
        }
    }
}
