use crate::core::error::AitermError;
use crate::providers::ChatTurn;

/// Number of user/assistant exchanges kept besides the system prompt.
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Conversation sent to the model on every round.
///
/// Element 0 is the system prompt and is never evicted. After `trim` the
/// buffer holds at most `2 * max_turns + 1` turns: the system prompt plus the
/// most recent `2 * max_turns` user/assistant turns.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    turns: Vec<ChatTurn>,
    max_turns: usize,
    // Turns dropped by the last trim of an uncommitted round.
    evicted: Vec<ChatTurn>,
}

impl HistoryBuffer {
    pub fn new(system_prompt: impl Into<String>, max_turns: usize) -> Self {
        Self {
            turns: vec![ChatTurn::system(system_prompt)],
            max_turns,
            evicted: Vec::new(),
        }
    }

    pub fn append_user(&mut self, text: impl Into<String>) -> Result<(), AitermError> {
        let text = text.into();
        if text.is_empty() {
            return Err(AitermError::EmptyInput);
        }
        self.evicted.clear();
        self.turns.push(ChatTurn::user(text));
        Ok(())
    }

    /// Appends the reply and commits the round: a later rollback can no
    /// longer bring back turns evicted while the round was pending.
    pub fn append_assistant(&mut self, text: impl Into<String>) {
        self.evicted.clear();
        self.turns.push(ChatTurn::assistant(text));
    }

    /// Drops the oldest non-system turns until the length invariant holds.
    pub fn trim(&mut self) {
        let limit = self.capacity();
        if self.turns.len() <= limit {
            return;
        }
        let excess = self.turns.len() - limit;
        let dropped: Vec<ChatTurn> = self.turns.drain(1..1 + excess).collect();
        self.evicted.extend(dropped);
    }

    /// Removes the most recently appended turn and puts back whatever the
    /// trim of that round evicted.
    pub fn rollback_last(&mut self) -> Result<ChatTurn, AitermError> {
        if self.turns.len() <= 1 {
            return Err(AitermError::EmptyHistory);
        }
        let last = self.turns.pop().ok_or(AitermError::EmptyHistory)?;
        let restored = std::mem::take(&mut self.evicted);
        self.turns.splice(1..1, restored);
        Ok(last)
    }

    pub fn capacity(&self) -> usize {
        2 * self.max_turns + 1
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }
}
