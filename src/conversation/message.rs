//! The conversation transcript: ordered messages with append / replace.
//!
//! [`Conversation`] is the only shared mutable resource in the core.
//! [`push`](Conversation::push) returns a [`Slot`] **atomically with the
//! mutation** — callers must never compute an index from a length snapshot
//! taken before an await point, or interleaved pipelines would overwrite
//! each other's slots.  A slot also carries the transcript generation at
//! allocation time: [`clear`](Conversation::clear) bumps the generation, so
//! a pipeline that outlives an identity switch cannot write into the new
//! identity's transcript.  Shared as [`SharedConversation`]
//! (`Arc<Mutex<…>>`), which serializes every append/replace.

use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Who a transcript entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The speaking user (a resolved transcript).
    User,
    /// The remote assistant (an answer or a failure notice).
    Assistant,
    /// A transient in-flight marker, always eventually replaced.
    Placeholder,
}

// ---------------------------------------------------------------------------
// ConversationMessage
// ---------------------------------------------------------------------------

/// One entry in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationMessage {
    pub role: Role,
    pub text: String,
}

impl ConversationMessage {
    /// A resolved user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// A resolved assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    /// A transient placeholder with a status string.
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self {
            role: Role::Placeholder,
            text: text.into(),
        }
    }

    /// Returns `true` while this entry awaits its terminal replacement.
    pub fn is_placeholder(&self) -> bool {
        self.role == Role::Placeholder
    }
}

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// Handle to one transcript entry, as returned by
/// [`Conversation::push`].
///
/// Besides the index it records the generation the entry was allocated in;
/// a [`replace`](Conversation::replace) through a slot from a cleared
/// generation is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    index: usize,
    generation: u64,
}

impl Slot {
    /// Position of the entry within its generation's transcript.
    pub fn index(&self) -> usize {
        self.index
    }
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// Ordered, append/replace-only message sequence.
///
/// Insertion order is display order; entries are never reordered or removed
/// except by [`clear`](Self::clear) when the active user identity changes.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ConversationMessage>,
    /// Bumped by [`clear`](Self::clear); invalidates all outstanding slots.
    generation: u64,
}

impl Conversation {
    /// An empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its [`Slot`].
    ///
    /// The slot is captured under the same lock as the mutation, so it stays
    /// valid for a later [`replace`](Self::replace) even when other
    /// pipelines append in between.
    pub fn push(&mut self, message: ConversationMessage) -> Slot {
        self.messages.push(message);
        Slot {
            index: self.messages.len() - 1,
            generation: self.generation,
        }
    }

    /// Replace the message at `slot` in place; returns `true` if applied.
    ///
    /// A slot from a cleared generation is dropped (the transcript belongs
    /// to a new identity now).  Out-of-range indices are logged and ignored
    /// — the transcript must never panic on behalf of a buggy caller.
    pub fn replace(&mut self, slot: Slot, message: ConversationMessage) -> bool {
        if slot.generation != self.generation {
            log::debug!(
                "conversation: dropping replace from generation {} (now {})",
                slot.generation,
                self.generation
            );
            return false;
        }
        match self.messages.get_mut(slot.index) {
            Some(entry) => {
                *entry = message;
                true
            }
            None => {
                log::error!(
                    "conversation: replace({}) out of range (len={})",
                    slot.index,
                    self.messages.len()
                );
                false
            }
        }
    }

    /// The message at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&ConversationMessage> {
        self.messages.get(index)
    }

    /// All messages in display order.
    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// A clone of the transcript for rendering outside the lock.
    pub fn snapshot(&self) -> Vec<ConversationMessage> {
        self.messages.clone()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` for an empty transcript.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns `true` while any entry is still a placeholder.
    pub fn has_pending(&self) -> bool {
        self.messages.iter().any(ConversationMessage::is_placeholder)
    }

    /// Drop the whole transcript (active user identity changed).
    ///
    /// Bumps the generation so every outstanding [`Slot`] becomes stale.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.generation += 1;
    }
}

// ---------------------------------------------------------------------------
// SharedConversation
// ---------------------------------------------------------------------------

/// Thread-safe handle to the [`Conversation`].
///
/// Cheap to clone.  Lock for short critical sections only; never across an
/// `.await` point.
pub type SharedConversation = Arc<Mutex<Conversation>>;

/// Construct a new empty [`SharedConversation`].
pub fn new_shared_conversation() -> SharedConversation {
    Arc::new(Mutex::new(Conversation::new()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- push / replace ----

    #[test]
    fn push_returns_sequential_indices() {
        let mut conv = Conversation::new();
        assert_eq!(conv.push(ConversationMessage::user("a")).index(), 0);
        assert_eq!(conv.push(ConversationMessage::assistant("b")).index(), 1);
        assert_eq!(conv.push(ConversationMessage::placeholder("c")).index(), 2);
        assert_eq!(conv.len(), 3);
    }

    #[test]
    fn replace_targets_only_its_index() {
        let mut conv = Conversation::new();
        let i = conv.push(ConversationMessage::placeholder("wait"));
        conv.push(ConversationMessage::assistant("later"));

        assert!(conv.replace(i, ConversationMessage::user("hello")));

        assert_eq!(
            conv.get(i.index()).unwrap(),
            &ConversationMessage::user("hello")
        );
        assert_eq!(
            conv.get(1).unwrap(),
            &ConversationMessage::assistant("later")
        );
    }

    #[test]
    fn replace_out_of_range_is_ignored() {
        let mut conv = Conversation::new();
        conv.push(ConversationMessage::user("only"));
        let bogus = Slot {
            index: 5,
            generation: 0,
        };
        assert!(!conv.replace(bogus, ConversationMessage::assistant("nope")));
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.get(0).unwrap().text, "only");
    }

    #[test]
    fn replace_from_previous_generation_is_dropped() {
        let mut conv = Conversation::new();
        let stale = conv.push(ConversationMessage::placeholder("wait"));
        conv.clear();
        let fresh = conv.push(ConversationMessage::user("fresh"));

        // The stale slot points at the same index as the new entry; the
        // generation check must protect it.
        assert_eq!(stale.index(), fresh.index());
        assert!(!conv.replace(stale, ConversationMessage::user("late")));
        assert_eq!(conv.get(0).unwrap(), &ConversationMessage::user("fresh"));

        assert!(conv.replace(fresh, ConversationMessage::user("edited")));
        assert_eq!(conv.get(0).unwrap(), &ConversationMessage::user("edited"));
    }

    // ---- queries ----

    #[test]
    fn has_pending_tracks_placeholders() {
        let mut conv = Conversation::new();
        assert!(!conv.has_pending());

        let i = conv.push(ConversationMessage::placeholder("…"));
        assert!(conv.has_pending());

        assert!(conv.replace(i, ConversationMessage::user("done")));
        assert!(!conv.has_pending());
    }

    #[test]
    fn snapshot_is_detached() {
        let mut conv = Conversation::new();
        conv.push(ConversationMessage::user("a"));
        let snap = conv.snapshot();
        conv.clear();

        assert_eq!(snap.len(), 1);
        assert!(conv.is_empty());
    }

    #[test]
    fn clear_empties_transcript() {
        let mut conv = Conversation::new();
        conv.push(ConversationMessage::user("a"));
        conv.push(ConversationMessage::assistant("b"));
        conv.clear();
        assert!(conv.is_empty());
        assert_eq!(conv.len(), 0);
    }

    // ---- roles ----

    #[test]
    fn constructors_set_roles() {
        assert_eq!(ConversationMessage::user("x").role, Role::User);
        assert_eq!(ConversationMessage::assistant("x").role, Role::Assistant);
        assert_eq!(
            ConversationMessage::placeholder("x").role,
            Role::Placeholder
        );
        assert!(ConversationMessage::placeholder("x").is_placeholder());
        assert!(!ConversationMessage::user("x").is_placeholder());
    }

    #[test]
    fn shared_conversation_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedConversation>();
    }

    #[test]
    fn shared_conversation_push_is_atomic_with_index() {
        let conv = new_shared_conversation();
        let conv2 = Arc::clone(&conv);

        let i = conv.lock().unwrap().push(ConversationMessage::user("one"));
        let j = conv2
            .lock()
            .unwrap()
            .push(ConversationMessage::user("two"));

        assert!(i.index() < j.index());
        assert_eq!(conv.lock().unwrap().len(), 2);
    }
}
