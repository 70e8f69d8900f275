//! Opaque conversation state threaded through text-generation exchanges.

use serde::{Deserialize, Serialize};

/// Accumulated dialogue state returned by a stateful text-generation service.
///
/// The orchestrator never looks inside a context; it only hands the latest one
/// back to the next exchange. Each exchange yields a replacement, never a
/// merge. Transport implementations convert it to and from their wire
/// representation with [`from_tokens`](Self::from_tokens) and
/// [`tokens`](Self::tokens).
///
/// # Examples
///
/// ```
/// use fable_core::ConversationContext;
///
/// let context = ConversationContext::from_tokens(vec![733, 16289, 28793]);
/// assert_eq!(context.len(), 3);
/// assert_eq!(serde_json::to_string(&context).unwrap(), "[733,16289,28793]");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationContext(Vec<i64>);

impl ConversationContext {
    /// Wrap the state markers a transport received.
    pub fn from_tokens(tokens: impl Into<Vec<i64>>) -> Self {
        Self(tokens.into())
    }

    /// The state markers, for transports that must send them back.
    pub fn tokens(&self) -> &[i64] {
        &self.0
    }

    /// Number of state markers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the service returned no state at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
