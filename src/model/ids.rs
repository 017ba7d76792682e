//! Identifier types for NeuroLine entities.
//!
//! Backend-assigned ids are positive integers. The client also synthesizes
//! placeholder ids for messages it appends optimistically before the backend
//! has acknowledged them; those are negative and allocated from a decreasing
//! counter owned by the session store, so they can never collide with an
//! authoritative id.

use core::fmt;
use core::num::ParseIntError;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declare an integer id newtype with a consistent API.
macro_rules! define_entity_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[repr(transparent)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wrap a raw id value.
            #[inline]
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Extract the raw id value.
            #[inline]
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }

            /// Whether this id is a client-local placeholder (negative).
            #[inline]
            #[must_use]
            pub const fn is_local(self) -> bool {
                self.0 < 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            #[inline]
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            #[inline]
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            #[inline]
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_entity_id!(
    /// Identifier of a project (workspace scoping a set of conversations).
    ProjectId
);

define_entity_id!(
    /// Identifier of an agent (named model configuration).
    AgentId
);

define_entity_id!(
    /// Identifier of a conversation.
    ///
    /// Allocated lazily by the backend on the first message of a turn sent
    /// without a conversation id.
    ConversationId
);

define_entity_id!(
    /// Identifier of a message within a conversation.
    MessageId
);
