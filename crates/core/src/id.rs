// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed entity identifiers.
//!
//! Every persisted entity gets a string id of the form `{prefix}{nanoid}`,
//! where the 4-character prefix names the entity kind. Ids are plain strings
//! on the wire and in JSON (`#[serde(transparent)]`).

/// Number of random characters appended to the type prefix.
pub const ID_RANDOM_LEN: usize = 19;

/// Define a string-backed id newtype with a type prefix.
///
/// Generates `random()` for id generation, `new()` for wrapping an existing
/// string, `as_str()`, plus `Display`, `From`, `AsRef`, `Borrow<str>` and
/// `PartialEq<str>` implementations.
///
/// ```ignore
/// crate::define_id! {
///     /// Doc comment for the id type.
///     pub struct CampaignId("cmp-");
/// }
/// ```
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($prefix:literal);
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Generate a fresh random id with the type prefix.
            pub fn random() -> Self {
                Self(format!(
                    "{}{}",
                    Self::PREFIX,
                    nanoid::nanoid!(($crate::id::ID_RANDOM_LEN))
                ))
            }

            /// Wrap an existing id string (parsing, test fixtures).
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

crate::define_id! {
    /// Unique identifier for a campaign aggregate.
    pub struct CampaignId("cmp-");
}

crate::define_id! {
    /// Unique identifier for a queued campaign job.
    pub struct JobId("job-");
}

crate::define_id! {
    /// Unique identifier for a state event.
    pub struct EventId("evt-");
}

crate::define_id! {
    /// Unique identifier for an audit-log entry.
    pub struct AuditId("aud-");
}

crate::define_id! {
    /// Unique identifier for a resolver or HTTP persona.
    pub struct PersonaId("per-");
}

crate::define_id! {
    /// Unique identifier for a keyword set.
    pub struct KeywordSetId("kws-");
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
