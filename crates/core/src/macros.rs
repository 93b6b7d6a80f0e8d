// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros for reducing boilerplate.
//!
//! - [`status_strings!`] — paired `Display`/`FromStr` impls over a
//!   variant ↔ string table
//! - [`test_builder!`] — test-only builder struct gated behind the
//!   `test-support` feature
//! - [`request_setters!`] — fluent setter methods for request structs

/// Error returned by the `FromStr` impls generated by [`status_strings!`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what}: {got:?}")]
pub struct ParseEnumError {
    pub what: &'static str,
    pub got: String,
}

/// Generate matching `Display` and `FromStr` impls from one table.
///
/// The same strings are used in both directions, so anything the system
/// prints (event states, log fields) can be parsed back during replay.
///
/// ```ignore
/// crate::status_strings! {
///     PhaseStatus {
///         NotStarted => "not_started",
///         InProgress => "in_progress",
///     }
/// }
/// ```
#[macro_export]
macro_rules! status_strings {
    ($ty:ident { $( $variant:ident => $str:literal ),+ $(,)? }) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant => $str, )+
                })
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::macros::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $str => Ok(Self::$variant), )+
                    other => Err($crate::macros::ParseEnumError {
                        what: stringify!($ty),
                        got: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// Generate a test builder (struct + Default + setters + `build()`).
///
/// Every field setter takes `impl Into<T>`; defaults are plain expressions.
/// Fields under `opt` are `Option<T>` in the target and default to `None`.
/// All generated items are gated behind `#[cfg(any(test, feature = "test-support"))]`.
///
/// ```ignore
/// crate::test_builder! {
///     pub struct CampaignBuilder => Campaign {
///         name: String = "test-campaign",
///         total_items: u64 = 0;
///         opt {
///             error_message: String,
///         }
///     }
/// }
/// ```
#[macro_export]
macro_rules! test_builder {
    (
        pub struct $builder:ident => $target:ident {
            $( $field:ident : $ty:ty = $default:expr ),+ $(,)?
        }
    ) => {
        $crate::test_builder! {
            pub struct $builder => $target {
                $( $field : $ty = $default ),+ ;
                opt {}
            }
        }
    };
    (
        pub struct $builder:ident => $target:ident {
            $( $field:ident : $ty:ty = $default:expr ),+ ;
            opt {
                $( $opt_field:ident : $opt_ty:ty ),* $(,)?
            }
        }
    ) => {
        #[cfg(any(test, feature = "test-support"))]
        pub struct $builder {
            $( $field: $ty, )+
            $( $opt_field: Option<$opt_ty>, )*
        }

        #[cfg(any(test, feature = "test-support"))]
        impl Default for $builder {
            fn default() -> Self {
                Self {
                    $( $field: ($default).into(), )+
                    $( $opt_field: None, )*
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $(
                pub fn $field(mut self, v: impl Into<$ty>) -> Self {
                    self.$field = v.into();
                    self
                }
            )+

            $(
                pub fn $opt_field(mut self, v: impl Into<$opt_ty>) -> Self {
                    self.$opt_field = Some(v.into());
                    self
                }
            )*

            pub fn build(self) -> $target {
                $target {
                    $( $field: self.$field, )+
                    $( $opt_field: self.$opt_field, )*
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $target {
            /// Create a builder with test defaults.
            pub fn builder() -> $builder {
                $builder::default()
            }
        }
    };
}

/// Generate fluent setter methods inside an existing `impl` block.
///
/// Plain fields get an `impl Into<T>` setter; fields under `opt` wrap the
/// value in `Some`.
///
/// ```ignore
/// impl CreateCampaignRequest {
///     svy_core::request_setters! {
///         owner: String;
///         opt { metadata: serde_json::Value }
///     }
/// }
/// ```
#[macro_export]
macro_rules! request_setters {
    (
        $( $field:ident : $ty:ty ),* $(,)?
    ) => {
        $(
            pub fn $field(mut self, v: impl Into<$ty>) -> Self {
                self.$field = v.into();
                self
            }
        )*
    };
    (
        $( $field:ident : $ty:ty ),+ ;
        opt {
            $( $opt_field:ident : $opt_ty:ty ),* $(,)?
        }
    ) => {
        $(
            pub fn $field(mut self, v: impl Into<$ty>) -> Self {
                self.$field = v.into();
                self
            }
        )+

        $(
            pub fn $opt_field(mut self, v: impl Into<$opt_ty>) -> Self {
                self.$opt_field = Some(v.into());
                self
            }
        )*
    };
    (
        opt {
            $( $opt_field:ident : $opt_ty:ty ),* $(,)?
        }
    ) => {
        $(
            pub fn $opt_field(mut self, v: impl Into<$opt_ty>) -> Self {
                self.$opt_field = Some(v.into());
                self
            }
        )*
    };
}

#[cfg(test)]
#[path = "macros_tests.rs"]
mod tests;
