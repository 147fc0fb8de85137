//! Macro for implementing Display and FromStr for wire-name enums
//!
//! Several domain enums (`ErrorKind`, `HttpMethod`) have a canonical string
//! form that travels over the wire or shows up in logs. This macro provides
//! both conversions from a single mapping table. Parsing is ASCII
//! case-insensitive; output always uses the canonical spelling.
//!
//! # Example
//!
//! ```rust
//! use ron_sdk_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Verb {
//!     Fetch,
//!     Store,
//! }
//!
//! impl_wire_name_conversions!(Verb {
//!     Fetch => "fetch",
//!     Store => "store",
//! });
//!
//! assert_eq!(Verb::Fetch.to_string(), "fetch");
//! assert_eq!("STORE".parse::<Verb>().ok(), Some(Verb::Store));
//! ```

/// Implements `Display`, `FromStr` and `as_str` for wire-name enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their canonical string
///   representations
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical string form of this value.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
