//! Macro for implementing Display and FromStr for fieldless domain enums
//!
//! # Example
//!
//! ```rust
//! use matchfeed_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Outcome {
//!     Win,
//!     Loss,
//! }
//!
//! impl_domain_status_conversions!(Outcome {
//!     Win => "win",
//!     Loss => "loss",
//! });
//!
//! assert_eq!(Outcome::Win.to_string(), "win");
//! assert_eq!("LOSS".parse::<Outcome>(), Ok(Outcome::Loss));
//! ```

/// Implements Display and FromStr traits for fieldless enums
///
/// Display writes the given lowercase string; FromStr parses it back
/// case-insensitively and reports the enum name on failure.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
