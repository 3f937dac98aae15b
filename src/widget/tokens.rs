//! Enumerations that travel as string tokens.
//!
//! Each variant has exactly one canonical wire token. Decoding is exact-match:
//! `"Cover"` is not `"cover"`, and an unknown token is an error rather than a
//! fallback to some default.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ZoomistError};

/// How the image fills its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fill {
    Cover,
    Contain,
    None,
}

impl Fill {
    pub const ALL: [Fill; 3] = [Fill::Cover, Fill::Contain, Fill::None];

    pub fn token(self) -> &'static str {
        match self {
            Fill::Cover => "cover",
            Fill::Contain => "contain",
            Fill::None => "none",
        }
    }

    pub fn from_token(token: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.token() == token)
            .ok_or_else(|| ZoomistError::UnrecognizedToken {
                kind: "fill",
                token: token.to_string(),
            })
    }
}

/// Slider axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Horizontal, Direction::Vertical];

    pub fn token(self) -> &'static str {
        match self {
            Direction::Horizontal => "horizontal",
            Direction::Vertical => "vertical",
        }
    }

    pub fn from_token(token: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.token() == token)
            .ok_or_else(|| ZoomistError::UnrecognizedToken {
                kind: "direction",
                token: token.to_string(),
            })
    }
}

macro_rules! token_impls {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }

        impl FromStr for $ty {
            type Err = ZoomistError;

            fn from_str(s: &str) -> Result<Self> {
                Self::from_token(s)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.token())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let token = String::deserialize(deserializer)?;
                Self::from_token(&token).map_err(serde::de::Error::custom)
            }
        }
    };
}

token_impls!(Fill);
token_impls!(Direction);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_tokens_round_trip() {
        for fill in Fill::ALL {
            assert_eq!(Fill::from_token(fill.token()).unwrap(), fill);
            assert_eq!(fill.to_string().parse::<Fill>().unwrap(), fill);
        }
    }

    #[test]
    fn test_unknown_token_is_error() {
        assert!(matches!(
            Fill::from_token("stretch"),
            Err(ZoomistError::UnrecognizedToken { kind: "fill", .. })
        ));
        // Case matters: the enum name is not the token
        assert!(Fill::from_token("NONE").is_err());
        assert!(Direction::from_token("Vertical").is_err());
    }

    #[test]
    fn test_serde_uses_tokens() {
        assert_eq!(serde_json::to_string(&Direction::Vertical).unwrap(), "\"vertical\"");
        let d: Direction = serde_json::from_str("\"horizontal\"").unwrap();
        assert_eq!(d, Direction::Horizontal);
        assert!(serde_json::from_str::<Fill>("\"tile\"").is_err());
    }
}
