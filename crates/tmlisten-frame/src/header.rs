//! Protocol header tags.
//!
//! Headers are plain constants with no state; the three values below are
//! the only tokens the controller speaks.

use std::fmt;
use std::str::FromStr;

use crate::error::FrameError;

/// Message category carried in the first field of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Header {
    /// `TMSTA`: status queries and their replies.
    StatusQuery,
    /// `TMSCT`: external script commands and their results.
    ScriptCommand,
    /// `CPERR`: communication errors reported by the controller.
    Error,
}

/// Status query header.
pub const TMSTA: Header = Header::StatusQuery;

/// Script command header.
pub const TMSCT: Header = Header::ScriptCommand;

/// Error report header.
pub const CPERR: Header = Header::Error;

impl Header {
    /// All headers, in wire-token order.
    pub const ALL: [Header; 3] = [Header::StatusQuery, Header::ScriptCommand, Header::Error];

    /// The literal wire token.
    pub const fn token(self) -> &'static str {
        match self {
            Header::StatusQuery => "TMSTA",
            Header::ScriptCommand => "TMSCT",
            Header::Error => "CPERR",
        }
    }

    /// Match a wire token exactly. `TMsct` is not `TMSCT`.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|header| header.token() == token)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Header {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| FrameError::BadHeader(s.to_string()))
    }
}

impl PartialEq<str> for Header {
    fn eq(&self, other: &str) -> bool {
        self.token() == other
    }
}

impl PartialEq<&str> for Header {
    fn eq(&self, other: &&str) -> bool {
        self.token() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip() {
        for header in Header::ALL {
            assert_eq!(Header::from_token(header.token()), Some(header));
            assert_eq!(header.to_string(), header.token());
        }
    }

    #[test]
    fn token_matching_is_case_sensitive() {
        assert_eq!(Header::from_token("TMsct"), None);
        assert_eq!(Header::from_token("tmsta"), None);
        assert!(matches!(
            "TMsct".parse::<Header>(),
            Err(FrameError::BadHeader(token)) if token == "TMsct"
        ));
    }

    #[test]
    fn compares_against_strings() {
        assert_eq!(TMSCT, "TMSCT");
        assert!(TMSTA != "TMSCT");
        assert_eq!(CPERR.token(), "CPERR");
    }
}
