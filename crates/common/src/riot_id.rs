//! Riot ID (`GameName#TagLine`) parsing.

use std::fmt;

use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiotId {
    pub game_name: String,
    pub tag_line: String,
}

impl RiotId {
    /// Parse `GameName#TagLine` or the URL form `GameName-TagLine`.
    ///
    /// Game names may contain `-`, so the split happens on the last separator.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let raw = raw.trim();
        let split_at = raw.rfind('#').or_else(|| raw.rfind('-'));

        let Some(idx) = split_at else {
            return Err(Error::InvalidRiotId(format!(
                "{raw:?}: expected GameName-TagLine or GameName#TagLine"
            )));
        };

        let game_name = raw[..idx].trim();
        let tag_line = raw[idx + 1..].trim();
        if game_name.is_empty() || tag_line.is_empty() {
            return Err(Error::InvalidRiotId(format!(
                "{raw:?}: game name and tag line must both be present"
            )));
        }

        Ok(Self {
            game_name: game_name.to_string(),
            tag_line: tag_line.to_string(),
        })
    }
}

impl fmt::Display for RiotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.game_name, self.tag_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hash_form() {
        let id = RiotId::parse("Faker#KR1").unwrap();
        assert_eq!(id.game_name, "Faker");
        assert_eq!(id.tag_line, "KR1");
        assert_eq!(id.to_string(), "Faker#KR1");
    }

    #[test]
    fn test_parse_splits_on_last_hyphen() {
        let id = RiotId::parse("Blade-Of-Silence-EUW").unwrap();
        assert_eq!(id.game_name, "Blade-Of-Silence");
        assert_eq!(id.tag_line, "EUW");
    }

    #[test]
    fn test_hash_wins_over_hyphen() {
        let id = RiotId::parse("Some-Name#NA1").unwrap();
        assert_eq!(id.game_name, "Some-Name");
        assert_eq!(id.tag_line, "NA1");
    }

    #[test]
    fn test_rejects_missing_parts() {
        assert!(RiotId::parse("Faker").is_err());
        assert!(RiotId::parse("-KR1").is_err());
        assert!(RiotId::parse("Faker-").is_err());
        assert!(RiotId::parse("#").is_err());
    }
}
