use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Lottery variant. Every rule site matches on this exhaustively.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum GameType {
    /// 6 numbers out of 1-45
    #[serde(rename = "mega_6_45")]
    #[strum(serialize = "mega_6_45")]
    Mega645,
    /// 6 numbers out of 1-55, plus a bonus drawn by the authority
    #[serde(rename = "power_6_55")]
    #[strum(serialize = "power_6_55")]
    Power655,
}

/// How a game treats the bonus number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusRule {
    /// No bonus anywhere.
    None,
    /// Drawings carry exactly one bonus from the main range; tickets never pick one.
    Drawn,
}

/// Number rules for one game type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    pub pick_count: usize,
    pub min: i32,
    pub max: i32,
    pub bonus: BonusRule,
}

impl GameRules {
    pub fn range(&self) -> RangeInclusive<i32> {
        self.min..=self.max
    }

    pub fn contains(&self, number: i32) -> bool {
        self.range().contains(&number)
    }

    pub fn draws_bonus(&self) -> bool {
        self.bonus == BonusRule::Drawn
    }
}

impl GameType {
    pub const fn rules(self) -> GameRules {
        match self {
            Self::Mega645 => GameRules {
                pick_count: 6,
                min: 1,
                max: 45,
                bonus: BonusRule::None,
            },
            Self::Power655 => GameRules {
                pick_count: 6,
                min: 1,
                max: 55,
                bonus: BonusRule::Drawn,
            },
        }
    }

    /// Wire id, e.g. `mega_6_45`.
    pub fn id(self) -> &'static str {
        self.into()
    }

    /// Short route segment used by the HTTP API.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Mega645 => "mega",
            Self::Power655 => "power",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "mega" => Some(Self::Mega645),
            "power" => Some(Self::Power655),
            _ => None,
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Mega645 => "Mega 6/45",
            Self::Power655 => "Power 6/55",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr as _;
    use strum::IntoEnumIterator as _;

    #[test]
    fn id_round_trips_through_from_str() {
        for game in GameType::iter() {
            assert_eq!(GameType::from_str(game.id()), Ok(game));
            assert_eq!(game.to_string(), game.id());
        }
        assert!(GameType::from_str("lotto_5_35").is_err());
    }

    #[test]
    fn slugs_resolve() {
        for game in GameType::iter() {
            assert_eq!(GameType::from_slug(game.slug()), Some(game));
        }
        assert_eq!(GameType::from_slug("mega_6_45"), None);
    }

    #[test]
    fn serde_uses_snake_ids() {
        let json = serde_json::to_string(&GameType::Power655).unwrap();
        assert_eq!(json, "\"power_6_55\"");
        let game: GameType = serde_json::from_str("\"mega_6_45\"").unwrap();
        assert_eq!(game, GameType::Mega645);
    }

    #[test]
    fn rules_table() {
        let mega = GameType::Mega645.rules();
        assert_eq!((mega.pick_count, mega.min, mega.max), (6, 1, 45));
        assert!(!mega.draws_bonus());

        let power = GameType::Power655.rules();
        assert_eq!((power.pick_count, power.min, power.max), (6, 1, 55));
        assert!(power.draws_bonus());
        assert!(power.contains(55));
        assert!(!power.contains(0));
    }
}
