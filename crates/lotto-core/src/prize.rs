use std::cmp::Ordering;

use crate::game::GameType;
use crate::model::PrizeCategory;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TierError {
    #[error("category {name:?} belongs to {found}, expected {expected}")]
    WrongGame {
        name: String,
        expected: GameType,
        found: GameType,
    },
    #[error("category {name:?} requires {match_count} matches, but {game} draws only {pick_count}")]
    MatchCountTooHigh {
        name: String,
        game: GameType,
        match_count: usize,
        pick_count: usize,
    },
    #[error("category {name:?} requires a bonus match, but {game} draws no bonus")]
    BonusNotDrawn { name: String, game: GameType },
    #[error("category {name:?} has a negative prize amount {amount}")]
    NegativeAmount { name: String, amount: i64 },
    #[error("category {name:?} has prize percentage {percentage} outside 0-100")]
    InvalidPercentage { name: String, percentage: f64 },
    #[error("categories {first:?} and {second:?} both require {match_count} matches (bonus: {include_bonus})")]
    DuplicateTier {
        first: String,
        second: String,
        match_count: usize,
        include_bonus: bool,
    },
}

/// Precedence order of prize categories: more matches first, then bonus-required
/// before bonus-agnostic. Ties fall back to id so the order is total.
pub fn precedence(a: &PrizeCategory, b: &PrizeCategory) -> Ordering {
    b.match_count
        .cmp(&a.match_count)
        .then_with(|| b.include_bonus.cmp(&a.include_bonus))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn sort_by_precedence(categories: &mut [PrizeCategory]) {
    categories.sort_by(precedence);
}

/// Check that `categories` form a consistent prize table for `game`.
pub fn check_tiers(game: GameType, categories: &[PrizeCategory]) -> Result<(), TierError> {
    let rules = game.rules();
    let mut tiers: Vec<(usize, bool, &str)> = Vec::with_capacity(categories.len());

    for category in categories {
        let name = || category.name.clone();
        if category.game_type != game {
            return Err(TierError::WrongGame {
                name: name(),
                expected: game,
                found: category.game_type,
            });
        }
        if category.match_count > rules.pick_count {
            return Err(TierError::MatchCountTooHigh {
                name: name(),
                game,
                match_count: category.match_count,
                pick_count: rules.pick_count,
            });
        }
        if category.include_bonus && !rules.draws_bonus() {
            return Err(TierError::BonusNotDrawn { name: name(), game });
        }
        if category.prize_amount < 0 {
            return Err(TierError::NegativeAmount {
                name: name(),
                amount: category.prize_amount,
            });
        }
        if !(0.0..=100.0).contains(&category.prize_percentage) {
            return Err(TierError::InvalidPercentage {
                name: name(),
                percentage: category.prize_percentage,
            });
        }
        if let Some(&(match_count, include_bonus, first)) = tiers.iter().find(|(count, bonus, _)| {
            *count == category.match_count && *bonus == category.include_bonus
        }) {
            return Err(TierError::DuplicateTier {
                first: first.to_owned(),
                second: name(),
                match_count,
                include_bonus,
            });
        }
        tiers.push((category.match_count, category.include_bonus, &category.name));
    }

    Ok(())
}

/// Built-in prize table, already in precedence order. Ids are left at 0 for the store to assign.
pub fn default_categories(game: GameType) -> Vec<PrizeCategory> {
    let tier = |name: &str, match_count: usize, include_bonus: bool, amount: i64, pct: f64| {
        PrizeCategory {
            id: 0,
            game_type: game,
            name: name.to_owned(),
            match_count,
            include_bonus,
            prize_amount: amount,
            prize_percentage: pct,
        }
    };

    match game {
        GameType::Mega645 => vec![
            tier("Jackpot", 6, false, 12_000_000_000, 55.0),
            tier("First", 5, false, 10_000_000, 0.0),
            tier("Second", 4, false, 300_000, 0.0),
            tier("Third", 3, false, 30_000, 0.0),
        ],
        GameType::Power655 => vec![
            tier("Jackpot 1", 6, false, 30_000_000_000, 55.0),
            tier("Jackpot 2", 5, true, 3_000_000_000, 5.0),
            tier("First", 5, false, 40_000_000, 0.0),
            tier("Second", 4, false, 500_000, 0.0),
            tier("Third", 3, false, 50_000, 0.0),
        ],
    }
}
