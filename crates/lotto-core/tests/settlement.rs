use std::collections::HashSet;

use lotto_core::{
    DrawGenerator, Drawing, GameType, PrizeCategory, Ticket, default_categories, settle,
    validate,
};
use strum::IntoEnumIterator as _;

fn numbered(game: GameType) -> Vec<PrizeCategory> {
    default_categories(game)
        .into_iter()
        .zip(1..)
        .map(|(mut c, id)| {
            c.id = id;
            c
        })
        .collect()
}

#[test]
fn settle_is_deterministic() -> anyhow::Result<()> {
    let mut generator = DrawGenerator::with_seed(99);
    for game in GameType::iter() {
        let categories = numbered(game);
        for round in 0..50 {
            let drawn = generator.draw(game);
            let picked = generator.draw(game);
            let drawing = Drawing {
                id: round,
                game_type: game,
                numbers: drawn.numbers,
                bonus_number: drawn.bonus_number,
            };
            let ticket = Ticket {
                id: round + 1000,
                game_type: game,
                numbers: picked.numbers,
            };

            let first = serde_json::to_vec(&settle(&ticket, &drawing, &categories)?)?;
            let second = serde_json::to_vec(&settle(&ticket, &drawing, &categories)?)?;
            assert_eq!(first, second);
        }
    }
    Ok(())
}

#[test]
fn matched_count_equals_set_intersection() -> anyhow::Result<()> {
    let mut generator = DrawGenerator::with_seed(2024);
    for game in GameType::iter() {
        let categories = numbered(game);
        for round in 0..200 {
            let drawn = generator.draw(game);
            let picked = generator.draw(game);

            let expected = picked
                .numbers
                .iter()
                .collect::<HashSet<_>>()
                .intersection(&drawn.numbers.iter().collect::<HashSet<_>>())
                .count();

            let result = settle(
                &Ticket {
                    id: round,
                    game_type: game,
                    numbers: picked.numbers.clone(),
                },
                &Drawing {
                    id: 1,
                    game_type: game,
                    numbers: drawn.numbers.clone(),
                    bonus_number: drawn.bonus_number,
                },
                &categories,
            )?;

            assert_eq!(result.matched_numbers.len(), expected);
            assert!(result.matched_numbers.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(
                result.matched_bonus,
                drawn
                    .bonus_number
                    .is_some_and(|b| picked.numbers.contains(&b))
            );
            if result.prize_category_id.is_some() {
                assert!(result.prize_amount.is_some_and(|amount| amount >= 0));
            } else {
                assert_eq!(result.prize_amount, None);
            }
        }
    }
    Ok(())
}

#[test]
fn invalid_mega_sets_name_the_rule() {
    let cases: [(&[i32], &str); 4] = [
        (&[1, 2, 3, 4, 5], "expected 6 numbers"),
        (&[1, 2, 3, 4, 5, 6, 7], "expected 6 numbers"),
        (&[1, 2, 3, 4, 5, 5], "more than once"),
        (&[1, 2, 3, 4, 5, 46], "out of range"),
    ];
    for (numbers, rule) in cases {
        let errors = validate(GameType::Mega645, numbers, None).unwrap_err();
        assert!(
            errors.iter().any(|e| e.to_string().contains(rule)),
            "{numbers:?}: {errors}"
        );
    }
}
