use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::game::{BonusRule, GameType};

pub const NUMBERS_FIELD: &str = "numbers";
pub const BONUS_FIELD: &str = "bonus_number";

/// One rule violation found in a set of numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("expected {expected} numbers, got {actual}")]
    WrongCount { expected: usize, actual: usize },
    #[error("number {value} appears more than once")]
    Duplicate { value: i32 },
    #[error("number {value} is out of range ({min}-{max})")]
    OutOfRange { value: i32, min: i32, max: i32 },
    #[error("{game} does not use a bonus number")]
    BonusNotAllowed { game: GameType },
    #[error("{game} drawings require a bonus number")]
    BonusMissing { game: GameType },
    #[error("bonus number {value} is out of range ({min}-{max})")]
    BonusOutOfRange { value: i32, min: i32, max: i32 },
    #[error("bonus number {value} duplicates a main number")]
    BonusDuplicatesNumber { value: i32 },
}

impl ValidationError {
    /// Request field the violation refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::WrongCount { .. } | Self::Duplicate { .. } | Self::OutOfRange { .. } => {
                NUMBERS_FIELD
            }
            Self::BonusNotAllowed { .. }
            | Self::BonusMissing { .. }
            | Self::BonusOutOfRange { .. }
            | Self::BonusDuplicatesNumber { .. } => BONUS_FIELD,
        }
    }
}

/// Every violation found by one validation pass, in check order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .iter()
                .map(|e| format!("{}: {e}", e.field()))
                .collect::<Vec<_>>()
                .join("; ")
        )
    }
}

impl std::error::Error for ValidationErrors {}

/// Check `numbers` and an optional `bonus` against the rules of `game`.
///
/// All violations are collected; the result is `Ok` only when none were found.
pub fn validate(
    game: GameType,
    numbers: &[i32],
    bonus: Option<i32>,
) -> Result<(), ValidationErrors> {
    check(game, numbers, bonus, false).into_result()
}

/// Validation for a player's ticket. Tickets never carry a bonus pick.
pub fn validate_ticket(game: GameType, numbers: &[i32]) -> Result<(), ValidationErrors> {
    check(game, numbers, None, false).into_result()
}

/// Validation for an authoritative drawing, which must carry the bonus when the game draws one.
pub fn validate_drawing(
    game: GameType,
    numbers: &[i32],
    bonus: Option<i32>,
) -> Result<(), ValidationErrors> {
    check(game, numbers, bonus, true).into_result()
}

fn check(
    game: GameType,
    numbers: &[i32],
    bonus: Option<i32>,
    bonus_required: bool,
) -> ValidationErrors {
    let rules = game.rules();
    let mut errors = Vec::new();

    if numbers.len() != rules.pick_count {
        errors.push(ValidationError::WrongCount {
            expected: rules.pick_count,
            actual: numbers.len(),
        });
    }

    let mut seen: BTreeMap<i32, usize> = BTreeMap::new();
    for &n in numbers {
        *seen.entry(n).or_insert(0) += 1;
    }
    errors.extend(
        seen.iter()
            .filter(|&(_, &count)| count > 1)
            .map(|(&value, _)| ValidationError::Duplicate { value }),
    );

    // each distinct offending value once
    errors.extend(
        seen.keys()
            .filter(|&&n| !rules.contains(n))
            .map(|&value| ValidationError::OutOfRange {
                value,
                min: rules.min,
                max: rules.max,
            }),
    );

    match (rules.bonus, bonus) {
        (BonusRule::None, Some(_)) => errors.push(ValidationError::BonusNotAllowed { game }),
        (BonusRule::Drawn, None) if bonus_required => {
            errors.push(ValidationError::BonusMissing { game });
        }
        (BonusRule::Drawn, Some(value)) => {
            if !rules.contains(value) {
                errors.push(ValidationError::BonusOutOfRange {
                    value,
                    min: rules.min,
                    max: rules.max,
                });
            }
            if seen.contains_key(&value) {
                errors.push(ValidationError::BonusDuplicatesNumber { value });
            }
        }
        (BonusRule::None | BonusRule::Drawn, None) => {}
    }

    ValidationErrors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors_of(result: Result<(), ValidationErrors>) -> Vec<ValidationError> {
        result.err().map(|e| e.0).unwrap_or_default()
    }

    #[test]
    fn valid_mega_sets_pass() {
        assert!(validate(GameType::Mega645, &[1, 2, 3, 4, 5, 6], None).is_ok());
        assert!(validate(GameType::Mega645, &[45, 1, 30, 12, 7, 22], None).is_ok());
        assert!(validate_ticket(GameType::Mega645, &[40, 41, 42, 43, 44, 45]).is_ok());
        assert!(validate_drawing(GameType::Mega645, &[1, 9, 17, 25, 33, 41], None).is_ok());
    }

    #[test]
    fn every_mega_set_in_range_passes() {
        // sliding windows over the whole range
        for start in 1..=40 {
            let numbers: Vec<i32> = (start..start + 6).collect();
            assert!(
                validate(GameType::Mega645, &numbers, None).is_ok(),
                "{numbers:?} should be valid"
            );
        }
    }

    #[test]
    fn wrong_count_is_reported() {
        let errors = errors_of(validate(GameType::Mega645, &[1, 2, 3, 4, 5], None));
        assert_eq!(
            errors,
            vec![ValidationError::WrongCount {
                expected: 6,
                actual: 5
            }]
        );

        let errors = errors_of(validate(GameType::Mega645, &[1, 2, 3, 4, 5, 6, 7], None));
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::WrongCount { actual: 7, .. }]
        ));
    }

    #[test]
    fn duplicates_are_reported_once_per_value() {
        let errors = errors_of(validate(GameType::Mega645, &[5, 5, 5, 9, 9, 1], None));
        assert_eq!(
            errors,
            vec![
                ValidationError::Duplicate { value: 5 },
                ValidationError::Duplicate { value: 9 },
            ]
        );
    }

    #[test]
    fn out_of_range_values_are_reported() {
        let errors = errors_of(validate(GameType::Mega645, &[0, 2, 3, 4, 5, 46], None));
        assert_eq!(
            errors,
            vec![
                ValidationError::OutOfRange {
                    value: 0,
                    min: 1,
                    max: 45
                },
                ValidationError::OutOfRange {
                    value: 46,
                    min: 1,
                    max: 45
                },
            ]
        );
        // 46..=55 is fine for power
        assert!(validate_ticket(GameType::Power655, &[46, 47, 48, 49, 50, 55]).is_ok());
    }

    #[test]
    fn checks_accumulate() {
        let errors = errors_of(validate(GameType::Mega645, &[3, 3, 99], Some(4)));
        assert_eq!(
            errors,
            vec![
                ValidationError::WrongCount {
                    expected: 6,
                    actual: 3
                },
                ValidationError::Duplicate { value: 3 },
                ValidationError::OutOfRange {
                    value: 99,
                    min: 1,
                    max: 45
                },
                ValidationError::BonusNotAllowed {
                    game: GameType::Mega645
                },
            ]
        );
    }

    #[test]
    fn mega_rejects_bonus() {
        let errors = errors_of(validate_drawing(
            GameType::Mega645,
            &[1, 2, 3, 4, 5, 6],
            Some(7),
        ));
        assert_eq!(
            errors,
            vec![ValidationError::BonusNotAllowed {
                game: GameType::Mega645
            }]
        );
    }

    #[test]
    fn power_bonus_rules() {
        let numbers = [1, 2, 3, 4, 5, 6];
        assert!(validate(GameType::Power655, &numbers, None).is_ok());
        assert!(validate(GameType::Power655, &numbers, Some(55)).is_ok());
        assert!(validate_drawing(GameType::Power655, &numbers, Some(7)).is_ok());

        assert_eq!(
            errors_of(validate_drawing(GameType::Power655, &numbers, None)),
            vec![ValidationError::BonusMissing {
                game: GameType::Power655
            }]
        );
        assert_eq!(
            errors_of(validate(GameType::Power655, &numbers, Some(56))),
            vec![ValidationError::BonusOutOfRange {
                value: 56,
                min: 1,
                max: 55
            }]
        );
        assert_eq!(
            errors_of(validate(GameType::Power655, &numbers, Some(6))),
            vec![ValidationError::BonusDuplicatesNumber { value: 6 }]
        );
    }

    #[test]
    fn fields_and_messages() {
        let errors = validate_drawing(GameType::Power655, &[1, 1, 2, 3, 4, 5], None).unwrap_err();
        let fields: Vec<_> = errors.iter().map(ValidationError::field).collect();
        assert_eq!(fields, vec![NUMBERS_FIELD, BONUS_FIELD]);
        assert_eq!(
            errors.to_string(),
            "numbers: number 1 appears more than once; bonus_number: power_6_55 drawings require a bonus number"
        );
    }
}
