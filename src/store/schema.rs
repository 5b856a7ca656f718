use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::adaptation::clamp_difficulty;
use crate::session::report::SessionReport;
use crate::session::state::PowerUp;

const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShopError {
    #[error("Not enough coins: need {needed}, have {available}")]
    NotEnoughCoins { needed: u64, available: u64 },
}

/// Power-ups the player owns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    #[serde(default)]
    pub extra_time: u32,
    #[serde(default)]
    pub mistake_shield: u32,
    #[serde(default)]
    pub number_reveal: u32,
}

impl Inventory {
    pub fn count(&self, power_up: PowerUp) -> u32 {
        match power_up {
            PowerUp::ExtraTime => self.extra_time,
            PowerUp::MistakeShield => self.mistake_shield,
            PowerUp::NumberReveal => self.number_reveal,
        }
    }

    fn slot(&mut self, power_up: PowerUp) -> &mut u32 {
        match power_up {
            PowerUp::ExtraTime => &mut self.extra_time,
            PowerUp::MistakeShield => &mut self.mistake_shield,
            PowerUp::NumberReveal => &mut self.number_reveal,
        }
    }

    pub fn add(&mut self, power_up: PowerUp) {
        *self.slot(power_up) += 1;
    }

    /// Use one unit. Returns false when none are left.
    pub fn take(&mut self, power_up: PowerUp) -> bool {
        let slot = self.slot(power_up);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    pub schema_version: u32,
    pub total_score: u64,
    pub coins: u64,
    /// Difficulty the last session finished at, until the end-of-session
    /// review replaces it with the advisor's pick.
    pub difficulty: u32,
    #[serde(default)]
    pub inventory: Inventory,
    pub sessions_played: u32,
    pub best_session_score: u64,
    #[serde(default)]
    pub last_played: Option<DateTime<Utc>>,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            total_score: 0,
            coins: 0,
            difficulty: 1,
            inventory: Inventory::default(),
            sessions_played: 0,
            best_session_score: 0,
            last_played: None,
        }
    }
}

impl ProfileData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn purchase(&mut self, power_up: PowerUp) -> Result<(), ShopError> {
        let price = power_up.price();
        if self.coins < price {
            return Err(ShopError::NotEnoughCoins {
                needed: price,
                available: self.coins,
            });
        }
        self.coins -= price;
        self.inventory.add(power_up);
        Ok(())
    }

    /// Fold a finished session into the lifetime totals.
    pub fn apply_report(&mut self, report: &SessionReport) {
        self.total_score += report.score;
        self.coins += report.coins;
        self.difficulty = clamp_difficulty(report.final_difficulty as i64);
        self.sessions_played += 1;
        self.best_session_score = self.best_session_score.max(report.score);
        self.last_played = Some(report.timestamp);
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionHistoryData {
    pub schema_version: u32,
    pub sessions: Vec<SessionReport>,
}

impl Default for SessionHistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sessions: Vec::new(),
        }
    }
}

impl SessionHistoryData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn best_accuracy(&self) -> Option<u32> {
        self.sessions
            .iter()
            .filter(|s| s.answered() > 0)
            .map(|s| s.accuracy_percent)
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::SessionState;

    #[test]
    fn test_purchase_debits_and_stocks() {
        let mut profile = ProfileData {
            coins: 120,
            ..ProfileData::default()
        };
        profile.purchase(PowerUp::MistakeShield).unwrap();
        assert_eq!(profile.coins, 20);
        assert_eq!(profile.inventory.count(PowerUp::MistakeShield), 1);

        let err = profile.purchase(PowerUp::ExtraTime).unwrap_err();
        assert_eq!(
            err,
            ShopError::NotEnoughCoins {
                needed: 50,
                available: 20
            }
        );
        assert_eq!(profile.coins, 20);
        assert_eq!(profile.inventory.count(PowerUp::ExtraTime), 0);
    }

    #[test]
    fn test_inventory_take() {
        let mut inventory = Inventory::default();
        assert!(!inventory.take(PowerUp::NumberReveal));
        inventory.add(PowerUp::NumberReveal);
        inventory.add(PowerUp::NumberReveal);
        assert!(inventory.take(PowerUp::NumberReveal));
        assert_eq!(inventory.count(PowerUp::NumberReveal), 1);
    }

    #[test]
    fn test_inventory_wire_names() {
        let json = serde_json::to_value(Inventory {
            extra_time: 1,
            mistake_shield: 2,
            number_reveal: 3,
        })
        .unwrap();
        assert_eq!(json["extraTime"], 1);
        assert_eq!(json["mistakeShield"], 2);
        assert_eq!(json["numberReveal"], 3);
    }

    #[test]
    fn test_apply_report_accumulates() {
        let mut profile = ProfileData::default();
        let state = SessionState {
            score: 150,
            coins: 15,
            difficulty: 7,
            ..SessionState::default()
        };
        let report = SessionReport::from_state(&state);
        profile.apply_report(&report);
        profile.apply_report(&SessionReport {
            score: 50,
            coins: 5,
            ..report.clone()
        });
        assert_eq!(profile.total_score, 200);
        assert_eq!(profile.coins, 20);
        assert_eq!(profile.difficulty, 7);
        assert_eq!(profile.sessions_played, 2);
        assert_eq!(profile.best_session_score, 150);
        assert!(profile.last_played.is_some());
    }

    #[test]
    fn test_stale_schema_needs_reset() {
        let profile = ProfileData {
            schema_version: 0,
            ..ProfileData::default()
        };
        assert!(profile.needs_reset());
        assert!(!ProfileData::default().needs_reset());
    }
}
