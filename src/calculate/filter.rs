//! Record filter predicate.

use std::fmt;

use crate::models::{ScoringConfig, Tournament};

/// The first check a tournament failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    GameNotSelected,
    ModeNotSelected,
    GameHidden,
    TierHidden,
    NotLan,
    OutsideYearRange,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Exclusion::GameNotSelected => "game not selected",
            Exclusion::ModeNotSelected => "mode not selected",
            Exclusion::GameHidden => "game hidden",
            Exclusion::TierHidden => "tier hidden",
            Exclusion::NotLan => "online event",
            Exclusion::OutsideYearRange => "outside year range",
        };
        f.write_str(reason)
    }
}

/// Run the filter checks in order and report the first failure.
pub fn check(tournament: &Tournament<'_>, config: &ScoringConfig) -> Result<(), Exclusion> {
    let filters = &config.filters;

    if filters.game.as_deref().is_some_and(|g| g != tournament.game) {
        return Err(Exclusion::GameNotSelected);
    }
    if filters.mode.as_deref().is_some_and(|m| m != tournament.mode) {
        return Err(Exclusion::ModeNotSelected);
    }
    if !config.is_game_visible(tournament.game) {
        return Err(Exclusion::GameHidden);
    }
    if !config.is_tier_visible(tournament.tier) {
        return Err(Exclusion::TierHidden);
    }
    if filters.lan_only && !tournament.is_lan {
        return Err(Exclusion::NotLan);
    }
    let (min_year, max_year) = filters.year_range;
    if tournament.year < min_year || tournament.year > max_year {
        return Err(Exclusion::OutsideYearRange);
    }

    Ok(())
}

/// Whether a tournament takes part in the computation.
pub fn included(tournament: &Tournament<'_>, config: &ScoringConfig) -> bool {
    check(tournament, config).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Filters, TournamentRecord};

    fn record() -> TournamentRecord {
        TournamentRecord::new("Quake 3", "Duel", 2, 2008).with_lan(false)
    }

    #[test]
    fn test_default_config_includes() {
        let record = record();
        assert!(included(&record.validate().unwrap(), &ScoringConfig::default()));
    }

    #[test]
    fn test_game_and_mode_selection() {
        let record = record();
        let t = record.validate().unwrap();
        let mut config = ScoringConfig::default();

        config.filters.game = Some("Quake Live".to_string());
        assert_eq!(check(&t, &config), Err(Exclusion::GameNotSelected));

        config.filters.game = Some("Quake 3".to_string());
        config.filters.mode = Some("TDM".to_string());
        assert_eq!(check(&t, &config), Err(Exclusion::ModeNotSelected));

        config.filters.mode = Some("Duel".to_string());
        assert_eq!(check(&t, &config), Ok(()));
    }

    #[test]
    fn test_visibility() {
        let record = record();
        let t = record.validate().unwrap();
        let mut config = ScoringConfig::default();

        config.game_visibility.insert("Quake 3".to_string(), false);
        assert_eq!(check(&t, &config), Err(Exclusion::GameHidden));

        config.game_visibility.insert("Quake 3".to_string(), true);
        config.tier_visibility.insert(2, false);
        assert_eq!(check(&t, &config), Err(Exclusion::TierHidden));

        config.tier_visibility.insert(2, true);
        assert!(included(&t, &config));
    }

    #[test]
    fn test_lan_only() {
        let online = record();
        let lan = record().with_lan(true);
        let config = ScoringConfig::default().with_filters(Filters {
            lan_only: true,
            ..Filters::default()
        });

        assert_eq!(
            check(&online.validate().unwrap(), &config),
            Err(Exclusion::NotLan)
        );
        assert!(included(&lan.validate().unwrap(), &config));
    }

    #[test]
    fn test_year_range_inclusive() {
        let config = ScoringConfig::default().with_filters(Filters {
            year_range: (2005, 2008),
            ..Filters::default()
        });

        for (year, expected) in [(2004, false), (2005, true), (2008, true), (2009, false)] {
            let record = TournamentRecord::new("Quake 3", "Duel", 1, year);
            assert_eq!(included(&record.validate().unwrap(), &config), expected, "{year}");
        }
    }

    #[test]
    fn test_check_order_reports_first_failure() {
        let record = record();
        let mut config = ScoringConfig::default();
        config.filters.game = Some("Quake 4".to_string());
        config.filters.lan_only = true;
        config.game_visibility.insert("Quake 3".to_string(), false);

        assert_eq!(
            check(&record.validate().unwrap(), &config),
            Err(Exclusion::GameNotSelected)
        );
    }
}
