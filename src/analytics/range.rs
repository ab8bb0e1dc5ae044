use chrono::{Days, NaiveDate};

use crate::errors::AnalyticsError;

/// Bounds an analytics view to recent activity. `LastMaps` counts at map
/// granularity: one multi-map scrim contributes several units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSelector {
    LastMaps(u32),
    LastDays(u32),
    All,
}

impl RangeSelector {
    /// Parses the literal query values. `last10` is only offered on the
    /// player and hero views.
    pub fn parse(value: Option<&str>, allow_last10: bool) -> Result<Self, AnalyticsError> {
        let Some(value) = value else {
            return Ok(RangeSelector::All);
        };
        match value {
            "last10" if allow_last10 => Ok(RangeSelector::LastMaps(10)),
            "last20" => Ok(RangeSelector::LastMaps(20)),
            "last50" => Ok(RangeSelector::LastMaps(50)),
            "last30d" => Ok(RangeSelector::LastDays(30)),
            "all" => Ok(RangeSelector::All),
            _ => Err(AnalyticsError::InvalidRange {
                value: value.to_string(),
                allowed: if allow_last10 {
                    "last10, last20, last50, last30d, all".to_string()
                } else {
                    "last20, last50, last30d, all".to_string()
                },
            }),
        }
    }

    pub fn label(&self) -> String {
        match self {
            RangeSelector::LastMaps(n) => format!("last{n}"),
            RangeSelector::LastDays(n) => format!("last{n}d"),
            RangeSelector::All => "all".to_string(),
        }
    }

    /// SQL LIMIT at map granularity, when the range is map-counted.
    pub fn map_limit(&self) -> Option<u32> {
        match self {
            RangeSelector::LastMaps(n) => Some(*n),
            _ => None,
        }
    }

    /// Wall-clock cutoff date, when the range is day-counted.
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            RangeSelector::LastDays(days) => today.checked_sub_days(Days::new(*days as u64)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_literals() {
        assert_eq!(
            RangeSelector::parse(Some("last20"), false).unwrap(),
            RangeSelector::LastMaps(20)
        );
        assert_eq!(
            RangeSelector::parse(Some("last30d"), false).unwrap(),
            RangeSelector::LastDays(30)
        );
        assert_eq!(
            RangeSelector::parse(Some("all"), false).unwrap(),
            RangeSelector::All
        );
        assert_eq!(RangeSelector::parse(None, false).unwrap(), RangeSelector::All);
    }

    #[test]
    fn last10_is_view_dependent() {
        assert_eq!(
            RangeSelector::parse(Some("last10"), true).unwrap(),
            RangeSelector::LastMaps(10)
        );
        assert!(RangeSelector::parse(Some("last10"), false).is_err());
    }

    #[test]
    fn rejects_unknown_literal() {
        let err = RangeSelector::parse(Some("last9000"), false).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::AnalyticsError::InvalidRange { .. }
        ));
    }

    #[test]
    fn cutoff_counts_back_from_today() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert_eq!(
            RangeSelector::LastDays(30).cutoff(today),
            Some(NaiveDate::from_ymd_opt(2026, 7, 7).unwrap())
        );
        assert_eq!(RangeSelector::All.cutoff(today), None);
        assert_eq!(RangeSelector::LastMaps(20).cutoff(today), None);
    }
}
