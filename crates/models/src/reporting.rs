use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Month over month change in registrations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Growth {
    /// Nothing last month, something this month
    FromZero,
    /// Nothing in either month
    Flat,
    /// Percentage change relative to last month
    Rate(f64),
}

impl Growth {
    pub fn between(this_total: u64, last_total: u64) -> Self {
        match (this_total, last_total) {
            (0, 0) => Self::Flat,
            (_, 0) => Self::FromZero,
            (this, last) => Self::Rate((this as f64 - last as f64) / last as f64 * 100.0),
        }
    }

    pub fn percent(&self) -> f64 {
        match self {
            Self::FromZero => 100.0,
            Self::Flat => 0.0,
            Self::Rate(rate) => round2(*rate),
        }
    }
}

impl Display for Growth {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::FromZero => write!(f, "100%"),
            Self::Flat => write!(f, "0%"),
            Self::Rate(rate) => write!(f, "{rate:.2}%"),
        }
    }
}

/// Last month's registrations as a share of this month's, `"0.00%"` when
/// last month had none.
///
/// This is a ratio rather than a growth rate, it is what the dashboard has
/// always reported for the previous month.
pub fn last_month_share(this_total: u64, last_total: u64) -> String {
    if last_total == 0 {
        return "0.00%".to_string();
    }

    let share = last_total as f64 / this_total.max(1) as f64 * 100.0;
    format!("{share:.2}%")
}

/// `count / total * 100` rounded to two decimals, zero when `total` is zero
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(count as f64 / total as f64 * 100.0)
    }
}

/// Share of `total` held by each labelled bucket, as two decimal strings
pub fn distribution<I, S>(counts: I, total: u64) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (S, u64)>,
    S: Into<String>,
{
    counts
        .into_iter()
        .map(|(label, count)| (label.into(), format!("{:.2}", percentage(count, total))))
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_from_zero() {
        let growth = Growth::between(5, 0);
        assert_eq!(growth, Growth::FromZero);
        assert_eq!(growth.to_string(), "100%");
        assert_eq!(growth.percent(), 100.0);
    }

    #[test]
    fn test_growth_flat() {
        assert_eq!(Growth::between(0, 0).to_string(), "0%");
    }

    #[test]
    fn test_growth_rate() {
        assert_eq!(Growth::between(5, 10).to_string(), "-50.00%");
        assert_eq!(Growth::between(15, 10).to_string(), "50.00%");
        assert_eq!(Growth::between(10, 10).to_string(), "0.00%");
        assert_eq!(Growth::between(2, 3).percent(), -33.33);
    }

    #[test]
    fn test_last_month_share() {
        assert_eq!(last_month_share(5, 0), "0.00%");
        assert_eq!(last_month_share(0, 0), "0.00%");
        assert_eq!(last_month_share(5, 10), "200.00%");
        assert_eq!(last_month_share(0, 4), "400.00%");
    }

    #[test]
    fn test_distribution_sums_to_hundred() {
        let counts = vec![("Morning", 1), ("Afternoon", 1), ("Evening", 1)];
        let shares = distribution(counts, 3);

        assert_eq!(shares["Morning"], "33.33");

        let sum: f64 = shares.values().map(|v| v.parse::<f64>().unwrap()).sum();
        assert!((sum - 100.0).abs() <= 0.01 * shares.len() as f64);
    }

    #[test]
    fn test_distribution_with_no_records() {
        let shares = distribution(vec![("Morning", 0), ("Evening", 0)], 0);

        assert_eq!(shares.len(), 2);
        assert!(shares.values().all(|v| v == "0.00"));
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 4), 25.0);
        assert_eq!(percentage(1, 0), 0.0);
        assert_eq!(percentage(2, 3), 66.67);
    }
}
