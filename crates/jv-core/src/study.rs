//! Fixed constants of the vacancy study.

/// Weeks dropped everywhere: they only cover part of a calendar week.
pub const EXCLUDED_WEEKS: [u32; 2] = [1, 52];

/// Year whose deviation from prior years is estimated.
pub const TREATMENT_YEAR: i32 = 2020;

/// First week counted as "after" the outbreak.
pub const AFTER_FIRST_WEEK: u32 = 11;

/// Years compared in the charts, oldest first.
pub const COMPARISON_YEARS: [i32; 3] = [2018, 2019, 2020];

/// Number of points each smoothed curve is evaluated at.
pub const SMOOTH_POINTS: usize = 300;

/// Degree of the smoothing B-spline.
pub const SPLINE_DEGREE: usize = 3;

/// Label of the aggregate row in the results chart.
pub const WHOLE_MARKET_LABEL: &str = "THE WHOLE LABOUR MARKET";

/// Industries analysed, in chart and table order. Spelled as in the source data.
pub const INDUSTRIES: [&str; 18] = [
    "Professional scientific & technical activities",
    "Education",
    "Human health & social work activities",
    "Wholesale & retail trade; repair of motor vehicles and motor cycles",
    "Accommodation & food service activities",
    "Administrative & support service activities",
    "Financial & insurance activities",
    "Information & communication",
    "Transport & storage",
    "Manufacturing",
    "Other service activities",
    "Construction",
    "Arts, entertainment & recreation",
    "Real estate activities",
    "Water supply, sewerage, waste",
    "Mining & quarrying",
    "Agriculture, Forestry and Fishing",
    "Electricity, gas, steam & air conditioning supply",
];

/// Short display label for an industry (results chart rows).
pub fn short_label(industry: &str) -> &str {
    match industry.split_once(';') {
        Some((head, _)) => head.trim_end(),
        None => industry,
    }
}

/// Whether a week survives the partial-week filter.
pub fn is_full_week(week: u32) -> bool {
    !EXCLUDED_WEEKS.contains(&week)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_labels() {
        assert_eq!(short_label(INDUSTRIES[3]), "Wholesale & retail trade");
        assert_eq!(short_label("Education"), "Education");
    }

    #[test]
    fn industries_are_unique() {
        let mut names = INDUSTRIES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), INDUSTRIES.len());
    }

    #[test]
    fn partial_weeks() {
        assert!(!is_full_week(1));
        assert!(!is_full_week(52));
        assert!(is_full_week(2));
        assert!(is_full_week(51));
    }
}
