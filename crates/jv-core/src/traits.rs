//! Shared row abstraction for the two input tables.

use crate::types::{IndustryRecord, VacancyRecord};

/// A weekly postings observation.
///
/// Both input tables implement this, so filtering, window selection and
/// smoothing are written once for either table.
pub trait WeeklyObservation {
    /// Calendar year.
    fn year(&self) -> i32;
    /// Week of the year.
    fn week(&self) -> u32;
    /// Postings count.
    fn postings(&self) -> f64;
}

impl WeeklyObservation for VacancyRecord {
    fn year(&self) -> i32 {
        self.year
    }

    fn week(&self) -> u32 {
        self.week
    }

    fn postings(&self) -> f64 {
        self.job_postings_count
    }
}

impl WeeklyObservation for IndustryRecord {
    fn year(&self) -> i32 {
        self.year
    }

    fn week(&self) -> u32 {
        self.week
    }

    fn postings(&self) -> f64 {
        self.job_postings_count
    }
}

impl<T: WeeklyObservation + ?Sized> WeeklyObservation for &T {
    fn year(&self) -> i32 {
        (**self).year()
    }

    fn week(&self) -> u32 {
        (**self).week()
    }

    fn postings(&self) -> f64 {
        (**self).postings()
    }
}
