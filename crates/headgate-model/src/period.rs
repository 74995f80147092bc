// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Time steps, years, and metered production periods.
//!
//! Demand is recorded per *time step* (a growing-season interval), while
//! well production is metered per calendar year at one of three
//! granularities. A well's capacity for a year is taken from the coarsest
//! granularity that has any record for that year: annual totals win over
//! semi-annual readings, which win over monthly ones. Mixing granularities
//! would double count, so the first one with data is used exclusively.

/// A growing-season interval for which consumptive use is recorded.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TimeStep(u16);

impl TimeStep {
    #[inline(always)]
    pub const fn new(step: u16) -> Self {
        Self(step)
    }

    #[inline(always)]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for TimeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimeStep({})", self.0)
    }
}

/// A calendar year.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Year(i32);

impl Year {
    #[inline(always)]
    pub const fn new(year: i32) -> Self {
        Self(year)
    }

    #[inline(always)]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The granularity at which a production record was metered.
///
/// Ordered from coarsest to finest; `Granularity::FALLBACK_ORDER` is the order
/// in which capacity aggregation looks for data.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Granularity {
    Annual,
    SemiAnnual,
    Monthly,
}

impl Granularity {
    /// Coarsest first.
    pub const FALLBACK_ORDER: [Granularity; 3] = [
        Granularity::Annual,
        Granularity::SemiAnnual,
        Granularity::Monthly,
    ];
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Annual => write!(f, "annual"),
            Granularity::SemiAnnual => write!(f, "semi-annual"),
            Granularity::Monthly => write!(f, "monthly"),
        }
    }
}

/// The period covered by one metered production record.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ProductionPeriod {
    /// A whole calendar year.
    Annual { year: Year },
    /// One half of a calendar year, `half` is `1` or `2`.
    SemiAnnual { year: Year, half: u8 },
    /// One calendar month, `month` is in `1..=12`.
    Monthly { year: Year, month: u8 },
}

impl ProductionPeriod {
    /// Creates an annual period.
    #[inline]
    pub const fn annual(year: Year) -> Self {
        ProductionPeriod::Annual { year }
    }

    /// Creates a semi-annual period.
    ///
    /// # Panics
    ///
    /// Panics if `half` is not `1` or `2`.
    #[inline]
    pub fn semi_annual(year: Year, half: u8) -> Self {
        assert!(
            half == 1 || half == 2,
            "called `ProductionPeriod::semi_annual` with invalid half: {}. Must be 1 or 2",
            half
        );
        ProductionPeriod::SemiAnnual { year, half }
    }

    /// Creates a monthly period.
    ///
    /// # Panics
    ///
    /// Panics if `month` is not in `1..=12`.
    #[inline]
    pub fn monthly(year: Year, month: u8) -> Self {
        assert!(
            (1..=12).contains(&month),
            "called `ProductionPeriod::monthly` with invalid month: {}. Must be in 1..=12",
            month
        );
        ProductionPeriod::Monthly { year, month }
    }

    /// Returns the calendar year the period falls into.
    #[inline]
    pub fn year(&self) -> Year {
        match *self {
            ProductionPeriod::Annual { year }
            | ProductionPeriod::SemiAnnual { year, .. }
            | ProductionPeriod::Monthly { year, .. } => year,
        }
    }

    /// Returns the granularity of the period.
    #[inline]
    pub fn granularity(&self) -> Granularity {
        match self {
            ProductionPeriod::Annual { .. } => Granularity::Annual,
            ProductionPeriod::SemiAnnual { .. } => Granularity::SemiAnnual,
            ProductionPeriod::Monthly { .. } => Granularity::Monthly,
        }
    }
}

impl std::fmt::Display for ProductionPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductionPeriod::Annual { year } => write!(f, "{}", year),
            ProductionPeriod::SemiAnnual { year, half } => write!(f, "{}-H{}", year, half),
            ProductionPeriod::Monthly { year, month } => write!(f, "{}-{:02}", year, month),
        }
    }
}

/// Sums `quantity` over the coarsest granularity present among `periods`
/// for `year`, following `Granularity::FALLBACK_ORDER`.
///
/// Returns `0.0` when no period matches the year.
pub fn aggregate_by_fallback<I>(year: Year, periods: I) -> f64
where
    I: IntoIterator<Item = (ProductionPeriod, f64)>,
    I::IntoIter: Clone,
{
    let iter = periods.into_iter();
    for granularity in Granularity::FALLBACK_ORDER {
        let mut found = false;
        let mut total = 0.0;
        for (period, quantity) in iter.clone() {
            if period.year() == year && period.granularity() == granularity {
                found = true;
                total += quantity;
            }
        }
        if found {
            return total;
        }
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const Y: Year = Year::new(2018);

    #[test]
    fn test_period_accessors() {
        let p = ProductionPeriod::monthly(Y, 7);
        assert_eq!(p.year(), Y);
        assert_eq!(p.granularity(), Granularity::Monthly);
        assert_eq!(format!("{}", p), "2018-07");
        assert_eq!(format!("{}", ProductionPeriod::semi_annual(Y, 2)), "2018-H2");
        assert_eq!(format!("{}", ProductionPeriod::annual(Y)), "2018");
    }

    #[test]
    #[should_panic]
    fn test_invalid_month_panics() {
        let _ = ProductionPeriod::monthly(Y, 13);
    }

    #[test]
    fn test_annual_wins_over_finer_granularities() {
        let records = vec![
            (ProductionPeriod::monthly(Y, 1), 5.0),
            (ProductionPeriod::annual(Y), 100.0),
            (ProductionPeriod::semi_annual(Y, 1), 30.0),
        ];
        assert_eq!(aggregate_by_fallback(Y, records), 100.0);
    }

    #[test]
    fn test_semi_annual_then_monthly_fallback() {
        let semi = vec![
            (ProductionPeriod::semi_annual(Y, 1), 30.0),
            (ProductionPeriod::semi_annual(Y, 2), 20.0),
            (ProductionPeriod::monthly(Y, 3), 99.0),
        ];
        assert_eq!(aggregate_by_fallback(Y, semi), 50.0);

        let monthly = vec![
            (ProductionPeriod::monthly(Y, 3), 4.0),
            (ProductionPeriod::monthly(Y, 4), 6.0),
        ];
        assert_eq!(aggregate_by_fallback(Y, monthly), 10.0);
    }

    #[test]
    fn test_other_years_are_ignored_and_missing_is_zero() {
        let records = vec![(ProductionPeriod::annual(Year::new(2017)), 100.0)];
        assert_eq!(aggregate_by_fallback(Y, records), 0.0);
        assert_eq!(aggregate_by_fallback(Y, Vec::<(ProductionPeriod, f64)>::new()), 0.0);
    }
}
