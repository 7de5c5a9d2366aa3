//! Date-index alignment.

use greenbond_primitives::{Date, DateIndexedSeries, FactorSet};

/// Sorted intersection of several strictly increasing date indices.
///
/// An empty list of indices yields an empty intersection.
#[must_use]
pub fn common_index(indices: &[&[Date]]) -> Vec<Date> {
    let Some((first, rest)) = indices.split_first() else {
        return Vec::new();
    };

    rest.iter().fold(first.to_vec(), |acc, index| intersect_sorted(&acc, index))
}

/// Restrict every series to the intersection of their date indices.
#[must_use]
pub fn align_series(series: &[&DateIndexedSeries]) -> Vec<DateIndexedSeries> {
    let indices: Vec<&[Date]> = series.iter().map(|s| s.dates()).collect();
    let index = common_index(&indices);
    series.iter().map(|s| s.restrict_to(&index)).collect()
}

/// Restrict a series and a factor set to their common dates.
#[must_use]
pub fn align_with_factors(
    series: &DateIndexedSeries,
    factors: &FactorSet,
) -> (DateIndexedSeries, FactorSet) {
    let index = common_index(&[series.dates(), factors.dates()]);
    (series.restrict_to(&index), factors.restrict_to(&index))
}

fn intersect_sorted(a: &[Date], b: &[Date]) -> Vec<Date> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use greenbond_primitives::FactorName;
    use ndarray::array;

    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2015, 3, day).unwrap()
    }

    fn series(name: &str, days: &[u32]) -> DateIndexedSeries {
        let dates = days.iter().map(|&x| d(x)).collect();
        let values = days.iter().map(|&x| f64::from(x)).collect();
        DateIndexedSeries::new(name, dates, values).unwrap()
    }

    #[test]
    fn intersection_is_sorted_and_common() {
        let a = series("a", &[1, 2, 3, 5, 8]);
        let b = series("b", &[2, 3, 4, 5]);
        let c = series("c", &[3, 5, 9]);

        let aligned = align_series(&[&a, &b, &c]);
        assert_eq!(aligned.len(), 3);
        for s in &aligned {
            assert_eq!(s.dates(), &[d(3), d(5)]);
        }
        assert_eq!(aligned[1].values(), &[3.0, 5.0]);
        assert_eq!(aligned[2].name(), "c");
    }

    #[test]
    fn disjoint_indices_give_empty() {
        let a = series("a", &[1, 2]);
        let b = series("b", &[3, 4]);
        let aligned = align_series(&[&a, &b]);
        assert!(aligned.iter().all(DateIndexedSeries::is_empty));
        assert!(common_index(&[]).is_empty());
    }

    #[test]
    fn aligns_series_with_factor_set() {
        let factors = FactorSet::new(
            vec![d(2), d(3), d(4)],
            vec![FactorName::new("Mkt-RF")],
            array![[0.01], [0.02], [0.03]],
            vec![0.0001, 0.0002, 0.0003],
        )
        .unwrap();
        let fund = series("fund", &[1, 3, 4, 6]);

        let (fund, factors) = align_with_factors(&fund, &factors);
        assert_eq!(fund.dates(), &[d(3), d(4)]);
        assert_eq!(factors.dates(), fund.dates());
        assert_eq!(factors.risk_free(), &[0.0002, 0.0003]);
        assert_eq!(factors.values()[[0, 0]], 0.02);
    }
}
