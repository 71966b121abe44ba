//! Price-bucket histogram shown next to the product list.
//!
//! Buckets are half-open on the right: `[0, 500)`, `[500, 1000)`,
//! `[1000, +inf)`. Anything else (negative, NaN, infinite) is `Unknown`.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceBucket {
    Low,
    Mid,
    High,
    Unknown,
}

impl PriceBucket {
    /// Output order. `Unknown` always comes last.
    pub const ALL: [PriceBucket; 4] = [Self::Low, Self::Mid, Self::High, Self::Unknown];

    pub fn for_price(price: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|bucket| {
                bucket
                    .bounds()
                    .is_some_and(|(lo, hi)| (lo..hi).contains(&price))
            })
            .unwrap_or(Self::Unknown)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "0-500",
            Self::Mid => "501-1000",
            Self::High => "1000+",
            Self::Unknown => "Unknown",
        }
    }

    /// Inclusive lower / exclusive upper bound, `None` for `Unknown`.
    pub fn bounds(self) -> Option<(f64, f64)> {
        match self {
            Self::Low => Some((0.0, 500.0)),
            Self::Mid => Some((500.0, 1000.0)),
            Self::High => Some((1000.0, f64::INFINITY)),
            Self::Unknown => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Mid => 1,
            Self::High => 2,
            Self::Unknown => 3,
        }
    }
}

/// Serialized as its display label (`"0-500"`, `"1000+"`, ...).
impl Serialize for PriceBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One histogram row: `{ "priceRange": "0-500", "count": 2 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeCount {
    pub price_range: PriceBucket,
    pub count: u64,
}

/// Count prices per bucket. Empty buckets are omitted.
pub fn price_histogram<I>(prices: I) -> Vec<PriceRangeCount>
where
    I: IntoIterator<Item = f64>,
{
    let mut counts = [0u64; 4];
    for price in prices {
        counts[PriceBucket::for_price(price).index()] += 1;
    }

    PriceBucket::ALL
        .into_iter()
        .filter(|bucket| counts[bucket.index()] > 0)
        .map(|bucket| PriceRangeCount {
            price_range: bucket,
            count: counts[bucket.index()],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_of(rows: &[PriceRangeCount], bucket: PriceBucket) -> u64 {
        rows.iter()
            .find(|r| r.price_range == bucket)
            .map(|r| r.count)
            .unwrap_or(0)
    }

    #[test]
    fn boundaries_belong_to_the_upper_bucket() {
        let rows = price_histogram([100.0, 500.0, 999.0, 1000.0, 2000.0]);
        assert_eq!(count_of(&rows, PriceBucket::Low), 1);
        assert_eq!(count_of(&rows, PriceBucket::Mid), 2);
        assert_eq!(count_of(&rows, PriceBucket::High), 2);
        assert_eq!(count_of(&rows, PriceBucket::Unknown), 0);
    }

    #[test]
    fn out_of_range_prices_are_unknown() {
        assert_eq!(PriceBucket::for_price(-0.01), PriceBucket::Unknown);
        assert_eq!(PriceBucket::for_price(f64::NAN), PriceBucket::Unknown);
        assert_eq!(PriceBucket::for_price(f64::INFINITY), PriceBucket::Unknown);
        assert_eq!(PriceBucket::for_price(0.0), PriceBucket::Low);
    }

    #[test]
    fn empty_buckets_are_omitted_and_unknown_is_last() {
        let rows = price_histogram([-5.0, 1500.0, 20.0]);
        let labels: Vec<_> = rows.iter().map(|r| r.price_range.label()).collect();
        assert_eq!(labels, vec!["0-500", "1000+", "Unknown"]);
        assert!(price_histogram(std::iter::empty()).is_empty());
    }

    #[test]
    fn serializes_with_storefront_field_names() {
        let rows = price_histogram([450.0]);
        assert_eq!(
            serde_json::to_value(&rows).unwrap(),
            serde_json::json!([{ "priceRange": "0-500", "count": 1 }])
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every product is counted exactly once.
            #[test]
            fn counts_sum_to_total(prices in proptest::collection::vec(-100.0f64..5000.0, 0..200)) {
                let rows = price_histogram(prices.iter().copied());
                let total: u64 = rows.iter().map(|r| r.count).sum();
                prop_assert_eq!(total, prices.len() as u64);
            }

            /// Property: a price lies within the bounds of the bucket that counts it.
            #[test]
            fn price_falls_inside_its_bucket(price in -1000.0f64..10000.0) {
                let bucket = PriceBucket::for_price(price);
                match bucket.bounds() {
                    Some((lo, hi)) => prop_assert!(price >= lo && price < hi),
                    None => prop_assert!(price < 0.0),
                }
            }
        }
    }
}
