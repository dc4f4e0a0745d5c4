use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use petalflow_core::{DomainError, DomainResult, ValueObject};

/// Volume discount rule: ordering at least `min_qty` units takes
/// `percent_off` percent off the base unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTier {
    pub min_qty: i64,
    pub percent_off: Decimal,
}

impl ValueObject for PricingTier {}

impl PricingTier {
    pub fn new(min_qty: i64, percent_off: Decimal) -> Self {
        Self {
            min_qty,
            percent_off,
        }
    }

    /// Invariants: threshold at least 1, percent-off within [0, 100].
    pub fn validate(&self) -> DomainResult<()> {
        if self.min_qty < 1 {
            return Err(DomainError::invalid_argument(
                "pricing tier min_qty must be at least 1",
            ));
        }
        if self.percent_off < Decimal::ZERO || self.percent_off > Decimal::from(100) {
            return Err(DomainError::invalid_argument(
                "pricing tier percent_off must be between 0 and 100",
            ));
        }
        Ok(())
    }
}

/// Compute the unit price for a product/quantity pair.
///
/// Selects the tier with the largest `min_qty` threshold not exceeding
/// `quantity`; with no qualifying tier the unit price is the base price,
/// otherwise `base_price * (1 - percent_off/100)`. No rounding is applied
/// here; formatting happens only at presentation time.
///
/// Tiers sharing the same threshold are resolved deterministically: the
/// highest percent-off wins.
pub fn price_line(
    base_price: Decimal,
    quantity: i64,
    tiers: &[PricingTier],
) -> DomainResult<Decimal> {
    if base_price < Decimal::ZERO {
        return Err(DomainError::invalid_argument(
            "base price cannot be negative",
        ));
    }
    if quantity < 1 {
        return Err(DomainError::invalid_argument("quantity must be at least 1"));
    }

    let applicable = tiers
        .iter()
        .filter(|tier| tier.min_qty <= quantity)
        .max_by(|a, b| {
            a.min_qty
                .cmp(&b.min_qty)
                .then(a.percent_off.cmp(&b.percent_off))
        });

    let Some(tier) = applicable else {
        return Ok(base_price);
    };

    let discount = tier.percent_off / Decimal::from(100);
    Ok(base_price * (Decimal::ONE - discount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn no_tiers_returns_base_price() {
        let unit = price_line(dec("2.50"), 10, &[]).unwrap();
        assert_eq!(unit, dec("2.50"));
    }

    #[test]
    fn below_smallest_threshold_returns_base_price() {
        let tiers = vec![PricingTier::new(50, dec("10"))];
        let unit = price_line(dec("2.50"), 49, &tiers).unwrap();
        assert_eq!(unit, dec("2.50"));
    }

    #[test]
    fn crossing_threshold_applies_percent_off() {
        // base 2.50 with tier (minQty=50, 10% off) at qty 60 -> 2.25
        let tiers = vec![PricingTier::new(50, dec("10"))];
        let unit = price_line(dec("2.50"), 60, &tiers).unwrap();
        assert_eq!(unit, dec("2.25"));
    }

    #[test]
    fn threshold_is_inclusive() {
        let tiers = vec![PricingTier::new(50, dec("10"))];
        let unit = price_line(dec("2.50"), 50, &tiers).unwrap();
        assert_eq!(unit, dec("2.25"));
    }

    #[test]
    fn largest_qualifying_threshold_wins() {
        let tiers = vec![
            PricingTier::new(10, dec("5")),
            PricingTier::new(50, dec("10")),
            PricingTier::new(100, dec("20")),
        ];
        assert_eq!(price_line(dec("4.00"), 60, &tiers).unwrap(), dec("3.60"));
        assert_eq!(price_line(dec("4.00"), 150, &tiers).unwrap(), dec("3.20"));
    }

    #[test]
    fn largest_threshold_wins_even_with_a_shallower_discount() {
        // Selection is by threshold, not by depth of discount: crossing the
        // 51 threshold moves the line off the 10% tier onto the 5% one.
        let tiers = vec![
            PricingTier::new(50, dec("10")),
            PricingTier::new(51, dec("5")),
        ];
        assert_eq!(price_line(dec("100"), 50, &tiers).unwrap(), dec("90"));
        assert_eq!(price_line(dec("100"), 51, &tiers).unwrap(), dec("95"));
    }

    #[test]
    fn equal_thresholds_resolve_to_highest_percent_off() {
        let tiers = vec![
            PricingTier::new(50, dec("10")),
            PricingTier::new(50, dec("15")),
        ];
        let unit = price_line(dec("2.00"), 60, &tiers).unwrap();
        assert_eq!(unit, dec("1.70"));
    }

    #[test]
    fn tier_order_in_the_list_does_not_matter() {
        let asc = vec![
            PricingTier::new(10, dec("5")),
            PricingTier::new(50, dec("10")),
        ];
        let desc = vec![
            PricingTier::new(50, dec("10")),
            PricingTier::new(10, dec("5")),
        ];
        assert_eq!(
            price_line(dec("2.50"), 60, &asc).unwrap(),
            price_line(dec("2.50"), 60, &desc).unwrap()
        );
    }

    #[test]
    fn hundred_percent_off_prices_to_zero() {
        let tiers = vec![PricingTier::new(1, dec("100"))];
        let unit = price_line(dec("9.99"), 5, &tiers).unwrap();
        assert_eq!(unit, Decimal::ZERO);
    }

    #[test]
    fn negative_base_price_is_rejected() {
        let err = price_line(dec("-0.01"), 1, &[]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[test]
    fn quantity_below_one_is_rejected() {
        let err = price_line(dec("2.50"), 0, &[]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[test]
    fn tier_validation_bounds_percent_off() {
        assert!(PricingTier::new(10, dec("0")).validate().is_ok());
        assert!(PricingTier::new(10, dec("100")).validate().is_ok());
        assert!(PricingTier::new(10, dec("100.01")).validate().is_err());
        assert!(PricingTier::new(10, dec("-1")).validate().is_err());
        assert!(PricingTier::new(0, dec("10")).validate().is_err());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_tiers() -> impl Strategy<Value = Vec<PricingTier>> {
            // Thresholds and discounts kept in-range; discounts as whole percents.
            prop::collection::vec((1i64..500, 0i64..=100), 0..6).prop_map(|raw| {
                raw.into_iter()
                    .map(|(min_qty, pct)| PricingTier::new(min_qty, Decimal::from(pct)))
                    .collect()
            })
        }

        /// Tier lists whose discounts never shrink at higher thresholds.
        /// A schedule with a shallower discount above a deeper one prices
        /// the larger quantity higher (largest qualifying threshold wins),
        /// so quantity monotonicity only holds for this shape.
        fn arb_volume_schedule() -> impl Strategy<Value = Vec<PricingTier>> {
            prop::collection::vec((1i64..500, 0i64..=100), 0..6).prop_map(|raw| {
                let (mut thresholds, mut pcts): (Vec<i64>, Vec<i64>) = raw.into_iter().unzip();
                thresholds.sort_unstable();
                pcts.sort_unstable();
                thresholds
                    .into_iter()
                    .zip(pcts)
                    .map(|(min_qty, pct)| PricingTier::new(min_qty, Decimal::from(pct)))
                    .collect()
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: unit price never exceeds the base price.
            #[test]
            fn unit_price_never_exceeds_base(
                base_cents in 0i64..100_000,
                qty in 1i64..1_000,
                tiers in arb_tiers()
            ) {
                let base = Decimal::new(base_cents, 2);
                let unit = price_line(base, qty, &tiers).unwrap();
                prop_assert!(unit <= base);
                prop_assert!(unit >= Decimal::ZERO);
            }

            /// Property: for schedules whose discounts deepen with the
            /// threshold, unit price is monotonically non-increasing in
            /// quantity.
            #[test]
            fn unit_price_is_monotone_in_quantity(
                base_cents in 0i64..100_000,
                qty in 1i64..999,
                tiers in arb_volume_schedule()
            ) {
                let base = Decimal::new(base_cents, 2);
                let at_qty = price_line(base, qty, &tiers).unwrap();
                let at_next = price_line(base, qty + 1, &tiers).unwrap();
                prop_assert!(at_next <= at_qty);
            }

            /// Property: below every threshold the base price applies unchanged.
            #[test]
            fn base_price_applies_below_smallest_threshold(
                base_cents in 0i64..100_000,
                tiers in arb_tiers()
            ) {
                let smallest = tiers.iter().map(|t| t.min_qty).min().unwrap_or(i64::MAX);
                prop_assume!(smallest > 1);
                let base = Decimal::new(base_cents, 2);
                let unit = price_line(base, smallest - 1, &tiers).unwrap();
                prop_assert_eq!(unit, base);
            }
        }
    }
}
