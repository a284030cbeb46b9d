// src/core/impact.rs

//! Business-impact estimate derived from the letter grade alone.

use std::str::FromStr;

use crate::core::models::{BusinessImpact, SslGrade};

// Baseline revenue model for a typical small commercial site.
const MONTHLY_VISITORS: u64 = 10_000;
/// Visitor-to-lead conversion, in percent.
const CONVERSION_PERCENT: u64 = 2;
/// Lead-to-order conversion, in percent.
const ORDER_CONVERSION_PERCENT: u64 = 10;
/// Average order value, in KRW.
const AVERAGE_ORDER_VALUE: u64 = 50_000_000;

/// Annual revenue the loss rates apply to.
pub const BASELINE_ANNUAL_REVENUE: u64 =
    MONTHLY_VISITORS * CONVERSION_PERCENT * ORDER_CONVERSION_PERCENT * AVERAGE_ORDER_VALUE * 12 / 10_000;

struct ImpactRates {
    loss_percent: u64,
    seo: u32,
    trust: u32,
}

fn rates(grade: SslGrade) -> ImpactRates {
    let (loss_percent, seo, trust) = match grade {
        SslGrade::F => (50, 40, 90),
        SslGrade::D => (30, 30, 70),
        SslGrade::C => (20, 25, 50),
        SslGrade::B => (10, 15, 30),
        SslGrade::A => (5, 5, 10),
        SslGrade::APlus => (2, 0, 5),
    };
    ImpactRates { loss_percent, seo, trust }
}

pub fn estimate(grade: SslGrade) -> BusinessImpact {
    let rates = rates(grade);
    BusinessImpact {
        revenue_loss_annual: BASELINE_ANNUAL_REVENUE * rates.loss_percent / 100,
        seo_impact: rates.seo,
        user_trust_impact: rates.trust,
    }
}

/// Estimate from a free-form grade label. "A-" counts as A; anything
/// unrecognised falls back to the F row.
pub fn estimate_for_label(label: &str) -> BusinessImpact {
    estimate(SslGrade::from_str(label).unwrap_or(SslGrade::F))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_is_twelve_billion() {
        assert_eq!(BASELINE_ANNUAL_REVENUE, 12_000_000_000);
    }

    #[test]
    fn table_rows() {
        assert_eq!(
            estimate(SslGrade::F),
            BusinessImpact { revenue_loss_annual: 6_000_000_000, seo_impact: 40, user_trust_impact: 90 }
        );
        assert_eq!(estimate(SslGrade::D).revenue_loss_annual, 3_600_000_000);
        assert_eq!(estimate(SslGrade::C).seo_impact, 25);
        assert_eq!(estimate(SslGrade::B).user_trust_impact, 30);
        assert_eq!(estimate(SslGrade::A).revenue_loss_annual, 600_000_000);
        assert_eq!(
            estimate(SslGrade::APlus),
            BusinessImpact { revenue_loss_annual: 240_000_000, seo_impact: 0, user_trust_impact: 5 }
        );
    }

    #[test]
    fn labels_fold_a_minus_and_unknowns() {
        assert_eq!(estimate_for_label("A-"), estimate(SslGrade::A));
        assert_eq!(estimate_for_label("A+"), estimate(SslGrade::APlus));
        assert_eq!(estimate_for_label("E"), estimate(SslGrade::F));
        assert_eq!(estimate_for_label(""), estimate(SslGrade::F));
    }

    #[test]
    fn loss_shrinks_as_grade_improves() {
        use strum::IntoEnumIterator;
        let losses: Vec<u64> = SslGrade::iter().map(|g| estimate(g).revenue_loss_annual).collect();
        assert!(losses.windows(2).all(|w| w[0] > w[1]));
    }
}
