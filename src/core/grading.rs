// src/core/grading.rs

//! Letter grade and numeric score.
//!
//! Both calculators read the same [`StatusPolicy`] table. The letter grade adds
//! one rule on top of the numeric score: an untrusted certificate
//! (self-signed, failed verification, invalid) is pinned to `D` whatever its
//! points say.

use tracing::debug;

use crate::core::models::{ProbeResult, SecurityHeader, SslGrade, SslStatus};

/// What a given certificate status is worth before header bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPolicy {
    pub base_score: u8,
    /// Headers only add points on top of a valid certificate.
    pub header_bonus: bool,
    /// When set, the letter grade ignores the numeric score.
    pub pinned_grade: Option<SslGrade>,
}

/// The grade every untrusted-but-reachable certificate is pinned to.
pub const UNTRUSTED_CERTIFICATE_GRADE: SslGrade = SslGrade::D;

pub fn status_policy(status: SslStatus) -> StatusPolicy {
    match status {
        SslStatus::Valid => StatusPolicy { base_score: 80, header_bonus: true, pinned_grade: None },
        SslStatus::SelfSigned | SslStatus::VerifyFailed | SslStatus::Invalid => StatusPolicy {
            base_score: 30,
            header_bonus: false,
            pinned_grade: Some(UNTRUSTED_CERTIFICATE_GRADE),
        },
        SslStatus::NoSsl | SslStatus::Expired | SslStatus::ConnectionError => StatusPolicy {
            base_score: 0,
            header_bonus: false,
            pinned_grade: Some(SslGrade::F),
        },
        // Scores zero, which the thresholds turn into an F.
        SslStatus::NotYetValid => StatusPolicy { base_score: 0, header_bonus: false, pinned_grade: None },
    }
}

/// Bonus points for the share of the header catalog a site serves.
pub fn header_bonus(present: usize) -> u8 {
    let present = present.min(SecurityHeader::COUNT);
    if present == SecurityHeader::COUNT {
        10
    } else if present * 2 >= SecurityHeader::COUNT {
        5
    } else if present > 0 {
        2
    } else {
        0
    }
}

pub fn grade_for_score(score: u8) -> SslGrade {
    match score {
        95.. => SslGrade::APlus,
        90..=94 => SslGrade::A,
        80..=89 => SslGrade::B,
        70..=79 => SslGrade::C,
        50..=69 => SslGrade::D,
        _ => SslGrade::F,
    }
}

fn points(result: &ProbeResult, policy: StatusPolicy) -> u8 {
    let bonus = if policy.header_bonus { header_bonus(result.headers.present_count()) } else { 0 };
    policy.base_score + bonus
}

/// Numeric security score in `0..=100`.
pub fn score(result: &ProbeResult) -> u8 {
    if !result.port_open() {
        return 0;
    }
    let score = points(result, status_policy(result.ssl_status())).min(100);
    debug!(status = %result.ssl_status(), score, "Computed security score.");
    score
}

/// Letter grade for the probe snapshot.
pub fn grade(result: &ProbeResult) -> SslGrade {
    if !result.port_open() {
        return SslGrade::F;
    }
    let policy = status_policy(result.ssl_status());
    let grade = policy
        .pinned_grade
        .unwrap_or_else(|| grade_for_score(points(result, policy)));
    debug!(status = %result.ssl_status(), %grade, "Computed SSL grade.");
    grade
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{CertificateState, HeaderState, PortOutcome, PortStatus};
    use strum::IntoEnumIterator;

    fn snapshot(status: SslStatus, present: usize) -> ProbeResult {
        let headers: Vec<SecurityHeader> = SecurityHeader::iter().take(present).collect();
        ProbeResult::new(
            "example.com",
            443,
            "https",
            PortStatus::open(Vec::new()),
            CertificateState::unavailable(status, None),
            HeaderState::from_present(&headers),
        )
    }

    #[test]
    fn closed_port_is_always_f_and_zero() {
        for status in SslStatus::iter() {
            let mut result = snapshot(status, 6);
            result.port_status = PortStatus::closed(PortOutcome::Timeout, None);
            assert_eq!(grade(&result), SslGrade::F);
            assert_eq!(score(&result), 0);
        }
    }

    #[test]
    fn bonus_tiers_for_valid_certificates() {
        let expected = [(0, 0), (1, 2), (2, 2), (3, 5), (4, 5), (5, 5), (6, 10)];
        for (present, bonus) in expected {
            assert_eq!(header_bonus(present), bonus, "{present} headers");
            assert_eq!(score(&snapshot(SslStatus::Valid, present)), 80 + bonus);
        }
    }

    #[test]
    fn bonus_never_decreases_with_more_headers() {
        let mut last = 0;
        for present in 0..=SecurityHeader::COUNT {
            let result = snapshot(SslStatus::Valid, present);
            assert!(header_bonus(present) >= last);
            assert!(score(&result) >= 80 + last);
            last = header_bonus(present);
        }
    }

    #[test]
    fn untrusted_certificates_are_pinned_to_d() {
        for status in [SslStatus::SelfSigned, SslStatus::VerifyFailed, SslStatus::Invalid] {
            for present in 0..=SecurityHeader::COUNT {
                let result = snapshot(status, present);
                assert_eq!(grade(&result), SslGrade::D, "{status} with {present} headers");
                assert_eq!(score(&result), 30);
            }
        }
    }

    #[test]
    fn failing_statuses_score_zero() {
        for status in [SslStatus::NoSsl, SslStatus::Expired, SslStatus::ConnectionError, SslStatus::NotYetValid] {
            let result = snapshot(status, 6);
            assert_eq!(grade(&result), SslGrade::F, "{status}");
            assert_eq!(score(&result), 0, "{status}");
        }
    }

    #[test]
    fn valid_certificate_grades_follow_thresholds() {
        assert_eq!(grade(&snapshot(SslStatus::Valid, 0)), SslGrade::B);
        assert_eq!(grade(&snapshot(SslStatus::Valid, 2)), SslGrade::B);
        assert_eq!(grade(&snapshot(SslStatus::Valid, 3)), SslGrade::B);
        assert_eq!(grade(&snapshot(SslStatus::Valid, 6)), SslGrade::A);
    }

    #[test]
    fn thresholds() {
        assert_eq!(grade_for_score(100), SslGrade::APlus);
        assert_eq!(grade_for_score(95), SslGrade::APlus);
        assert_eq!(grade_for_score(94), SslGrade::A);
        assert_eq!(grade_for_score(90), SslGrade::A);
        assert_eq!(grade_for_score(80), SslGrade::B);
        assert_eq!(grade_for_score(70), SslGrade::C);
        assert_eq!(grade_for_score(50), SslGrade::D);
        assert_eq!(grade_for_score(49), SslGrade::F);
    }

    #[test]
    fn calculators_are_pure() {
        for status in SslStatus::iter() {
            let result = snapshot(status, 4);
            assert_eq!(grade(&result), grade(&result));
            assert_eq!(score(&result), score(&result));
        }
    }

    #[test]
    fn stored_grade_matches_calculator() {
        for status in SslStatus::iter() {
            let result = snapshot(status, 5);
            assert_eq!(result.ssl_grade, grade(&result));
        }
    }
}
