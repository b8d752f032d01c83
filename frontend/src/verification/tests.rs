use super::*;
use chrono::NaiveDate;
use std::collections::VecDeque;

// =========================================================
// Shared Mock Components
// =========================================================

/// 抽签结果可脚本化的随机源
struct FixedSource {
    queued: RefCell<VecDeque<f64>>,
    fallback: f64,
}

impl FixedSource {
    fn always(value: f64) -> Self {
        FixedSource {
            queued: RefCell::new(VecDeque::new()),
            fallback: value,
        }
    }

    fn sequence(values: &[f64], fallback: f64) -> Self {
        FixedSource {
            queued: RefCell::new(values.iter().copied().collect()),
            fallback,
        }
    }
}

impl RandomSource for FixedSource {
    fn next_unit(&self) -> f64 {
        self.queued.borrow_mut().pop_front().unwrap_or(self.fallback)
    }
}

fn ts(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

// =========================================================
// Scanner
// =========================================================

#[tokio::test]
async fn test_draw_below_rate_verifies() {
    let scanner = SimulatedScanner::new(FixedSource::always(0.3));
    assert_eq!(scanner.verify("John Doe").await, VerificationStatus::Verified);
}

#[tokio::test]
async fn test_draw_above_rate_fails() {
    let scanner = SimulatedScanner::new(FixedSource::always(0.95));
    assert_eq!(scanner.verify("John Doe").await, VerificationStatus::Failed);
}

#[tokio::test]
async fn test_rate_boundary_is_exclusive() {
    // 抽中阈值本身算失败，成功区间是 [0, rate)
    let scanner = SimulatedScanner::new(FixedSource::always(VERIFICATION_SUCCESS_RATE));
    assert_eq!(scanner.verify("John Doe").await, VerificationStatus::Failed);
}

#[tokio::test]
async fn test_seeded_scanner_is_deterministic() {
    let first = SimulatedScanner::new(ClockSeededRng::seeded(42));
    let second = SimulatedScanner::new(ClockSeededRng::seeded(42));
    for _ in 0..16 {
        assert_eq!(first.verify("x").await, second.verify("x").await);
    }
}

// =========================================================
// Verification Log
// =========================================================

#[tokio::test]
async fn test_log_keeps_five_most_recent_newest_first() {
    let scanner = SimulatedScanner::new(FixedSource::always(0.1));
    let mut log = VerificationLog::new();

    for i in 0..10 {
        let status = scanner.verify(&format!("patient-{i}")).await;
        assert!(status.is_verified());
        log.record(format!("patient-{i}"), status, ts(1 + i, 8));
    }

    let entries = log.entries();
    assert_eq!(entries.len(), VERIFICATION_LOG_CAP);
    // 最新的排最前，编号递减
    let ids: Vec<u32> = entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![10, 9, 8, 7, 6]);
    assert_eq!(entries[0].name, "patient-9");
    assert_eq!(entries[4].name, "patient-5");
}

#[tokio::test]
async fn test_failures_are_recorded_too() {
    let scanner = SimulatedScanner::new(FixedSource::sequence(&[0.2, 0.9], 0.2));
    let mut log = VerificationLog::new();

    let first = scanner.verify("John Doe").await;
    log.record("John Doe", first, ts(2, 9));
    let second = scanner.verify("Jane Smith").await;
    log.record("Jane Smith", second, ts(2, 10));

    let entries = log.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "Jane Smith");
    assert_eq!(entries[0].status, VerificationStatus::Failed);
    assert_eq!(entries[1].name, "John Doe");
    assert_eq!(entries[1].status, VerificationStatus::Verified);
}

#[test]
fn test_empty_log() {
    let log = VerificationLog::new();
    assert!(log.is_empty());
    assert!(log.entries().is_empty());
}

// =========================================================
// Report Gating
// =========================================================

#[test]
fn test_report_needs_one_of_each_institution() {
    assert!(report_submittable(1, 1, false));
    assert!(report_submittable(3, 2, false));
    assert!(!report_submittable(0, 1, false));
    assert!(!report_submittable(1, 0, false));
    assert!(!report_submittable(0, 0, false));
}

#[test]
fn test_report_blocked_while_in_flight() {
    assert!(!report_submittable(1, 1, true));
}

// =========================================================
// Biometric Token
// =========================================================

#[test]
fn test_biometric_token_shape() {
    let token = sample_biometric_token();
    assert!(token.starts_with("biometric_"));
    assert_eq!(token.len(), "biometric_".len() + 8);
}
