//! 患者身份验证模块。
//!
//! 真实的生物识别硬件还没接入，扫描器目前是一个按固定
//! 成功率抽签的模拟实现，但对外只暴露 [`IdentityVerifier`]
//! trait，接入真机时组件代码不用动。验证结果只存在内存里，
//! 不回传后端；后端拿到的是之后显式提交的报告。

use std::cell::RefCell;

use chrono::{NaiveDateTime, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 模拟扫描的成功率，低于该值的抽签算通过
pub const VERIFICATION_SUCCESS_RATE: f64 = 0.8;

/// 最近验证列表保留的条数
pub const VERIFICATION_LOG_CAP: usize = 5;

// =========================================================
// 随机源
// =========================================================

/// [0, 1) 区间的随机抽取
///
/// 单独抽出来是为了让测试能钉死抽签结果
pub trait RandomSource {
    fn next_unit(&self) -> f64;
}

/// 生产随机源：用时钟毫秒数播种的 SmallRng
///
/// WASM 环境拿不到系统熵，时钟种子对模拟场景足够
pub struct ClockSeededRng {
    rng: RefCell<SmallRng>,
}

impl ClockSeededRng {
    pub fn from_clock() -> Self {
        Self::seeded(Utc::now().timestamp_millis() as u64)
    }

    pub fn seeded(seed: u64) -> Self {
        ClockSeededRng {
            rng: RefCell::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for ClockSeededRng {
    fn next_unit(&self) -> f64 {
        self.rng.borrow_mut().gen_range(0.0..1.0)
    }
}

/// 注册表单"采集生物特征"按钮生成的占位令牌
pub fn sample_biometric_token() -> String {
    let draw = ClockSeededRng::from_clock().next_unit();
    format!("biometric_{:08x}", (draw * f64::from(u32::MAX)) as u32)
}

// =========================================================
// 验证器
// =========================================================

/// 单次验证的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Verified,
    Failed,
}

impl VerificationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VerificationStatus::Verified => "Verified",
            VerificationStatus::Failed => "Failed",
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationStatus::Verified)
    }
}

/// 身份验证接口，真实服务与模拟器共用
#[async_trait::async_trait(?Send)]
pub trait IdentityVerifier {
    async fn verify(&self, subject: &str) -> VerificationStatus;
}

/// 模拟扫描器：按成功率抽签
pub struct SimulatedScanner<R: RandomSource> {
    source: R,
}

impl SimulatedScanner<ClockSeededRng> {
    pub fn from_clock() -> Self {
        SimulatedScanner::new(ClockSeededRng::from_clock())
    }
}

impl<R: RandomSource> SimulatedScanner<R> {
    pub fn new(source: R) -> Self {
        SimulatedScanner { source }
    }
}

#[async_trait::async_trait(?Send)]
impl<R: RandomSource> IdentityVerifier for SimulatedScanner<R> {
    async fn verify(&self, _subject: &str) -> VerificationStatus {
        if self.source.next_unit() < VERIFICATION_SUCCESS_RATE {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Failed
        }
    }
}

// =========================================================
// 验证日志
// =========================================================

/// 一条验证记录，只存在当前页面会话里
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationRecord {
    pub id: u32,
    pub name: String,
    pub status: VerificationStatus,
    pub timestamp: NaiveDateTime,
}

/// 最近验证列表：新的在前，超出上限的最旧记录被挤掉
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationLog {
    entries: Vec<VerificationRecord>,
    next_id: u32,
}

impl VerificationLog {
    pub fn new() -> Self {
        VerificationLog::default()
    }

    pub fn record(
        &mut self,
        name: impl Into<String>,
        status: VerificationStatus,
        timestamp: NaiveDateTime,
    ) {
        self.next_id += 1;
        self.entries.insert(
            0,
            VerificationRecord {
                id: self.next_id,
                name: name.into(),
                status,
                timestamp,
            },
        );
        self.entries.truncate(VERIFICATION_LOG_CAP);
    }

    pub fn entries(&self) -> &[VerificationRecord] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 报告提交按钮的可用条件：两类机构各至少选一个，
/// 且当前没有在途的提交
pub fn report_submittable(bank_count: usize, hospital_count: usize, in_flight: bool) -> bool {
    bank_count > 0 && hospital_count > 0 && !in_flight
}

#[cfg(test)]
mod tests;
