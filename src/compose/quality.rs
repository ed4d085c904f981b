// src/compose/quality.rs
//! Content quality: fusion strength, data quality, angle count and platform count
//! folded into an integer 0..=100, plus the auto-approval decision.

use serde::{Deserialize, Serialize};

use crate::compose::fusion::FusionStrength;
use crate::side_data::Statistic;

pub const DEFAULT_AUTO_APPROVE_THRESHOLD: u32 = 70;

const DATA_QUALITY_CAP: f64 = 30.0;
const POINTS_PER_STAT: f64 = 5.0;
const ANGLE_CAP: f64 = 25.0;
const POINTS_PER_ANGLE: f64 = 12.5;
const PLATFORM_CAP: f64 = 15.0;
const POINTS_PER_PLATFORM: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    pub fusion_strength: f64,
    pub data_quality: f64,
    pub angle_quality: f64,
    pub platform_fit: f64,
    pub total: u32,
}

/// `min(30, count*5 + mean credibility)`, 0 without statistics, never negative.
pub fn data_quality(stats: &[Statistic]) -> f64 {
    if stats.is_empty() {
        return 0.0;
    }
    let n = stats.len() as f64;
    let mean = stats.iter().map(|s| s.credibility).sum::<f64>() / n;
    let v = (n * POINTS_PER_STAT + mean).min(DATA_QUALITY_CAP);
    if v.is_nan() {
        0.0
    } else {
        v.max(0.0)
    }
}

pub fn score_quality(
    strength: FusionStrength,
    stats: &[Statistic],
    angle_count: usize,
    platform_count: usize,
) -> QualityScore {
    let fusion_strength = strength.points();
    let data_quality = data_quality(stats);
    let angle_quality = (angle_count as f64 * POINTS_PER_ANGLE).min(ANGLE_CAP);
    let platform_fit = (platform_count as f64 * POINTS_PER_PLATFORM).min(PLATFORM_CAP);

    let sum = fusion_strength + data_quality + angle_quality + platform_fit;
    // halves round to even
    let total = sum.round_ties_even().clamp(0.0, 100.0) as u32;

    QualityScore {
        fusion_strength,
        data_quality,
        angle_quality,
        platform_fit,
        total,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalPolicy {
    pub auto_approve: bool,
    pub threshold: u32,
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        Self {
            auto_approve: true,
            threshold: DEFAULT_AUTO_APPROVE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Approval {
    pub auto_approved: bool,
    pub requires_review: bool,
}

impl ApprovalPolicy {
    pub fn decide(&self, total: u32) -> Approval {
        let auto_approved = self.auto_approve && total >= self.threshold;
        Approval {
            auto_approved,
            requires_review: !auto_approved,
        }
    }
}
