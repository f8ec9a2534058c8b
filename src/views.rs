//! View builders — five pure derivations over the record table.
//!
//! Each function takes the full dataset plus the control values it
//! depends on and returns one derived view. No selection always means
//! "all rows"; active filters compose by logical AND. Every grouping
//! sorts its keys, so identical inputs serialize byte-identically.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::BILLING_BUCKETS;
use crate::dataset::{Dataset, Encounter, YearMonth};

fn matches_gender(row: &Encounter, gender: Option<&str>) -> bool {
    gender.map_or(true, |g| row.gender == g)
}

fn matches_condition(row: &Encounter, condition: Option<&str>) -> bool {
    condition.map_or(true, |c| row.condition == c)
}

// ═══════════════════════════════════════════════════════════
// 1. Age-by-gender distribution
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgeSeries {
    pub gender: String,
    pub ages: Vec<u32>,
}

/// Age values partitioned by gender, or an explicit empty sentinel when
/// the filter matches no rows.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum AgeDistribution {
    Empty,
    Series(Vec<AgeSeries>),
}

/// Filter by gender when set, then partition the Age values by Gender.
/// Series are sorted by gender label; ages keep row order.
pub fn age_by_gender(dataset: &Dataset, gender: Option<&str>) -> AgeDistribution {
    let mut by_gender: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
    for row in dataset.rows() {
        if matches_gender(row, gender) {
            by_gender.entry(&row.gender).or_default().push(row.age);
        }
    }

    if by_gender.is_empty() {
        return AgeDistribution::Empty;
    }

    AgeDistribution::Series(
        by_gender
            .into_iter()
            .map(|(gender, ages)| AgeSeries {
                gender: gender.to_string(),
                ages,
            })
            .collect(),
    )
}

// ═══════════════════════════════════════════════════════════
// 2. Medical-condition share
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConditionSlice {
    pub condition: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConditionShare {
    pub slices: Vec<ConditionSlice>,
}

/// Filter by gender when set, then count rows per distinct Medical
/// Condition. Zero slices is a valid output.
pub fn condition_share(dataset: &Dataset, gender: Option<&str>) -> ConditionShare {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for row in dataset.rows() {
        if matches_gender(row, gender) {
            *counts.entry(&row.condition).or_default() += 1;
        }
    }

    ConditionShare {
        slices: counts
            .into_iter()
            .map(|(condition, count)| ConditionSlice {
                condition: condition.to_string(),
                count,
            })
            .collect(),
    }
}

// ═══════════════════════════════════════════════════════════
// 3. Insurance-provider comparison
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProviderBilling {
    pub provider: String,
    pub condition: String,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InsuranceBilling {
    pub groups: Vec<ProviderBilling>,
}

/// Filter by gender when set, then sum Billing Amount per
/// (Insurance Provider, Medical Condition) pair, sorted by provider
/// then condition.
pub fn insurance_billing(dataset: &Dataset, gender: Option<&str>) -> InsuranceBilling {
    let mut totals: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for row in dataset.rows() {
        if matches_gender(row, gender) {
            *totals
                .entry((&row.insurance_provider, &row.condition))
                .or_default() += row.billing_amount;
        }
    }

    InsuranceBilling {
        groups: totals
            .into_iter()
            .map(|((provider, condition), total)| ProviderBilling {
                provider: provider.to_string(),
                condition: condition.to_string(),
                total,
            })
            .collect(),
    }
}

// ═══════════════════════════════════════════════════════════
// 4. Billing-amount distribution
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BillingBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BillingDistribution {
    pub buckets: Vec<BillingBucket>,
    pub sample_count: usize,
}

/// Filter by gender when set AND Billing Amount <= ceiling, then bucket
/// the amounts into `BILLING_BUCKETS` equal-width buckets spanning the
/// filtered [min, max].
///
/// Empty filtered set yields zero buckets; all-equal values collapse to
/// a single bucket. A value on a shared edge counts in the later bucket,
/// except the maximum which lands in the last.
pub fn billing_distribution(
    dataset: &Dataset,
    gender: Option<&str>,
    ceiling: f64,
) -> BillingDistribution {
    let amounts: Vec<f64> = dataset
        .rows()
        .iter()
        .filter(|row| matches_gender(row, gender) && row.billing_amount <= ceiling)
        .map(|row| row.billing_amount)
        .collect();

    let sample_count = amounts.len();
    if amounts.is_empty() {
        return BillingDistribution {
            buckets: Vec::new(),
            sample_count,
        };
    }

    let min = amounts.iter().copied().fold(f64::INFINITY, f64::min);
    let max = amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return BillingDistribution {
            buckets: vec![BillingBucket {
                lower: min,
                upper: max,
                count: sample_count as u64,
            }],
            sample_count,
        };
    }

    let width = (max - min) / BILLING_BUCKETS as f64;
    let mut counts = vec![0u64; BILLING_BUCKETS];
    for amount in &amounts {
        let index = (((amount - min) / width) as usize).min(BILLING_BUCKETS - 1);
        counts[index] += 1;
    }

    BillingDistribution {
        buckets: counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| BillingBucket {
                lower: min + width * i as f64,
                upper: min + width * (i + 1) as f64,
                count,
            })
            .collect(),
        sample_count,
    }
}

// ═══════════════════════════════════════════════════════════
// 5. Admission trends
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendPoint {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdmissionTrends {
    pub points: Vec<TrendPoint>,
}

/// Filter by condition when set, then count rows per YearMonth bucket in
/// ascending calendar order. Buckets with zero rows are omitted. Chart
/// kind never reaches this function; it only selects the trace type.
pub fn admission_trends(dataset: &Dataset, condition: Option<&str>) -> AdmissionTrends {
    let mut counts: BTreeMap<YearMonth, u64> = BTreeMap::new();
    for row in dataset.rows() {
        if matches_condition(row, condition) {
            *counts.entry(row.admission_month).or_default() += 1;
        }
    }

    AdmissionTrends {
        points: counts
            .into_iter()
            .map(|(month, count)| TrendPoint {
                label: month.to_string(),
                count,
            })
            .collect(),
    }
}
