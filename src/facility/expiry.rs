use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Contract, ContractId};

/// Default width of the expiring-soon alert window, in calendar days.
///
/// The single source of truth for expiry thresholds; listings, sorting, and
/// alert badges all derive from [`classify`], or from [`classify_within`]
/// when an operator has configured a different window.
pub const EXPIRY_WINDOW_DAYS: i64 = 30;

/// Alert tier for a contract's remaining term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryTier {
    Overdue { days_past: u32 },
    ExpiringSoon { days_left: u32 },
    Normal,
}

impl ExpiryTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overdue { .. } => "Overdue",
            Self::ExpiringSoon { .. } => "Expiring Soon",
            Self::Normal => "Normal",
        }
    }
}

/// Classify a contract end date relative to `today`.
///
/// Calendar-day arithmetic only; no time-of-day component. An end date of
/// today counts as expiring with zero days left, not overdue.
pub fn classify(end_date: NaiveDate, today: NaiveDate) -> ExpiryTier {
    classify_within(end_date, today, EXPIRY_WINDOW_DAYS)
}

/// [`classify`] against an explicit window width.
pub fn classify_within(end_date: NaiveDate, today: NaiveDate, window_days: i64) -> ExpiryTier {
    let days = (end_date - today).num_days();
    if days < 0 {
        ExpiryTier::Overdue {
            days_past: days.unsigned_abs() as u32,
        }
    } else if days <= window_days {
        ExpiryTier::ExpiringSoon {
            days_left: days as u32,
        }
    } else {
        ExpiryTier::Normal
    }
}

/// Flagged contract row for alert listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractExpiryView {
    pub contract_id: ContractId,
    pub contract_number: String,
    pub end_date: NaiveDate,
    pub tier: ExpiryTier,
}

/// Classify a listing of contracts, most urgent first.
pub fn flag_contracts(contracts: &[Contract], today: NaiveDate) -> Vec<ContractExpiryView> {
    flag_contracts_within(contracts, today, EXPIRY_WINDOW_DAYS)
}

/// [`flag_contracts`] against an explicit window width.
pub fn flag_contracts_within(
    contracts: &[Contract],
    today: NaiveDate,
    window_days: i64,
) -> Vec<ContractExpiryView> {
    let mut views: Vec<ContractExpiryView> = contracts
        .iter()
        .map(|contract| ContractExpiryView {
            contract_id: contract.id,
            contract_number: contract.contract_number.clone(),
            end_date: contract.end_date,
            tier: classify_within(contract.end_date, today, window_days),
        })
        .collect();
    views.sort_by(|a, b| a.end_date.cmp(&b.end_date));
    views
}
