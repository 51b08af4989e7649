use rust_decimal::Decimal;

use super::{
    models::{ProjectStatus, QuarterlyReport},
    MonitoringError,
};

/// Utilized vs. remaining budget of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetSummary {
    pub total_budget: Decimal,
    pub total_used: Decimal,
    /// Negative when spending exceeds the grant.
    pub remaining: Decimal,
    pub over_budget: bool,
}

impl BudgetSummary {
    /// Share of the grant spent, in percent rounded to two decimals.
    ///
    /// `None` for projects without a budget.
    pub fn utilization_percent(&self) -> Option<Decimal> {
        if self.total_budget.is_zero() {
            return None;
        }
        self.total_used
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_div(self.total_budget))
            .map(|percent| percent.round_dp(2))
    }
}

/// Sum of a report's expense items.
pub fn expense_total(report: &QuarterlyReport) -> Result<Decimal, MonitoringError> {
    report
        .expenses
        .iter()
        .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.amount))
        .ok_or(MonitoringError::AmountOverflow)
}

/// Reconciles spending against the grant.
///
/// Only Submitted and Verified reports count. A Completed project is treated
/// as having used exactly its full budget.
pub fn reconcile(
    reports: &[QuarterlyReport],
    total_budget: Decimal,
    project_status: ProjectStatus,
) -> Result<BudgetSummary, MonitoringError> {
    if project_status == ProjectStatus::Completed {
        return Ok(BudgetSummary {
            total_budget,
            total_used: total_budget,
            remaining: Decimal::ZERO,
            over_budget: false,
        });
    }

    let mut total_used = Decimal::ZERO;
    for report in reports.iter().filter(|r| r.status.is_complete()) {
        total_used = total_used
            .checked_add(expense_total(report)?)
            .ok_or(MonitoringError::AmountOverflow)?;
    }
    let remaining = total_budget
        .checked_sub(total_used)
        .ok_or(MonitoringError::AmountOverflow)?;

    Ok(BudgetSummary {
        total_budget,
        total_used,
        remaining,
        over_budget: remaining.is_sign_negative() && !remaining.is_zero(),
    })
}
