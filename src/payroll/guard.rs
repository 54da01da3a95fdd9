use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::PayrollError, model::salary::SalaryPayment, store::PayrollStore};

use super::month::first_of_month;

/// Answer to "has this employee already been paid for this month?".
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCheck {
    #[schema(example = true)]
    pub has_paid: bool,

    /// The existing payment for that month, if any
    pub payment: Option<SalaryPayment>,
}

impl From<Option<SalaryPayment>> for PaymentCheck {
    fn from(payment: Option<SalaryPayment>) -> Self {
        Self {
            has_paid: payment.is_some(),
            payment,
        }
    }
}

/// Finds the payment made to `employee_number` in the month containing `month`.
pub fn find_month_payment<'a, I>(
    payments: I,
    employee_number: &str,
    month: NaiveDate,
) -> Option<&'a SalaryPayment>
where
    I: IntoIterator<Item = &'a SalaryPayment>,
{
    let month = first_of_month(month);
    payments
        .into_iter()
        .find(|p| p.employee_number == employee_number && first_of_month(p.month) == month)
}

/// Fails with [`PayrollError::DuplicatePayment`] when the employee is already
/// paid for that month. `except` skips one payment, the one being edited.
pub fn ensure_unpaid<'a, I>(
    payments: I,
    employee_number: &str,
    month: NaiveDate,
    except: Option<u64>,
) -> Result<(), PayrollError>
where
    I: IntoIterator<Item = &'a SalaryPayment>,
{
    let others = payments.into_iter().filter(|p| Some(p.id) != except);
    match find_month_payment(others, employee_number, month) {
        Some(existing) => Err(PayrollError::DuplicatePayment {
            employee_number: existing.employee_number.clone(),
            month: existing.month,
        }),
        None => Ok(()),
    }
}

/// Advisory lookup used by clients before they submit a payment.
///
/// Creation does not rely on it: stores enforce the same rule atomically.
pub async fn check_payment(
    store: &dyn PayrollStore,
    employee_number: &str,
    month: NaiveDate,
) -> Result<PaymentCheck, PayrollError> {
    let month = first_of_month(month);
    let existing = store.find_payment(employee_number, month).await?;

    tracing::debug!(
        employee_number,
        %month,
        has_paid = existing.is_some(),
        "Checked payment for month"
    );

    Ok(existing.into())
}
