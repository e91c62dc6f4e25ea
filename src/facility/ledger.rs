use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::domain::{Invoice, InvoiceDetail, InvoiceId, InvoiceStatus};
use super::repository::{FacilityRepository, RepositoryError};

/// Amount for one service charge line: unit price times quantity, exact.
pub fn line_amount(detail: &InvoiceDetail) -> Decimal {
    detail.unit_price * detail.quantity
}

/// Exact sum over the detail lines.
///
/// Decimal arithmetic throughout; repeated runs over the same lines always
/// produce the same total.
pub fn compute_total(details: &[InvoiceDetail]) -> Decimal {
    details.iter().map(line_amount).sum()
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("invoice is already paid")]
    AlreadyPaid,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Enforces the one-way invoice payment transition.
pub struct InvoiceLedger<R> {
    repository: Arc<R>,
}

impl<R> InvoiceLedger<R>
where
    R: FacilityRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Recompute an invoice total from its persisted detail lines.
    pub fn total_for(&self, invoice_id: InvoiceId) -> Result<Decimal, LedgerError> {
        let details = self.repository.invoice_details(invoice_id)?;
        Ok(compute_total(&details))
    }

    /// Transition an invoice from unpaid to paid, stamping `now`.
    ///
    /// Paid is terminal: a second call is [`LedgerError::AlreadyPaid`], not a
    /// no-op, and no reversal path exists.
    pub fn mark_paid(
        &self,
        invoice_id: InvoiceId,
        now: DateTime<Utc>,
    ) -> Result<Invoice, LedgerError> {
        let mut invoice = self
            .repository
            .invoice(invoice_id)?
            .ok_or(RepositoryError::NotFound)?;

        if invoice.status == InvoiceStatus::Paid {
            return Err(LedgerError::AlreadyPaid);
        }

        invoice.status = InvoiceStatus::Paid;
        invoice.payment_date = Some(now);
        self.repository.update_invoice(&invoice)?;

        tracing::info!(
            invoice = invoice.id.0,
            amount = %invoice.total_amount,
            "invoice settled"
        );

        Ok(invoice)
    }
}
