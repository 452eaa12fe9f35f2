//! Invoice ledger.
//!
//! `PaymentLedger` edits a project's payment list in place. Invoices have no
//! delete path and `paid` is terminal.

use chrono::NaiveDate;
use fynkr_core::{
    parse_due_date, Money, Payment, PaymentId, PaymentMethod, PaymentStatus, Time, ValidationError,
};
use serde::Serialize;
use tracing::debug;

/// Mutable view over one project's payments.
pub struct PaymentLedger<'a> {
    payments: &'a mut Vec<Payment>,
}

impl<'a> PaymentLedger<'a> {
    /// Wrap a payment list.
    pub fn new(payments: &'a mut Vec<Payment>) -> Self {
        Self { payments }
    }

    /// Current payments in insertion order.
    pub fn payments(&self) -> &[Payment] {
        self.payments.as_slice()
    }

    /// Append a pending invoice built from raw form text.
    ///
    /// Rejected, with no change, when a field is blank, the amount does not
    /// parse or is not positive, or the due date is not `YYYY-MM-DD`.
    pub fn create_invoice(
        &mut self,
        amount: &str,
        description: &str,
        due_date: &str,
    ) -> Result<Payment, ValidationError> {
        let amount = required("amount", amount)?;
        let description = required("description", description)?;
        let due_date = required("due date", due_date)?;

        let amount: Money = amount.parse()?;
        if !amount.is_positive() {
            return Err(ValidationError::NonPositiveAmount);
        }
        let due_date = parse_due_date(due_date)?;

        let payment = Payment::new(amount, description, due_date);
        self.payments.push(payment.clone());
        Ok(payment)
    }

    /// Settle a payment now. Unknown ids and already-paid payments are untouched.
    pub fn mark_paid(&mut self, id: PaymentId, method: PaymentMethod) -> &[Payment] {
        self.mark_paid_at(id, method, chrono::Utc::now())
    }

    /// Settle a payment with an explicit settlement time.
    pub fn mark_paid_at(&mut self, id: PaymentId, method: PaymentMethod, paid_at: Time) -> &[Payment] {
        match self.payments.iter_mut().find(|p| p.id == id) {
            Some(payment) => {
                if !payment.settle(method, paid_at) {
                    debug!(payment_id = %id, "payment already settled");
                }
            }
            None => debug!(payment_id = %id, "settlement for unknown payment ignored"),
        }
        self.payments.as_slice()
    }

    /// Flag pending invoices due before `today` as overdue; returns how many.
    ///
    /// Only ever called explicitly: no other ledger operation derives
    /// `overdue` from dates.
    pub fn flag_overdue(&mut self, today: NaiveDate) -> usize {
        let mut flagged = 0;
        for payment in self.payments.iter_mut().filter(|p| p.is_past_due(today)) {
            payment.status = PaymentStatus::Overdue;
            flagged += 1;
        }
        flagged
    }

    /// Totals of the current payments.
    pub fn totals(&self) -> PaymentTotals {
        totals(self.payments)
    }
}

/// Invoice sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaymentTotals {
    /// Sum of every invoice
    pub total: Money,
    /// Sum of paid invoices
    pub paid: Money,
    /// `total - paid`
    pub pending: Money,
}

/// Aggregate invoice amounts. Exact: amounts are integer cents.
pub fn totals(payments: &[Payment]) -> PaymentTotals {
    let total: Money = payments.iter().map(|p| p.amount).sum();
    let paid: Money = payments.iter().filter(|p| p.is_paid()).map(|p| p.amount).sum();
    PaymentTotals {
        total,
        paid,
        pending: total - paid,
    }
}

fn required<'s>(field: &'static str, value: &'s str) -> Result<&'s str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required { field })
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_due_date(s).unwrap()
    }

    #[test]
    fn test_create_invoice() {
        let mut payments = Vec::new();
        let mut ledger = PaymentLedger::new(&mut payments);

        let invoice = ledger.create_invoice("1000", "Milestone 2", "2024-06-01").unwrap();

        assert_eq!(invoice.status, PaymentStatus::Pending);
        assert_eq!(invoice.amount, Money::from_units(1000));
        assert_eq!(invoice.due_date, date("2024-06-01"));
        assert!(invoice.method.is_none());
        assert!(invoice.paid_at.is_none());
        assert_eq!(payments, vec![invoice]);
    }

    #[test]
    fn test_create_invoice_rejections_leave_ledger_unchanged() {
        let mut payments = Vec::new();
        let mut ledger = PaymentLedger::new(&mut payments);

        assert_eq!(
            ledger.create_invoice("", "Milestone 2", "2024-06-01"),
            Err(ValidationError::Required { field: "amount" })
        );
        assert_eq!(
            ledger.create_invoice("1000", " ", "2024-06-01"),
            Err(ValidationError::Required { field: "description" })
        );
        assert_eq!(
            ledger.create_invoice("1000", "Milestone 2", ""),
            Err(ValidationError::Required { field: "due date" })
        );
        assert!(matches!(
            ledger.create_invoice("abc", "Milestone 2", "2024-06-01"),
            Err(ValidationError::InvalidAmount(_))
        ));
        assert_eq!(
            ledger.create_invoice("0", "Milestone 2", "2024-06-01"),
            Err(ValidationError::NonPositiveAmount)
        );
        assert!(matches!(
            ledger.create_invoice("10", "Milestone 2", "June 1st"),
            Err(ValidationError::InvalidDate(_))
        ));
        assert!(payments.is_empty());
    }

    #[test]
    fn test_mark_paid_moves_amount_from_pending_to_paid() {
        let mut payments = Vec::new();
        let mut ledger = PaymentLedger::new(&mut payments);
        ledger.create_invoice("2500", "Initial project payment (50%)", "2024-01-30").unwrap();
        let milestone = ledger.create_invoice("1500.25", "Milestone 2 payment (30%)", "2024-02-28").unwrap();
        let before = ledger.totals();

        let after_pay = ledger.mark_paid(milestone.id, PaymentMethod::Stripe);
        let paid = after_pay.iter().find(|p| p.id == milestone.id).unwrap();
        assert_eq!(paid.status, PaymentStatus::Paid);
        assert_eq!(paid.method, Some(PaymentMethod::Stripe));
        assert!(paid.paid_at.is_some());

        let after = ledger.totals();
        assert_eq!(after.total, before.total);
        assert_eq!(after.paid, before.paid + milestone.amount);
        assert_eq!(after.pending, before.pending - milestone.amount);
        assert_eq!(after.pending, Money::from_units(2500));
    }

    #[test]
    fn test_mark_paid_unknown_or_settled_is_noop() {
        let mut payments = Vec::new();
        let mut ledger = PaymentLedger::new(&mut payments);
        let invoice = ledger.create_invoice("10", "Final", "2024-03-15").unwrap();
        ledger.mark_paid(invoice.id, PaymentMethod::Paypal);
        let settled = ledger.payments().to_vec();

        ledger.mark_paid(PaymentId::new(), PaymentMethod::Stripe);
        ledger.mark_paid(invoice.id, PaymentMethod::Stripe);

        assert_eq!(payments, settled);
    }

    #[test]
    fn test_flag_overdue_is_explicit() {
        let mut payments = Vec::new();
        let mut ledger = PaymentLedger::new(&mut payments);
        let late = ledger.create_invoice("10", "Late", "2024-01-01").unwrap();
        let paid = ledger.create_invoice("10", "Paid", "2024-01-01").unwrap();
        ledger.create_invoice("10", "Future", "2024-12-01").unwrap();
        ledger.mark_paid(paid.id, PaymentMethod::Stripe);

        assert_eq!(ledger.payments()[0].status, PaymentStatus::Pending);
        assert_eq!(ledger.flag_overdue(date("2024-06-01")), 1);
        assert_eq!(ledger.flag_overdue(date("2024-06-01")), 0);

        assert_eq!(payments[0].id, late.id);
        assert_eq!(payments[0].status, PaymentStatus::Overdue);
        assert_eq!(payments[1].status, PaymentStatus::Paid);
        assert_eq!(payments[2].status, PaymentStatus::Pending);
    }

    #[test]
    fn test_overdue_invoices_can_still_be_paid() {
        let mut payments = Vec::new();
        let mut ledger = PaymentLedger::new(&mut payments);
        let invoice = ledger.create_invoice("10", "Late", "2024-01-01").unwrap();
        ledger.flag_overdue(date("2024-02-01"));

        ledger.mark_paid(invoice.id, PaymentMethod::Paypal);
        assert_eq!(ledger.payments()[0].status, PaymentStatus::Paid);
        assert_eq!(ledger.totals().pending, Money::ZERO);
    }

    #[test]
    fn test_totals_of_nothing() {
        assert_eq!(totals(&[]), PaymentTotals::default());
    }

    #[test]
    fn test_oversized_amounts_are_rejected() {
        let mut payments = Vec::new();
        let mut ledger = PaymentLedger::new(&mut payments);

        assert!(matches!(
            ledger.create_invoice("90000000000000000", "Retainer", "2024-06-01"),
            Err(ValidationError::InvalidAmount(_))
        ));
        ledger.create_invoice("1000000000000", "Retainer", "2024-06-01").unwrap();
        ledger.create_invoice("1000000000000", "Retainer", "2024-07-01").unwrap();

        let sums = ledger.totals();
        assert_eq!(sums.total, Money::from_cents(2 * Money::MAX.cents()));
        assert_eq!(sums.pending, sums.total);
    }

    #[test]
    fn test_totals_of_stored_extremes_do_not_overflow() {
        let due = date("2024-06-01");
        let mut paid = Payment::new(Money::from_cents(i64::MAX), "Imported", due);
        paid.settle(PaymentMethod::Paypal, chrono::Utc::now());
        let payments = vec![paid, Payment::new(Money::from_cents(i64::MAX), "Imported", due)];

        let sums = totals(&payments);
        assert_eq!(sums.total, Money::from_cents(i64::MAX));
        assert_eq!(sums.paid, Money::from_cents(i64::MAX));
        assert_eq!(sums.pending, Money::ZERO);
    }
}
