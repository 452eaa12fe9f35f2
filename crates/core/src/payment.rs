//! Payment model - an invoice issued against a project.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::error::ValidationError;
use crate::id::PaymentId;
use crate::money::Money;
use crate::Time;

/// A billable line item of a project.
///
/// `method` and `paid_at` are both `None` until the payment is settled, and
/// both `Some` afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,

    /// Invoiced amount, always positive
    pub amount: Money,

    /// Lifecycle state
    pub status: PaymentStatus,

    /// Calendar due date
    pub due_date: NaiveDate,

    /// Free text shown on the invoice
    pub description: String,

    /// Processor used to settle, present once paid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,

    /// Settlement time, present once paid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<Time>,
}

impl Payment {
    /// Create a new pending invoice.
    pub fn new(amount: Money, description: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            id: PaymentId::new(),
            amount,
            status: PaymentStatus::Pending,
            due_date,
            description: description.into(),
            method: None,
            paid_at: None,
        }
    }

    /// Whether the payment has been settled.
    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }

    /// Settle the payment. `paid` is terminal: settling twice keeps the first record.
    pub fn settle(&mut self, method: PaymentMethod, paid_at: Time) -> bool {
        if self.is_paid() {
            return false;
        }
        self.status = PaymentStatus::Paid;
        self.method = Some(method);
        self.paid_at = Some(paid_at);
        true
    }

    /// Pending and past its due date as of `today`.
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.status == PaymentStatus::Pending && self.due_date < today
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_due_date(s: &str) -> Result<NaiveDate, ValidationError> {
    let raw = s.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Invoice lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    /// Issued, awaiting payment
    Pending,
    /// Settled
    Paid,
    /// Flagged as late
    Overdue,
}

impl PaymentStatus {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Payment processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Card payment through Stripe.
    Stripe,
    /// PayPal checkout.
    Paypal,
}

impl PaymentMethod {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Stripe => "stripe",
            PaymentMethod::Paypal => "paypal",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stripe" => Ok(PaymentMethod::Stripe),
            "paypal" => Ok(PaymentMethod::Paypal),
            other => Err(ValidationError::unknown("payment method", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_due_date(s).unwrap()
    }

    #[test]
    fn test_new_payment_is_pending_without_settlement() {
        let payment = Payment::new(Money::from_units(1000), "Milestone 2", date("2024-06-01"));
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(payment.method.is_none());
        assert!(payment.paid_at.is_none());

        let json = serde_json::to_value(&payment).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["dueDate"], "2024-06-01");
        assert_eq!(json["amount"], 100_000);
        assert!(json.get("method").is_none());
        assert!(json.get("paidAt").is_none());
    }

    #[test]
    fn test_settle_is_terminal() {
        let mut payment = Payment::new(Money::from_units(50), "Deposit", date("2024-01-30"));
        let first = chrono::Utc::now();
        assert!(payment.settle(PaymentMethod::Stripe, first));
        assert!(!payment.settle(PaymentMethod::Paypal, chrono::Utc::now()));
        assert_eq!(payment.method, Some(PaymentMethod::Stripe));
        assert_eq!(payment.paid_at, Some(first));
    }

    #[test]
    fn test_due_date_parsing() {
        assert!(parse_due_date("2024-02-30").is_err());
        assert!(parse_due_date("06/01/2024").is_err());
        assert_eq!(
            parse_due_date(" 2024-03-15 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn test_past_due_only_when_pending() {
        let mut payment = Payment::new(Money::from_units(10), "Final", date("2024-03-15"));
        assert!(payment.is_past_due(date("2024-03-16")));
        assert!(!payment.is_past_due(date("2024-03-15")));
        payment.settle(PaymentMethod::Paypal, chrono::Utc::now());
        assert!(!payment.is_past_due(date("2024-04-01")));
    }
}
