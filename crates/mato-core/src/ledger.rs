//! # Credit Ledger
//!
//! Per-customer credit accounts, derived on demand from the sale and
//! payment history - never stored.
//!
//! ## Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │            balance = owed − paid, per phone key                     │
//! │                                                                     │
//! │  owed  = Σ credit-sale totals      (cart sales on credit)           │
//! │        + Σ manual credit amounts   (credit sales with no lines)     │
//! │  paid  = Σ payment amounts                                          │
//! │                                                                     │
//! │  Recomputed from the full history every time. There is no stored    │
//! │  balance column to drift out of sync.                               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A balance can go negative (overpayment) and that is a valid state,
//! shown as the shop owing the customer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::money::Money;
use crate::types::{CreditPayment, Customer, Sale, TenderType};

// =============================================================================
// Phone Label Parsing
// =============================================================================

/// Extracts the bare phone key from a customer label.
///
/// The credit screen offers customers as `"Name (612345)"`; picking one
/// puts that whole label in the input. This recovers the key:
/// a trailing parenthesized token wins, otherwise the trimmed input is
/// taken as the phone itself.
///
/// ## Example
/// ```rust
/// use mato_core::ledger::extract_phone;
///
/// assert_eq!(extract_phone("Amina (612345)"), "612345");
/// assert_eq!(extract_phone("612345"), "612345");
/// assert_eq!(extract_phone(" 612345 "), "612345");
/// ```
pub fn extract_phone(label: &str) -> String {
    let label = label.trim();
    if let Some(open) = label.rfind('(') {
        if let Some(inner) = label[open + 1..].strip_suffix(')') {
            let inner = inner.trim();
            if !inner.is_empty() {
                return inner.to_string();
            }
        }
    }
    label.to_string()
}

// =============================================================================
// Credit Account
// =============================================================================

/// A derived credit account for one phone key.
#[derive(Debug, Clone, Serialize)]
pub struct CreditAccount {
    pub phone: String,
    /// Display name from the customer directory, when known.
    pub name: Option<String>,
    pub owed: Money,
    pub paid: Money,
    pub balance: Money,
}

impl CreditAccount {
    /// Accounts at exactly zero are settled and hidden from the default
    /// listing (they still show up under an explicit search).
    pub fn has_balance(&self) -> bool {
        !self.balance.is_zero()
    }

    /// "Name (phone)" when a name is known, else the bare phone.
    pub fn display_label(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => format!("{} ({})", name, self.phone),
            _ => self.phone.clone(),
        }
    }
}

/// Builds the full account list from history, sorted by descending
/// balance (biggest debtors first), ties by phone.
///
/// Credit sales without a phone key are skipped - checkout refuses to
/// create them, so any such row predates that rule and has no account
/// to land in.
pub fn build_accounts(
    sales: &[Sale],
    payments: &[CreditPayment],
    customers: &[Customer],
) -> Vec<CreditAccount> {
    let mut owed: BTreeMap<String, Money> = BTreeMap::new();
    let mut paid: BTreeMap<String, Money> = BTreeMap::new();

    for sale in sales {
        if sale.tender != TenderType::Credit {
            continue;
        }
        let Some(phone) = sale.customer.as_deref().filter(|p| !p.is_empty()) else {
            continue;
        };
        *owed.entry(phone.to_string()).or_default() += sale.total();
    }
    for payment in payments {
        *paid.entry(payment.phone.clone()).or_default() += payment.amount();
    }

    let mut phones: Vec<String> = owed.keys().chain(paid.keys()).cloned().collect();
    phones.sort();
    phones.dedup();

    let mut accounts: Vec<CreditAccount> = phones
        .into_iter()
        .map(|phone| {
            let owed = owed.get(&phone).copied().unwrap_or_default();
            let paid = paid.get(&phone).copied().unwrap_or_default();
            let name = customers
                .iter()
                .find(|c| c.phone == phone)
                .and_then(|c| c.name.clone());
            CreditAccount {
                phone,
                name,
                owed,
                paid,
                balance: owed - paid,
            }
        })
        .collect();

    accounts.sort_by(|a, b| {
        b.balance
            .cents()
            .cmp(&a.balance.cents())
            .then_with(|| a.phone.cmp(&b.phone))
    });
    accounts
}

// =============================================================================
// Account Statement
// =============================================================================

/// The kind of event on a statement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// A cart sale taken on credit.
    Sale,
    /// A manual credit grant (no cart lines).
    ManualCredit,
    /// A payment received against the balance.
    Payment,
}

/// One chronological event on a customer's statement.
///
/// Payments carry a negative `amount` so the running sum of a statement
/// is the balance.
#[derive(Debug, Clone, Serialize)]
pub struct StatementEntry {
    pub kind: StatementKind,
    pub amount: Money,
    /// Manual-credit note, when present.
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A customer's full statement with totals.
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub phone: String,
    pub name: Option<String>,
    pub entries: Vec<StatementEntry>,
    pub owed: Money,
    pub paid: Money,
    pub balance: Money,
}

/// Builds one account's statement, oldest event first.
pub fn build_statement(
    phone: &str,
    sales: &[Sale],
    payments: &[CreditPayment],
    customers: &[Customer],
) -> Statement {
    let mut entries: Vec<StatementEntry> = Vec::new();
    let mut owed = Money::zero();
    let mut paid = Money::zero();

    for sale in sales {
        if sale.tender != TenderType::Credit || sale.customer.as_deref() != Some(phone) {
            continue;
        }
        owed += sale.total();
        entries.push(StatementEntry {
            kind: if sale.is_manual_credit() {
                StatementKind::ManualCredit
            } else {
                StatementKind::Sale
            },
            amount: sale.total(),
            note: sale.note.clone(),
            created_at: sale.created_at,
        });
    }
    for payment in payments.iter().filter(|p| p.phone == phone) {
        paid += payment.amount();
        entries.push(StatementEntry {
            kind: StatementKind::Payment,
            amount: Money::zero() - payment.amount(),
            note: None,
            created_at: payment.created_at,
        });
    }

    entries.sort_by_key(|e| e.created_at);

    Statement {
        phone: phone.to_string(),
        name: customers
            .iter()
            .find(|c| c.phone == phone)
            .and_then(|c| c.name.clone()),
        entries,
        owed,
        paid,
        balance: owed - paid,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaleLine;
    use crate::types::Unit;

    fn credit_sale(phone: &str, total: i64, lines: Vec<SaleLine>) -> Sale {
        Sale {
            id: uuid::Uuid::new_v4().to_string(),
            tender: TenderType::Credit,
            total_cents: total,
            profit_cents: 0,
            customer: Some(phone.to_string()),
            shs_amount_cents: None,
            note: None,
            lines,
            created_at: Utc::now(),
        }
    }

    fn payment(phone: &str, amount: i64) -> CreditPayment {
        CreditPayment {
            id: uuid::Uuid::new_v4().to_string(),
            phone: phone.to_string(),
            amount_cents: amount,
            created_at: Utc::now(),
        }
    }

    fn line() -> SaleLine {
        SaleLine {
            product_id: "p1".to_string(),
            name: "Soap".to_string(),
            price_cents: 100,
            cost_cents: 60,
            quantity_milli: 1000,
            unit: Unit::Piece,
        }
    }

    #[test]
    fn test_extract_phone() {
        assert_eq!(extract_phone("Amina (612345)"), "612345");
        assert_eq!(extract_phone("612345"), "612345");
        assert_eq!(extract_phone("  612345  "), "612345");
        assert_eq!(extract_phone("Weird (Name) (99)"), "99");
        assert_eq!(extract_phone("Amina ()"), "Amina ()");
    }

    #[test]
    fn test_balance_combines_sales_credits_and_payments() {
        let sales = vec![
            credit_sale("61", 500, vec![line()]),
            credit_sale("61", 300, vec![]), // manual credit
        ];
        let payments = vec![payment("61", 200)];

        let accounts = build_accounts(&sales, &payments, &[]);
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].owed, Money::from_cents(800));
        assert_eq!(accounts[0].paid, Money::from_cents(200));
        assert_eq!(accounts[0].balance, Money::from_cents(600));
    }

    #[test]
    fn test_overpayment_goes_negative() {
        let sales = vec![credit_sale("61", 100, vec![line()])];
        let payments = vec![payment("61", 250)];

        let accounts = build_accounts(&sales, &payments, &[]);
        assert_eq!(accounts[0].balance, Money::from_cents(-150));
        assert!(accounts[0].has_balance());
    }

    #[test]
    fn test_settled_account_has_no_balance() {
        let sales = vec![credit_sale("61", 100, vec![line()])];
        let payments = vec![payment("61", 100)];

        let accounts = build_accounts(&sales, &payments, &[]);
        assert!(!accounts[0].has_balance());
    }

    #[test]
    fn test_non_credit_sales_ignored() {
        let mut cash = credit_sale("61", 500, vec![line()]);
        cash.tender = TenderType::Cash;

        let accounts = build_accounts(&[cash], &[], &[]);
        assert!(accounts.is_empty());
    }

    #[test]
    fn test_accounts_sorted_by_balance_descending() {
        let sales = vec![
            credit_sale("11", 100, vec![line()]),
            credit_sale("22", 900, vec![line()]),
        ];

        let accounts = build_accounts(&sales, &[], &[]);
        assert_eq!(accounts[0].phone, "22");
        assert_eq!(accounts[1].phone, "11");
    }

    #[test]
    fn test_account_name_from_directory() {
        let sales = vec![credit_sale("61", 100, vec![line()])];
        let customers = vec![Customer {
            id: "c1".to_string(),
            phone: "61".to_string(),
            name: Some("Amina".to_string()),
            created_at: Utc::now(),
        }];

        let accounts = build_accounts(&sales, &[], &customers);
        assert_eq!(accounts[0].display_label(), "Amina (61)");
    }

    #[test]
    fn test_statement_is_chronological_with_signed_amounts() {
        let mut sale = credit_sale("61", 500, vec![line()]);
        sale.created_at = Utc::now() - chrono::Duration::hours(2);
        let mut grant = credit_sale("61", 300, vec![]);
        grant.note = Some("borrowed for lunch".to_string());
        grant.created_at = Utc::now() - chrono::Duration::hours(1);
        let pay = payment("61", 200);

        let statement = build_statement("61", &[grant, sale], &[pay], &[]);
        assert_eq!(statement.entries.len(), 3);
        assert_eq!(statement.entries[0].kind, StatementKind::Sale);
        assert_eq!(statement.entries[1].kind, StatementKind::ManualCredit);
        assert_eq!(
            statement.entries[1].note.as_deref(),
            Some("borrowed for lunch")
        );
        assert_eq!(statement.entries[2].kind, StatementKind::Payment);
        assert_eq!(statement.entries[2].amount, Money::from_cents(-200));
        assert_eq!(statement.balance, Money::from_cents(600));
    }
}
