//! Audit entry data structures
//!
//! One entry per completed mutation. Entries carry account numbers, amounts
//! and resulting balances; they never carry password material.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Account, AccountNumber, Money};

/// Types of operations that are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Deposit,
    Withdraw,
    Transfer,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Operation::Create => "CREATE",
            Operation::Deposit => "DEPOSIT",
            Operation::Withdraw => "WITHDRAW",
            Operation::Transfer => "TRANSFER",
            Operation::Delete => "DELETE",
        };
        f.write_str(label)
    }
}

/// A single audit log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    /// Account the operation was performed on (the sender, for transfers)
    pub account_number: AccountNumber,

    /// Receiving account of a transfer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<AccountNumber>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,

    /// Balance of `account_number` once the operation completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_after: Option<Money>,
}

impl AuditEntry {
    fn base(operation: Operation, account_number: AccountNumber) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            account_number,
            counterparty: None,
            customer_name: None,
            amount: None,
            balance_after: None,
        }
    }

    pub fn create(account: &Account) -> Self {
        Self {
            customer_name: Some(account.customer_name.clone()),
            balance_after: Some(account.balance),
            ..Self::base(Operation::Create, account.account_number)
        }
    }

    pub fn deposit(account_number: AccountNumber, amount: Money, balance_after: Money) -> Self {
        Self {
            amount: Some(amount),
            balance_after: Some(balance_after),
            ..Self::base(Operation::Deposit, account_number)
        }
    }

    pub fn withdraw(account_number: AccountNumber, amount: Money, balance_after: Money) -> Self {
        Self {
            amount: Some(amount),
            balance_after: Some(balance_after),
            ..Self::base(Operation::Withdraw, account_number)
        }
    }

    pub fn transfer(
        from: AccountNumber,
        to: AccountNumber,
        amount: Money,
        from_balance_after: Money,
    ) -> Self {
        Self {
            counterparty: Some(to),
            amount: Some(amount),
            balance_after: Some(from_balance_after),
            ..Self::base(Operation::Transfer, from)
        }
    }

    pub fn delete(account: &Account) -> Self {
        Self {
            customer_name: Some(account.customer_name.clone()),
            balance_after: Some(account.balance),
            ..Self::base(Operation::Delete, account.account_number)
        }
    }

    /// Whether this entry touched `number` on either side
    pub fn involves(&self, number: AccountNumber) -> bool {
        self.account_number == number || self.counterparty == Some(number)
    }

    /// Format the entry as one line, amounts prefixed by `currency_symbol`
    pub fn format_human_readable(&self, currency_symbol: &str) -> String {
        let mut output = format!(
            "[{}] {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.account_number
        );

        if let Some(to) = self.counterparty {
            output.push_str(&format!(" -> {}", to));
        }
        if let Some(name) = &self.customer_name {
            output.push_str(&format!(" ({})", name));
        }
        if let Some(amount) = self.amount {
            output.push_str(&format!(" amount={}", amount.format_with_symbol(currency_symbol)));
        }
        if let Some(balance) = self.balance_after {
            output.push_str(&format!(" balance={}", balance.format_with_symbol(currency_symbol)));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: u64) -> AccountNumber {
        AccountNumber::try_from(n).unwrap()
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Transfer.to_string(), "TRANSFER");
    }

    #[test]
    fn test_create_entry_omits_password_hash() {
        let account = Account::new(
            num(123456789012),
            "John",
            "Doe",
            "9876543210",
            "123456789012",
            "$argon2id$secret",
        );
        let entry = AuditEntry::create(&account);

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.customer_name.as_deref(), Some("John Doe"));

        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_transfer_involves_both_sides() {
        let entry = AuditEntry::transfer(
            num(111111111111),
            num(222222222222),
            Money::from_units(100),
            Money::from_units(200),
        );

        assert!(entry.involves(num(111111111111)));
        assert!(entry.involves(num(222222222222)));
        assert!(!entry.involves(num(333333333333)));
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::transfer(
            num(111111111111),
            num(222222222222),
            Money::from_units(100),
            Money::from_units(200),
        );

        let formatted = entry.format_human_readable("₹");
        assert!(formatted.contains("TRANSFER 111111111111 -> 222222222222"));
        assert!(formatted.contains("amount=₹100.00"));
        assert!(formatted.contains("balance=₹200.00"));
    }

    #[test]
    fn test_serialization() {
        let entry = AuditEntry::deposit(
            num(111111111111),
            Money::from_units(5),
            Money::from_units(5),
        );
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("counterparty"));

        let deserialized: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, entry);
    }
}
