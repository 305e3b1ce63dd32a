//! Account repository for JSON storage
//!
//! Holds every account keyed by account number and persists them to
//! `accounts.json`. Each mutation builds the next state, writes it to disk
//! atomically, and only then swaps it into memory, so a failed write leaves
//! both copies unchanged.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{BankError, BankResult};
use crate::models::{Account, AccountNumber, Money};

use super::file_io::{read_json, write_json_atomic};

/// On-disk layout of accounts.json
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AccountData {
    accounts: Vec<Account>,
}

type AccountMap = HashMap<AccountNumber, Account>;

/// Balances of both sides after a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferBalances {
    pub from_balance: Money,
    pub to_balance: Money,
}

/// Repository for account persistence
pub struct AccountRepository {
    path: PathBuf,
    data: RwLock<AccountMap>,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> BankResult<RwLockReadGuard<'_, AccountMap>> {
        self.data
            .read()
            .map_err(|e| BankError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> BankResult<RwLockWriteGuard<'_, AccountMap>> {
        self.data
            .write()
            .map_err(|e| BankError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Persist `next` and install it as the current state
    fn commit(&self, data: &mut AccountMap, next: AccountMap) -> BankResult<()> {
        let mut accounts: Vec<Account> = next.values().cloned().collect();
        accounts.sort_by_key(|a| a.account_number);
        write_json_atomic(&self.path, &AccountData { accounts })?;
        *data = next;
        Ok(())
    }

    /// Load accounts from disk, replacing anything in memory
    pub fn load(&self) -> BankResult<()> {
        let file_data: AccountData = read_json(&self.path)?;

        let mut data = self.write()?;
        data.clear();
        for account in file_data.accounts {
            data.insert(account.account_number, account);
        }

        Ok(())
    }

    /// Insert a new account, failing if the number is already taken
    pub fn insert(&self, account: Account) -> BankResult<()> {
        let mut data = self.write()?;

        if data.contains_key(&account.account_number) {
            return Err(BankError::duplicate_account(account.account_number));
        }

        let mut next = data.clone();
        next.insert(account.account_number, account);
        self.commit(&mut data, next)
    }

    /// Look up an account by number
    pub fn find(&self, number: AccountNumber) -> BankResult<Option<Account>> {
        Ok(self.read()?.get(&number).cloned())
    }

    /// Add `delta` (which may be negative) to an account's balance
    ///
    /// The read and the write happen under one lock. A delta that would drive
    /// the balance below zero is rejected with `InsufficientFunds`.
    pub fn increment_balance(&self, number: AccountNumber, delta: Money) -> BankResult<Money> {
        let mut data = self.write()?;

        let mut next = data.clone();
        let new_balance = apply_delta(&mut next, number, delta)?;
        self.commit(&mut data, next)?;

        Ok(new_balance)
    }

    /// Subtract a positive `amount` from an account's balance if it can cover it
    pub fn debit(&self, number: AccountNumber, amount: Money) -> BankResult<Money> {
        ensure_positive(amount)?;
        self.increment_balance(number, -amount)
    }

    /// Move a positive `amount` between two accounts in a single write
    ///
    /// Both balances change together or neither does.
    pub fn transfer(
        &self,
        from: AccountNumber,
        to: AccountNumber,
        amount: Money,
    ) -> BankResult<TransferBalances> {
        if from == to {
            return Err(BankError::SameAccount);
        }
        ensure_positive(amount)?;

        let mut data = self.write()?;

        if !data.contains_key(&to) {
            return Err(BankError::account_not_found(to));
        }

        let mut next = data.clone();
        let from_balance = apply_delta(&mut next, from, -amount)?;
        let to_balance = apply_delta(&mut next, to, amount)?;
        self.commit(&mut data, next)?;

        Ok(TransferBalances {
            from_balance,
            to_balance,
        })
    }

    /// Delete an account, returning how many records were removed
    pub fn delete(&self, number: AccountNumber) -> BankResult<usize> {
        let mut data = self.write()?;

        if !data.contains_key(&number) {
            return Ok(0);
        }

        let mut next = data.clone();
        next.remove(&number);
        self.commit(&mut data, next)?;

        Ok(1)
    }

    /// Check if an account exists
    pub fn exists(&self, number: AccountNumber) -> BankResult<bool> {
        Ok(self.read()?.contains_key(&number))
    }

    /// Count accounts
    pub fn count(&self) -> BankResult<usize> {
        Ok(self.read()?.len())
    }
}

fn ensure_positive(amount: Money) -> BankResult<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(BankError::InvalidAmount(amount))
    }
}

fn apply_delta(data: &mut AccountMap, number: AccountNumber, delta: Money) -> BankResult<Money> {
    let account = data
        .get_mut(&number)
        .ok_or_else(|| BankError::account_not_found(number))?;

    let new_balance = account
        .balance
        .checked_add(delta)
        .ok_or(BankError::BalanceOverflow {
            account: number,
            amount: delta,
        })?;

    if new_balance.is_negative() {
        return Err(BankError::InsufficientFunds {
            account: number,
            needed: -delta,
            available: account.balance,
        });
    }

    account.set_balance(new_balance);
    Ok(new_balance)
}
