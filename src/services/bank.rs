//! Bank service
//!
//! Business logic for the five account operations plus account creation and
//! authentication. Every operation is validation, then lookup, then a single
//! store mutation; successful mutations are appended to the audit trail.

use crate::audit::AuditEntry;
use crate::config::Settings;
use crate::crypto::CredentialHasher;
use crate::error::{BankError, BankResult};
use crate::models::account::{validate_aadhaar, validate_mobile};
use crate::models::{Account, AccountNumber, Money};
use crate::storage::Storage;

/// Outcome of a completed transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReceipt {
    pub from: AccountNumber,
    pub to: AccountNumber,
    pub amount: Money,
    /// Sender's balance after the transfer
    pub from_balance: Money,
    /// Receiver's balance after the transfer
    pub to_balance: Money,
}

/// Service for customer-facing bank operations
pub struct BankService<'a> {
    storage: &'a Storage,
    hasher: &'a dyn CredentialHasher,
    settings: &'a Settings,
    number_source: Box<dyn Fn() -> AccountNumber + 'a>,
}

impl<'a> BankService<'a> {
    pub fn new(
        storage: &'a Storage,
        hasher: &'a dyn CredentialHasher,
        settings: &'a Settings,
    ) -> Self {
        Self {
            storage,
            hasher,
            settings,
            number_source: Box::new(AccountNumber::generate),
        }
    }

    /// Replace the random account-number generator
    pub fn with_number_source(mut self, source: impl Fn() -> AccountNumber + 'a) -> Self {
        self.number_source = Box::new(source);
        self
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    /// Open a new account with a zero balance
    ///
    /// A randomly drawn account number that is already taken is replaced by a
    /// fresh draw, up to `settings.account_number_attempts` times.
    pub fn create_account(
        &self,
        first_name: &str,
        last_name: &str,
        mobile_num: &str,
        aadhaar_num: &str,
        password: &str,
    ) -> BankResult<Account> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(BankError::Validation("First and last name cannot be empty".into()));
        }

        let mobile_num = mobile_num.trim();
        let aadhaar_num = aadhaar_num.trim();
        validate_mobile(mobile_num).map_err(|e| BankError::Validation(e.to_string()))?;
        validate_aadhaar(aadhaar_num).map_err(|e| BankError::Validation(e.to_string()))?;

        if password.is_empty() {
            return Err(BankError::Validation("Password cannot be empty".into()));
        }

        let password_hash = self.hasher.hash(password)?;

        let attempts = self.settings.account_number_attempts.max(1);
        let mut last_tried = None;
        for attempt in 1..=attempts {
            let number = (self.number_source)();
            last_tried = Some(number);

            let account = Account::new(
                number,
                first_name,
                last_name,
                mobile_num,
                aadhaar_num,
                password_hash.clone(),
            );
            account
                .validate()
                .map_err(|e| BankError::Validation(e.to_string()))?;

            match self.storage.accounts.insert(account.clone()) {
                Ok(()) => {
                    tracing::info!(account = %number, "account created");
                    self.storage.record(AuditEntry::create(&account));
                    return Ok(account);
                }
                Err(BankError::Duplicate { .. }) => {
                    tracing::warn!(account = %number, attempt, "account number collision");
                }
                Err(e) => return Err(e),
            }
        }

        Err(match last_tried {
            Some(number) => BankError::duplicate_account(number),
            None => BankError::Storage("No account number could be generated".into()),
        })
    }

    /// Verify a password against an account's stored hash
    pub fn authenticate(&self, number: AccountNumber, password: &str) -> BankResult<()> {
        self.authenticated(number, password).map(|_| ())
    }

    fn authenticated(&self, number: AccountNumber, password: &str) -> BankResult<Account> {
        let account = self
            .storage
            .accounts
            .find(number)?
            .ok_or_else(|| BankError::account_not_found(number))?;

        if !self.hasher.verify(&account.password_hash, password) {
            tracing::warn!(account = %number, "authentication failed");
            return Err(BankError::InvalidCredentials(number));
        }

        Ok(account)
    }

    /// Credit an account; no password is required
    pub fn deposit(&self, number: AccountNumber, amount: Money) -> BankResult<Money> {
        ensure_positive(amount)?;

        let balance = self.storage.accounts.increment_balance(number, amount)?;

        tracing::info!(account = %number, %amount, "deposit");
        self.storage.record(AuditEntry::deposit(number, amount, balance));
        Ok(balance)
    }

    /// Debit an account after authenticating
    ///
    /// The returned balance is the store's post-update value.
    pub fn withdraw(
        &self,
        number: AccountNumber,
        amount: Money,
        password: &str,
    ) -> BankResult<Money> {
        self.authenticated(number, password)?;
        ensure_positive(amount)?;

        let balance = self.storage.accounts.debit(number, amount)?;

        tracing::info!(account = %number, %amount, "withdrawal");
        self.storage.record(AuditEntry::withdraw(number, amount, balance));
        Ok(balance)
    }

    /// Move funds to another account after authenticating the sender
    ///
    /// Both balances are updated in one store write.
    pub fn transfer(
        &self,
        from: AccountNumber,
        to: AccountNumber,
        amount: Money,
        password: &str,
    ) -> BankResult<TransferReceipt> {
        self.authenticated(from, password)?;

        if from == to {
            return Err(BankError::SameAccount);
        }
        ensure_positive(amount)?;

        if !self.storage.accounts.exists(to)? {
            return Err(BankError::account_not_found(to));
        }

        let balances = self.storage.accounts.transfer(from, to, amount)?;

        tracing::info!(from = %from, to = %to, %amount, "transfer");
        self.storage.record(AuditEntry::transfer(from, to, amount, balances.from_balance));

        Ok(TransferReceipt {
            from,
            to,
            amount,
            from_balance: balances.from_balance,
            to_balance: balances.to_balance,
        })
    }

    pub fn check_balance(&self, number: AccountNumber) -> BankResult<Money> {
        self.storage
            .accounts
            .find(number)?
            .map(|account| account.balance)
            .ok_or_else(|| BankError::account_not_found(number))
    }

    /// Remove an account after authenticating, returning the removed record
    pub fn delete_account(&self, number: AccountNumber, password: &str) -> BankResult<Account> {
        let account = self.authenticated(number, password)?;

        if self.storage.accounts.delete(number)? == 0 {
            return Err(BankError::account_not_found(number));
        }

        tracing::info!(account = %number, "account deleted");
        self.storage.record(AuditEntry::delete(&account));
        Ok(account)
    }
}

fn ensure_positive(amount: Money) -> BankResult<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(BankError::InvalidAmount(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::BankPaths;
    use std::cell::Cell;
    use tempfile::TempDir;

    /// Reversible stand-in so tests skip Argon2's cost
    struct FakeHasher;

    impl CredentialHasher for FakeHasher {
        fn hash(&self, password: &str) -> BankResult<String> {
            Ok(format!("fake${}", password.chars().rev().collect::<String>()))
        }

        fn verify(&self, hash: &str, password: &str) -> bool {
            self.hash(password).map(|h| h == hash).unwrap_or(false)
        }
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BankPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(&paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn open_john(service: &BankService) -> Account {
        service
            .create_account("John", "Doe", "9876543210", "123456789012", "pw1")
            .unwrap()
    }

    fn num(n: u64) -> AccountNumber {
        AccountNumber::try_from(n).unwrap()
    }

    #[test]
    fn test_create_account() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = BankService::new(&storage, &FakeHasher, &settings);

        let account = open_john(&service);

        assert_eq!(account.account_number.to_string().len(), 12);
        assert_eq!(account.customer_name, "John Doe");
        assert_eq!(account.balance, Money::zero());
        assert_ne!(account.password_hash, "pw1");
        assert!(service.authenticate(account.account_number, "pw1").is_ok());
        assert_eq!(
            service.check_balance(account.account_number).unwrap(),
            Money::zero()
        );
    }

    #[test]
    fn test_create_account_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = BankService::new(&storage, &FakeHasher, &settings);

        let cases = [
            ("John", "Doe", "987654321", "123456789012", "pw"),
            ("John", "Doe", "98765432100", "123456789012", "pw"),
            ("John", "Doe", "9876543210", "12345678901", "pw"),
            ("John", "Doe", "98765x3210", "123456789012", "pw"),
            ("  ", "Doe", "9876543210", "123456789012", "pw"),
            ("John", "Doe", "9876543210", "123456789012", ""),
        ];
        for (first, last, mobile, aadhaar, password) in cases {
            let result = service.create_account(first, last, mobile, aadhaar, password);
            assert!(
                result.as_ref().is_err_and(|e| e.is_validation()),
                "expected validation error for {:?}",
                (first, last, mobile, aadhaar)
            );
        }
        assert_eq!(storage.accounts.count().unwrap(), 0);
    }

    #[test]
    fn test_create_account_retries_collisions() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();

        let taken = num(111111111111);
        let first =
            BankService::new(&storage, &FakeHasher, &settings).with_number_source(|| taken);
        open_john(&first);

        let calls = Cell::new(0);
        let service = BankService::new(&storage, &FakeHasher, &settings).with_number_source(|| {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                taken
            } else {
                num(222222222222)
            }
        });

        let account = open_john(&service);
        assert_eq!(account.account_number, num(222222222222));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_create_account_gives_up_after_attempts() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings {
            account_number_attempts: 2,
            ..Settings::default()
        };

        let taken = num(111111111111);
        let service =
            BankService::new(&storage, &FakeHasher, &settings).with_number_source(|| taken);
        open_john(&service);

        let result = service.create_account("Jane", "Doe", "9876543210", "123456789012", "pw2");
        assert!(matches!(result, Err(BankError::Duplicate { .. })));
        assert_eq!(storage.accounts.count().unwrap(), 1);
    }

    #[test]
    fn test_authenticate() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = BankService::new(&storage, &FakeHasher, &settings);
        let account = open_john(&service);

        assert!(matches!(
            service.authenticate(account.account_number, "wrong"),
            Err(BankError::InvalidCredentials(_))
        ));
        assert!(service
            .authenticate(num(999999999999), "pw1")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_deposit() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = BankService::new(&storage, &FakeHasher, &settings);
        let n = open_john(&service).account_number;

        assert_eq!(
            service.deposit(n, Money::from_units(500)).unwrap(),
            Money::from_units(500)
        );
        assert_eq!(
            service.deposit(n, Money::from_cents(25)).unwrap(),
            Money::from_cents(50025)
        );

        for bad in [Money::zero(), Money::from_units(-5)] {
            assert!(matches!(service.deposit(n, bad), Err(BankError::InvalidAmount(_))));
        }
        assert_eq!(service.check_balance(n).unwrap(), Money::from_cents(50025));

        assert!(service
            .deposit(num(999999999999), Money::from_units(1))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_deposit_overflow_keeps_balance() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = BankService::new(&storage, &FakeHasher, &settings);
        let n = open_john(&service).account_number;
        service.deposit(n, Money::from_cents(i64::MAX - 1)).unwrap();

        let err = service.deposit(n, Money::from_units(1)).unwrap_err();
        assert!(matches!(err, BankError::BalanceOverflow { .. }));
        assert!(err.is_validation());
        assert!(!err.is_store_unavailable());
        assert_eq!(service.check_balance(n).unwrap(), Money::from_cents(i64::MAX - 1));
    }

    #[test]
    fn test_withdraw() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = BankService::new(&storage, &FakeHasher, &settings);
        let n = open_john(&service).account_number;
        service.deposit(n, Money::from_units(500)).unwrap();

        assert!(matches!(
            service.withdraw(n, Money::from_units(100), "wrong"),
            Err(BankError::InvalidCredentials(_))
        ));
        assert!(matches!(
            service.withdraw(n, Money::zero(), "pw1"),
            Err(BankError::InvalidAmount(_))
        ));
        assert_eq!(service.check_balance(n).unwrap(), Money::from_units(500));

        assert_eq!(
            service.withdraw(n, Money::from_units(500), "pw1").unwrap(),
            Money::zero()
        );
    }

    #[test]
    fn test_wrong_password_checked_before_amount() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = BankService::new(&storage, &FakeHasher, &settings);
        let n = open_john(&service).account_number;

        assert!(matches!(
            service.withdraw(n, Money::from_units(-1), "wrong"),
            Err(BankError::InvalidCredentials(_))
        ));
    }

    #[test]
    fn test_transfer() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = BankService::new(&storage, &FakeHasher, &settings);
        let x = open_john(&service).account_number;
        let y = service
            .create_account("Jane", "Roe", "9123456780", "210987654321", "pw2")
            .unwrap()
            .account_number;
        service.deposit(x, Money::from_units(300)).unwrap();
        service.deposit(y, Money::from_units(50)).unwrap();

        let receipt = service.transfer(x, y, Money::from_units(100), "pw1").unwrap();
        assert_eq!(receipt.from_balance, Money::from_units(200));
        assert_eq!(receipt.to_balance, Money::from_units(150));
        assert_eq!(service.check_balance(x).unwrap(), Money::from_units(200));
        assert_eq!(service.check_balance(y).unwrap(), Money::from_units(150));
    }

    #[test]
    fn test_transfer_rejections_leave_balances() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = BankService::new(&storage, &FakeHasher, &settings);
        let x = open_john(&service).account_number;
        let y = service
            .create_account("Jane", "Roe", "9123456780", "210987654321", "pw2")
            .unwrap()
            .account_number;
        service.deposit(x, Money::from_units(300)).unwrap();

        assert!(matches!(
            service.transfer(x, x, Money::from_units(1), "pw1"),
            Err(BankError::SameAccount)
        ));
        assert!(matches!(
            service.transfer(x, y, Money::from_units(1), "pw2"),
            Err(BankError::InvalidCredentials(_))
        ));
        assert!(matches!(
            service.transfer(x, y, Money::zero(), "pw1"),
            Err(BankError::InvalidAmount(_))
        ));
        assert!(matches!(
            service.transfer(x, y, Money::from_units(301), "pw1"),
            Err(BankError::InsufficientFunds { .. })
        ));
        assert!(service
            .transfer(x, num(999999999999), Money::from_units(1), "pw1")
            .unwrap_err()
            .is_not_found());
        assert!(service
            .transfer(num(999999999999), x, Money::from_units(1), "pw1")
            .unwrap_err()
            .is_not_found());

        assert_eq!(service.check_balance(x).unwrap(), Money::from_units(300));
        assert_eq!(service.check_balance(y).unwrap(), Money::zero());
    }

    #[test]
    fn test_delete_account() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = BankService::new(&storage, &FakeHasher, &settings);
        let n = open_john(&service).account_number;

        assert!(matches!(
            service.delete_account(n, "wrong"),
            Err(BankError::InvalidCredentials(_))
        ));
        assert!(service.check_balance(n).is_ok());

        let removed = service.delete_account(n, "pw1").unwrap();
        assert_eq!(removed.account_number, n);
        assert!(service.check_balance(n).unwrap_err().is_not_found());
        assert!(service.delete_account(n, "pw1").unwrap_err().is_not_found());
    }

    #[test]
    fn test_walkthrough_scenario() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = BankService::new(&storage, &FakeHasher, &settings);

        let n = open_john(&service).account_number;
        assert_eq!(service.check_balance(n).unwrap(), Money::zero());

        assert_eq!(
            service.deposit(n, Money::from_units(500)).unwrap(),
            Money::from_units(500)
        );
        assert_eq!(
            service.withdraw(n, Money::from_units(200), "pw1").unwrap(),
            Money::from_units(300)
        );

        let err = service
            .withdraw(n, Money::from_units(1000), "pw1")
            .unwrap_err();
        assert!(matches!(err, BankError::InsufficientFunds { .. }));
        assert_eq!(service.check_balance(n).unwrap(), Money::from_units(300));

        let missing = if n == num(100000000000) {
            num(100000000001)
        } else {
            num(100000000000)
        };
        let err = service
            .transfer(n, missing, Money::from_units(100), "pw1")
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(service.check_balance(n).unwrap(), Money::from_units(300));
    }

    #[test]
    fn test_operations_are_audited() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = BankService::new(&storage, &FakeHasher, &settings);
        let n = open_john(&service).account_number;

        service.deposit(n, Money::from_units(10)).unwrap();
        service.withdraw(n, Money::from_units(4), "pw1").unwrap();
        let _ = service.withdraw(n, Money::from_units(400), "pw1");
        service.delete_account(n, "pw1").unwrap();

        let ops: Vec<Operation> = storage
            .audit()
            .read_for_account(n)
            .unwrap()
            .into_iter()
            .map(|e| e.operation)
            .collect();
        assert_eq!(
            ops,
            vec![
                Operation::Create,
                Operation::Deposit,
                Operation::Withdraw,
                Operation::Delete
            ]
        );
    }
}
