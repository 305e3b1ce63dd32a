//! Interactive banking shell
//!
//! A numbered-menu loop over any `BufRead`/`Write` pair. Operation errors
//! are printed and the loop carries on; only I/O failures on the shell's own
//! streams end it early.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use crate::crypto::SecureString;
use crate::error::BankError;
use crate::models::{AccountNumber, Money};
use crate::services::BankService;

const INVALID_OPTION: &str = "Invalid option. Please try again.";

enum Flow {
    Continue,
    Exit,
}

/// The interactive menu shell
pub struct Shell<'a, R, W> {
    service: BankService<'a>,
    input: R,
    output: W,
    hidden_passwords: bool,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(service: BankService<'a>, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
            hidden_passwords: false,
        }
    }

    /// Read passwords from the terminal without echo instead of from `input`
    pub fn hidden_passwords(mut self, hidden: bool) -> Self {
        self.hidden_passwords = hidden;
        self
    }

    /// Run until Exit is chosen or input ends
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "***Welcome To OnlineBanking***")?;
            writeln!(self.output, "1. Existing Customer")?;
            writeln!(self.output, "2. New Customer")?;
            writeln!(self.output, "3. Exit")?;

            let Some(choice) = self.prompt("Enter your choice: ")? else {
                break;
            };

            let flow = match choice.trim() {
                "1" => self.existing_customer()?,
                "2" => self.new_customer()?,
                "3" => Flow::Exit,
                _ => {
                    writeln!(self.output, "{}", INVALID_OPTION)?;
                    Flow::Continue
                }
            };

            if let Flow::Exit = flow {
                break;
            }
        }

        writeln!(self.output, "Thank you for banking with us. Goodbye!")?;
        self.output.flush()
    }

    fn new_customer(&mut self) -> io::Result<Flow> {
        let Some(first_name) = self.prompt("Enter your First Name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(last_name) = self.prompt("Enter your Last Name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(mobile) = self.prompt("Enter your 10 digit Mobile Number: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(aadhaar) = self.prompt("Enter your 12 digit Aadhaar Number: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(password) = self.prompt_password("Set your password: ")? else {
            return Ok(Flow::Exit);
        };

        match self
            .service
            .create_account(&first_name, &last_name, &mobile, &aadhaar, &password)
        {
            Ok(account) => writeln!(
                self.output,
                "Account created successfully. Your account number is {}",
                account.account_number
            )?,
            Err(e) => self.report_failure(&e)?,
        }

        Ok(Flow::Continue)
    }

    fn existing_customer(&mut self) -> io::Result<Flow> {
        let number = match self
            .prompt_parse("Enter your Account Number: ", str::parse::<AccountNumber>)?
        {
            None => return Ok(Flow::Exit),
            Some(Err(e)) => {
                self.report(&e)?;
                return Ok(Flow::Continue);
            }
            Some(Ok(number)) => number,
        };
        let Some(password) = self.prompt_password("Enter your password: ")? else {
            return Ok(Flow::Exit);
        };

        loop {
            writeln!(self.output)?;
            writeln!(self.output, "1. Deposit")?;
            writeln!(self.output, "2. Withdraw")?;
            writeln!(self.output, "3. Balance Enquiry")?;
            writeln!(self.output, "4. Transfer Funds")?;
            writeln!(self.output, "5. Delete Account")?;
            writeln!(self.output, "6. Back to Main Menu")?;

            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return Ok(Flow::Exit);
            };

            match choice.trim() {
                "1" => {
                    let amount = match self
                        .prompt_parse("Enter amount to deposit: ", Money::parse)?
                    {
                        None => return Ok(Flow::Exit),
                        Some(Err(e)) => {
                            self.report(&e)?;
                            continue;
                        }
                        Some(Ok(amount)) => amount,
                    };
                    match self.service.deposit(number, amount) {
                        Ok(balance) => {
                            let shown = self.money(balance);
                            writeln!(
                                self.output,
                                "Deposit successful. New balance is {}",
                                shown
                            )?
                        }
                        Err(e) => self.report_failure(&e)?,
                    }
                }
                "2" => {
                    let amount = match self
                        .prompt_parse("Enter amount to withdraw: ", Money::parse)?
                    {
                        None => return Ok(Flow::Exit),
                        Some(Err(e)) => {
                            self.report(&e)?;
                            continue;
                        }
                        Some(Ok(amount)) => amount,
                    };
                    match self.service.withdraw(number, amount, &password) {
                        Ok(balance) => {
                            let shown = self.money(balance);
                            writeln!(
                                self.output,
                                "Withdrawal successful. New balance is {}",
                                shown
                            )?
                        }
                        Err(e) => self.report_failure(&e)?,
                    }
                }
                "3" => match self.service.check_balance(number) {
                    Ok(balance) => {
                        let shown = self.money(balance);
                        writeln!(self.output, "Account balance is: {}", shown)?
                    }
                    Err(e) => self.report_failure(&e)?,
                },
                "4" => {
                    let to = match self.prompt_parse(
                        "Enter destination account number: ",
                        str::parse::<AccountNumber>,
                    )? {
                        None => return Ok(Flow::Exit),
                        Some(Err(e)) => {
                            self.report(&e)?;
                            continue;
                        }
                        Some(Ok(to)) => to,
                    };
                    let amount = match self
                        .prompt_parse("Enter amount to transfer: ", Money::parse)?
                    {
                        None => return Ok(Flow::Exit),
                        Some(Err(e)) => {
                            self.report(&e)?;
                            continue;
                        }
                        Some(Ok(amount)) => amount,
                    };
                    match self.service.transfer(number, to, amount, &password) {
                        Ok(receipt) => {
                            let amount = self.money(receipt.amount);
                            let balance = self.money(receipt.from_balance);
                            writeln!(
                                self.output,
                                "Transfer of {} from account {} to account {} successful.",
                                amount, receipt.from, receipt.to
                            )?;
                            writeln!(self.output, "Your new balance is {}.", balance)?;
                        }
                        Err(e) => self.report_failure(&e)?,
                    }
                }
                "5" => {
                    match self.service.delete_account(number, &password) {
                        Ok(account) => writeln!(
                            self.output,
                            "Account {} deleted successfully.",
                            account.account_number
                        )?,
                        Err(e) => self.report_failure(&e)?,
                    }
                    return Ok(Flow::Continue);
                }
                "6" => return Ok(Flow::Continue),
                _ => writeln!(self.output, "{}", INVALID_OPTION)?,
            }
        }
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.service.settings().currency_symbol)
    }

    fn report(&mut self, err: &dyn Display) -> io::Result<()> {
        writeln!(self.output, "Error: {}", err)
    }

    fn report_failure(&mut self, err: &BankError) -> io::Result<()> {
        let message = err.describe(&self.service.settings().currency_symbol);
        writeln!(self.output, "Error: {}", message)
    }

    /// Print `label` and read one line; `None` at end of input
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn prompt_parse<T, E>(
        &mut self,
        label: &str,
        parse: impl Fn(&str) -> Result<T, E>,
    ) -> io::Result<Option<Result<T, E>>> {
        Ok(self.prompt(label)?.map(|line| parse(&line)))
    }

    fn prompt_password(&mut self, label: &str) -> io::Result<Option<SecureString>> {
        if self.hidden_passwords {
            self.output.flush()?;
            return rpassword::prompt_password(label).map(|p| Some(SecureString::from(p)));
        }
        Ok(self.prompt(label)?.map(SecureString::from))
    }
}
