//! Loan records and the repository that owns them.
use crate::error::{ChamaError, Result};
use chrono::NaiveDate;
use log::{debug, info};
use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoanType {
    Personal,
    Business,
    Emergency,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
    Disbursed,
    Repaid,
}

/// Split of the loans list into the two tabs members see.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoanCategory {
    Active,
    Completed,
}

impl LoanStatus {
    pub fn category(&self) -> LoanCategory {
        match self {
            LoanStatus::Pending | LoanStatus::Approved | LoanStatus::Disbursed => {
                LoanCategory::Active
            }
            LoanStatus::Repaid | LoanStatus::Rejected => LoanCategory::Completed,
        }
    }

    /// Loans still waiting on a treasurer decision or payout.
    pub fn awaiting_disbursement(&self) -> bool {
        matches!(self, LoanStatus::Pending | LoanStatus::Approved)
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl std::str::FromStr for LoanType {
    type Err = ChamaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "personal" => Ok(LoanType::Personal),
            "business" => Ok(LoanType::Business),
            "emergency" => Ok(LoanType::Emergency),
            _ => Err(ChamaError::invalid(
                "loan_type",
                format!(
                    "unknown loan type '{}', expected personal, business or emergency",
                    s
                ),
            )),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Loan {
    pub id: String,
    pub applicant_name: String,
    pub amount: f64,
    pub loan_type: LoanType,
    pub date_applied: NaiveDate,
    pub status: LoanStatus,
    /// Months.
    pub repayment_period: u32,
    /// Percentage.
    pub interest_rate: f64,
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "loan {}, {}, {} {:.2} over {} months at {}%, applied {}, {}",
            self.id,
            self.applicant_name,
            self.loan_type,
            self.amount,
            self.repayment_period,
            self.interest_rate,
            self.date_applied,
            self.status
        )
    }
}

/// A loan before the repository has assigned it an id.
#[derive(Clone, PartialEq, Debug)]
pub struct NewLoan {
    pub applicant_name: String,
    pub amount: f64,
    pub loan_type: LoanType,
    pub date_applied: NaiveDate,
    pub status: LoanStatus,
    pub repayment_period: u32,
    pub interest_rate: f64,
}

impl NewLoan {
    fn into_loan(self, id: String) -> Loan {
        Loan {
            id,
            applicant_name: self.applicant_name,
            amount: self.amount,
            loan_type: self.loan_type,
            date_applied: self.date_applied,
            status: self.status,
            repayment_period: self.repayment_period,
            interest_rate: self.interest_rate,
        }
    }
}

pub trait LoanRepository: Send + Sync {
    /// All loans, newest first.
    fn list(&self) -> Vec<Loan>;

    fn create(&self, loan: NewLoan) -> Loan;

    fn update_status(&self, id: &str, status: LoanStatus) -> Result<Loan>;

    fn list_by_category(&self, category: LoanCategory) -> Vec<Loan> {
        self.list()
            .into_iter()
            .filter(|loan| loan.status.category() == category)
            .collect()
    }

    fn pending_disbursements(&self) -> Vec<Loan> {
        self.list()
            .into_iter()
            .filter(|loan| loan.status.awaiting_disbursement())
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryLoanRepository {
    loans: Mutex<Vec<Loan>>,
    next_id: AtomicU64,
}

impl InMemoryLoanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loans(loans: Vec<Loan>) -> Self {
        let next_id = loans.len() as u64;
        Self {
            loans: Mutex::new(loans),
            next_id: AtomicU64::new(next_id),
        }
    }

    /// Repository seeded with the group's sample loan book.
    pub fn with_sample_loans() -> Self {
        Self::with_loans(sample_loans())
    }

    fn loans(&self) -> MutexGuard<'_, Vec<Loan>> {
        self.loans.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LoanRepository for InMemoryLoanRepository {
    fn list(&self) -> Vec<Loan> {
        self.loans().clone()
    }

    fn create(&self, loan: NewLoan) -> Loan {
        let id = format!("l{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let loan = loan.into_loan(id);
        info!("created {}", loan);
        self.loans().insert(0, loan.clone());
        loan
    }

    fn update_status(&self, id: &str, status: LoanStatus) -> Result<Loan> {
        let mut loans = self.loans();
        let loan = loans
            .iter_mut()
            .find(|loan| loan.id == id)
            .ok_or_else(|| ChamaError::NotFound(id.to_string()))?;
        debug!("loan {} status {} -> {}", id, loan.status, status);
        loan.status = status;
        Ok(loan.clone())
    }
}

#[allow(clippy::too_many_arguments)]
fn sample_loan(
    id: &str,
    applicant_name: &str,
    amount: f64,
    loan_type: LoanType,
    (yr, mon, day): (i32, u32, u32),
    status: LoanStatus,
    repayment_period: u32,
    interest_rate: f64,
) -> Option<Loan> {
    Some(Loan {
        id: id.to_string(),
        applicant_name: applicant_name.to_string(),
        amount,
        loan_type,
        date_applied: NaiveDate::from_ymd_opt(yr, mon, day)?,
        status,
        repayment_period,
        interest_rate,
    })
}

pub fn sample_loans() -> Vec<Loan> {
    use LoanStatus::*;
    use LoanType::*;

    [
        sample_loan("l1", "Jane Doe", 50000., Business, (2023, 10, 20), Pending, 12, 12.),
        sample_loan("l2", "Mike Ross", 20000., Personal, (2023, 10, 18), Disbursed, 6, 10.),
        sample_loan("l3", "Harvey Specter", 100000., Business, (2023, 10, 22), Approved, 24, 8.),
        sample_loan("l4", "Rachel Zane", 15000., Emergency, (2023, 10, 25), Pending, 3, 5.),
        sample_loan("l5", "Louis Litt", 5000., Personal, (2023, 1, 15), Repaid, 3, 10.),
        sample_loan("l6", "Donna Paulsen", 30000., Emergency, (2023, 2, 20), Rejected, 12, 8.),
    ]
    .into_iter()
    .flatten()
    .collect()
}
