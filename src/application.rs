//! Loan applications: the hand-off from the calculator and the intake that
//! turns an application into a pending loan record.
use crate::amortization::LoanCalculationInput;
use crate::error::{ChamaError, Result};
use crate::policy::current_user;
use crate::records::{Loan, LoanRepository, LoanStatus, LoanType, NewLoan};
use chrono::Local;
use log::{info, warn};
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;

/// Smallest amount the intake form accepts.
pub const MIN_APPLICATION_AMOUNT: f64 = 100.;

/// Amount and term the application form opens with.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplicationDefaults {
    pub principal: f64,
    pub duration_months: u32,
}

impl Default for ApplicationDefaults {
    fn default() -> Self {
        Self {
            principal: 5000.,
            duration_months: 12,
        }
    }
}

impl ApplicationDefaults {
    /// "Apply for this amount": carry the calculator's principal over with
    /// the term expressed in months.
    pub fn from_calculation(input: &LoanCalculationInput) -> Self {
        Self {
            principal: input.principal,
            duration_months: input.duration_in_months(),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanApplication {
    pub amount: f64,
    pub duration_months: u32,
    pub loan_type: LoanType,
    pub purpose: String,
}

impl LoanApplication {
    pub fn from_defaults(defaults: ApplicationDefaults, loan_type: LoanType) -> Self {
        Self {
            amount: defaults.principal,
            duration_months: defaults.duration_months,
            loan_type,
            purpose: String::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount < MIN_APPLICATION_AMOUNT {
            return Err(ChamaError::invalid(
                "amount",
                format!("loan amount must be at least {}", MIN_APPLICATION_AMOUNT),
            ));
        }
        if self.duration_months == 0 {
            return Err(ChamaError::invalid(
                "duration_months",
                "duration must be at least one month",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct IntakeConfig {
    /// Simulated round-trip before the application is recorded.
    pub latency: Duration,
    /// Percentage stamped on every new application.
    pub default_interest_rate: f64,
    pub applicant_name: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1500),
            default_interest_rate: 10.,
            applicant_name: current_user().name,
        }
    }
}

pub struct LoanIntake<R: ?Sized> {
    repo: Arc<R>,
    config: Arc<IntakeConfig>,
}

impl<R: ?Sized> Clone for LoanIntake<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            config: Arc::clone(&self.config),
        }
    }
}

impl<R> LoanIntake<R>
where
    R: LoanRepository + ?Sized + 'static,
{
    pub fn new(repo: Arc<R>, config: IntakeConfig) -> Self {
        Self {
            repo,
            config: Arc::new(config),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    /// Validate, wait out the latency, then record the application as a
    /// pending loan. Nothing is recorded if the future is dropped early.
    pub async fn submit(&self, application: LoanApplication) -> Result<Loan> {
        application.validate()?;
        info!(
            "submitting {} application for {:.2} over {} months",
            application.loan_type, application.amount, application.duration_months
        );

        tokio::time::sleep(self.config.latency).await;

        Ok(self.repo.create(NewLoan {
            applicant_name: self.config.applicant_name.clone(),
            amount: application.amount,
            loan_type: application.loan_type,
            date_applied: Local::now().date_naive(),
            status: LoanStatus::Pending,
            repayment_period: application.duration_months,
            interest_rate: self.config.default_interest_rate,
        }))
    }

    /// Run [`submit`](Self::submit) as a background task.
    pub fn spawn(&self, application: LoanApplication) -> Submission {
        let intake = self.clone();
        Submission {
            handle: tokio::spawn(async move { intake.submit(application).await }),
        }
    }
}

/// Handle to an in-flight application.
#[derive(Debug)]
pub struct Submission {
    handle: JoinHandle<Result<Loan>>,
}

impl Submission {
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn wait(self) -> Result<Loan> {
        match self.handle.await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => {
                warn!("loan application submission cancelled");
                Err(ChamaError::Cancelled)
            }
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        }
    }
}
