pub mod amortization;
pub mod application;
pub mod error;
pub mod format;
pub mod policy;
pub mod records;

pub use error::{ChamaError, Result};

// verifies that types can implement the gated traits below
#[cfg(test)]
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<amortization::LoanCalculationInput>();
    is_normal::<amortization::LoanCalculationResult>();
    is_normal::<application::LoanApplication>();
    is_normal::<application::LoanIntake<records::InMemoryLoanRepository>>();
    is_normal::<application::Submission>();
    is_normal::<records::Loan>();
    is_normal::<records::InMemoryLoanRepository>();
    is_normal::<policy::User>();
    is_normal::<ChamaError>();
}
