use chama::amortization::{compute, Compounding, DurationUnit, LoanCalculationInput, RateBasis};
use chama::application::{ApplicationDefaults, IntakeConfig, LoanApplication, LoanIntake};
use chama::format::{format_currency, DEFAULT_CURRENCY};
use chama::records::{InMemoryLoanRepository, LoanCategory, LoanRepository, LoanType};
use clap::Parser;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use std::{error::Error, process, sync::Arc, time::Duration};

/// Loan calculator for a savings group: compound the principal over the
/// term and spread the total across monthly installments.
#[derive(Parser)]
#[command(name = "chama", version)]
struct Cli {
    /// Amount borrowed [default: 10000]
    #[arg(long)]
    principal: Option<f64>,

    /// Interest rate in percent [default: 10]
    #[arg(long)]
    rate: Option<f64>,

    /// Period the rate is quoted for: monthly or yearly [default: yearly]
    #[arg(long)]
    rate_basis: Option<RateBasis>,

    /// Length of the loan [default: 12]
    #[arg(long)]
    duration: Option<u32>,

    /// months or years [default: months]
    #[arg(long)]
    duration_unit: Option<DurationUnit>,

    /// daily, weekly, monthly or yearly [default: monthly]
    #[arg(long)]
    compounding: Option<Compounding>,

    #[arg(long, default_value = DEFAULT_CURRENCY)]
    currency: String,

    /// Submit an application for the calculated amount
    #[arg(long)]
    apply: bool,

    #[arg(long, default_value = "personal")]
    loan_type: LoanType,

    /// Simulated submission latency
    #[arg(long, default_value_t = 1500)]
    latency_ms: u64,

    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn calculation_input(&self) -> LoanCalculationInput {
        let defaults = LoanCalculationInput::default();
        LoanCalculationInput {
            principal: self.principal.unwrap_or(defaults.principal),
            nominal_rate: self.rate.unwrap_or(defaults.nominal_rate),
            rate_basis: self.rate_basis.unwrap_or(defaults.rate_basis),
            duration: self.duration.unwrap_or(defaults.duration),
            duration_unit: self.duration_unit.unwrap_or(defaults.duration_unit),
            compounding: self.compounding.unwrap_or(defaults.compounding),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let level = cli
        .log_level
        .parse::<LevelFilter>()
        .map_err(|_| format!("unknown log level '{}'", cli.log_level))?;
    SimpleLogger::new()
        .with_level(level)
        .init()
        .map_err(|e| e.to_string())?;

    let input = cli.calculation_input();
    info!(
        "principal {}, rate {}% {}, {} {}, compounded {}",
        input.principal,
        input.nominal_rate,
        input.rate_basis,
        input.duration,
        input.duration_unit,
        input.compounding
    );

    let result = compute(&input)?;
    println!(
        "Monthly installment: {}",
        format_currency(result.monthly_installment, &cli.currency)
    );
    println!(
        "Total interest:      {}",
        format_currency(result.total_interest, &cli.currency)
    );
    println!(
        "Total repayment:     {}",
        format_currency(result.total_repayment, &cli.currency)
    );

    if cli.apply {
        let defaults = ApplicationDefaults::from_calculation(&input);
        let application = LoanApplication::from_defaults(defaults, cli.loan_type);
        let intake = LoanIntake::new(
            Arc::new(InMemoryLoanRepository::with_sample_loans()),
            IntakeConfig {
                latency: Duration::from_millis(cli.latency_ms),
                ..IntakeConfig::default()
            },
        );

        let runtime = tokio::runtime::Runtime::new()?;
        let loan = runtime.block_on(intake.submit(application))?;
        println!("Submitted {}", loan);

        println!("Active loans:");
        for loan in intake.repository().list_by_category(LoanCategory::Active) {
            println!("  {}", loan);
        }
    }

    Ok(())
}
