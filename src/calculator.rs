//! Fixed-rate loan math: quotes, amortization results and month-by-month schedules.

use std::io::{self, Write};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::CalculatorDefaults;
use crate::format::{parse_amount, parse_rate};

/// Longest loan term accepted, in years.
pub const MAX_TERM_YEARS: u32 = 100;
/// Highest annual interest rate accepted, in percent.
pub const MAX_RATE_PERCENT: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoanError {
    #[error("property value must be greater than zero, got {0}")]
    NonPositiveValue(f64),
    #[error("down payment {down_payment} must be between 0 and the property value {property_value}")]
    DownPaymentOutOfRange { down_payment: f64, property_value: f64 },
    #[error("interest rate cannot be negative, got {0}%")]
    NegativeRate(f64),
    #[error("interest rate cannot exceed {}%, got {}%", MAX_RATE_PERCENT, .0)]
    RateTooHigh(f64),
    #[error("loan term must be at least one year")]
    ZeroTerm,
    #[error("loan term cannot exceed {} years, got {}", MAX_TERM_YEARS, .0)]
    TermTooLong(u32),
    #[error("loan inputs must be finite numbers")]
    NotFinite,
}

/// A validated request for a loan. The only way to build one is [`LoanQuote::new`],
/// so `loan_amount()` is never negative and the property value is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanQuote {
    property_value: f64,
    down_payment: f64,
    annual_interest_rate_percent: f64,
    term_years: u32,
}

impl LoanQuote {
    pub fn new(
        property_value: f64,
        down_payment: f64,
        annual_interest_rate_percent: f64,
        term_years: u32,
    ) -> Result<Self, LoanError> {
        if ![property_value, down_payment, annual_interest_rate_percent]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(LoanError::NotFinite);
        }
        if property_value <= 0.0 {
            return Err(LoanError::NonPositiveValue(property_value));
        }
        if !(0.0..=property_value).contains(&down_payment) {
            return Err(LoanError::DownPaymentOutOfRange {
                down_payment,
                property_value,
            });
        }
        if annual_interest_rate_percent < 0.0 {
            return Err(LoanError::NegativeRate(annual_interest_rate_percent));
        }
        if annual_interest_rate_percent > MAX_RATE_PERCENT {
            return Err(LoanError::RateTooHigh(annual_interest_rate_percent));
        }
        if term_years == 0 {
            return Err(LoanError::ZeroTerm);
        }
        if term_years > MAX_TERM_YEARS {
            return Err(LoanError::TermTooLong(term_years));
        }
        Ok(Self {
            property_value,
            down_payment,
            annual_interest_rate_percent,
            term_years,
        })
    }

    pub fn property_value(&self) -> f64 {
        self.property_value
    }

    pub fn down_payment(&self) -> f64 {
        self.down_payment
    }

    pub fn annual_interest_rate_percent(&self) -> f64 {
        self.annual_interest_rate_percent
    }

    pub fn term_years(&self) -> u32 {
        self.term_years
    }

    pub fn loan_amount(&self) -> f64 {
        self.property_value - self.down_payment
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_interest_rate_percent / 100.0 / 12.0
    }

    pub fn num_payments(&self) -> u32 {
        self.term_years * 12
    }

    /// Standard annuity payment. A zero rate falls back to straight-line repayment.
    pub fn monthly_payment(&self) -> f64 {
        let loan_amount = self.loan_amount();
        let monthly_rate = self.monthly_rate();
        let num_payments = self.num_payments() as f64;
        if monthly_rate > 0.0 {
            // discount form; (1 + r)^n itself overflows for long, steep loans
            loan_amount * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-num_payments))
        } else {
            loan_amount / num_payments
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmortizationResult {
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub loan_to_value_percent: f64,
}

pub fn compute(quote: &LoanQuote) -> AmortizationResult {
    let loan_amount = quote.loan_amount();
    let monthly_payment = quote.monthly_payment();
    let total_interest = monthly_payment * quote.num_payments() as f64 - loan_amount;

    AmortizationResult {
        loan_amount,
        monthly_payment,
        total_interest,
        loan_to_value_percent: loan_amount / quote.property_value * 100.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub extra_principal: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSummary {
    pub total_interest: f64,
    pub total_principal: f64,
    pub total_paid: f64,
    pub months_to_payoff: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    pub rows: Vec<ScheduleRow>,
    pub summary: ScheduleSummary,
}

/// Builds the month-by-month repayment table. `extra_principal` is paid on top
/// of every installment; negative values are treated as zero.
pub fn schedule(quote: &LoanQuote, extra_principal: f64) -> Schedule {
    let monthly_rate = quote.monthly_rate();
    let monthly_payment = quote.monthly_payment();
    let num_payments = quote.num_payments();
    let extra_principal = extra_principal.max(0.0);

    let mut rows = Vec::with_capacity(num_payments as usize);
    let mut balance = quote.loan_amount();
    let mut total_interest = 0.0;
    let mut total_principal = 0.0;

    for month in 1..=num_payments {
        if balance <= 0.0 {
            break;
        }

        let interest = balance * monthly_rate;
        // the final installment sweeps up any rounding residue
        let principal = if month == num_payments {
            balance
        } else {
            (monthly_payment - interest).min(balance)
        };
        let extra = extra_principal.min(balance - principal);
        balance = balance - principal - extra;

        total_interest += interest;
        total_principal += principal + extra;

        rows.push(ScheduleRow {
            month,
            payment: interest + principal + extra,
            interest,
            principal,
            extra_principal: extra,
            balance,
        });
    }

    let summary = ScheduleSummary {
        total_interest,
        total_principal,
        total_paid: total_interest + total_principal,
        months_to_payoff: rows.len() as u32,
    };
    debug!(
        months = summary.months_to_payoff,
        total_interest = summary.total_interest,
        "built amortization schedule"
    );

    Schedule { rows, summary }
}

impl Schedule {
    pub fn write_csv<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "Month,Payment,Interest,Principal,Extra Principal,Balance")?;
        for row in &self.rows {
            writeln!(
                out,
                "{},{:.2},{:.2},{:.2},{:.2},{:.2}",
                row.month, row.payment, row.interest, row.principal, row.extra_principal, row.balance
            )?;
        }

        writeln!(out)?;
        writeln!(out, "Summary")?;
        writeln!(out, "Total Interest Paid,{:.2}", self.summary.total_interest)?;
        writeln!(out, "Total Principal Paid,{:.2}", self.summary.total_principal)?;
        writeln!(out, "Total Paid,{:.2}", self.summary.total_paid)?;
        writeln!(out, "Months to Payoff,{}", self.summary.months_to_payoff)?;
        out.flush()
    }
}

/// Raw text of the calculator fields, exactly as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanInputs {
    pub property_value: String,
    pub down_payment_percent: String,
    pub down_payment_amount: String,
    pub down_payment_is_percent: bool,
    pub interest_rate: String,
    pub term_years: String,
    pub extra_principal: String,
}

impl LoanInputs {
    pub fn with_defaults(defaults: &CalculatorDefaults) -> Self {
        Self {
            property_value: String::new(),
            down_payment_percent: defaults.down_payment_percent.to_string(),
            down_payment_amount: String::new(),
            down_payment_is_percent: true,
            interest_rate: defaults.interest_rate.to_string(),
            term_years: defaults.term_years.to_string(),
            extra_principal: String::new(),
        }
    }

    pub fn down_payment_text(&self) -> &str {
        if self.down_payment_is_percent {
            &self.down_payment_percent
        } else {
            &self.down_payment_amount
        }
    }

    pub fn down_payment_text_mut(&mut self) -> &mut String {
        if self.down_payment_is_percent {
            &mut self.down_payment_percent
        } else {
            &mut self.down_payment_amount
        }
    }

    /// Down payment in currency units, resolving the percentage mode against
    /// the property value.
    pub fn down_payment(&self, property_value: f64) -> Option<f64> {
        if self.down_payment_is_percent {
            parse_rate(&self.down_payment_percent).map(|percent| property_value * percent / 100.0)
        } else {
            parse_amount(&self.down_payment_amount)
        }
    }

    /// Missing or unparsable extra principal counts as none.
    pub fn extra_principal(&self) -> f64 {
        parse_amount(&self.extra_principal).unwrap_or(0.0).max(0.0)
    }

    /// `None` until every required field holds a usable value.
    pub fn quote(&self) -> Option<LoanQuote> {
        let property_value = parse_amount(&self.property_value)?;
        let down_payment = self.down_payment(property_value)?;
        let rate = parse_rate(&self.interest_rate)?;
        let term_years = self.term_years.trim().parse::<u32>().ok()?;

        LoanQuote::new(property_value, down_payment, rate, term_years)
            .map_err(|e| debug!("incomplete loan input: {e}"))
            .ok()
    }

    pub fn result(&self) -> Option<AmortizationResult> {
        self.quote().map(|quote| compute(&quote))
    }
}
