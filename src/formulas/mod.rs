//! Pure calculator formulas, one submodule per legal area. No I/O.

pub mod amortization;
pub mod banking;
pub mod civil;
pub mod dates;
pub mod labor;
pub mod late_payment;
pub mod tax;

pub use amortization::{
    compare_methods, price_installment, price_schedule, price_summary, sac_schedule, sac_summary,
    AmortizationComparison, LoanTerms, PriceSummary, RecommendedMethod, SacSummary, ScheduleRow,
};
pub use banking::{
    check_payroll_card_rate, classify_debt_ratio, debt_load, review_financing, DebtLoad, DebtLoadInput,
    DebtRisk, FinancingReview, PayrollCardCheck,
};
pub use civil::{
    alimony, capital_distribution, damages_estimate, estate_partition, retirement_eligibility,
    sentence_progression, Alimony, AlimonyInput, DamagesEstimate, EstateInput, EstatePartition, Partner,
    PartnerShare, RetirementEligibility, RetirementInput, SentenceInput, SentenceProgression, Severity, Sex,
};
pub use labor::{
    fgts_estimate, overtime, termination_pay, work_premiums, FgtsEstimate, FgtsInput, OvertimeInput,
    OvertimePay, PremiumInput, Premiums, TerminationInput, TerminationPay,
};
pub use late_payment::{
    default_interest, overdue_property_tax, rent_debt, DefaultInterest, DefaultInterestInput, OverdueCharge,
    PropertyTaxInput, RentDebt, RentDebtInput,
};
pub use tax::{
    income_tax, pis_cofins, social_security, transfer_tax, IncomeTax, IncomeTaxInput, PisCofins, SocialSecurity,
    TaxRegime, TransferTax,
};
