//! Calculator dispatch: request parsing, response shaping and the engine that ties them to the formulas

pub mod engine;
pub mod fields;
pub mod request;
pub mod response;

pub use engine::Engine;
pub use request::{
    Calculation, CalculationRequest, CalculatorKind, CorrectionRequest, DamagesRequest, DefaultInterestRequest,
    FinancingRequest, PayrollCardRequest, PropertyTaxRequest, MAX_TERM_MONTHS,
};
pub use response::{CalculationResponse, Money, Rounded};
