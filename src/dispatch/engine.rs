//! Calculation engine: maps each request variant to its formula

use chrono::{Local, NaiveDate};
use log::{debug, error, warn};
use rayon::prelude::*;
use serde_json::Value;

use super::request::{Calculation, CalculationRequest, CalculatorKind};
use super::response::*;
use crate::config::EngineConfig;
use crate::correction::{apply_correction, BcbClient, IndexSeriesSource, SeriesFetch};
use crate::error::{CalcError, CalcResult, SetupError};
use crate::formulas::{self, DefaultInterestInput, PropertyTaxInput};
use crate::tables::{PolicyCatalog, PolicyTables};

/// Immutable after construction; safe to share across requests and threads
pub struct Engine<S: IndexSeriesSource> {
    catalog: PolicyCatalog,
    source: S,
    fixed_date: Option<NaiveDate>,
}

impl Engine<BcbClient> {
    /// Engine backed by the live SGS API and the configured policy tables
    pub fn from_config(config: &EngineConfig) -> Result<Self, SetupError> {
        let catalog = config.load_catalog()?;
        let client = BcbClient::from_config(config)?;
        Ok(Self::new(catalog, client))
    }
}

impl<S: IndexSeriesSource> Engine<S> {
    pub fn new(catalog: PolicyCatalog, source: S) -> Self {
        Self { catalog, source, fixed_date: None }
    }

    /// Pin "today" to a fixed date for reproducible runs
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.fixed_date = Some(date);
        self
    }

    pub fn catalog(&self) -> &PolicyCatalog {
        &self.catalog
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.fixed_date.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn tables_for(&self, date: NaiveDate) -> &PolicyTables {
        self.catalog.for_date(date)
    }

    /// Parse a raw body for the calculator named by `slug` and run it
    pub async fn handle(&self, slug: &str, body: &Value) -> CalcResult<CalculationResponse> {
        let parsed = slug
            .parse::<CalculatorKind>()
            .and_then(|kind| Calculation::parse(kind, body));

        let result = match parsed {
            Ok(calculation) => self.run(&calculation).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            if e.is_validation() {
                warn!("{} rejected: {}", slug, e);
            } else {
                error!("{} failed: {}", slug, e);
            }
        }
        result
    }

    /// Run a request against the tables in force on the engine's reference date
    pub async fn calculate(&self, request: &CalculationRequest) -> CalcResult<CalculationResponse> {
        self.calculate_at(request, self.reference_date()).await
    }

    pub async fn run(&self, calculation: &Calculation) -> CalcResult<CalculationResponse> {
        let date = calculation.reference_date.unwrap_or_else(|| self.reference_date());
        self.calculate_at(&calculation.request, date).await
    }

    pub async fn calculate_at(&self, request: &CalculationRequest, date: NaiveDate) -> CalcResult<CalculationResponse> {
        debug!("calculating {} as of {}", request.kind(), date);
        let series = self.fetch_series(request).await;
        self.evaluate(request, date, series.as_ref())
    }

    /// Fetch the index series a request needs, if any. Only monetary correction awaits.
    async fn fetch_series(&self, request: &CalculationRequest) -> Option<SeriesFetch> {
        match request {
            CalculationRequest::MonetaryCorrection(c) => Some(self.source.fetch(c.index, c.start, c.end).await),
            _ => None,
        }
    }

    /// Evaluate many calculations: series are fetched first, one per correction request,
    /// then the pure phase runs in parallel. Results keep the input order.
    pub async fn calculate_batch(&self, calculations: &[Calculation]) -> Vec<CalcResult<CalculationResponse>> {
        let mut series = Vec::with_capacity(calculations.len());
        for calculation in calculations {
            series.push(self.fetch_series(&calculation.request).await);
        }

        let today = self.reference_date();
        calculations
            .par_iter()
            .zip(series.par_iter())
            .map(|(calculation, fetch)| {
                let date = calculation.reference_date.unwrap_or(today);
                self.evaluate(&calculation.request, date, fetch.as_ref())
            })
            .collect()
    }

    /// Pure synchronous core. `series` must be present for monetary correction.
    pub fn evaluate(
        &self,
        request: &CalculationRequest,
        date: NaiveDate,
        series: Option<&SeriesFetch>,
    ) -> CalcResult<CalculationResponse> {
        let tables = self.tables_for(date);

        let response = match request {
            CalculationRequest::Amortization(terms) => {
                CalculationResponse::Amortization((&formulas::compare_methods(terms)).into())
            }

            CalculationRequest::MonetaryCorrection(c) => {
                let fetch = series.ok_or_else(|| {
                    CalcError::Internal(format!("{} series was not fetched", c.index))
                })?;
                let outcome = apply_correction(c.principal, fetch);
                CalculationResponse::MonetaryCorrection(CorrectionResponse::new(&outcome, c.index))
            }

            CalculationRequest::IncomeTax(input) => {
                CalculationResponse::IncomeTax((&formulas::income_tax(input, &tables.income_tax)).into())
            }

            CalculationRequest::SocialSecurity { gross_salary } => CalculationResponse::SocialSecurity(
                (&formulas::social_security(*gross_salary, &tables.social_security)).into(),
            ),

            CalculationRequest::Overtime(input) => {
                CalculationResponse::Overtime((&formulas::overtime(input, &tables.labor)).into())
            }

            CalculationRequest::WorkPremiums(input) => {
                CalculationResponse::WorkPremiums((&formulas::work_premiums(input, &tables.labor)).into())
            }

            CalculationRequest::Fgts(input) => {
                CalculationResponse::Fgts((&formulas::fgts_estimate(input, &tables.labor)).into())
            }

            CalculationRequest::Termination(input) => {
                CalculationResponse::Termination((&formulas::termination_pay(input, &tables.labor)).into())
            }

            CalculationRequest::Retirement(input) => CalculationResponse::Retirement(
                (&formulas::retirement_eligibility(input, &tables.retirement)).into(),
            ),

            CalculationRequest::SentenceProgression(input) => CalculationResponse::SentenceProgression(
                (&formulas::sentence_progression(input, &tables.progression)).into(),
            ),

            CalculationRequest::EstatePartition(input) => {
                CalculationResponse::EstatePartition((&formulas::estate_partition(input)).into())
            }

            CalculationRequest::Alimony(input) => CalculationResponse::Alimony((&formulas::alimony(input)).into()),

            CalculationRequest::Overindebtedness(input) => {
                CalculationResponse::Overindebtedness((&formulas::debt_load(input, &tables.debt_risk)).into())
            }

            CalculationRequest::PisCofins { revenue, regime } => CalculationResponse::PisCofins(
                (&formulas::pis_cofins(*revenue, *regime, &tables.pis_cofins)).into(),
            ),

            CalculationRequest::TransferTax { property_value, rate_pct } => {
                CalculationResponse::TransferTax((&formulas::transfer_tax(*property_value, *rate_pct)).into())
            }

            CalculationRequest::PropertyTax(p) => {
                let input = PropertyTaxInput {
                    original_value: p.original_value,
                    due_date: p.due_date,
                    reference_date: date,
                    fine_pct: p.fine_pct.unwrap_or(tables.late_payment.iptu_fine_pct),
                    monthly_interest_pct: p
                        .monthly_interest_pct
                        .unwrap_or(tables.late_payment.iptu_monthly_interest_pct),
                };
                CalculationResponse::PropertyTax((&formulas::overdue_property_tax(&input)).into())
            }

            CalculationRequest::DefaultInterest(d) => {
                let input = DefaultInterestInput {
                    principal: d.principal,
                    start: d.start,
                    end: d.end,
                    annual_rate_pct: d.annual_rate_pct.unwrap_or(tables.late_payment.default_annual_interest_pct),
                };
                CalculationResponse::DefaultInterest((&formulas::default_interest(&input)).into())
            }

            CalculationRequest::RentDebt(input) => {
                CalculationResponse::RentDebt((&formulas::rent_debt(input)).into())
            }

            CalculationRequest::CapitalDistribution { total_capital, partners } => {
                let shares = formulas::capital_distribution(*total_capital, partners);
                CalculationResponse::CapitalDistribution(CapitalResponse::new(*total_capital, shares))
            }

            CalculationRequest::FinancingReview(f) => CalculationResponse::FinancingReview(
                (&formulas::review_financing(f.principal, f.monthly_rate_pct, f.months, &tables.market_rates)).into(),
            ),

            CalculationRequest::PayrollCard(p) => CalculationResponse::PayrollCard(
                (&formulas::check_payroll_card_rate(p.loan, p.monthly_rate_pct, &tables.market_rates)).into(),
            ),

            CalculationRequest::Damages(d) => CalculationResponse::Damages(
                (&formulas::damages_estimate(d.material, d.severity, &tables.damages)).into(),
            ),
        };

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::{EconomicIndex, IndexSeriesPoint, StaticSeries};
    use crate::dispatch::request::CorrectionRequest;
    use crate::formulas::LoanTerms;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn engine() -> Engine<StaticSeries> {
        let source = StaticSeries::new().with_index(
            EconomicIndex::Ipca,
            vec![IndexSeriesPoint::new(d(2024, 1, 1), 1.0), IndexSeriesPoint::new(d(2024, 2, 1), 2.0)],
        );
        Engine::new(PolicyCatalog::default(), source).with_reference_date(d(2024, 6, 1))
    }

    #[tokio::test]
    async fn test_handle_unknown_slug() {
        let err = engine().handle("hipoteca", &json!({})).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_correction_uses_source() {
        let response = engine()
            .handle(
                "correcao-monetaria",
                &json!({ "valor": 1000, "dataInicial": "2024-01-01", "dataFinal": "2024-03-01", "indice": "IPCA" }),
            )
            .await
            .unwrap();
        let value = response.to_json().unwrap();
        assert_eq!(value["valorCorrigido"], json!(1030.2));
        assert_eq!(value["periodos"], json!(2));
        assert_eq!(value["situacao"], json!("corrigido"));
        assert_eq!(value["indiceUsado"], json!("IPCA"));
    }

    #[test]
    fn test_evaluate_correction_without_series_is_internal() {
        let request = CalculationRequest::MonetaryCorrection(CorrectionRequest {
            principal: 1000.0,
            start: d(2024, 1, 1),
            end: d(2024, 2, 1),
            index: EconomicIndex::Ipca,
        });
        let err = engine().evaluate(&request, d(2024, 6, 1), None).unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_iptu_uses_reference_date_and_table_defaults() {
        let response = engine()
            .handle("iptu", &json!({ "valorOriginal": 1000, "dataVencimento": "2024-03-01" }))
            .await
            .unwrap();
        let value = response.to_json().unwrap();
        assert_eq!(value["mesesAtraso"], json!(3));
        assert_eq!(value["multa"], json!("20.00"));
        assert_eq!(value["juros"], json!("30.00"));
        assert_eq!(value["total"], json!("1050.00"));
    }

    #[tokio::test]
    async fn test_batch_keeps_order() {
        let calculations: Vec<Calculation> = vec![
            CalculationRequest::Amortization(LoanTerms::new(10_000.0, 2.0, 12)).into(),
            CalculationRequest::SocialSecurity { gross_salary: 1_412.0 }.into(),
        ];
        let results = engine().calculate_batch(&calculations).await;
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0], Ok(CalculationResponse::Amortization(_))));
        assert!(matches!(results[1], Ok(CalculationResponse::SocialSecurity(_))));
    }
}
