//! Calculator identifiers and strongly typed calculation requests

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::Fields;
use crate::correction::EconomicIndex;
use crate::error::{CalcError, CalcResult};
use crate::formulas::{
    AlimonyInput, DebtLoadInput, EstateInput, FgtsInput, IncomeTaxInput, LoanTerms, OvertimeInput, Partner,
    PremiumInput, RentDebtInput, RetirementInput, SentenceInput, Severity, Sex, TaxRegime, TerminationInput,
};

/// Every calculator the engine serves, keyed by its route slug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculatorKind {
    Amortization,
    MonetaryCorrection,
    IncomeTax,
    SocialSecurity,
    Overtime,
    WorkPremiums,
    Fgts,
    Termination,
    Retirement,
    SentenceProgression,
    EstatePartition,
    Alimony,
    Overindebtedness,
    PisCofins,
    TransferTax,
    PropertyTax,
    DefaultInterest,
    RentDebt,
    CapitalDistribution,
    FinancingReview,
    PayrollCard,
    Damages,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 22] = [
        CalculatorKind::Amortization,
        CalculatorKind::MonetaryCorrection,
        CalculatorKind::IncomeTax,
        CalculatorKind::SocialSecurity,
        CalculatorKind::Overtime,
        CalculatorKind::WorkPremiums,
        CalculatorKind::Fgts,
        CalculatorKind::Termination,
        CalculatorKind::Retirement,
        CalculatorKind::SentenceProgression,
        CalculatorKind::EstatePartition,
        CalculatorKind::Alimony,
        CalculatorKind::Overindebtedness,
        CalculatorKind::PisCofins,
        CalculatorKind::TransferTax,
        CalculatorKind::PropertyTax,
        CalculatorKind::DefaultInterest,
        CalculatorKind::RentDebt,
        CalculatorKind::CapitalDistribution,
        CalculatorKind::FinancingReview,
        CalculatorKind::PayrollCard,
        CalculatorKind::Damages,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            CalculatorKind::Amortization => "amortizacao",
            CalculatorKind::MonetaryCorrection => "correcao-monetaria",
            CalculatorKind::IncomeTax => "irpf",
            CalculatorKind::SocialSecurity => "inss",
            CalculatorKind::Overtime => "horas-extras",
            CalculatorKind::WorkPremiums => "insalubridade",
            CalculatorKind::Fgts => "fgts",
            CalculatorKind::Termination => "trabalhista-completo",
            CalculatorKind::Retirement => "aposentadoria",
            CalculatorKind::SentenceProgression => "calculo-pena",
            CalculatorKind::EstatePartition => "partilha-bens",
            CalculatorKind::Alimony => "pensao-alimenticia",
            CalculatorKind::Overindebtedness => "superendividamento",
            CalculatorKind::PisCofins => "pis-cofins",
            CalculatorKind::TransferTax => "itbi",
            CalculatorKind::PropertyTax => "iptu",
            CalculatorKind::DefaultInterest => "juros-moratorios",
            CalculatorKind::RentDebt => "divida-aluguel",
            CalculatorKind::CapitalDistribution => "capital-social",
            CalculatorKind::FinancingReview => "revisao-financiamento",
            CalculatorKind::PayrollCard => "rmc-rcc",
            CalculatorKind::Damages => "indenizacao",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CalculatorKind::Amortization => "Comparativo de amortização Price x SAC",
            CalculatorKind::MonetaryCorrection => "Correção monetária por índice oficial",
            CalculatorKind::IncomeTax => "Imposto de renda mensal (IRPF)",
            CalculatorKind::SocialSecurity => "Contribuição previdenciária do empregado (INSS)",
            CalculatorKind::Overtime => "Horas extras com reflexo no DSR",
            CalculatorKind::WorkPremiums => "Adicionais de insalubridade e periculosidade",
            CalculatorKind::Fgts => "Estimativa de saldo do FGTS",
            CalculatorKind::Termination => "Verbas rescisórias",
            CalculatorKind::Retirement => "Elegibilidade à aposentadoria por idade",
            CalculatorKind::SentenceProgression => "Progressão de regime penal",
            CalculatorKind::EstatePartition => "Partilha de bens",
            CalculatorKind::Alimony => "Pensão alimentícia",
            CalculatorKind::Overindebtedness => "Risco de superendividamento",
            CalculatorKind::PisCofins => "PIS/COFINS por regime",
            CalculatorKind::TransferTax => "ITBI",
            CalculatorKind::PropertyTax => "IPTU em atraso",
            CalculatorKind::DefaultInterest => "Juros moratórios",
            CalculatorKind::RentDebt => "Dívida de aluguel",
            CalculatorKind::CapitalDistribution => "Distribuição do capital social",
            CalculatorKind::FinancingReview => "Revisão de financiamento",
            CalculatorKind::PayrollCard => "Revisão de RMC/RCC",
            CalculatorKind::Damages => "Estimativa de indenização",
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for CalculatorKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = s.trim().trim_matches('/');
        CalculatorKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == slug)
            .ok_or_else(|| CalcError::UnknownCalculator(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionRequest {
    pub principal: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub index: EconomicIndex,
}

/// Rates left unset fall back to the policy tables in force
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyTaxRequest {
    pub original_value: f64,
    pub due_date: NaiveDate,
    pub fine_pct: Option<f64>,
    pub monthly_interest_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultInterestRequest {
    pub principal: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub annual_rate_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancingRequest {
    pub principal: f64,
    pub monthly_rate_pct: f64,
    pub months: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayrollCardRequest {
    pub loan: f64,
    pub monthly_rate_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DamagesRequest {
    pub severity: Option<Severity>,
    pub material: f64,
}

/// One validated request per calculator
#[derive(Debug, Clone, PartialEq)]
pub enum CalculationRequest {
    Amortization(LoanTerms),
    MonetaryCorrection(CorrectionRequest),
    IncomeTax(IncomeTaxInput),
    SocialSecurity { gross_salary: f64 },
    Overtime(OvertimeInput),
    WorkPremiums(PremiumInput),
    Fgts(FgtsInput),
    Termination(TerminationInput),
    Retirement(RetirementInput),
    SentenceProgression(SentenceInput),
    EstatePartition(EstateInput),
    Alimony(AlimonyInput),
    Overindebtedness(DebtLoadInput),
    PisCofins { revenue: f64, regime: TaxRegime },
    TransferTax { property_value: f64, rate_pct: f64 },
    PropertyTax(PropertyTaxRequest),
    DefaultInterest(DefaultInterestRequest),
    RentDebt(RentDebtInput),
    CapitalDistribution { total_capital: f64, partners: Vec<Partner> },
    FinancingReview(FinancingRequest),
    PayrollCard(PayrollCardRequest),
    Damages(DamagesRequest),
}

impl CalculationRequest {
    pub fn kind(&self) -> CalculatorKind {
        match self {
            CalculationRequest::Amortization(_) => CalculatorKind::Amortization,
            CalculationRequest::MonetaryCorrection(_) => CalculatorKind::MonetaryCorrection,
            CalculationRequest::IncomeTax(_) => CalculatorKind::IncomeTax,
            CalculationRequest::SocialSecurity { .. } => CalculatorKind::SocialSecurity,
            CalculationRequest::Overtime(_) => CalculatorKind::Overtime,
            CalculationRequest::WorkPremiums(_) => CalculatorKind::WorkPremiums,
            CalculationRequest::Fgts(_) => CalculatorKind::Fgts,
            CalculationRequest::Termination(_) => CalculatorKind::Termination,
            CalculationRequest::Retirement(_) => CalculatorKind::Retirement,
            CalculationRequest::SentenceProgression(_) => CalculatorKind::SentenceProgression,
            CalculationRequest::EstatePartition(_) => CalculatorKind::EstatePartition,
            CalculationRequest::Alimony(_) => CalculatorKind::Alimony,
            CalculationRequest::Overindebtedness(_) => CalculatorKind::Overindebtedness,
            CalculationRequest::PisCofins { .. } => CalculatorKind::PisCofins,
            CalculationRequest::TransferTax { .. } => CalculatorKind::TransferTax,
            CalculationRequest::PropertyTax(_) => CalculatorKind::PropertyTax,
            CalculationRequest::DefaultInterest(_) => CalculatorKind::DefaultInterest,
            CalculationRequest::RentDebt(_) => CalculatorKind::RentDebt,
            CalculationRequest::CapitalDistribution { .. } => CalculatorKind::CapitalDistribution,
            CalculationRequest::FinancingReview(_) => CalculatorKind::FinancingReview,
            CalculationRequest::PayrollCard(_) => CalculatorKind::PayrollCard,
            CalculationRequest::Damages(_) => CalculatorKind::Damages,
        }
    }

    /// Validate a flat JSON body for `kind`
    pub fn parse(kind: CalculatorKind, body: &Value) -> CalcResult<Self> {
        let f = Fields::new(body)?;

        let request = match kind {
            CalculatorKind::Amortization => {
                let months = loan_term(&f)?;
                CalculationRequest::Amortization(LoanTerms::new(
                    f.f64("valorEmprestimo")?,
                    f.f64("taxaJurosMensal")?,
                    months,
                ))
            }

            CalculatorKind::MonetaryCorrection => {
                let principal = f.f64("valor")?;
                let start = f.date("dataInicial")?;
                let end = f.date("dataFinal")?;
                if end < start {
                    return Err(CalcError::invalid("dataFinal", "precedes dataInicial"));
                }
                let index = f.string("indice")?.to_uppercase().parse::<EconomicIndex>()?;
                CalculationRequest::MonetaryCorrection(CorrectionRequest { principal, start, end, index })
            }

            CalculatorKind::IncomeTax => CalculationRequest::IncomeTax(IncomeTaxInput {
                gross_income: f.f64("rendimentos")?,
                dependents: f.count_or("dependentes", 0)?,
                pension_contribution: f.f64_or("previdencia", 0.0)?,
                other_deductions: f.f64_or("outrasDeducoes", 0.0)?,
            }),

            CalculatorKind::SocialSecurity => CalculationRequest::SocialSecurity {
                gross_salary: f.f64("salarioBruto")?,
            },

            CalculatorKind::Overtime => {
                let monthly_hours = f.f64("jornadaMensal")?;
                if monthly_hours <= 0.0 {
                    return Err(CalcError::invalid("jornadaMensal", "must be positive"));
                }
                CalculationRequest::Overtime(OvertimeInput {
                    monthly_salary: f.f64("salario")?,
                    monthly_hours,
                    hours_50: f.f64_or("qtdHoras50", 0.0)?,
                    hours_100: f.f64_or("qtdHoras100", 0.0)?,
                })
            }

            CalculatorKind::WorkPremiums => CalculationRequest::WorkPremiums(PremiumInput {
                minimum_wage: f.f64("salarioMinimo")?,
                base_salary: f.f64("salarioBase")?,
                unhealthy_degree_pct: f.f64_or("grauInsalubridade", 0.0)?,
                hazardous: f.flag("temPericulosidade"),
            }),

            CalculatorKind::Fgts => CalculationRequest::Fgts(FgtsInput {
                monthly_salary: f.f64("salario")?,
                admission: f.date("dataAdmissao")?,
                calculation_date: f.date("dataCalculo")?,
            }),

            CalculatorKind::Termination => CalculationRequest::Termination(TerminationInput {
                monthly_salary: f.f64("salario")?,
                admission: f.date("dataAdmissao")?,
                dismissal: f.date("dataDemissao")?,
                include_vacation: f.flag("incluirFerias"),
                include_thirteenth: f.flag("incluir13"),
                include_notice: f.flag("incluirAviso"),
            }),

            CalculatorKind::Retirement => {
                let sex = match f.opt_string("sexo")?.as_deref() {
                    Some("M") | Some("m") => Sex::Male,
                    _ => Sex::Female,
                };
                CalculationRequest::Retirement(RetirementInput {
                    sex,
                    age: f.f64("idade")?.trunc(),
                    contribution_years: f.f64("tempoContribuicaoAnos")?,
                })
            }

            CalculatorKind::SentenceProgression => CalculationRequest::SentenceProgression(SentenceInput {
                total_years: f.f64("penaTotalAnos")?,
                heinous: f.flag("crimeHediondo"),
                repeat_offender: f.flag("reincidente"),
            }),

            CalculatorKind::EstatePartition => CalculationRequest::EstatePartition(EstateInput {
                assets: f.f64("totalBens")?,
                debts: f.f64_or("totalDividas", 0.0)?,
                spousal_share: f.flag("conjugeMeacao"),
                heirs: f.count_or("numHerdeiros", 1)?.max(1),
            }),

            CalculatorKind::Alimony => CalculationRequest::Alimony(AlimonyInput {
                income: f.f64("rendaMensal")?,
                percent: f.f64("percentual")?,
                dependents: f.count("numeroDependentes")?,
            }),

            CalculatorKind::Overindebtedness => {
                let monthly_income = f.f64("rendaMensal")?;
                let essential_expenses = f.f64("despesasEssenciais")?;
                let installments = f
                    .list("dividas")?
                    .iter()
                    .map(debt_installment)
                    .collect::<CalcResult<Vec<f64>>>()?;
                CalculationRequest::Overindebtedness(DebtLoadInput {
                    monthly_income,
                    essential_expenses,
                    installments,
                })
            }

            CalculatorKind::PisCofins => {
                let regime = match f.opt_string("regime")?.as_deref() {
                    Some("cumulativo") => TaxRegime::Cumulative,
                    _ => TaxRegime::NonCumulative,
                };
                CalculationRequest::PisCofins { revenue: f.f64("faturamento")?, regime }
            }

            CalculatorKind::TransferTax => CalculationRequest::TransferTax {
                property_value: f.f64("valorImovel")?,
                rate_pct: f.f64("aliquota")?,
            },

            CalculatorKind::PropertyTax => CalculationRequest::PropertyTax(PropertyTaxRequest {
                original_value: f.f64("valorOriginal")?,
                due_date: f.date("dataVencimento")?,
                fine_pct: f.opt_f64("multaPercentual")?,
                monthly_interest_pct: f.opt_f64("jurosMensais")?,
            }),

            CalculatorKind::DefaultInterest => CalculationRequest::DefaultInterest(DefaultInterestRequest {
                principal: f.f64("valorPrincipal")?,
                start: f.date("dataInicial")?,
                end: f.date("dataFinal")?,
                annual_rate_pct: f.opt_f64("taxaJurosAnual")?,
            }),

            CalculatorKind::RentDebt => CalculationRequest::RentDebt(RentDebtInput {
                monthly_rent: f.f64("valorAluguel")?,
                months_late: f.count("mesesAtraso")?,
                fine_pct: f.f64_or("multa", 0.0)?,
                monthly_interest_pct: f.f64_or("juros", 0.0)?,
            }),

            CalculatorKind::CapitalDistribution => {
                let total_capital = f.f64("capitalTotal")?;
                if total_capital <= 0.0 {
                    return Err(CalcError::invalid("capitalTotal", "must be positive"));
                }
                let partners = f
                    .list("socios")?
                    .iter()
                    .map(partner)
                    .collect::<CalcResult<Vec<Partner>>>()?;
                CalculationRequest::CapitalDistribution { total_capital, partners }
            }

            CalculatorKind::FinancingReview => {
                let months = loan_term(&f)?;
                CalculationRequest::FinancingReview(FinancingRequest {
                    principal: f.f64("valorFinanciado")?,
                    monthly_rate_pct: f.f64("taxaJurosMensal")?,
                    months,
                })
            }

            CalculatorKind::PayrollCard => CalculationRequest::PayrollCard(PayrollCardRequest {
                loan: f.f64("valorEmprestimo")?,
                monthly_rate_pct: f.f64("taxaJurosMensal")?,
            }),

            CalculatorKind::Damages => CalculationRequest::Damages(DamagesRequest {
                severity: f.opt_string("gravidade")?.as_deref().and_then(Severity::from_label),
                material: f.f64_or("valorMaterial", 0.0)?,
            }),
        };

        Ok(request)
    }
}

/// Longest accepted loan term: 100 years of monthly periods
pub const MAX_TERM_MONTHS: u32 = 1_200;

fn loan_term(f: &Fields) -> CalcResult<u32> {
    let months = f.count("prazoMeses")?;
    if months == 0 {
        return Err(CalcError::invalid("prazoMeses", "must be at least 1"));
    }
    if months > MAX_TERM_MONTHS {
        return Err(CalcError::invalid("prazoMeses", format!("must not exceed {}", MAX_TERM_MONTHS)));
    }
    Ok(months)
}

/// `{ "nome": ..., "parcela": ... }`; an entry without a usable installment counts as zero
fn debt_installment(entry: &Value) -> CalcResult<f64> {
    let fields = Fields::new(entry).map_err(|_| CalcError::invalid("dividas", "expected objects"))?;
    Ok(fields.opt_f64("parcela").ok().flatten().unwrap_or(0.0))
}

fn partner(entry: &Value) -> CalcResult<Partner> {
    let fields = Fields::new(entry).map_err(|_| CalcError::invalid("socios", "expected objects"))?;
    Ok(Partner {
        name: fields.opt_string("nome")?.unwrap_or_default(),
        quotas: fields.f64("quotas")?,
    })
}

/// A parsed request plus the date that selects the policy tables (`dataReferencia`)
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub request: CalculationRequest,
    pub reference_date: Option<NaiveDate>,
}

impl Calculation {
    pub fn parse(kind: CalculatorKind, body: &Value) -> CalcResult<Self> {
        let request = CalculationRequest::parse(kind, body)?;
        let reference_date = Fields::new(body)?.opt_date("dataReferencia")?;
        Ok(Self { request, reference_date })
    }
}

impl From<CalculationRequest> for Calculation {
    fn from(request: CalculationRequest) -> Self {
        Self { request, reference_date: None }
    }
}
