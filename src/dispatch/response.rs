//! Response records in the wire shape of each calculator
//!
//! Full precision is kept through the formulas; rounding only happens here, when a
//! value is serialized. [`Money`] renders as a two-decimal string, [`Rounded`] as a
//! JSON number rounded to two decimals. Percentages and counts stay raw.

use serde::{Serialize, Serializer};

use crate::correction::{CorrectionOutcome, EconomicIndex};
use crate::formulas::{
    Alimony, AmortizationComparison, DamagesEstimate, DebtLoad, DefaultInterest, EstatePartition, FgtsEstimate,
    FinancingReview, IncomeTax, OverdueCharge, OvertimePay, PartnerShare, PayrollCardCheck, PisCofins, Premiums,
    RentDebt, RetirementEligibility, SentenceProgression, SocialSecurity, TerminationPay, TransferTax,
};

fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid "-0.00"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Monetary value serialized as a fixed two-decimal string
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Money(pub f64);

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:.2}", round2(self.0)))
    }
}

/// Monetary value serialized as a number rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rounded(pub f64);

impl Serialize for Rounded {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(round2(self.0))
    }
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBlock {
    pub parcela: Money,
    pub total_pago: Money,
    pub total_juros: Money,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SacBlock {
    pub primeira_parcela: Money,
    pub ultima_parcela: Money,
    pub total_pago: Money,
    pub total_juros: Money,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationResponse {
    pub price: PriceBlock,
    pub sac: SacBlock,
    pub diferenca_juros: Money,
    pub melhor_opcao: &'static str,
}

impl From<&AmortizationComparison> for AmortizationResponse {
    fn from(cmp: &AmortizationComparison) -> Self {
        Self {
            price: PriceBlock {
                parcela: Money(cmp.price.installment),
                total_pago: Money(cmp.price.total_paid),
                total_juros: Money(cmp.price.total_interest),
            },
            sac: SacBlock {
                primeira_parcela: Money(cmp.sac.first_installment),
                ultima_parcela: Money(cmp.sac.last_installment),
                total_pago: Money(cmp.sac.total_paid),
                total_juros: Money(cmp.sac.total_interest),
            },
            diferenca_juros: Money(cmp.interest_difference),
            melhor_opcao: cmp.recommended.rationale(),
        }
    }
}

// ---------------------------------------------------------------------------
// Monetary correction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionResponse {
    pub valor_original: Rounded,
    pub valor_corrigido: Rounded,
    pub correcao: Rounded,
    pub percentual: f64,
    pub fator_correcao: f64,
    pub indice_usado: EconomicIndex,
    pub periodos: usize,
    pub situacao: &'static str,
}

impl CorrectionResponse {
    pub fn new(outcome: &CorrectionOutcome, index: EconomicIndex) -> Self {
        Self {
            valor_original: Rounded(outcome.principal),
            valor_corrigido: Rounded(outcome.corrected_value),
            correcao: Rounded(outcome.correction()),
            percentual: outcome.percent(),
            fator_correcao: outcome.factor,
            indice_usado: index,
            periodos: outcome.periods,
            situacao: outcome.status.as_str(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tax
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeTaxResponse {
    pub base_calculo: Money,
    pub aliquota_nominal: f64,
    pub parcela_deduzir: Money,
    pub imposto_mensal: Money,
    pub aliquota_efetiva: Money,
}

impl From<&IncomeTax> for IncomeTaxResponse {
    fn from(tax: &IncomeTax) -> Self {
        Self {
            base_calculo: Money(tax.taxable_base),
            aliquota_nominal: tax.rate_pct,
            parcela_deduzir: Money(tax.deduction),
            imposto_mensal: Money(tax.tax_due),
            aliquota_efetiva: Money(tax.effective_rate_pct),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialSecurityResponse {
    pub contribuicao: Money,
    pub aliquota_efetiva: Money,
    pub teto_atingido: bool,
}

impl From<&SocialSecurity> for SocialSecurityResponse {
    fn from(ss: &SocialSecurity) -> Self {
        Self {
            contribuicao: Money(ss.contribution),
            aliquota_efetiva: Money(ss.effective_rate_pct),
            teto_atingido: ss.ceiling_reached,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PisCofinsResponse {
    pub pis: Money,
    pub cofins: Money,
    pub total: Money,
    pub regime: &'static str,
}

impl From<&PisCofins> for PisCofinsResponse {
    fn from(p: &PisCofins) -> Self {
        Self {
            pis: Money(p.pis),
            cofins: Money(p.cofins),
            total: Money(p.total),
            regime: p.regime.label(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferTaxResponse {
    pub valor_base: Money,
    pub aliquota: f64,
    pub valor_imposto: Money,
}

impl From<&TransferTax> for TransferTaxResponse {
    fn from(t: &TransferTax) -> Self {
        Self {
            valor_base: Money(t.base),
            aliquota: t.rate_pct,
            valor_imposto: Money(t.tax),
        }
    }
}

// ---------------------------------------------------------------------------
// Labor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeResponse {
    pub valor_hora_normal: Rounded,
    pub valor_hora50: Rounded,
    pub valor_hora100: Rounded,
    pub total50: Rounded,
    pub total100: Rounded,
    pub dsr: Rounded,
    pub total_geral: Rounded,
}

impl From<&OvertimePay> for OvertimeResponse {
    fn from(o: &OvertimePay) -> Self {
        Self {
            valor_hora_normal: Rounded(o.hourly_rate),
            valor_hora50: Rounded(o.hourly_rate_50),
            valor_hora100: Rounded(o.hourly_rate_100),
            total50: Rounded(o.total_50),
            total100: Rounded(o.total_100),
            dsr: Rounded(o.rest_pay),
            total_geral: Rounded(o.grand_total),
        }
    }
}

pub const PREMIUMS_ACCUMULATED_WARNING: &str =
    "Insalubridade e periculosidade normalmente não se acumulam; o trabalhador deve optar por um dos adicionais.";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumsResponse {
    pub adicional_insalubridade: Rounded,
    pub adicional_periculosidade: Rounded,
    pub total_adicionais: Rounded,
    pub salario_final: Rounded,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aviso: Option<&'static str>,
}

impl From<&Premiums> for PremiumsResponse {
    fn from(p: &Premiums) -> Self {
        Self {
            adicional_insalubridade: Rounded(p.unhealthy),
            adicional_periculosidade: Rounded(p.hazard),
            total_adicionais: Rounded(p.total),
            salario_final: Rounded(p.final_salary),
            aviso: p.accumulated().then_some(PREMIUMS_ACCUMULATED_WARNING),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FgtsMeta {
    pub months: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FgtsResponse {
    pub saldo_total: Rounded,
    pub juros_mora: Rounded,
    pub correcao: Rounded,
    pub total: Rounded,
    pub meta: FgtsMeta,
}

impl From<&FgtsEstimate> for FgtsResponse {
    fn from(e: &FgtsEstimate) -> Self {
        Self {
            saldo_total: Rounded(e.deposited),
            juros_mora: Rounded(e.interest),
            correcao: Rounded(e.correction),
            total: Rounded(e.total),
            meta: FgtsMeta { months: e.months },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminationMeta {
    pub days_worked: i64,
    pub months_worked: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminationResponse {
    pub saldo_salario: Rounded,
    pub ferias: Rounded,
    pub decimo_terceiro: Rounded,
    pub aviso_previo: Rounded,
    pub fgts: Rounded,
    pub multa_fgts: Rounded,
    pub total: Rounded,
    pub meta: TerminationMeta,
}

impl From<&TerminationPay> for TerminationResponse {
    fn from(t: &TerminationPay) -> Self {
        Self {
            saldo_salario: Rounded(t.salary_balance),
            ferias: Rounded(t.vacation),
            decimo_terceiro: Rounded(t.thirteenth),
            aviso_previo: Rounded(t.notice),
            fgts: Rounded(t.fgts),
            multa_fgts: Rounded(t.fgts_fine),
            total: Rounded(t.total),
            meta: TerminationMeta {
                days_worked: t.days_worked,
                months_worked: t.months_worked,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Civil, family and penal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementResponse {
    pub apto: bool,
    pub falta_idade: f64,
    pub falta_tempo: f64,
    pub regra: String,
}

impl From<&RetirementEligibility> for RetirementResponse {
    fn from(r: &RetirementEligibility) -> Self {
        Self {
            apto: r.eligible,
            falta_idade: r.missing_age,
            falta_tempo: r.missing_contribution,
            regra: r.rule_description(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceResponse {
    pub pena_total: f64,
    pub percentual_aplicado: f64,
    pub tempo_para_progressao: Money,
    pub mensagem: String,
}

impl From<&SentenceProgression> for SentenceResponse {
    fn from(s: &SentenceProgression) -> Self {
        Self {
            pena_total: s.total_years,
            percentual_aplicado: s.percent,
            tempo_para_progressao: Money(s.years_required),
            mensagem: format!("Para progredir de regime, é necessário cumprir {}% da pena.", s.percent),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstateResponse {
    pub patrimonio_liquido: Money,
    pub meacao_conjuge: Money,
    pub total_para_herdeiros: Money,
    pub valor_por_herdeiro: Money,
}

impl From<&EstatePartition> for EstateResponse {
    fn from(e: &EstatePartition) -> Self {
        Self {
            patrimonio_liquido: Money(e.net_estate),
            meacao_conjuge: Money(e.spouse_share),
            total_para_herdeiros: Money(e.heirs_pool),
            valor_por_herdeiro: Money(e.per_heir),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlimonyResponse {
    pub valor_pensao: Rounded,
    pub valor_por_dependente: Rounded,
    pub renda_liquida: Rounded,
}

impl From<&Alimony> for AlimonyResponse {
    fn from(a: &Alimony) -> Self {
        Self {
            valor_pensao: Rounded(a.pension),
            valor_por_dependente: Rounded(a.per_dependent),
            renda_liquida: Rounded(a.residual_income),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DamagesResponse {
    pub danos_materiais: Money,
    pub sugestao_moral_min: Money,
    pub sugestao_moral_max: Money,
    pub total_estimado_min: Money,
    pub total_estimado_max: Money,
}

impl From<&DamagesEstimate> for DamagesResponse {
    fn from(d: &DamagesEstimate) -> Self {
        Self {
            danos_materiais: Money(d.material),
            sugestao_moral_min: Money(d.moral_min),
            sugestao_moral_max: Money(d.moral_max),
            total_estimado_min: Money(d.total_min),
            total_estimado_max: Money(d.total_max),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PartnerShareResponse {
    pub nome: String,
    pub valor: Money,
    /// Formatted as `"60.00%"`
    pub percentual: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalResponse {
    pub capital_total: Money,
    pub distribuicao: Vec<PartnerShareResponse>,
}

impl CapitalResponse {
    pub fn new(total_capital: f64, shares: Vec<PartnerShare>) -> Self {
        let distribuicao = shares
            .into_iter()
            .map(|s| PartnerShareResponse {
                nome: s.name,
                valor: Money(s.amount),
                percentual: format!("{:.2}%", round2(s.percent)),
            })
            .collect();

        Self {
            capital_total: Money(total_capital),
            distribuicao,
        }
    }
}

// ---------------------------------------------------------------------------
// Banking and late payment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverindebtednessResponse {
    pub total_dividas: Rounded,
    pub capacidade_pagamento: Rounded,
    pub percentual_comprometimento: f64,
    pub situacao: &'static str,
}

impl From<&DebtLoad> for OverindebtednessResponse {
    fn from(d: &DebtLoad) -> Self {
        Self {
            total_dividas: Rounded(d.total_installments),
            capacidade_pagamento: Rounded(d.payment_capacity),
            percentual_comprometimento: d.ratio_pct,
            situacao: d.risk.label(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancingReviewResponse {
    pub prestacao_mensal: Money,
    pub total_pago: Money,
    pub total_juros: Money,
    pub taxa_considerada: f64,
    pub taxa_media_mercado: f64,
    pub indicio_abusividade: bool,
    pub economia_estimada: Money,
}

impl From<&FinancingReview> for FinancingReviewResponse {
    fn from(r: &FinancingReview) -> Self {
        Self {
            prestacao_mensal: Money(r.installment),
            total_pago: Money(r.total_paid),
            total_juros: Money(r.total_interest),
            taxa_considerada: r.charged_rate_pct,
            taxa_media_mercado: r.market_rate_pct,
            indicio_abusividade: r.above_market,
            economia_estimada: Money(r.estimated_saving),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollCardResponse {
    pub abusividade: bool,
    pub taxa_cobrada: f64,
    pub taxa_media_mercado: f64,
    pub diferenca_taxa: Money,
    pub valor_devido: Money,
    pub mensagem: &'static str,
}

impl From<&PayrollCardCheck> for PayrollCardResponse {
    fn from(c: &PayrollCardCheck) -> Self {
        Self {
            abusividade: c.abusive,
            taxa_cobrada: c.charged_rate_pct,
            taxa_media_mercado: c.market_rate_pct,
            diferenca_taxa: Money(c.rate_difference),
            valor_devido: Money(c.overpaid),
            mensagem: c.message(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyTaxResponse {
    pub valor_original: Money,
    pub meses_atraso: u32,
    pub multa: Money,
    pub juros: Money,
    pub total: Money,
}

impl From<&OverdueCharge> for PropertyTaxResponse {
    fn from(c: &OverdueCharge) -> Self {
        Self {
            valor_original: Money(c.original_value),
            meses_atraso: c.months_late,
            multa: Money(c.fine),
            juros: Money(c.interest),
            total: Money(c.total),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultInterestResponse {
    pub valor_principal: Money,
    pub dias: u32,
    pub juros: Money,
    pub total: Money,
}

impl From<&DefaultInterest> for DefaultInterestResponse {
    fn from(d: &DefaultInterest) -> Self {
        Self {
            valor_principal: Money(d.principal),
            dias: d.days,
            juros: Money(d.interest),
            total: Money(d.total),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentDebtResponse {
    pub valor_base: Rounded,
    pub valor_multa: Rounded,
    pub valor_juros: Rounded,
    pub total: Rounded,
}

impl From<&RentDebt> for RentDebtResponse {
    fn from(r: &RentDebt) -> Self {
        Self {
            valor_base: Rounded(r.base),
            valor_multa: Rounded(r.fine),
            valor_juros: Rounded(r.interest),
            total: Rounded(r.total),
        }
    }
}

/// Result of any calculator, serialized as its flat JSON object
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CalculationResponse {
    Amortization(AmortizationResponse),
    MonetaryCorrection(CorrectionResponse),
    IncomeTax(IncomeTaxResponse),
    SocialSecurity(SocialSecurityResponse),
    Overtime(OvertimeResponse),
    WorkPremiums(PremiumsResponse),
    Fgts(FgtsResponse),
    Termination(TerminationResponse),
    Retirement(RetirementResponse),
    SentenceProgression(SentenceResponse),
    EstatePartition(EstateResponse),
    Alimony(AlimonyResponse),
    Overindebtedness(OverindebtednessResponse),
    PisCofins(PisCofinsResponse),
    TransferTax(TransferTaxResponse),
    PropertyTax(PropertyTaxResponse),
    DefaultInterest(DefaultInterestResponse),
    RentDebt(RentDebtResponse),
    CapitalDistribution(CapitalResponse),
    FinancingReview(FinancingReviewResponse),
    PayrollCard(PayrollCardResponse),
    Damages(DamagesResponse),
}

impl CalculationResponse {
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
