//! Civil, family, social-security, penal and corporate calculators

use serde::{Deserialize, Serialize};

use crate::tables::{DamageRange, DamageRanges, ProgressionFractions, RetirementRules, RetirementThreshold};

// ---------------------------------------------------------------------------
// Retirement
// ---------------------------------------------------------------------------

/// Category that selects the retirement threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetirementInput {
    pub sex: Sex,
    pub age: f64,
    pub contribution_years: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetirementEligibility {
    pub eligible: bool,
    /// Years still missing on each axis, floored at zero
    pub missing_age: f64,
    pub missing_contribution: f64,
    pub threshold: RetirementThreshold,
}

impl RetirementEligibility {
    pub fn rule_description(&self) -> String {
        format!(
            "Idade Mínima: {} anos | Tempo Mínimo: {} anos",
            self.threshold.min_age, self.threshold.min_contribution_years
        )
    }
}

/// Eligible only when both the age and the contribution-time deficits are <= 0
pub fn retirement_eligibility(input: &RetirementInput, rules: &RetirementRules) -> RetirementEligibility {
    let threshold = match input.sex {
        Sex::Male => rules.male,
        Sex::Female => rules.female,
    };

    let age_gap = threshold.min_age - input.age;
    let contribution_gap = threshold.min_contribution_years - input.contribution_years;

    RetirementEligibility {
        eligible: age_gap <= 0.0 && contribution_gap <= 0.0,
        missing_age: age_gap.max(0.0),
        missing_contribution: contribution_gap.max(0.0),
        threshold,
    }
}

// ---------------------------------------------------------------------------
// Sentence progression
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentenceInput {
    pub total_years: f64,
    pub heinous: bool,
    pub repeat_offender: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentenceProgression {
    pub total_years: f64,
    pub percent: f64,
    pub years_required: f64,
}

pub fn sentence_progression(input: &SentenceInput, fractions: &ProgressionFractions) -> SentenceProgression {
    let percent = fractions.percent_for(input.heinous, input.repeat_offender);
    SentenceProgression {
        total_years: input.total_years,
        percent,
        years_required: input.total_years * percent / 100.0,
    }
}

// ---------------------------------------------------------------------------
// Estate partition and alimony
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstateInput {
    pub assets: f64,
    pub debts: f64,
    /// Surviving spouse keeps half under community property (meação)
    pub spousal_share: bool,
    /// At least one
    pub heirs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstatePartition {
    pub net_estate: f64,
    pub spouse_share: f64,
    pub heirs_pool: f64,
    pub per_heir: f64,
}

pub fn estate_partition(input: &EstateInput) -> EstatePartition {
    let net_estate = input.assets - input.debts;
    let (spouse_share, heirs_pool) = if input.spousal_share {
        (net_estate * 0.5, net_estate * 0.5)
    } else {
        (0.0, net_estate)
    };
    let heirs = input.heirs.max(1) as f64;

    EstatePartition {
        net_estate,
        spouse_share,
        heirs_pool,
        per_heir: heirs_pool / heirs,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlimonyInput {
    pub income: f64,
    pub percent: f64,
    pub dependents: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alimony {
    pub pension: f64,
    pub per_dependent: f64,
    pub residual_income: f64,
}

pub fn alimony(input: &AlimonyInput) -> Alimony {
    let pension = input.income * input.percent / 100.0;
    let per_dependent = if input.dependents > 0 {
        pension / input.dependents as f64
    } else {
        0.0
    };

    Alimony {
        pension,
        per_dependent,
        residual_income: input.income - pension,
    }
}

// ---------------------------------------------------------------------------
// Damages estimate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Leve,
    Media,
    Grave,
    Gravissima,
}

impl Severity {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "leve" => Some(Severity::Leve),
            "media" | "média" => Some(Severity::Media),
            "grave" => Some(Severity::Grave),
            "gravissima" | "gravíssima" => Some(Severity::Gravissima),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamagesEstimate {
    pub material: f64,
    pub moral_min: f64,
    pub moral_max: f64,
    pub total_min: f64,
    pub total_max: f64,
}

/// Material damages plus a reference range for moral damages.
/// An unknown severity contributes a zero range.
pub fn damages_estimate(material: f64, severity: Option<Severity>, ranges: &DamageRanges) -> DamagesEstimate {
    let range = match severity {
        Some(Severity::Leve) => ranges.leve,
        Some(Severity::Media) => ranges.media,
        Some(Severity::Grave) => ranges.grave,
        Some(Severity::Gravissima) => ranges.gravissima,
        None => DamageRange { min: 0.0, max: 0.0 },
    };

    DamagesEstimate {
        material,
        moral_min: range.min,
        moral_max: range.max,
        total_min: material + range.min,
        total_max: material + range.max,
    }
}

// ---------------------------------------------------------------------------
// Capital distribution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub name: String,
    /// Amount invested
    pub quotas: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerShare {
    pub name: String,
    pub amount: f64,
    pub percent: f64,
}

/// Each partner's share of the registered capital. `total_capital` must be positive.
pub fn capital_distribution(total_capital: f64, partners: &[Partner]) -> Vec<PartnerShare> {
    partners
        .iter()
        .map(|p| PartnerShare {
            name: p.name.clone(),
            amount: p.quotas,
            percent: p.quotas / total_capital * 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_retirement_at_threshold() {
        let result = retirement_eligibility(
            &RetirementInput { sex: Sex::Male, age: 65.0, contribution_years: 20.0 },
            &RetirementRules::default(),
        );
        assert!(result.eligible);
        assert_eq!(result.missing_age, 0.0);
        assert_eq!(result.missing_contribution, 0.0);
    }

    #[test]
    fn test_retirement_one_year_short() {
        let result = retirement_eligibility(
            &RetirementInput { sex: Sex::Male, age: 64.0, contribution_years: 25.0 },
            &RetirementRules::default(),
        );
        assert!(!result.eligible);
        assert_eq!(result.missing_age, 1.0);
        assert_eq!(result.missing_contribution, 0.0);
    }

    #[test]
    fn test_retirement_female_threshold() {
        let result = retirement_eligibility(
            &RetirementInput { sex: Sex::Female, age: 62.0, contribution_years: 12.5 },
            &RetirementRules::default(),
        );
        assert!(!result.eligible);
        assert_eq!(result.missing_contribution, 2.5);
        assert_eq!(result.rule_description(), "Idade Mínima: 62 anos | Tempo Mínimo: 15 anos");
    }

    #[test]
    fn test_sentence_progression() {
        let fractions = ProgressionFractions::default();
        let cases = [
            (false, false, 16.0),
            (false, true, 20.0),
            (true, false, 40.0),
            (true, true, 60.0),
        ];
        for (heinous, repeat, pct) in cases {
            let result = sentence_progression(
                &SentenceInput { total_years: 10.0, heinous, repeat_offender: repeat },
                &fractions,
            );
            assert_eq!(result.percent, pct);
            assert_abs_diff_eq!(result.years_required, pct / 10.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_estate_with_spouse() {
        let partition = estate_partition(&EstateInput {
            assets: 500_000.0,
            debts: 100_000.0,
            spousal_share: true,
            heirs: 4,
        });
        assert_eq!(partition.net_estate, 400_000.0);
        assert_eq!(partition.spouse_share, 200_000.0);
        assert_eq!(partition.heirs_pool, 200_000.0);
        assert_eq!(partition.per_heir, 50_000.0);
    }

    #[test]
    fn test_estate_zero_heirs_treated_as_one() {
        let partition = estate_partition(&EstateInput {
            assets: 90_000.0,
            debts: 0.0,
            spousal_share: false,
            heirs: 0,
        });
        assert_eq!(partition.spouse_share, 0.0);
        assert_eq!(partition.per_heir, 90_000.0);
    }

    #[test]
    fn test_alimony() {
        let result = alimony(&AlimonyInput { income: 5_000.0, percent: 30.0, dependents: 2 });
        assert_abs_diff_eq!(result.pension, 1_500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.per_dependent, 750.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.residual_income, 3_500.0, epsilon = 1e-9);

        let none = alimony(&AlimonyInput { income: 5_000.0, percent: 30.0, dependents: 0 });
        assert_eq!(none.per_dependent, 0.0);
    }

    #[test]
    fn test_damages_estimate() {
        let ranges = DamageRanges::default();
        let grave = damages_estimate(2_000.0, Severity::from_label("grave"), &ranges);
        assert_eq!(grave.total_min, 17_000.0);
        assert_eq!(grave.total_max, 52_000.0);

        let unknown = damages_estimate(2_000.0, Severity::from_label("catastrofica"), &ranges);
        assert_eq!(unknown.moral_max, 0.0);
        assert_eq!(unknown.total_max, 2_000.0);
    }

    #[test]
    fn test_retirement_result_serde() {
        let result = retirement_eligibility(
            &RetirementInput { sex: Sex::Female, age: 60.0, contribution_years: 15.0 },
            &RetirementRules::default(),
        );
        let text = serde_json::to_string(&result).unwrap();
        let back: RetirementEligibility = serde_json::from_str(&text).unwrap();
        assert_eq!(back, result);
        assert_eq!(back.threshold.min_age, 62.0);
    }

    #[test]
    fn test_capital_distribution() {
        let partners = vec![
            Partner { name: "Ana".into(), quotas: 60_000.0 },
            Partner { name: "Bruno".into(), quotas: 40_000.0 },
        ];
        let shares = capital_distribution(100_000.0, &partners);
        assert_eq!(shares.len(), 2);
        assert_abs_diff_eq!(shares[0].percent, 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(shares[1].percent, 40.0, epsilon = 1e-9);
    }
}
