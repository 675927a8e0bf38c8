//! What-if scenarios for a closed trade.
//!
//! The catalog is a fixed table; each entry perturbs one parameter of the
//! original trade and the P&L is recomputed with the same formula:
//! `pl = exit_value - entry_value - commission`, `percentage = pl / entry_value * 100`,
//! where the entry value follows the scenario's quantity.

use crate::domain::error::TradelensError;
use crate::domain::trade::Trade;
use crate::domain::trade_analysis::TradeAnalysis;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    Duration,
    RiskManagement,
    PositionSizing,
}

/// Parameters after the perturbation has been applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perturbed {
    pub exit_price: f64,
    pub quantity: f64,
    pub commission: f64,
}

pub struct ScenarioTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ScenarioKind,
    pub adjustment: &'static str,
    pub perturb: fn(&Trade) -> Perturbed,
}

pub static SCENARIO_CATALOG: [ScenarioTemplate; 7] = [
    ScenarioTemplate {
        id: "longer-hold",
        name: "Hold 2 Extra Days",
        description: "Position held for two more days",
        kind: ScenarioKind::Duration,
        adjustment: "+2 days",
        perturb: |t| Perturbed {
            exit_price: t.exit_price * 1.015,
            quantity: t.quantity,
            commission: t.commission,
        },
    },
    ScenarioTemplate {
        id: "strict-stop-loss",
        name: "Strict Stop-Loss (-2%)",
        description: "Tighter stop-loss at 2% below entry",
        kind: ScenarioKind::RiskManagement,
        adjustment: "-2%",
        perturb: |t| Perturbed {
            exit_price: t.entry_price * 0.98,
            quantity: t.quantity,
            commission: t.commission,
        },
    },
    ScenarioTemplate {
        id: "higher-take-profit",
        name: "Higher Take-Profit (+3%)",
        description: "More ambitious profit target at 3% above entry",
        kind: ScenarioKind::RiskManagement,
        adjustment: "+3%",
        perturb: |t| Perturbed {
            exit_price: t.entry_price * 1.03,
            quantity: t.quantity,
            commission: t.commission,
        },
    },
    ScenarioTemplate {
        id: "smaller-position",
        name: "Smaller Position (50%)",
        description: "Half the original position size",
        kind: ScenarioKind::PositionSizing,
        adjustment: "50% size",
        perturb: |t| Perturbed {
            exit_price: t.exit_price,
            quantity: t.quantity * 0.5,
            commission: t.commission * 0.5,
        },
    },
    ScenarioTemplate {
        id: "larger-position",
        name: "Larger Position (150%)",
        description: "Position 50% larger than the original",
        kind: ScenarioKind::PositionSizing,
        adjustment: "150% size",
        perturb: |t| Perturbed {
            exit_price: t.exit_price,
            quantity: t.quantity * 1.5,
            commission: t.commission * 1.5,
        },
    },
    ScenarioTemplate {
        id: "wide-stop-loss",
        name: "Wide Stop-Loss (-5%)",
        description: "Looser stop-loss at 5% below entry",
        kind: ScenarioKind::RiskManagement,
        adjustment: "-5%",
        perturb: |t| Perturbed {
            exit_price: t.entry_price * 0.95,
            quantity: t.quantity,
            commission: t.commission,
        },
    },
    ScenarioTemplate {
        id: "early-exit",
        name: "Early Exit (50% duration)",
        description: "Exit halfway through the holding period",
        kind: ScenarioKind::Duration,
        adjustment: "50% duration",
        perturb: |t| Perturbed {
            exit_price: t.entry_price + (t.exit_price - t.entry_price) / 2.0,
            quantity: t.quantity,
            commission: t.commission,
        },
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioParams {
    pub exit_price: f64,
    pub quantity: f64,
    pub commission: f64,
    pub adjustment: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResults {
    pub pl: f64,
    pub percentage: f64,
    pub exit_value: f64,
    pub commission: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub kind: ScenarioKind,
    pub params: ScenarioParams,
    pub results: ScenarioResults,
}

impl ScenarioTemplate {
    pub fn apply(&self, trade: &Trade) -> Scenario {
        let p = (self.perturb)(trade);
        let entry_value = trade.entry_price * p.quantity;
        let exit_value = p.exit_price * p.quantity;
        let pl = exit_value - entry_value - p.commission;

        Scenario {
            id: self.id,
            name: self.name,
            description: self.description,
            kind: self.kind,
            params: ScenarioParams {
                exit_price: p.exit_price,
                quantity: p.quantity,
                commission: p.commission,
                adjustment: self.adjustment,
            },
            results: ScenarioResults {
                pl,
                percentage: pl / entry_value * 100.0,
                exit_value,
                commission: p.commission,
            },
        }
    }
}

/// All seven scenarios, in catalog order.
pub fn generate_alternative_scenarios(trade: &Trade) -> Result<Vec<Scenario>, TradelensError> {
    trade.validate()?;
    Ok(SCENARIO_CATALOG.iter().map(|template| template.apply(trade)).collect())
}

/// How a scenario compares with what actually happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDelta {
    pub id: &'static str,
    pub diff: f64,
    pub percent_diff: f64,
    pub is_better: bool,
}

pub fn compare_scenarios(actual: &TradeAnalysis, scenarios: &[Scenario]) -> Vec<ScenarioDelta> {
    scenarios
        .iter()
        .map(|s| {
            let diff = s.results.pl - actual.net_pl;
            ScenarioDelta {
                id: s.id,
                diff,
                percent_diff: s.results.percentage - actual.pl_percentage,
                is_better: diff > 0.0,
            }
        })
        .collect()
}

/// Scenario with the highest P&L; the first one wins ties.
pub fn best_scenario(scenarios: &[Scenario]) -> Option<&Scenario> {
    scenarios.iter().fold(None, |best: Option<&Scenario>, s| match best {
        Some(b) if b.results.pl >= s.results.pl => Some(b),
        _ => Some(s),
    })
}
