//! Yearly projection records and multi-year summaries

use serde::{Deserialize, Serialize};

use super::streams::RevenueStreams;

/// Per-unit ratio that reads `0` for an empty network instead of NaN/inf
pub fn per_unit(amount: f64, units: f64) -> f64 {
    if units == 0.0 {
        0.0
    } else {
        amount / units
    }
}

/// Projection output for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearProjection {
    /// Projection year (1-indexed)
    pub year_index: u32,
    /// Operating units after growth, churn and openings
    pub units: u64,

    // Network totals (not franchisor income)
    pub system_sales: f64,
    pub marketing_levy_collected: f64,

    // Itemized franchisor income
    pub royalty_income: f64,
    pub initial_fees: f64,
    pub renewal_fees: f64,
    pub transfer_fees: f64,
    pub training_income: f64,
    pub tech_income: f64,
    pub support_income: f64,
    pub supply_chain_income: f64,
    pub msp_income: f64,
    pub marketing_income: f64,
    pub master_franchise_fees: f64,
    pub master_override_income: f64,

    // Totals
    pub gross_revenue: f64,
    pub total_costs: f64,
    pub net_profit: f64,
    pub revenue_per_unit: f64,
}

impl YearProjection {
    pub fn new(
        year_index: u32,
        units: u64,
        system_sales: f64,
        marketing_levy_collected: f64,
        streams: RevenueStreams,
        total_costs: f64,
    ) -> Self {
        let gross_revenue = streams.total();
        Self {
            year_index,
            units,
            system_sales,
            marketing_levy_collected,
            royalty_income: streams.royalty_income,
            initial_fees: streams.initial_fees,
            renewal_fees: streams.renewal_fees,
            transfer_fees: streams.transfer_fees,
            training_income: streams.training_income,
            tech_income: streams.tech_income,
            support_income: streams.support_income,
            supply_chain_income: streams.supply_chain_income,
            msp_income: streams.msp_income,
            marketing_income: streams.marketing_income,
            master_franchise_fees: streams.master_franchise_fees,
            master_override_income: streams.master_override_income,
            gross_revenue,
            total_costs,
            net_profit: gross_revenue - total_costs,
            revenue_per_unit: per_unit(gross_revenue, units as f64),
        }
    }

    /// The itemized streams of this year
    pub fn streams(&self) -> RevenueStreams {
        RevenueStreams {
            royalty_income: self.royalty_income,
            initial_fees: self.initial_fees,
            renewal_fees: self.renewal_fees,
            transfer_fees: self.transfer_fees,
            training_income: self.training_income,
            tech_income: self.tech_income,
            support_income: self.support_income,
            supply_chain_income: self.supply_chain_income,
            msp_income: self.msp_income,
            marketing_income: self.marketing_income,
            master_franchise_fees: self.master_franchise_fees,
            master_override_income: self.master_override_income,
        }
    }

    /// Net profit as a percentage of gross revenue (0 when there is no revenue)
    pub fn profit_margin_pct(&self) -> f64 {
        if self.gross_revenue == 0.0 {
            0.0
        } else {
            self.net_profit / self.gross_revenue * 100.0
        }
    }

    /// Non-zero streams with labels, largest first
    pub fn revenue_breakdown(&self) -> Vec<(&'static str, f64)> {
        let mut items: Vec<_> = self
            .streams()
            .labelled()
            .into_iter()
            .filter(|(_, amount)| *amount != 0.0)
            .collect();
        items.sort_by(|a, b| b.1.total_cmp(&a.1));
        items
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// One record per projection year, ascending
    pub years: Vec<YearProjection>,
}

impl ProjectionResult {
    pub fn new() -> Self {
        Self { years: Vec::new() }
    }

    pub fn with_capacity(years: usize) -> Self {
        Self {
            years: Vec::with_capacity(years),
        }
    }

    /// Add a year record
    pub fn add_year(&mut self, year: YearProjection) {
        self.years.push(year);
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Record for a 1-indexed projection year
    pub fn year(&self, year_index: u32) -> Option<&YearProjection> {
        year_index
            .checked_sub(1)
            .and_then(|i| self.years.get(i as usize))
    }

    pub fn into_years(self) -> Vec<YearProjection> {
        self.years
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_gross_revenue: f64 = self.years.iter().map(|y| y.gross_revenue).sum();
        let total_costs: f64 = self.years.iter().map(|y| y.total_costs).sum();
        let total_net_profit: f64 = self.years.iter().map(|y| y.net_profit).sum();
        let total_unit_years: f64 = self.years.iter().map(|y| y.units as f64).sum();

        let first_revenue = self.years.first().map(|y| y.gross_revenue).unwrap_or(0.0);
        let last_revenue = self.years.last().map(|y| y.gross_revenue).unwrap_or(0.0);

        ProjectionSummary {
            total_years: self.years.len() as u32,
            total_gross_revenue,
            total_costs,
            total_net_profit,
            avg_annual_growth_pct: compound_growth_pct(first_revenue, last_revenue, self.years.len()),
            final_year_units: self.years.last().map(|y| y.units).unwrap_or(0),
            avg_revenue_per_unit: per_unit(total_gross_revenue, total_unit_years),
        }
    }
}

impl Default for ProjectionResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Compound annual growth (percent) from the first to the last of `years` values.
///
/// Zero when fewer than two years or when the growth rate is undefined.
fn compound_growth_pct(first: f64, last: f64, years: usize) -> f64 {
    if years < 2 || first <= 0.0 || last < 0.0 {
        return 0.0;
    }
    ((last / first).powf(1.0 / (years - 1) as f64) - 1.0) * 100.0
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub total_years: u32,
    pub total_gross_revenue: f64,
    pub total_costs: f64,
    pub total_net_profit: f64,
    pub avg_annual_growth_pct: f64,
    pub final_year_units: u64,
    /// Gross revenue per unit-year over the whole horizon
    pub avg_revenue_per_unit: f64,
}
