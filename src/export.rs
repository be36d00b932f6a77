//! Tabular export of a projection
//!
//! An export carries the inputs it was projected from and the yearly table.
//! Columns and input blocks follow the toggles: cost and profit columns only
//! with cost modeling on, optional-stream columns and their input blocks only
//! when that stream is switched on.

use std::io::Write;

use csv::WriterBuilder;

use crate::params::{BusinessParameters, FeatureToggles, TechCost};
use crate::projection::YearProjection;

/// A titled block of `label, value` input rows
#[derive(Debug, Clone, PartialEq)]
pub struct InputSection {
    pub title: &'static str,
    pub rows: Vec<(&'static str, f64)>,
}

impl InputSection {
    fn new(title: &'static str, rows: Vec<(&'static str, f64)>) -> Self {
        Self { title, rows }
    }

    /// Value of a labelled row in this block
    pub fn value(&self, label: &str) -> Option<f64> {
        self.rows.iter().find(|(l, _)| *l == label).map(|(_, v)| *v)
    }
}

/// Input blocks exported for a parameter set, in display order
pub fn input_sections(params: &BusinessParameters, toggles: &FeatureToggles) -> Vec<InputSection> {
    let mut sections = vec![
        InputSection::new(
            "Franchise Network Profile",
            vec![
                ("Current Franchise Units", params.starting_units as f64),
                ("New Units Per Year", params.new_units_per_year as f64),
                ("Average Franchise Term (years)", params.franchise_term_years),
                ("Growth Rate (%)", params.growth_rate_pct),
                ("Churn Rate (%)", params.churn_rate_pct),
                ("Projection Duration (years)", params.projection_years as f64),
            ],
        ),
        InputSection::new(
            "Financial Parameters",
            vec![
                ("Average Gross Sales per Unit", params.avg_annual_sales_per_unit),
                ("Royalty Percentage (%)", params.royalty_rate_pct),
                ("Marketing Levy (%)", params.marketing_levy_pct),
                ("Initial Franchise Fee", params.initial_franchise_fee),
                ("Renewal Fee", params.renewal_fee),
                ("Transfer Fee", params.transfer_fee),
                ("Resale Frequency (years)", params.resale_frequency_years),
                ("Technology Fee (Monthly)", params.monthly_tech_fee),
                ("Support Fee (Monthly)", params.monthly_support_fee),
                ("Training Fee (Initial)", params.initial_training_fee),
                ("Training Fee (Recurring)", params.recurring_training_fee),
            ],
        ),
    ];

    if toggles.include_supply_chain {
        let supply = &params.supply_chain;
        sections.push(InputSection::new(
            "Supply Chain",
            vec![
                ("Annual Supply Chain Spend per Unit", supply.annual_supply_spend_per_unit),
                ("Supply Chain Margin (%)", supply.supply_margin_pct),
            ],
        ));
    }
    if toggles.include_msp {
        let msp = &params.msp;
        sections.push(InputSection::new(
            "Management Services",
            vec![
                ("MSP Fee (Monthly)", msp.monthly_msp_fee),
                ("Annual MSP Services per Unit", msp.annual_msp_services_per_unit),
            ],
        ));
    }
    if toggles.include_master_franchise {
        let master = &params.master_franchise;
        sections.push(InputSection::new(
            "Master Franchise",
            vec![
                ("Number of Master Territories", master.territory_count as f64),
                ("Franchisor Share of Royalty (%)", master.franchisor_royalty_share_pct),
                ("Franchisor Share of Initial Fees (%)", master.franchisor_initial_fee_share_pct),
                ("Master Franchise Fee", master.master_franchise_fee_per_territory),
                ("Master Override (%)", master.master_ongoing_override_pct),
            ],
        ));
    }
    if toggles.include_operating_costs {
        let costs = &params.costs;
        let tech = match costs.tech_cost {
            TechCost::FlatAnnual(amount) => ("Technology Costs (Annual)", amount),
            TechCost::PerUnitMonthly(amount) => ("Technology Costs (Monthly per Unit)", amount),
        };
        sections.push(InputSection::new(
            "Operating Costs",
            vec![
                ("Staff Costs (Annual)", costs.annual_staff_cost),
                ("Recruitment Cost per New Franchisee", costs.per_new_unit_recruitment_cost),
                ("Training Delivery Cost", costs.per_new_unit_training_cost),
                tech,
                ("Legal & Compliance Costs", costs.annual_legal_cost),
                ("Marketing Fund Admin Overhead", costs.annual_marketing_admin_cost),
            ],
        ));
    }

    sections
}

/// One export column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Year,
    Units,
    GrossRevenue,
    OperatingCosts,
    NetProfit,
    ProfitMarginPct,
    RoyaltyIncome,
    InitialFees,
    RenewalFees,
    TrainingIncome,
    TechIncome,
    SupportIncome,
    TransferFees,
    SupplyChainIncome,
    MspIncome,
    MarketingIncome,
    MasterFranchiseFees,
    MasterOverrideIncome,
    RevenuePerUnit,
}

impl Column {
    pub fn header(&self) -> &'static str {
        match self {
            Column::Year => "Year",
            Column::Units => "Units",
            Column::GrossRevenue => "Total Annual Revenue",
            Column::OperatingCosts => "Operating Costs",
            Column::NetProfit => "Net Profit",
            Column::ProfitMarginPct => "Profit Margin (%)",
            Column::RoyaltyIncome => "Royalty Income",
            Column::InitialFees => "Initial Franchise Fees",
            Column::RenewalFees => "Renewal Fees",
            Column::TrainingIncome => "Training Fees",
            Column::TechIncome => "Technology Fees",
            Column::SupportIncome => "Admin/Support Fees",
            Column::TransferFees => "Transfer Fees",
            Column::SupplyChainIncome => "Supply Chain Income",
            Column::MspIncome => "MSP Income",
            Column::MarketingIncome => "Marketing Levy Income",
            Column::MasterFranchiseFees => "Master Franchise Fees",
            Column::MasterOverrideIncome => "Master Override Income",
            Column::RevenuePerUnit => "Revenue Per Unit",
        }
    }

    /// Numeric value of this column for a year
    pub fn value(&self, year: &YearProjection) -> f64 {
        match self {
            Column::Year => year.year_index as f64,
            Column::Units => year.units as f64,
            Column::GrossRevenue => year.gross_revenue,
            Column::OperatingCosts => year.total_costs,
            Column::NetProfit => year.net_profit,
            Column::ProfitMarginPct => year.profit_margin_pct(),
            Column::RoyaltyIncome => year.royalty_income,
            Column::InitialFees => year.initial_fees,
            Column::RenewalFees => year.renewal_fees,
            Column::TrainingIncome => year.training_income,
            Column::TechIncome => year.tech_income,
            Column::SupportIncome => year.support_income,
            Column::TransferFees => year.transfer_fees,
            Column::SupplyChainIncome => year.supply_chain_income,
            Column::MspIncome => year.msp_income,
            Column::MarketingIncome => year.marketing_income,
            Column::MasterFranchiseFees => year.master_franchise_fees,
            Column::MasterOverrideIncome => year.master_override_income,
            Column::RevenuePerUnit => year.revenue_per_unit,
        }
    }

    /// Cell text: year label, whole units, one-decimal margin, cents elsewhere
    pub fn format(&self, year: &YearProjection) -> String {
        match self {
            Column::Year => format!("Year {}", year.year_index),
            Column::Units => year.units.to_string(),
            Column::ProfitMarginPct => format!("{:.1}", year.profit_margin_pct()),
            other => format!("{:.2}", other.value(year)),
        }
    }
}

/// Columns exported for a toggle configuration, in display order
pub fn columns(toggles: &FeatureToggles) -> Vec<Column> {
    let mut cols = vec![Column::Year, Column::Units, Column::GrossRevenue];

    if toggles.include_operating_costs {
        cols.extend([Column::OperatingCosts, Column::NetProfit, Column::ProfitMarginPct]);
    }

    cols.extend([
        Column::RoyaltyIncome,
        Column::InitialFees,
        Column::RenewalFees,
        Column::TrainingIncome,
        Column::TechIncome,
        Column::SupportIncome,
        Column::TransferFees,
    ]);

    if toggles.include_supply_chain {
        cols.push(Column::SupplyChainIncome);
    }
    if toggles.include_msp {
        cols.push(Column::MspIncome);
    }
    if toggles.include_marketing_levy_as_income {
        cols.push(Column::MarketingIncome);
    }
    if toggles.include_master_franchise {
        cols.extend([Column::MasterFranchiseFees, Column::MasterOverrideIncome]);
    }

    cols.push(Column::RevenuePerUnit);
    cols
}

/// A projection and its inputs laid out for export sinks
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub inputs: Vec<InputSection>,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<f64>>,
}

impl ExportTable {
    pub fn build(
        params: &BusinessParameters,
        toggles: &FeatureToggles,
        years: &[YearProjection],
    ) -> Self {
        let columns = columns(toggles);
        let rows = years
            .iter()
            .map(|y| columns.iter().map(|c| c.value(y)).collect())
            .collect();
        Self {
            inputs: input_sections(params, toggles),
            columns,
            rows,
        }
    }

    /// Input block by title, `None` if it is not exported
    pub fn input_section(&self, title: &str) -> Option<&InputSection> {
        self.inputs.iter().find(|s| s.title == title)
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(Column::header).collect()
    }

    /// Numeric cell by row and column, `None` if the column is not exported
    pub fn cell(&self, row: usize, column: Column) -> Option<f64> {
        let col = self.columns.iter().position(|c| *c == column)?;
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }
}

/// Write the inputs and the projection table as CSV.
///
/// Layout: an `INPUT PARAMETERS` section of titled label/value blocks, a blank
/// record, then `FINANCIAL PROJECTIONS` with the header and one row per year.
pub fn write_csv<W: Write>(
    writer: W,
    params: &BusinessParameters,
    toggles: &FeatureToggles,
    years: &[YearProjection],
) -> Result<(), csv::Error> {
    let columns = columns(toggles);
    let mut csv_writer = WriterBuilder::new().flexible(true).from_writer(writer);

    csv_writer.write_record(["INPUT PARAMETERS"])?;
    for (i, section) in input_sections(params, toggles).iter().enumerate() {
        if i > 0 {
            csv_writer.write_record([""])?;
        }
        csv_writer.write_record([section.title])?;
        for (label, value) in &section.rows {
            csv_writer.write_record([label.to_string(), value.to_string()])?;
        }
    }

    csv_writer.write_record([""])?;
    csv_writer.write_record(["FINANCIAL PROJECTIONS"])?;
    csv_writer.write_record(columns.iter().map(Column::header))?;
    for year in years {
        csv_writer.write_record(columns.iter().map(|c| c.format(year)))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::BusinessParameters;
    use crate::projection::project;

    #[test]
    fn test_minimal_columns() {
        let headers: Vec<_> = columns(&FeatureToggles::default()).iter().map(Column::header).collect();
        assert_eq!(
            headers,
            vec![
                "Year",
                "Units",
                "Total Annual Revenue",
                "Royalty Income",
                "Initial Franchise Fees",
                "Renewal Fees",
                "Training Fees",
                "Technology Fees",
                "Admin/Support Fees",
                "Transfer Fees",
                "Revenue Per Unit",
            ]
        );
    }

    #[test]
    fn test_conditional_columns() {
        let all = columns(&FeatureToggles::all());
        assert_eq!(all.len(), 19);
        assert_eq!(all[3], Column::OperatingCosts);
        assert_eq!(all.last(), Some(&Column::RevenuePerUnit));

        let costs_only = columns(&FeatureToggles {
            include_operating_costs: true,
            ..Default::default()
        });
        assert!(costs_only.contains(&Column::NetProfit));
        assert!(!costs_only.contains(&Column::MspIncome));

        let master_only = columns(&FeatureToggles {
            include_master_franchise: true,
            ..Default::default()
        });
        assert!(master_only.contains(&Column::MasterFranchiseFees));
        assert!(master_only.contains(&Column::MasterOverrideIncome));
        assert!(!master_only.contains(&Column::ProfitMarginPct));
    }

    #[test]
    fn test_table_matches_projection() {
        let toggles = FeatureToggles::all();
        let params = BusinessParameters::default();
        let years = project(&params, &toggles).unwrap().into_years();
        let table = ExportTable::build(&params, &toggles, &years);

        assert_eq!(table.rows.len(), years.len());
        assert_eq!(table.headers().len(), table.columns.len());
        assert_eq!(table.cell(0, Column::Units), Some(35.0));
        assert_eq!(table.cell(2, Column::NetProfit), Some(years[2].net_profit));
        assert_eq!(table.cell(0, Column::Year), Some(1.0));
    }

    #[test]
    fn test_write_csv() {
        let toggles = FeatureToggles::default();
        let params = BusinessParameters {
            projection_years: 2,
            ..Default::default()
        };
        let years = project(&params, &toggles).unwrap().into_years();

        let mut buf = Vec::new();
        write_csv(&mut buf, &params, &toggles, &years).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "INPUT PARAMETERS");
        assert_eq!(lines[1], "Franchise Network Profile");
        assert_eq!(lines[2], "Current Franchise Units,25");
        assert!(lines.contains(&"Royalty Percentage (%),6.5"));
        assert!(!lines.contains(&"Operating Costs"));

        let start = lines
            .iter()
            .position(|l| *l == "FINANCIAL PROJECTIONS")
            .expect("projection section");
        assert_eq!(lines.len(), start + 4);
        assert!(lines[start + 1].starts_with("Year,Units,Total Annual Revenue,Royalty Income"));
        assert!(lines[start + 2].starts_with("Year 1,35,"));
        assert!(lines[start + 3].starts_with("Year 2,47,"));
    }

    #[test]
    fn test_input_sections_follow_toggles() {
        let params = BusinessParameters::default();
        let titles = |toggles: &FeatureToggles| -> Vec<&'static str> {
            input_sections(&params, toggles).iter().map(|s| s.title).collect()
        };

        assert_eq!(
            titles(&FeatureToggles::default()),
            vec!["Franchise Network Profile", "Financial Parameters"]
        );
        assert_eq!(
            titles(&FeatureToggles::all()),
            vec![
                "Franchise Network Profile",
                "Financial Parameters",
                "Supply Chain",
                "Management Services",
                "Master Franchise",
                "Operating Costs",
            ]
        );

        let master_only = FeatureToggles {
            include_master_franchise: true,
            ..Default::default()
        };
        let table = ExportTable::build(&params, &master_only, &[]);
        let master = table.input_section("Master Franchise").expect("master block");
        assert_eq!(master.value("Number of Master Territories"), Some(3.0));
        assert_eq!(master.value("Franchisor Share of Royalty (%)"), Some(40.0));
        assert!(table.input_section("Supply Chain").is_none());
        assert!(table.input_section("Operating Costs").is_none());
    }

    #[test]
    fn test_write_csv_gated_blocks() {
        let params = BusinessParameters {
            projection_years: 1,
            ..Default::default()
        };
        let render = |toggles: &FeatureToggles| {
            let years = project(&params, toggles).unwrap().into_years();
            let mut buf = Vec::new();
            write_csv(&mut buf, &params, toggles, &years).unwrap();
            String::from_utf8(buf).unwrap()
        };

        let costs_on = render(&FeatureToggles {
            include_operating_costs: true,
            ..Default::default()
        });
        assert!(costs_on.contains("\nOperating Costs\n"));
        assert!(costs_on.contains("Staff Costs (Annual),250000\n"));
        assert!(costs_on.contains("Technology Costs (Annual),50000\n"));
        assert!(!costs_on.contains("\nSupply Chain\n"));

        let supply_on = render(&FeatureToggles {
            include_supply_chain: true,
            ..Default::default()
        });
        assert!(supply_on.contains("\nSupply Chain\n"));
        assert!(supply_on.contains("Supply Chain Margin (%),12\n"));
        assert!(!supply_on.contains("\nOperating Costs\n"));
    }
}
