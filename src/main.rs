//! fincalc CLI
//!
//! Demo driver for the calculation engine: prices a reference bond and
//! option set, projects an annuity and a 401k, runs a Monte Carlo
//! retirement simulation, and evaluates a cash-flow series (built-in or
//! loaded from CSV) for NPV/IRR/payback.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use fincalc::portfolio::{portfolio_risk_metrics, PortfolioAsset};
use fincalc::products::{
    defined_benefit_pension, defined_contribution_projection, fixed_annuity, term_life_premium,
    SurvivorElection,
};
use fincalc::valuation::{calculate_ddm, dcf_valuation, payback_period};
use fincalc::{
    efficient_frontier, internal_rate_of_return, net_present_value, price_bond, price_option,
    simulate_portfolio, Health, OptionContract, OptionType, RateSpec,
};

#[derive(Parser)]
#[command(name = "fincalc", about = "Financial calculation engine demo")]
struct Args {
    /// Monte Carlo trial count
    #[arg(long, default_value_t = 10_000)]
    simulations: u32,

    /// Simulation seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Optional cash-flow CSV (header `period,amount`; period 0 is the
    /// initial outlay as a negative amount)
    #[arg(long)]
    cashflows: Option<PathBuf>,

    /// Emit the summary as JSON instead of the console report
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct SummaryReport {
    generated_at: String,
    bond_price: f64,
    call_price: f64,
    put_price: f64,
    annuity_monthly_payment: f64,
    db_annual_benefit: f64,
    dc_projected_balance: f64,
    term_life_annual_premium: f64,
    ddm_intrinsic_value: Option<f64>,
    dcf_enterprise_value: Option<f64>,
    irr_pct: f64,
    irr_converged: bool,
    npv_at_10pct: f64,
    payback_years: Option<f64>,
    monte_carlo_median: f64,
    monte_carlo_probability_of_loss: f64,
    frontier_points: usize,
    execution_time_ms: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    // Cash-flow series: caller-supplied CSV or the built-in example
    let (initial_outlay, flows) = match &args.cashflows {
        Some(path) => load_cashflow_series(path)?,
        None => (10_000.0, vec![3_000.0, 4_000.0, 4_500.0, 5_000.0]),
    };

    let npv = net_present_value(initial_outlay, &flows, 10.0);
    let irr = internal_rate_of_return(initial_outlay, &flows)?;
    let payback = payback_period(initial_outlay, &flows);

    // Reference calculations across the engine
    let bond = price_bond(1_000.0, 5.0, 10.0, 5.0, 2)?;

    let atm_contract = OptionContract {
        spot: 100.0,
        strike: 100.0,
        time_to_maturity_years: 1.0,
        risk_free_rate: 0.05,
        volatility: 0.2,
        option_type: OptionType::Call,
    };
    let call = price_option(&atm_contract)?;
    let put = price_option(&OptionContract {
        option_type: OptionType::Put,
        ..atm_contract
    })?;

    let annuity_rate = RateSpec::new(4.5, 12)?;
    let annuity = fixed_annuity(250_000.0, annuity_rate.annual_rate_pct, 55, 65, false, Health::Average)?;
    let pension = defined_benefit_pension(95_000.0, 28.0, 62, SurvivorElection::Half)?;
    let dc = defined_contribution_projection(120_000.0, 15_000.0, 50.0, 7.0, 45, 65)?;
    let life = term_life_premium(750_000.0, 42, 20, false, Health::Excellent)?;

    let ddm = calculate_ddm(2.40, 4.0, 9.0);
    let dcf = dcf_valuation(1_200_000.0, 6.0, 5, 9.5, 2.5);

    let simulation = simulate_portfolio(500_000.0, 7.0, 14.0, 25, args.simulations, args.seed)?;

    let assets = demo_assets();
    let frontier = efficient_frontier(&assets)?;
    let risk = portfolio_risk_metrics(500_000.0, 7.0, 14.0, 1.05, 3.0, 8.0, 95)?;

    let report = SummaryReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        bond_price: bond.price,
        call_price: call.price,
        put_price: put.price,
        annuity_monthly_payment: annuity.monthly_payment,
        db_annual_benefit: pension.annual_benefit,
        dc_projected_balance: dc.projected_balance,
        term_life_annual_premium: life.annual_premium,
        ddm_intrinsic_value: ddm.intrinsic_value,
        dcf_enterprise_value: dcf.enterprise_value,
        irr_pct: irr.rate * 100.0,
        irr_converged: irr.converged,
        npv_at_10pct: npv,
        payback_years: payback,
        monte_carlo_median: simulation.median,
        monte_carlo_probability_of_loss: simulation.probability_of_loss,
        frontier_points: frontier.len(),
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("fincalc v0.1.0");
    println!("==============\n");

    println!("Cash-flow series ({} periods after outlay {:.2}):", flows.len(), initial_outlay);
    println!("  NPV @ 10%:     {:>12.2}", npv);
    println!(
        "  IRR:           {:>11.4}%{}",
        irr.rate * 100.0,
        if irr.converged { "" } else { "  (did not converge)" }
    );
    match payback {
        Some(years) => println!("  Payback:       {:>11.2} years", years),
        None => println!("  Payback:       never recovered"),
    }
    println!();

    println!("Reference bond (1000 face, 5% coupon, 10y, 5% yield, semiannual):");
    println!("  Price:         {:>12.2}", bond.price);
    println!("  Macaulay dur:  {:>12.4}", bond.macaulay_duration);
    println!("  Convexity:     {:>12.4}", bond.convexity);
    println!();

    println!("ATM option (S=K=100, T=1y, r=5%, vol=20%):");
    println!("  Call / Put:    {:>8.4} / {:.4}", call.price, put.price);
    println!("  Call delta:    {:>12.4}", call.delta);
    println!();

    println!("Products:");
    println!(
        "  Annuity pays   {:>12.2}/mo for {:.1} years ({:.2}% effective)",
        annuity.monthly_payment,
        annuity.payout_years,
        annuity_rate.effective_annual() * 100.0
    );
    println!("  DB pension:    {:>12.2}/yr ({}% early reduction)", pension.annual_benefit, pension.early_reduction_pct * 100.0);
    println!("  401k at 65:    {:>12.2}", dc.projected_balance);
    println!("  Term life:     {:>12.2}/yr", life.annual_premium);
    println!();

    println!("Monte Carlo ({} trials, seed {}):", args.simulations, args.seed);
    println!("  Median:        {:>12.2}", simulation.median);
    println!("  P10 / P90:     {:>12.2} / {:.2}", simulation.percentile_10, simulation.percentile_90);
    println!("  P(loss):       {:>12.4}", simulation.probability_of_loss);
    println!("  Sharpe:        {:>12.4}", risk.sharpe_ratio);
    println!();

    // Write the annuity schedule and frontier to CSV for inspection
    write_annuity_schedule("annuity_schedule.csv", &annuity)?;
    write_frontier("frontier.csv", &frontier)?;
    println!("Schedules written to: annuity_schedule.csv, frontier.csv");

    Ok(())
}

fn demo_assets() -> Vec<PortfolioAsset> {
    let mut bond_correlations = std::collections::HashMap::new();
    bond_correlations.insert("stocks".to_string(), -0.1);

    vec![
        PortfolioAsset {
            name: "bonds".to_string(),
            expected_return: 4.0,
            std_dev: 6.0,
            correlations: bond_correlations,
        },
        PortfolioAsset {
            name: "stocks".to_string(),
            expected_return: 9.5,
            std_dev: 17.0,
            correlations: std::collections::HashMap::new(),
        },
        PortfolioAsset {
            name: "reits".to_string(),
            expected_return: 7.0,
            std_dev: 14.0,
            correlations: std::collections::HashMap::new(),
        },
    ]
}

/// Load `period,amount` rows; period 0 is the initial outlay (negative)
fn load_cashflow_series(path: &PathBuf) -> anyhow::Result<(f64, Vec<f64>)> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut initial_outlay = 0.0;
    let mut flows = Vec::new();

    for result in reader.records() {
        let record = result?;
        let period: u32 = record[0].parse()?;
        let amount: f64 = record[1].parse()?;

        if period == 0 {
            initial_outlay = -amount;
        } else {
            flows.push(amount);
        }
    }

    anyhow::ensure!(!flows.is_empty(), "cash-flow file has no periods past 0");
    Ok((initial_outlay, flows))
}

fn write_annuity_schedule(
    path: &str,
    annuity: &fincalc::AnnuityProjection,
) -> anyhow::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "Period,Age,Payment,CumulativePaid,RemainingBalance")?;
    for row in &annuity.schedule {
        writeln!(
            file,
            "{},{},{:.2},{:.2},{:.2}",
            row.period, row.age, row.payment, row.cumulative_paid, row.remaining_balance
        )?;
    }
    Ok(())
}

fn write_frontier(
    path: &str,
    frontier: &[fincalc::portfolio::FrontierPoint],
) -> anyhow::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "TargetReturn,AchievedReturn,StdDev")?;
    for point in frontier {
        writeln!(
            file,
            "{:.4},{:.4},{:.4}",
            point.target_return, point.achieved_return, point.std_dev
        )?;
    }
    Ok(())
}
