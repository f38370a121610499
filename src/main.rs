//! Pension Estimator CLI
//!
//! Command-line front end: collects one individual's data, checks the input
//! ranges a form would enforce, and prints the estimate.

use anyhow::{bail, ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use pension_estimator::individual::load_salary_history;
use pension_estimator::rules::{load_rules, parse_birth_date};
use pension_estimator::{
    HandicapSchedule, IncapacityType, IndividualInput, PensionCalculator, RuleParameters,
    WorkplaceIncapacity,
};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Accepted target ages, as in the input form
const MIN_TARGET_AGE: f64 = 50.0;
const MAX_TARGET_AGE: f64 = 70.0;

#[derive(Debug, Parser)]
#[command(name = "pension_estimator", version, about = "French retirement pension estimator")]
struct Cli {
    /// Rule parameters JSON file (defaults to the built-in 2025 regulation)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Estimate the pension of one individual
    Estimate(EstimateArgs),
    /// Show the rules and RATH schedule resolved for a birth date
    Rules {
        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth_date: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct EstimateArgs {
    /// Read the individual from a JSON file instead of flags
    #[arg(long)]
    input: Option<PathBuf>,

    /// Birth date (YYYY-MM-DD)
    #[arg(long)]
    birth_date: Option<String>,

    /// Age at departure, in decimal years
    #[arg(long, default_value_t = 64.0)]
    target_age: f64,

    /// Validated base quarters
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    quarters: i32,

    /// Complementary scheme points
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    points: f64,

    /// Average reference salary (SAM)
    #[arg(long, allow_negative_numbers = true)]
    salary: Option<f64>,

    /// Yearly salary CSV (Year,Salary,Coefficient) used when --salary is absent
    #[arg(long)]
    salary_history: Option<PathBuf>,

    #[arg(long, default_value_t = 0)]
    children: u32,

    /// AVA caregiving quarters
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    ava: i32,

    /// AVPF parental quarters
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    avpf: i32,

    /// C2P hardship points
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    c2p_points: f64,

    /// Permanent workplace incapacity, in percent
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    incapacity_pct: f64,

    /// NONE, OCCUPATIONAL_DISEASE or WORK_ACCIDENT
    #[arg(long, default_value = "NONE")]
    incapacity_type: String,

    /// Work accident recognised after control
    #[arg(long)]
    at_control_ok: bool,

    /// 17 years of exposure (10-19% band)
    #[arg(long)]
    exposure_17_years: bool,

    /// Medical commission opinion (10-19% band)
    #[arg(long)]
    medical_opinion: bool,

    /// Commission approval (10-19% band)
    #[arg(long)]
    commission_ok: bool,

    /// Engage the handicap (RATH) track with these contributed quarters
    #[arg(long, allow_negative_numbers = true)]
    handicap_quarters: Option<i32>,

    #[arg(long)]
    long_career: bool,

    #[arg(long)]
    disability: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl EstimateArgs {
    fn to_input(&self) -> Result<IndividualInput> {
        if let Some(path) = &self.input {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            let input = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing {}", path.display()))?;
            return Ok(input);
        }

        let Some(kind) = IncapacityType::from_code(&self.incapacity_type) else {
            bail!("unknown incapacity type {:?}", self.incapacity_type);
        };

        let mut input = IndividualInput::new(self.target_age)
            .with_quarters(self.quarters)
            .with_points(self.points)
            .with_children(self.children)
            .with_caregiving(self.ava, self.avpf)
            .with_hardship_points(self.c2p_points)
            .with_incapacity(WorkplaceIncapacity {
                percent: self.incapacity_pct,
                kind,
                work_accident_control_ok: self.at_control_ok,
                exposure_17_years: self.exposure_17_years,
                medical_commission_opinion: self.medical_opinion,
                commission_approval: self.commission_ok,
            });

        if let Some(raw) = &self.birth_date {
            input = input.with_birth_date_str(raw);
        }
        if let Some(salary) = self.salary {
            input = input.with_average_salary(salary);
        }
        if let Some(path) = &self.salary_history {
            let history = load_salary_history(path)
                .with_context(|| format!("loading salary history {}", path.display()))?;
            input = input.with_salary_history(history);
        }
        if let Some(quarters) = self.handicap_quarters {
            input = input.with_handicap(quarters);
        }
        if self.long_career {
            input = input.with_long_career();
        }
        if self.disability {
            input = input.with_disability();
        }

        Ok(input)
    }
}

/// Range checks the calculator leaves to its caller
fn validate_input(input: &IndividualInput) -> Result<()> {
    ensure!(
        (MIN_TARGET_AGE..=MAX_TARGET_AGE).contains(&input.target_age),
        "target age {} outside [{}, {}]",
        input.target_age,
        MIN_TARGET_AGE,
        MAX_TARGET_AGE
    );
    ensure!(input.base_quarters >= 0, "quarters must be non-negative");
    ensure!(input.points >= 0.0, "points must be non-negative");
    ensure!(input.average_salary.unwrap_or(0.0) >= 0.0, "salary must be non-negative");
    ensure!(input.ava_quarters >= 0 && input.avpf_quarters >= 0, "AVA/AVPF quarters must be non-negative");
    ensure!(input.hardship_points >= 0.0, "C2P points must be non-negative");
    ensure!(
        (0.0..=100.0).contains(&input.incapacity.percent),
        "incapacity percentage must be within [0, 100]"
    );
    ensure!(input.handicap.contributed_quarters >= 0, "handicap quarters must be non-negative");
    Ok(())
}

#[derive(Serialize)]
struct RulesReport<'a> {
    rules: &'a RuleParameters,
    handicap_schedule: &'a HandicapSchedule,
}

fn format_age(age: f64) -> String {
    let total_months = (age * 12.0).round() as i64;
    let (years, months) = (total_months / 12, total_months % 12);
    if months == 0 {
        format!("{} years", years)
    } else {
        format!("{} years {} months", years, months)
    }
}

fn print_rules(rules: &RuleParameters) {
    println!("  Legal age:            {} ({:.2})", format_age(rules.legal_age), rules.legal_age);
    println!("  Automatic full rate:  {}", format_age(rules.full_rate_auto_age));
    println!("  Required quarters:    {}", rules.required_quarters);
    println!("  Rate:                 {:.3} .. {:.3}", rules.min_rate, rules.full_rate);
    println!(
        "  Décote:               {:.5} per quarter, max {} quarters",
        rules.decote_per_missing_quarter, rules.decote_cap_quarters
    );
    println!(
        "  Surcote:              {:.4} per quarter ({:?})",
        rules.surcote_per_extra_quarter, rules.surcote_policy
    );
    println!("  Point value:          {:.4}", rules.point_value);
    println!("  CSG:                  {:.3}", rules.csg_rate);
}

fn run_estimate(calculator: &PensionCalculator, args: &EstimateArgs) -> Result<()> {
    let input = args.to_input()?;
    validate_input(&input)?;

    let estimate = calculator.estimate(&input);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
        return Ok(());
    }
    let (rules, adjustments, result) = (&estimate.rules, &estimate.adjustments, &estimate.result);

    println!("Pension Estimator v{}", env!("CARGO_PKG_VERSION"));
    println!("========================\n");

    match input.birth_date {
        Some(date) => println!("Rules for birth date {}:", date),
        None => println!("Baseline rules (no birth date):"),
    }
    print_rules(rules);

    println!("\nAdjustments:");
    println!("  Caregiving credit:    {} quarters", adjustments.caregiving_credit);
    println!("  Hardship credit:      {} quarters", adjustments.hardship_credit);
    println!("  Effective quarters:   {}", adjustments.effective_quarters);
    println!("  Effective legal age:  {}", format_age(adjustments.effective_legal_age));
    for step in &adjustments.legal_age_steps {
        println!("    {:?} -> {:.2}", step.step, step.legal_age);
    }

    println!("\nEstimate:");
    if let Some(sam) = result.average_salary {
        println!("  Derived SAM:          {:.2}", sam);
    }
    println!("  Reference quarters:   {}", result.reference_quarters);
    println!("  Rate:                 {:.4} ({:?})", result.rate, result.rate_basis);
    println!("  Prorata:              {:.4}", result.prorata);
    println!("  Base annual:          {:.2}", result.base_annual);
    println!("  Complementary annual: {:.2}", result.complementary_annual);
    println!("  Gross annual:         {:.2}  ({:.2} / month)", result.gross_annual, result.monthly_gross());
    println!("  Net annual:           {:.2}  ({:.2} / month)", result.net_annual, result.monthly_net());

    Ok(())
}

fn run_rules(calculator: &PensionCalculator, birth_date: Option<&str>, json: bool) -> Result<()> {
    let date = birth_date.and_then(parse_birth_date);
    let rules = calculator.resolved_rules(date);
    let schedule = calculator.handicap_schedule(date);

    if json {
        let report = RulesReport {
            rules: &rules,
            handicap_schedule: &schedule,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match date {
        Some(date) => println!("Rules for birth date {}:", date),
        None => println!("Baseline rules:"),
    }
    print_rules(&rules);

    println!("\nHandicap (RATH) schedule, reference {} quarters:", schedule.full_reference);
    if schedule.is_empty() {
        println!("  (no entries: track not available for this cohort)");
    }
    for (age, quarters) in &schedule.minimum_quarters {
        println!("  From {} years: {} contributed quarters", age, quarters);
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let rules = match &cli.rules {
        Some(path) => load_rules(path).with_context(|| format!("loading rules {}", path.display()))?,
        None => RuleParameters::regulation_2025(),
    };
    let calculator = PensionCalculator::new(rules);

    match &cli.command {
        Command::Estimate(args) => run_estimate(&calculator, args),
        Command::Rules { birth_date, json } => run_rules(&calculator, birth_date.as_deref(), *json),
    }
}
