use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tc_fluids::{Property, PropertyService, SimpleTwoPhaseModel, Species, StateInput};
use tc_process::{
    ChainConfig, CounterflowConfig, CounterflowReport, Scenario, TankConfig, load_scenario,
    save_scenario,
};
use tc_solver::{Evaluation, IterationEvent, SolverProblem, Status, solve_with_progress};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "tc-cli")]
#[command(
    about = "thermochain CLI - property lookups, bisection solves and exergy scenarios",
    long_about = None
)]
struct Cli {
    /// Property backend
    #[arg(long, value_enum, global = true, default_value_t = Backend::default())]
    backend: Backend,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Closed-form two-phase model (a handful of fluids)
    Analytic,
    /// CoolProp through rfluids
    Coolprop,
}

impl Default for Backend {
    fn default() -> Self {
        if cfg!(feature = "coolprop") {
            Backend::Coolprop
        } else {
            Backend::Analytic
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one property from an input pair
    #[command(allow_negative_numbers = true)]
    Props {
        /// Output property code (T, P, H, S, D, U, Q)
        property: String,
        in1_type: String,
        in1_value: f64,
        in2_type: String,
        in2_value: f64,
        #[arg(default_value = "Water")]
        fluid: String,
    },
    /// Bisect on one property until another reaches a target
    #[command(allow_negative_numbers = true)]
    Solve {
        target_prop: String,
        target_value: f64,
        known_prop: String,
        known_value: f64,
        unknown_prop: String,
        min_guess: f64,
        max_guess: f64,
        #[arg(default_value = "Water")]
        fluid: String,
        #[arg(default_value_t = SolverProblem::DEFAULT_TOLERANCE)]
        tolerance: f64,
        #[arg(long, default_value_t = SolverProblem::DEFAULT_MAX_ITERATIONS)]
        max_iterations: usize,
    },
    /// Throttle, flash drum, exchangers and mixer with an exergy ledger
    Chain {
        #[command(flatten)]
        scenario: ScenarioArgs,
        #[arg(long)]
        fluid: Option<String>,
        /// Flash drum pressure [Pa]
        #[arg(long)]
        flash_pressure: Option<f64>,
        /// Feed mass flow [kg/s]
        #[arg(long)]
        mass_flow: Option<f64>,
    },
    /// Pinch placement and exergy analysis of a counterflow exchanger
    Counterflow {
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Minimum approach temperature [K]
        #[arg(long)]
        dt_min: Option<f64>,
        /// Hot-side mass flow [kg/s]
        #[arg(long)]
        hot_flow: Option<f64>,
        /// Cold-side mass flow [kg/s]
        #[arg(long)]
        cold_flow: Option<f64>,
    },
    /// Fill a rigid insulated tank from a supply line
    Tank {
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Tank volume [m^3]
        #[arg(long)]
        volume: Option<f64>,
        /// Fill duration [s]
        #[arg(long)]
        fill_time: Option<f64>,
    },
}

#[derive(Args)]
struct ScenarioArgs {
    /// Scenario YAML file (defaults to the reference case)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the effective scenario to this YAML file
    #[arg(long)]
    save: Option<PathBuf>,
}

impl ScenarioArgs {
    fn load<T: Scenario + Default>(&self) -> CliResult<T> {
        match &self.config {
            Some(path) => Ok(load_scenario(path)?),
            None => Ok(T::default()),
        }
    }

    fn finish<T: Scenario>(&self, scenario: &T) -> CliResult<()> {
        if let Some(path) = &self.save {
            save_scenario(path, scenario)?;
            println!("Scenario written to {}", path.display());
        }
        Ok(())
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let service = backend(cli.backend)?;
    let service = service.as_ref();
    tracing::debug!(backend = service.name(), "property backend ready");

    match cli.command {
        Commands::Props {
            property,
            in1_type,
            in1_value,
            in2_type,
            in2_value,
            fluid,
        } => cmd_props(
            service,
            &property,
            (&in1_type, in1_value),
            (&in2_type, in2_value),
            &fluid,
        ),
        Commands::Solve {
            target_prop,
            target_value,
            known_prop,
            known_value,
            unknown_prop,
            min_guess,
            max_guess,
            fluid,
            tolerance,
            max_iterations,
        } => {
            let problem = SolverProblem::new(
                Species::from_str(&fluid)?,
                parse_property(&target_prop)?,
                target_value,
                parse_property(&known_prop)?,
                known_value,
                parse_property(&unknown_prop)?,
                min_guess,
                max_guess,
            )
            .with_tolerance(tolerance)
            .with_max_iterations(max_iterations);
            cmd_solve(service, &problem)
        }
        Commands::Chain {
            scenario,
            fluid,
            flash_pressure,
            mass_flow,
        } => {
            let mut config: ChainConfig = scenario.load()?;
            if let Some(fluid) = fluid {
                config.fluid = fluid;
            }
            if let Some(p) = flash_pressure {
                config.flash_pressure_pa = p;
            }
            if let Some(m) = mass_flow {
                config.mass_flow_kgps = m;
            }
            cmd_chain(service, &config)?;
            scenario.finish(&config)
        }
        Commands::Counterflow {
            scenario,
            dt_min,
            hot_flow,
            cold_flow,
        } => {
            let mut config: CounterflowConfig = scenario.load()?;
            if let Some(dt) = dt_min {
                config.dt_min_k = dt;
            }
            if let Some(m) = hot_flow {
                config.hot.mass_flow_kgps = m;
            }
            if let Some(m) = cold_flow {
                config.cold.mass_flow_kgps = m;
            }
            cmd_counterflow(service, &config)?;
            scenario.finish(&config)
        }
        Commands::Tank {
            scenario,
            volume,
            fill_time,
        } => {
            let mut config: TankConfig = scenario.load()?;
            if let Some(v) = volume {
                config.volume_m3 = v;
            }
            if let Some(t) = fill_time {
                config.fill_time_s = t;
            }
            cmd_tank(service, &config)?;
            scenario.finish(&config)
        }
    }
}

fn backend(choice: Backend) -> CliResult<Box<dyn PropertyService>> {
    match choice {
        Backend::Analytic => Ok(Box::new(SimpleTwoPhaseModel::with_presets())),
        #[cfg(feature = "coolprop")]
        Backend::Coolprop => Ok(Box::new(tc_fluids::CoolPropService::new())),
        #[cfg(not(feature = "coolprop"))]
        Backend::Coolprop => Err("tc-cli was built without the `coolprop` feature".into()),
    }
}

fn parse_property(code: &str) -> CliResult<Property> {
    Ok(Property::from_str(code)?)
}

fn cmd_props(
    service: &dyn PropertyService,
    property: &str,
    (in1_type, in1_value): (&str, f64),
    (in2_type, in2_value): (&str, f64),
    fluid: &str,
) -> CliResult<()> {
    let lookup = || -> CliResult<f64> {
        let input = StateInput::new(
            parse_property(in1_type)?,
            in1_value,
            parse_property(in2_type)?,
            in2_value,
        );
        let species = Species::from_str(fluid)?;
        Ok(service.query(parse_property(property)?, input, species)?)
    };

    match lookup() {
        Ok(value) => {
            println!(
                "{property} at {in1_type}={in1_value}, {in2_type}={in2_value} for {fluid}: {value}"
            );
            Ok(())
        }
        Err(e) => Err(format!(
            "{e}\nMake sure '{fluid}' is a valid fluid name for the {} backend.\nCommon fluids: {}",
            service.name(),
            Species::common_names()
        )
        .into()),
    }
}

fn cmd_solve(service: &dyn PropertyService, problem: &SolverProblem) -> CliResult<()> {
    let unknown = problem.unknown;
    let target = problem.target;
    println!(
        "Solving for {unknown} where {target} = {} at {} = {} for {}",
        problem.target_value, problem.known, problem.known_value, problem.fluid
    );
    println!("Search range: {} to {}", problem.low, problem.high);
    println!(
        "Tolerance: {}, Max iterations: {}",
        problem.tolerance, problem.max_iterations
    );
    println!("{}", "-".repeat(60));

    let mut print_iteration = |event: &IterationEvent<'_>| match event.evaluation {
        Evaluation::Value {
            actual,
            relative_error,
        } => println!(
            "Iter {:2}: {unknown} = {:10.3} -> {target} = {:10.3} (target: {:10.3}, error: {:.6})",
            event.iteration, event.guess, actual, problem.target_value, relative_error
        ),
        Evaluation::Failed(e) => println!(
            "Iter {:2}: {unknown} = {:10.3} -> ERROR: {e}",
            event.iteration, event.guess
        ),
    };
    let solution = solve_with_progress(service, problem, Some(&mut print_iteration))?;

    println!("{}", "-".repeat(60));
    match solution.status {
        Status::Converged => println!("✓ Converged! {unknown} = {:.6}", solution.value),
        Status::MaxIterations => {
            println!("⚠ Maximum iterations reached without convergence!");
            println!("  Final {unknown} = {:.6}", solution.value);
        }
    }
    let error = (solution.achieved - problem.target_value).abs() / problem.target_value.abs();
    println!(
        "  Final {target} = {:.6} (target: {:.6})",
        solution.achieved, problem.target_value
    );
    println!("  Final error: {error:.8}");
    println!("  Iterations: {}", solution.iterations);
    println!("\nSolution: {unknown} = {:.6}", solution.value);
    Ok(())
}

fn cmd_chain(service: &dyn PropertyService, config: &ChainConfig) -> CliResult<()> {
    let chain = config.build()?;
    println!(
        "Flash chain: {} at {:.1} K / {:.0} Pa -> {:.0} Pa, {:.3} kg/s ({} backend)",
        chain.fluid,
        chain.inlet_temperature.value,
        chain.inlet_pressure.value,
        chain.flash_pressure.value,
        chain.mass_flow.value,
        service.name()
    );
    let report = chain.run(service)?;

    let throttle = &report.throttle.outlet;
    println!("\nStages:");
    println!(
        "  Throttle outlet:   T = {}  x = {}",
        fmt_temperature(throttle.temperature.map(|t| t.value)),
        throttle
            .quality
            .map_or_else(|| "n/a".to_string(), |x| format!("{x:.4}"))
    );
    println!(
        "  Flash split:       vapor {:.4} kg/s, liquid {:.4} kg/s",
        report.flash.vapor.mass_flow.value, report.flash.liquid.mass_flow.value
    );
    println!(
        "  Vapor exchanger:   Q = {:>12.1} W",
        report.vapor_exchanger.heat_duty.value
    );
    println!(
        "  Liquid heater:     Q = {:>12.1} W",
        report.liquid_heater.heat_duty.value
    );
    println!(
        "  Mixer outlet:      T = {}  h = {:.1} J/kg",
        fmt_temperature(report.mixer.outlet.temperature.map(|t| t.value)),
        report.mixer.outlet.enthalpy
    );

    println!(
        "\nExergy destruction (T0 = {:.2} K):",
        report.ledger.dead_state().t0().value
    );
    for entry in report.ledger.entries() {
        println!(
            "  {:<18} {:>12.2} W   (S_gen {:.4} W/K)",
            entry.component, entry.exergy_destroyed.value, entry.entropy_generation
        );
    }
    println!("  {:<18} {:>12.2} W", "Total", report.ledger.total().value);
    if let Some(dominant) = report.ledger.dominant() {
        println!("  Dominant irreversibility: {}", dominant.component);
    }
    let violations = report
        .ledger
        .second_law_violations(tc_process::ledger::DEFAULT_AUDIT_TOLERANCE_W);
    for entry in violations {
        println!("  ⚠ {} shows negative exergy destruction", entry.component);
    }
    Ok(())
}

fn fmt_temperature(t: Option<f64>) -> String {
    t.map_or_else(|| "n/a".to_string(), |t| format!("{t:.2} K"))
}

fn cmd_counterflow(service: &dyn PropertyService, config: &CounterflowConfig) -> CliResult<()> {
    let exchanger = config.build()?;
    println!(
        "Counterflow: hot {} {:.1} K, cold {} {:.1} K, dTmin = {:.1} K",
        exchanger.hot.fluid,
        exchanger.hot.inlet_temperature.value,
        exchanger.cold.fluid,
        exchanger.cold.inlet_temperature.value,
        exchanger.dt_min.value
    );
    let report = exchanger.evaluate(service)?;
    print_counterflow(&report);
    Ok(())
}

fn print_counterflow(report: &CounterflowReport) {
    println!("  m_h/m_c = {:.4}", report.mass_flow_ratio);
    for case in &report.cases {
        println!("\n  {}: {}", case.case, case.feasibility);
        println!(
            "    T_h,out = {}  T_c,out = {}",
            fmt_temperature(case.hot_outlet_temperature.map(|t| t.value)),
            fmt_temperature(case.cold_outlet_temperature.map(|t| t.value))
        );
        if let Some(approach) = case.approach {
            println!("    approach = {:.2} K", approach.value);
        }
        if let Some(mu) = case.implied_mass_flow_ratio {
            println!("    implied m_h/m_c = {mu:.4}");
        }
    }

    match &report.analysis {
        Some(a) => {
            println!("\n  Selected: {}", a.case);
            println!("    T_b,H = {:.2} K", a.hot_boundary_temperature.value);
            println!("    T_b,C = {:.2} K", a.cold_boundary_temperature.value);
            println!("    Q     = {:.1} W", a.heat_rate.value);
            println!(
                "    X_dest = {:.1} W (entropy check {:.1} W)",
                a.exergy_destruction.value, a.exergy_check.value
            );
            match a.exergetic_efficiency {
                Some(eta) => println!("    eta_II = {eta:.4}"),
                None => println!("    eta_II = n/a"),
            }
        }
        None => println!("\n  No feasible pinch placement; analysis skipped."),
    }
}

fn cmd_tank(service: &dyn PropertyService, config: &TankConfig) -> CliResult<()> {
    let tank = config.build()?;
    println!(
        "Filling tank: {} {:.3} m^3 from {:.0} Pa / {:.1} K over {:.0} s",
        tank.fluid,
        tank.volume.value,
        tank.supply_pressure.value,
        tank.supply_temperature.value,
        tank.fill_time.value
    );
    let report = tank.fill(service)?;
    for (label, state) in [("Initial", &report.initial), ("Final", &report.final_state)] {
        println!(
            "  {label:<8} m = {:.4} kg  T = {:.2} K  P = {:.0} Pa  Xi = {:.1} J",
            state.mass.value, state.temperature.value, state.pressure.value, state.stored_exergy
        );
    }
    println!("  Mass added:          {:.4} kg", report.mass_added.value);
    println!("  Inlet flow exergy:   {:.1} J/kg", report.inlet_flow_exergy);
    println!("  Exergy destroyed:    {:.1} J", report.exergy_destroyed);
    Ok(())
}
