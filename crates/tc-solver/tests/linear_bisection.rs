//! Bisection against synthetic monotonic property services.

use proptest::prelude::*;
use tc_core::units::{k, pa};
use tc_fluids::{
    FluidResult, Property, PropertyService, SimpleTwoPhaseModel, Species, StateInput,
};
use tc_solver::{SolverProblem, Status, solve};

/// `H = a·T + b` at any pressure.
struct Linear {
    a: f64,
    b: f64,
}

impl PropertyService for Linear {
    fn name(&self) -> &str {
        "linear"
    }

    fn query(&self, _output: Property, input: StateInput, _fluid: Species) -> FluidResult<f64> {
        let t = input.value_of(Property::Temperature).unwrap_or(f64::NAN);
        Ok(self.a * t + self.b)
    }
}

fn linear_problem(target: f64) -> SolverProblem {
    SolverProblem::new(
        Species::Water,
        Property::Enthalpy,
        target,
        Property::Pressure,
        101_325.0,
        Property::Temperature,
        1.0,
        100.0,
    )
}

proptest! {
    #[test]
    fn converges_on_linear_functions(
        a in 0.1_f64..50.0,
        b in 1.0_f64..1000.0,
        root in 1.5_f64..99.5,
    ) {
        let service = Linear { a, b };
        let target = a * root + b;
        let solution = solve(&service, &linear_problem(target)).unwrap();

        prop_assert_eq!(solution.status, Status::Converged);
        prop_assert!(solution.iterations <= SolverProblem::DEFAULT_MAX_ITERATIONS);
        prop_assert!((solution.achieved - target).abs() / target < 1e-3);
        prop_assert!(solution.value >= 1.0 && solution.value <= 100.0);
        // |a (T - root)| < 1e-3 |target| bounds the distance to the root
        prop_assert!(
            (solution.value - root).abs() <= 1e-3 * target / a,
            "T = {}, root = {}",
            solution.value,
            root
        );
    }

    #[test]
    fn tighter_tolerance_never_takes_fewer_iterations(
        a in 0.1_f64..50.0,
        root in 1.5_f64..99.5,
    ) {
        let service = Linear { a, b: 10.0 };
        let target = a * root + 10.0;
        let loose = solve(&service, &linear_problem(target).with_tolerance(1e-2)).unwrap();
        let tight = solve(&service, &linear_problem(target).with_tolerance(1e-6)).unwrap();
        prop_assert!(tight.iterations >= loose.iterations);
    }
}

#[test]
fn inverts_enthalpy_of_superheated_propane() {
    let model = SimpleTwoPhaseModel::with_presets();
    let h = model
        .query(
            Property::Enthalpy,
            StateInput::pt(pa(6.5e5), k(345.0)),
            Species::Propane,
        )
        .unwrap();

    let problem = SolverProblem::new(
        Species::Propane,
        Property::Enthalpy,
        h,
        Property::Pressure,
        6.5e5,
        Property::Temperature,
        300.0,
        400.0,
    )
    .with_tolerance(1e-6);
    let solution = solve(&model, &problem).unwrap();
    assert!(solution.is_converged());
    assert!((solution.value - 345.0).abs() < 0.1, "T = {}", solution.value);
}
