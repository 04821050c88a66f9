//! Property checks for the quadrature and the exergy ledger.

use proptest::prelude::*;
use tc_components::ExergyBalance;
use tc_core::units::{MassRate, k, kgps, m3, pa, s};
use tc_core::{DeadState, Tolerances, nearly_equal};
use tc_fluids::Species;
use tc_process::integrate::simpson;
use tc_process::tank::DEFAULT_INTERVALS;
use tc_process::{ExergyLedger, FillingTank, MassFlowSchedule};

struct Fixed {
    name: String,
    s_gen: f64,
}

impl ExergyBalance for Fixed {
    fn name(&self) -> &str {
        &self.name
    }

    fn entropy_generation(&self, _dead_state: &DeadState) -> f64 {
        self.s_gen
    }

    fn mass_in(&self) -> MassRate {
        kgps(1.0)
    }

    fn mass_out(&self) -> MassRate {
        kgps(1.0)
    }
}

fn tank(initial_kgps: f64, final_kgps: f64, fill_time: f64) -> FillingTank {
    FillingTank {
        fluid: Species::N2,
        volume: m3(0.8),
        initial_pressure: pa(150.0e3),
        initial_temperature: k(310.0),
        supply_pressure: pa(1.8e6),
        supply_temperature: k(420.0),
        fill_time: s(fill_time),
        schedule: MassFlowSchedule::Linear {
            initial_kgps,
            final_kgps,
        },
        intervals: DEFAULT_INTERVALS,
        dead_state: DeadState::default(),
    }
}

proptest! {
    #[test]
    fn simpson_is_exact_for_cubics(
        c in prop::array::uniform4(-5.0_f64..5.0),
        length in 0.1_f64..10.0,
        intervals in 1_usize..50,
    ) {
        let f = |t: f64| c[0] + c[1] * t + c[2] * t * t + c[3] * t * t * t;
        let terms = [
            c[0] * length,
            c[1] * length.powi(2) / 2.0,
            c[2] * length.powi(3) / 3.0,
            c[3] * length.powi(4) / 4.0,
        ];
        let exact: f64 = terms.iter().sum();
        let scale: f64 = terms.iter().map(|t| t.abs()).sum();

        let v = simpson(f, 0.0, length, intervals).unwrap();
        prop_assert!((v - exact).abs() <= 1e-10 * scale + 1e-12, "{} vs {}", v, exact);
    }

    #[test]
    fn linear_schedule_adds_mean_rate_times_duration(
        initial in 0.0_f64..0.1,
        last in 0.0_f64..0.1,
        duration in 1.0_f64..3600.0,
    ) {
        let dm = tank(initial, last, duration).mass_added().unwrap().value;
        let expected = 0.5 * (initial + last) * duration;
        prop_assert!((dm - expected).abs() <= 1e-9 * expected.max(1.0));
    }

    #[test]
    fn ledger_total_is_the_sum_of_entries(
        s_gens in prop::collection::vec(-1.0_f64..10.0, 1..8),
    ) {
        let dead_state = DeadState::default();
        let t0 = dead_state.t0().value;
        let mut ledger = ExergyLedger::new(dead_state);
        for (i, s_gen) in s_gens.iter().enumerate() {
            let recorded = ledger.record(&Fixed {
                name: format!("op{i}"),
                s_gen: *s_gen,
            });
            prop_assert!(nearly_equal(recorded.value, t0 * s_gen, Tolerances::default()));
        }

        let sum: f64 = ledger.entries().iter().map(|e| e.exergy_destroyed.value).sum();
        prop_assert_eq!(ledger.total().value, sum);
        prop_assert_eq!(ledger.len(), s_gens.len());

        let dominant = ledger.dominant().unwrap();
        for entry in ledger.entries() {
            prop_assert!(entry.exergy_destroyed <= dominant.exergy_destroyed);
        }

        let negative = s_gens.iter().filter(|s| t0 * **s < -1e-6).count();
        prop_assert_eq!(ledger.second_law_violations(1e-6).len(), negative);
    }
}
