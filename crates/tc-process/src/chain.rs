//! Fixed flash chain: throttle, flash drum, per-phase exchangers, mixer.
//!
//! ```text
//!  inlet ──► Throttle ──► FlashSeparator ─┬─ vapor ──► HeatExchanger ──┐
//!                                         └─ liquid ─► HeatExchanger ──┴─► Mixer
//! ```

use crate::error::{ProcessError, ProcessResult};
use crate::ledger::ExergyLedger;
use tc_components::{
    ComponentResult, FlashFeed, FlashOutcome, FlashSeparator, HeatBoundary, HeatExchanger,
    HeatExchangerOutcome, Mixer, MixerOutcome, Stream, Throttle, ThrottleOutcome,
};
use tc_core::DeadState;
use tc_core::units::{MassRate, Pressure, Temperature};
use tc_fluids::{PropertyService, Species};
use tracing::info;

pub const INLET: &str = "Inlet";
pub const THROTTLE: &str = "Throttle";
pub const FLASH: &str = "Flash Separator";
pub const VAPOR_EXCHANGER: &str = "Vapor Exchanger";
pub const LIQUID_HEATER: &str = "Liquid Heater";
pub const MIXER: &str = "Mixer";

/// Chain parameters. Both exchangers and the mixer run at the throttle
/// outlet pressure.
#[derive(Debug, Clone, PartialEq)]
pub struct FlashChain {
    pub fluid: Species,
    pub inlet_pressure: Pressure,
    pub inlet_temperature: Temperature,
    pub flash_pressure: Pressure,
    pub mass_flow: MassRate,
    pub vapor_target: Temperature,
    pub vapor_boundary: HeatBoundary,
    pub liquid_target: Temperature,
    pub liquid_boundary: HeatBoundary,
    pub dead_state: DeadState,
}

/// Every stage outcome plus the exergy ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainReport {
    pub inlet: Stream,
    pub throttle: ThrottleOutcome,
    pub flash: FlashOutcome,
    pub vapor_exchanger: HeatExchangerOutcome,
    pub liquid_heater: HeatExchangerOutcome,
    pub mixer: MixerOutcome,
    pub ledger: ExergyLedger,
}

fn stage<T>(component: &str, result: ComponentResult<T>) -> ProcessResult<T> {
    result.map_err(|source| ProcessError::Stage {
        component: component.to_string(),
        source,
    })
}

impl FlashChain {
    /// Run the chain once. The first failing stage aborts the run.
    pub fn run(&self, service: &dyn PropertyService) -> ProcessResult<ChainReport> {
        let inlet = stage(
            INLET,
            Stream::from_pt(
                service,
                self.fluid,
                self.inlet_pressure,
                self.inlet_temperature,
                self.mass_flow,
            ),
        )?;

        let throttle = stage(
            THROTTLE,
            Throttle::new(THROTTLE, self.flash_pressure).compute(service, &inlet),
        )?;
        info!(
            stage = THROTTLE,
            t_out = throttle.outlet.temperature.map(|t| t.value),
            quality = throttle.outlet.quality,
            "stage complete"
        );

        let flash = stage(
            FLASH,
            FlashSeparator::new(FLASH).separate(service, &FlashFeed::from_stream(&throttle.outlet)),
        )?;
        info!(
            stage = FLASH,
            m_vap = flash.vapor.mass_flow.value,
            m_liq = flash.liquid.mass_flow.value,
            "stage complete"
        );

        let vapor_exchanger = stage(
            VAPOR_EXCHANGER,
            HeatExchanger::new(VAPOR_EXCHANGER, self.vapor_target, self.vapor_boundary)
                .compute(service, &flash.vapor),
        )?;
        info!(stage = VAPOR_EXCHANGER, q_w = vapor_exchanger.heat_duty.value, "stage complete");

        let liquid_heater = stage(
            LIQUID_HEATER,
            HeatExchanger::new(LIQUID_HEATER, self.liquid_target, self.liquid_boundary)
                .compute(service, &flash.liquid),
        )?;
        info!(stage = LIQUID_HEATER, q_w = liquid_heater.heat_duty.value, "stage complete");

        let mixer = stage(
            MIXER,
            Mixer::new(MIXER, self.flash_pressure).compute(
                service,
                &vapor_exchanger.outlet,
                &liquid_heater.outlet,
            ),
        )?;
        info!(
            stage = MIXER,
            t_out = mixer.outlet.temperature.map(|t| t.value),
            "stage complete"
        );

        let mut ledger = ExergyLedger::new(self.dead_state);
        ledger.record(&throttle);
        ledger.record(&flash);
        ledger.record(&vapor_exchanger);
        ledger.record(&liquid_heater);
        ledger.record(&mixer);

        Ok(ChainReport {
            inlet,
            throttle,
            flash,
            vapor_exchanger,
            liquid_heater,
            mixer,
            ledger,
        })
    }
}
