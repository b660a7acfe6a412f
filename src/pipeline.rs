use crate::dosing::DoseCommand;
use crate::error::PKResult;
use crate::interpreter::CommandInterpreter;
use crate::models::ParameterSource;
use crate::output::{package_curve, ChartDescriptor};
use crate::resolver::{ParameterResolver, Resolution};
use crate::simulation::Simulator;
use log::info;

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub command: DoseCommand,
    pub resolution: Resolution,
    pub chart: ChartDescriptor,
}

/// Text command in, chart out. One command is handled completely before
/// the next one is accepted.
pub struct Pipeline<'a> {
    interpreter: CommandInterpreter<'a>,
    resolver: ParameterResolver<'a>,
    simulator: Simulator,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        interpreter: CommandInterpreter<'a>,
        resolver: ParameterResolver<'a>,
        simulator: Simulator,
    ) -> Self {
        Self {
            interpreter,
            resolver,
            simulator,
        }
    }

    pub fn run(&self, text: &str) -> PKResult<PipelineOutcome> {
        let command = self.interpreter.interpret(text)?;

        let resolution = match command.parameters {
            Some(params) => Resolution {
                params,
                source: ParameterSource::Command,
            },
            None => self.resolver.resolve(&command.drug_name),
        };

        let series = self.simulator.simulate(command.dose, &resolution.params)?;
        info!(
            "Simulated {} points for '{}' (Cmax {:.4} mg/L)",
            series.len(),
            command.drug_name,
            series.max_concentration()
        );

        let chart = package_curve(
            series,
            &command.drug_name,
            command.dose,
            &command.unit,
            resolution.source,
        );

        Ok(PipelineOutcome {
            command,
            resolution,
            chart,
        })
    }
}
