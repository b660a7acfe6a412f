//! Free text → [`DoseCommand`], trying the parsing service first and the
//! local grammar second.

pub mod extract;
pub mod grammar;

use crate::dosing::DoseCommand;
use crate::error::{PKError, PKResult};
use crate::fallback::{run_chain, Attempt, ChainOutcome, Stage};
use crate::services::CommandParsingService;
use crate::validation::validate_dose_record;
use log::info;

pub use extract::extract_json_object;

/// Asks the parsing service and validates whatever object it returns.
pub struct ServiceStage<'a> {
    service: &'a dyn CommandParsingService,
}

impl<'a> ServiceStage<'a> {
    pub fn new(service: &'a dyn CommandParsingService) -> Self {
        Self { service }
    }
}

impl Stage<str, DoseCommand> for ServiceStage<'_> {
    fn name(&self) -> &str {
        "parsing service"
    }

    fn attempt(&self, text: &str) -> Attempt<DoseCommand> {
        let response = match self.service.complete(text) {
            Ok(response) => response,
            Err(e) => return Attempt::Unavailable(e),
        };

        let record = match extract_json_object(&response) {
            Ok(record) => record,
            Err(e) => return Attempt::Unavailable(e),
        };

        // The service answered with a usable object: its verdict stands,
        // unless required fields are simply missing.
        match validate_dose_record(&record) {
            Ok(command) => Attempt::Resolved(command),
            Err(e @ PKError::MalformedRecord(_)) => Attempt::Unavailable(e),
            Err(e) => Attempt::Rejected(e),
        }
    }
}

/// Deterministic `(show me|plot) <drug> at <dose> mg` grammar.
pub struct GrammarStage;

impl Stage<str, DoseCommand> for GrammarStage {
    fn name(&self) -> &str {
        "local grammar"
    }

    fn attempt(&self, text: &str) -> Attempt<DoseCommand> {
        match grammar::parse_command(text).and_then(|record| validate_dose_record(&record)) {
            Ok(command) => Attempt::Resolved(command),
            Err(e @ PKError::UnrecognizedCommand(_)) => Attempt::Unavailable(e),
            Err(e) => Attempt::Rejected(e),
        }
    }
}

pub struct CommandInterpreter<'a> {
    service: Option<ServiceStage<'a>>,
}

impl<'a> CommandInterpreter<'a> {
    pub fn new(service: Option<&'a dyn CommandParsingService>) -> Self {
        Self {
            service: service.map(ServiceStage::new),
        }
    }

    /// Local grammar only.
    pub fn offline() -> Self {
        Self { service: None }
    }

    pub fn interpret(&self, text: &str) -> PKResult<DoseCommand> {
        let mut stages: Vec<&dyn Stage<str, DoseCommand>> = Vec::with_capacity(2);
        if let Some(service) = &self.service {
            stages.push(service);
        }
        stages.push(&GrammarStage);

        match run_chain(&stages, text) {
            ChainOutcome::Resolved { value, stage } => {
                info!(
                    "Parsed drug '{}' at {} {} via {}",
                    value.drug_name, value.dose, value.unit, stage
                );
                Ok(value)
            }
            ChainOutcome::Rejected { error, .. } => Err(error),
            ChainOutcome::Exhausted { .. } => Err(PKError::UnrecognizedCommand(format!(
                "'{}'. {}",
                text.trim(),
                grammar::USAGE
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::Cell;

    struct StubService {
        response: PKResult<String>,
        calls: Cell<usize>,
    }

    impl StubService {
        fn replying(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
                calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                response: Err(PKError::ServiceUnavailable("timed out".to_string())),
                calls: Cell::new(0),
            }
        }
    }

    impl CommandParsingService for StubService {
        fn complete(&self, _command: &str) -> PKResult<String> {
            self.calls.set(self.calls.get() + 1);
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(PKError::ServiceUnavailable(e.to_string())),
            }
        }
    }

    #[test]
    fn test_grammar_when_service_unavailable() {
        let service = StubService::failing();
        let interpreter = CommandInterpreter::new(Some(&service));

        let command = interpreter.interpret("show me metformin at 500 mg").unwrap();
        assert_eq!(command.drug_name, "metformin");
        assert_relative_eq!(command.dose, 500.0);
        assert_eq!(command.unit, "mg");
        assert!(command.parameters.is_none());
        assert_eq!(service.calls.get(), 1);
    }

    #[test]
    fn test_offline_multi_word_drug() {
        let command = CommandInterpreter::offline()
            .interpret("plot wellbutrin xl at 300 mg")
            .unwrap();
        assert_eq!(command.drug_name, "wellbutrin xl");
        assert_relative_eq!(command.dose, 300.0);
    }

    #[test]
    fn test_service_result_takes_priority() {
        // Service reads the dose in micrograms; grammar would have said 500 mg
        let service = StubService::replying(r#"{"drug": "Metformin", "dosage": 500, "unit": "ug"}"#);
        let command = CommandInterpreter::new(Some(&service))
            .interpret("show me metformin at 500 mg")
            .unwrap();
        assert_relative_eq!(command.dose, 0.5);
    }

    #[test]
    fn test_service_with_embedded_parameters() {
        let service = StubService::replying(
            r#"Here you go: {"drug": "metformin", "dosage": 500, "unit": "mg", "Vd": 100, "Ka": 0.5, "ke": 0.0693}"#,
        );
        let command = CommandInterpreter::new(Some(&service))
            .interpret("metformin 500mg")
            .unwrap();
        let params = command.parameters.unwrap();
        assert_relative_eq!(params.vd(), 100.0);
    }

    #[test]
    fn test_invalid_service_values_are_terminal() {
        let service = StubService::replying(r#"{"drug": "metformin", "dosage": 500, "unit": "kg"}"#);
        assert!(matches!(
            CommandInterpreter::new(Some(&service)).interpret("show me metformin at 500 mg"),
            Err(PKError::UnsupportedUnit(_))
        ));

        let service = StubService::replying(r#"{"drug": "metformin", "dosage": -1, "unit": "mg"}"#);
        assert!(matches!(
            CommandInterpreter::new(Some(&service)).interpret("show me metformin at 500 mg"),
            Err(PKError::NonPositiveParameter { .. })
        ));
    }

    #[test]
    fn test_malformed_service_output_falls_back() {
        for reply in [
            "",
            "Sorry, I can't help with that.",
            r#"{"drug": "metformin", "extra": {"nested": true}} trailing"#,
            r#"{"drug": "metformin"}"#,
        ] {
            let service = StubService::replying(reply);
            let command = CommandInterpreter::new(Some(&service))
                .interpret("plot metformin at 750 mg")
                .unwrap();
            assert_relative_eq!(command.dose, 750.0);
            assert_eq!(service.calls.get(), 1);
        }
    }

    #[test]
    fn test_unrecognized_when_everything_fails() {
        let service = StubService::failing();
        assert!(matches!(
            CommandInterpreter::new(Some(&service)).interpret("what is the weather"),
            Err(PKError::UnrecognizedCommand(_))
        ));
        assert!(matches!(
            CommandInterpreter::offline().interpret("metformin please"),
            Err(PKError::UnrecognizedCommand(_))
        ));
    }

    #[test]
    fn test_grammar_zero_dose_rejected() {
        assert!(matches!(
            CommandInterpreter::offline().interpret("plot metformin at 0 mg"),
            Err(PKError::NonPositiveParameter { .. })
        ));
    }
}
