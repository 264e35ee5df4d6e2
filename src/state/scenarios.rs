//! Conversation scenarios implementation
//!
//! This module defines the conversation flows a chat can go through:
//! registration and event creation. Each scenario is a strictly ordered
//! sequence of steps; the only backward movement is re-prompting the same
//! step when input validation fails.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::context::ConversationContext;
use crate::utils::errors::{RemindBuddyError, Result};
use crate::utils::helpers;

pub const REGISTRATION: &str = "registration";
pub const EVENT_CREATION: &str = "event_creation";

/// Represents a conversation scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario identifier
    pub id: String,
    /// Initial step when starting this scenario
    pub initial_step: String,
    /// All steps in this scenario
    pub steps: HashMap<String, ScenarioStep>,
}

/// Represents a step within a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioStep {
    /// Step identifier
    pub id: String,
    /// Possible next steps from this step
    pub next_steps: Vec<String>,
    /// Validation rules for user input at this step
    pub validation: Option<StepValidation>,
}

/// Validation rules for a scenario step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepValidation {
    /// Input type expected
    pub input_type: InputType,
    /// Minimum length (for text inputs)
    pub min_length: Option<usize>,
    /// Message shown when the input is rejected
    pub error_message: String,
}

/// Types of input expected in a step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InputType {
    Text,
    Date,
    Time,
    Choice(Vec<String>),
}

/// Scenario manager holding all conversation flow definitions
#[derive(Debug, Clone)]
pub struct ScenarioManager {
    scenarios: HashMap<String, Scenario>,
}

impl ScenarioManager {
    /// Create a new scenario manager with the default scenarios
    pub fn new() -> Self {
        let mut manager = Self {
            scenarios: HashMap::new(),
        };

        manager.register_scenario(create_registration_scenario());
        manager.register_scenario(create_event_creation_scenario());
        manager
    }

    pub fn register_scenario(&mut self, scenario: Scenario) {
        self.scenarios.insert(scenario.id.clone(), scenario);
    }

    pub fn get_scenario(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.get(id)
    }

    /// Start a scenario for a chat
    pub fn start_scenario(&self, context: &mut ConversationContext, scenario_id: &str) -> Result<()> {
        let scenario = self
            .get_scenario(scenario_id)
            .ok_or_else(|| RemindBuddyError::InvalidInput(format!("Unknown scenario: {}", scenario_id)))?;

        context.start_scenario(scenario_id, &scenario.initial_step);
        Ok(())
    }

    /// Move to the next step in a scenario, enforcing the step graph
    pub fn next_step(&self, context: &mut ConversationContext, next_step: &str) -> Result<()> {
        let scenario_id = context.scenario.clone().ok_or_else(|| {
            RemindBuddyError::InvalidStateTransition {
                from: "no_scenario".to_string(),
                to: next_step.to_string(),
            }
        })?;

        let current_step_id = context.step.clone().ok_or_else(|| {
            RemindBuddyError::InvalidStateTransition {
                from: "no_step".to_string(),
                to: next_step.to_string(),
            }
        })?;

        let scenario = self
            .get_scenario(&scenario_id)
            .ok_or_else(|| RemindBuddyError::InvalidInput(format!("Unknown scenario: {}", scenario_id)))?;

        let current_step = scenario
            .steps
            .get(&current_step_id)
            .ok_or_else(|| RemindBuddyError::InvalidInput(format!("Unknown step: {}", current_step_id)))?;

        if !current_step.next_steps.iter().any(|s| s == next_step) {
            return Err(RemindBuddyError::InvalidStateTransition {
                from: current_step_id,
                to: next_step.to_string(),
            });
        }

        if !scenario.steps.contains_key(next_step) {
            return Err(RemindBuddyError::InvalidInput(format!("Unknown step: {}", next_step)));
        }

        context.next_step(next_step)?;
        Ok(())
    }

    /// Validate user input for the current step.
    ///
    /// Only format-level validation happens here; semantic checks against
    /// the current time live in the handlers.
    pub fn validate_input(&self, context: &ConversationContext, input: &str) -> Result<()> {
        let scenario_id = context
            .scenario
            .as_ref()
            .ok_or_else(|| RemindBuddyError::InvalidInput("No active scenario".to_string()))?;

        let step_id = context
            .step
            .as_ref()
            .ok_or_else(|| RemindBuddyError::InvalidInput("No active step".to_string()))?;

        let scenario = self
            .get_scenario(scenario_id)
            .ok_or_else(|| RemindBuddyError::InvalidInput(format!("Unknown scenario: {}", scenario_id)))?;

        let step = scenario
            .steps
            .get(step_id)
            .ok_or_else(|| RemindBuddyError::InvalidInput(format!("Unknown step: {}", step_id)))?;

        if let Some(validation) = &step.validation {
            validate_against_rules(input, validation)?;
        }

        Ok(())
    }
}

fn validate_against_rules(input: &str, validation: &StepValidation) -> Result<()> {
    if let Some(min_length) = validation.min_length {
        if input.chars().count() < min_length {
            return Err(RemindBuddyError::InvalidInput(validation.error_message.clone()));
        }
    }

    match &validation.input_type {
        InputType::Text => {}
        InputType::Date => {
            if helpers::parse_event_date(input).is_none() {
                return Err(RemindBuddyError::InvalidInput(validation.error_message.clone()));
            }
        }
        InputType::Time => {
            if helpers::parse_event_time(input).is_none() {
                return Err(RemindBuddyError::InvalidInput(validation.error_message.clone()));
            }
        }
        InputType::Choice(choices) => {
            if !choices.iter().any(|c| c == input) {
                return Err(RemindBuddyError::InvalidInput(validation.error_message.clone()));
            }
        }
    }

    Ok(())
}

/// Registration: a single name prompt
fn create_registration_scenario() -> Scenario {
    let mut steps = HashMap::new();

    steps.insert(
        "name_input".to_string(),
        ScenarioStep {
            id: "name_input".to_string(),
            next_steps: vec![],
            validation: Some(StepValidation {
                input_type: InputType::Text,
                min_length: Some(2),
                error_message: "That name is too short. Please send a name of at least 2 characters:".to_string(),
            }),
        },
    );

    Scenario {
        id: REGISTRATION.to_string(),
        initial_step: "name_input".to_string(),
        steps,
    }
}

/// Event creation: name, date, time, then a closed reminder choice
fn create_event_creation_scenario() -> Scenario {
    let mut steps = HashMap::new();

    steps.insert(
        "event_name".to_string(),
        ScenarioStep {
            id: "event_name".to_string(),
            next_steps: vec!["event_date".to_string()],
            validation: Some(StepValidation {
                input_type: InputType::Text,
                min_length: Some(1),
                error_message: "Please send a name for the event:".to_string(),
            }),
        },
    );

    steps.insert(
        "event_date".to_string(),
        ScenarioStep {
            id: "event_date".to_string(),
            next_steps: vec!["event_time".to_string()],
            validation: Some(StepValidation {
                input_type: InputType::Date,
                min_length: None,
                error_message: "❌ Invalid date format. Please send it as DD-MM-YYYY\nExample: 25-12-2024".to_string(),
            }),
        },
    );

    steps.insert(
        "event_time".to_string(),
        ScenarioStep {
            id: "event_time".to_string(),
            next_steps: vec!["reminder_choice".to_string()],
            validation: Some(StepValidation {
                input_type: InputType::Time,
                min_length: None,
                error_message: "❌ Invalid time format. Please send it as HH:MM\nExample: 14:30 or 09:15".to_string(),
            }),
        },
    );

    steps.insert(
        "reminder_choice".to_string(),
        ScenarioStep {
            id: "reminder_choice".to_string(),
            next_steps: vec![],
            validation: Some(StepValidation {
                input_type: InputType::Choice(
                    crate::models::ReminderChoice::ALL_CHOICES
                        .iter()
                        .map(|c| c.callback_code().to_string())
                        .collect(),
                ),
                min_length: None,
                error_message: "Please pick one of the reminder options using the buttons.".to_string(),
            }),
        },
    );

    Scenario {
        id: EVENT_CREATION.to_string(),
        initial_step: "event_name".to_string(),
        steps,
    }
}

impl Default for ScenarioManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_creation() {
        let manager = ScenarioManager::new();

        assert!(manager.get_scenario(REGISTRATION).is_some());
        assert!(manager.get_scenario(EVENT_CREATION).is_some());
        assert!(manager.get_scenario("nonexistent").is_none());
    }

    #[test]
    fn test_registration_name_validation() {
        let manager = ScenarioManager::new();
        let mut context = ConversationContext::new(555);
        manager.start_scenario(&mut context, REGISTRATION).unwrap();

        assert!(manager.validate_input(&context, "R").is_err());
        assert!(manager.validate_input(&context, "").is_err());
        assert!(manager.validate_input(&context, "Rina").is_ok());
    }

    #[test]
    fn test_event_creation_flow() {
        let manager = ScenarioManager::new();
        let mut context = ConversationContext::new(555);

        manager.start_scenario(&mut context, EVENT_CREATION).unwrap();
        assert!(context.is_at(EVENT_CREATION, "event_name"));

        manager.next_step(&mut context, "event_date").unwrap();
        manager.next_step(&mut context, "event_time").unwrap();
        manager.next_step(&mut context, "reminder_choice").unwrap();
        assert!(context.is_at(EVENT_CREATION, "reminder_choice"));
    }

    #[test]
    fn test_no_step_skipping() {
        let manager = ScenarioManager::new();
        let mut context = ConversationContext::new(555);
        manager.start_scenario(&mut context, EVENT_CREATION).unwrap();

        // Cannot jump straight from name to time or to an unknown step
        assert!(manager.next_step(&mut context, "event_time").is_err());
        assert!(manager.next_step(&mut context, "nonexistent").is_err());
        assert!(context.is_at(EVENT_CREATION, "event_name"));
    }

    #[test]
    fn test_date_step_validation() {
        let manager = ScenarioManager::new();
        let mut context = ConversationContext::new(555);
        manager.start_scenario(&mut context, EVENT_CREATION).unwrap();
        manager.next_step(&mut context, "event_date").unwrap();

        assert!(manager.validate_input(&context, "25-12-2030").is_ok());
        assert!(manager.validate_input(&context, "2030-12-25").is_err());
        assert!(manager.validate_input(&context, "tomorrow").is_err());
    }

    #[test]
    fn test_time_step_validation() {
        let manager = ScenarioManager::new();
        let mut context = ConversationContext::new(555);
        manager.start_scenario(&mut context, EVENT_CREATION).unwrap();
        manager.next_step(&mut context, "event_date").unwrap();
        manager.next_step(&mut context, "event_time").unwrap();

        assert!(manager.validate_input(&context, "14:30").is_ok());
        assert!(manager.validate_input(&context, "14.30").is_err());
        assert!(manager.validate_input(&context, "later").is_err());
    }

    #[test]
    fn test_reminder_choice_is_closed() {
        let manager = ScenarioManager::new();
        let mut context = ConversationContext::new(555);
        manager.start_scenario(&mut context, EVENT_CREATION).unwrap();
        manager.next_step(&mut context, "event_date").unwrap();
        manager.next_step(&mut context, "event_time").unwrap();
        manager.next_step(&mut context, "reminder_choice").unwrap();

        assert!(manager.validate_input(&context, "all").is_ok());
        assert!(manager.validate_input(&context, "h12_h1").is_ok());
        assert!(manager.validate_input(&context, "every hour").is_err());
    }
}
