//! Hearing schedule optimization.
//!
//! The model assigns hearings to slots; the result must contain exactly one entry per
//! schedulable hearing, i.e. `min(pendingHearings, availableSlots)` entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dashboard::Tab;
use crate::flows::{Flow, FlowError};
use crate::schema::{optional, required, Schema};

const TEMPLATE: &str = r#"You are CourtIQ Scheduling Optimizer. Organize the following pending hearings into {{availableSlots}} slots to maximize court efficiency:

Hearings:
{{#each pendingHearings}}- {{this.caseTitle}} (Complexity: {{this.complexity}}{{#if this.estimatedDuration}}, Estimated Duration: {{this.estimatedDuration}}{{/if}})
{{/each}}
1. Create an optimized schedule with exactly {{scheduleCount}} entries, one per scheduled hearing, each with a recommended slot time and a positive number of allotted minutes.
2. Forecast the efficiency gain from this arrangement.
3. Estimate the reduction in idle court time."#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingHearing {
    pub case_title: String,
    pub complexity: Complexity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarInput {
    pub pending_hearings: Vec<PendingHearing>,
    pub available_slots: u32,
}

impl CalendarInput {
    /// Number of hearings that fit into the available slots.
    pub fn schedule_count(&self) -> usize {
        self.pending_hearings
            .len()
            .min(self.available_slots as usize)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledHearing {
    pub case_title: String,
    pub recommended_slot_time: String,
    pub allotted_minutes: f64,
    pub priority_reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarPlan {
    pub optimized_schedule: Vec<ScheduledHearing>,
    pub efficiency_gain_forecast: String,
    pub idle_time_reduction: String,
}

pub struct OptimizeCalendar;

impl Flow for OptimizeCalendar {
    type Input = CalendarInput;
    type Output = CalendarPlan;

    const NAME: &'static str = "optimizeCalendar";
    const PATH: &'static str = "optimize-calendar";
    const TAB: Tab = Tab::Calendar;
    const TEMPLATE: &'static str = TEMPLATE;

    fn input_schema() -> Schema {
        Schema::object([
            required(
                "pendingHearings",
                Schema::array(Schema::object([
                    required("caseTitle", Schema::string().non_empty()),
                    required("complexity", Schema::enumeration(&["Low", "Medium", "High"])),
                    optional("estimatedDuration", Schema::string()),
                ])),
            ),
            required("availableSlots", Schema::integer().positive())
                .describe("Number of available hearing slots."),
        ])
    }

    fn output_schema() -> Schema {
        Schema::object([
            required(
                "optimizedSchedule",
                Schema::array(Schema::object([
                    required("caseTitle", Schema::string()),
                    required("recommendedSlotTime", Schema::string().non_empty()),
                    required("allottedMinutes", Schema::number().positive()),
                    required("priorityReason", Schema::string()),
                ])),
            ),
            required("efficiencyGainForecast", Schema::string()),
            required("idleTimeReduction", Schema::string()),
        ])
    }

    fn context(input: &Self::Input) -> Result<Value, FlowError> {
        let mut context = serde_json::to_value(input)?;
        if let Value::Object(map) = &mut context {
            map.insert("scheduleCount".to_string(), input.schedule_count().into());
        }
        Ok(context)
    }

    fn check_output(input: &Self::Input, output: &Self::Output) -> Result<(), FlowError> {
        let expected = input.schedule_count();
        let actual = output.optimized_schedule.len();
        if actual != expected {
            return Err(FlowError::Rejected(format!(
                "expected {expected} scheduled hearings, got {actual}"
            )));
        }
        Ok(())
    }
}
