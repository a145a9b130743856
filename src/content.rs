//! Marketing content data model.
//!
//! A [`GenerationRequest`] is built from the four form fields; a
//! [`GenerationResult`] is the Markdown the oracle returned for it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Kind of marketing artifact to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    /// Full campaign concept with the six fixed sections.
    #[default]
    CampaignIdea,
    /// Persuasive advertising copy.
    AdCopy,
    /// Professional product description.
    ProductDescription,
}

impl TaskType {
    /// Returns all task types, in selector order.
    pub fn all() -> [TaskType; 3] {
        [
            TaskType::CampaignIdea,
            TaskType::AdCopy,
            TaskType::ProductDescription,
        ]
    }

    /// Returns the display label used in prompts and the CLI.
    pub fn display_name(&self) -> &'static str {
        match self {
            TaskType::CampaignIdea => "Campaign idea",
            TaskType::AdCopy => "Ad copy",
            TaskType::ProductDescription => "Product description",
        }
    }

    /// Returns the kebab-case identifier accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::CampaignIdea => "campaign-idea",
            TaskType::AdCopy => "ad-copy",
            TaskType::ProductDescription => "product-description",
        }
    }

    /// Task-specific directive appended after the input block.
    pub fn directive(&self) -> &'static str {
        match self {
            TaskType::CampaignIdea => {
                "Develop a creative marketing campaign. Use exactly these bold sections, in order: \
                 Campaign Name, Headline, Core Message, Creative Hook, Recommended Channels, Call-to-Action."
            }
            TaskType::AdCopy => {
                "Write persuasive, conversion-oriented ad copy. Tone: creative and marketing-driven. \
                 Lead with a headline, follow with body copy and close with a call-to-action."
            }
            TaskType::ProductDescription => {
                "Write a professional product description aimed at the target audience. \
                 Highlight only benefits that follow from the product details given."
            }
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TaskType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        if normalized.is_empty() {
            return Err(ValidationError::EmptyField { field: "task_type" });
        }
        match normalized.as_str() {
            "campaign-idea" | "campaign" => Ok(TaskType::CampaignIdea),
            "ad-copy" | "copy" => Ok(TaskType::AdCopy),
            "product-description" | "description" => Ok(TaskType::ProductDescription),
            _ => Err(ValidationError::UnknownTaskType(s.to_string())),
        }
    }
}

/// The four form fields for one "Generate" action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Product or service being marketed.
    pub subject: String,
    /// Target audience.
    pub audience: String,
    /// Marketing objective.
    pub objective: String,
    /// Kind of artifact requested.
    pub task_type: TaskType,
}

impl GenerationRequest {
    pub fn new(
        subject: impl Into<String>,
        audience: impl Into<String>,
        objective: impl Into<String>,
        task_type: TaskType,
    ) -> Self {
        Self {
            subject: subject.into(),
            audience: audience.into(),
            objective: objective.into(),
            task_type,
        }
    }

    /// Checks that every required field has non-whitespace content.
    ///
    /// Fields are checked in form order and the first empty one is reported.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("subject", &self.subject),
            ("audience", &self.audience),
            ("objective", &self.objective),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField { field });
            }
        }
        Ok(())
    }
}

/// Markdown produced by the oracle for a request.
///
/// Immutable once created; a refinement produces a new value that replaces
/// the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub id: Uuid,
    /// Markdown text, exactly as returned by the oracle.
    pub content: String,
    /// The request this result (or the result it refines) was generated for.
    pub source_request: GenerationRequest,
    /// Model identifier the session sent with the call.
    pub model: String,
    pub created_at: DateTime<Utc>,
}

impl GenerationResult {
    pub fn new(
        content: impl Into<String>,
        source_request: GenerationRequest,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            source_request,
            model: model.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest::new(
            "Reusable water bottle",
            "Eco-conscious students",
            "Raise brand awareness",
            TaskType::CampaignIdea,
        )
    }

    #[test]
    fn test_task_type_parsing() {
        assert_eq!("campaign-idea".parse::<TaskType>(), Ok(TaskType::CampaignIdea));
        assert_eq!("Ad_Copy".parse::<TaskType>(), Ok(TaskType::AdCopy));
        assert_eq!(
            " product description ".parse::<TaskType>(),
            Ok(TaskType::ProductDescription)
        );
        assert_eq!(
            "  ".parse::<TaskType>(),
            Err(ValidationError::EmptyField { field: "task_type" })
        );
        assert!(matches!(
            "jingle".parse::<TaskType>(),
            Err(ValidationError::UnknownTaskType(_))
        ));
    }

    #[test]
    fn test_task_type_identifiers_round_trip_through_parse() {
        for task in TaskType::all() {
            assert_eq!(task.as_str().parse::<TaskType>(), Ok(task));
        }
    }

    #[test]
    fn test_task_type_serializes_kebab_case() {
        let json = serde_json::to_string(&TaskType::ProductDescription).expect("serialize");
        assert_eq!(json, "\"product-description\"");
    }

    #[test]
    fn test_campaign_directive_lists_sections_in_order() {
        let directive = TaskType::CampaignIdea.directive();
        let sections = [
            "Campaign Name",
            "Headline",
            "Core Message",
            "Creative Hook",
            "Recommended Channels",
            "Call-to-Action",
        ];
        let positions: Vec<usize> = sections
            .iter()
            .map(|s| directive.find(s).expect("section present"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_each_empty_field_is_rejected() {
        let mut r = request();
        r.subject = "   ".to_string();
        assert_eq!(
            r.validate(),
            Err(ValidationError::EmptyField { field: "subject" })
        );

        let mut r = request();
        r.audience = String::new();
        assert_eq!(
            r.validate(),
            Err(ValidationError::EmptyField { field: "audience" })
        );

        let mut r = request();
        r.objective = "\n\t".to_string();
        assert_eq!(
            r.validate(),
            Err(ValidationError::EmptyField { field: "objective" })
        );
    }

    #[test]
    fn test_result_records_source() {
        let result = GenerationResult::new("**Headline:** Hi", request(), "test-model");
        assert_eq!(result.content, "**Headline:** Hi");
        assert_eq!(result.source_request, request());
        assert_eq!(result.model, "test-model");
    }
}
