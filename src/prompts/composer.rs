//! Builds the text payloads sent to the oracle.
//!
//! Composition is deterministic: the same inputs always produce the same
//! payload. Validation happens here so that no oracle call is ever made for
//! rejected input.

use crate::content::{GenerationRequest, GenerationResult};
use crate::error::{ComposeError, StateError, ValidationError};

use super::system::SYSTEM_INSTRUCTION;

/// Fence placed around prior content in a refinement payload.
pub const PRIOR_RESULT_FENCE: &str = "---";

/// Closing line of an initial generation payload.
const INITIAL_CLOSING: &str = "Create a fitting marketing output for the task above.";

/// Directive that frames a refinement as an amendment of existing content.
const REVISE_DIRECTIVE: &str = "Do not start over with a new, unrelated piece. \
Keep what the feedback does not ask to change, and output the complete revised result.";

/// Validate the four form fields.
pub fn validate_request(request: &GenerationRequest) -> Result<(), ValidationError> {
    request.validate()
}

/// Render the labeled input block in fixed field order.
fn render_fields(request: &GenerationRequest) -> String {
    format!(
        "Product: {}\nTarget audience: {}\nMarketing objective: {}\nTask: {}",
        request.subject.trim(),
        request.audience.trim(),
        request.objective.trim(),
        request.task_type.display_name(),
    )
}

/// Build the payload for a first generation.
///
/// # Errors
///
/// Returns `ValidationError::EmptyField` naming the first blank field.
pub fn compose_initial(request: &GenerationRequest) -> Result<String, ValidationError> {
    validate_request(request)?;

    Ok(format!(
        "{system}\n\n<input_data>\n{fields}\n</input_data>\n\n{directive}\n\n{closing}",
        system = SYSTEM_INSTRUCTION,
        fields = render_fields(request),
        directive = request.task_type.directive(),
        closing = INITIAL_CLOSING,
    ))
}

/// Build the payload asking the oracle to revise `prior` per `instruction`.
///
/// The prior content is embedded verbatim. Whether the oracle actually
/// revises rather than rewrites is outside this crate's control.
///
/// # Errors
///
/// Returns `StateError::NoResult` when there is no prior result, checked
/// before the instruction, and `ValidationError::EmptyInstruction` for a
/// blank instruction.
pub fn compose_refinement(
    prior: Option<&GenerationResult>,
    instruction: &str,
) -> Result<String, ComposeError> {
    let prior = prior.ok_or(StateError::NoResult)?;

    let instruction = instruction.trim();
    if instruction.is_empty() {
        return Err(ValidationError::EmptyInstruction.into());
    }

    Ok(format!(
        "{system}\n\n<input_data>\n{fields}\n</input_data>\n\n\
         Here is the current result:\n{fence}\n{prior}\n{fence}\n\n\
         Revise the result above according to this feedback:\n{instruction}\n\n{revise}",
        system = SYSTEM_INSTRUCTION,
        fields = render_fields(&prior.source_request),
        fence = PRIOR_RESULT_FENCE,
        prior = prior.content,
        instruction = instruction,
        revise = REVISE_DIRECTIVE,
    ))
}
