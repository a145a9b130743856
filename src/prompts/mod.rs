//! Prompt composition for marketing content generation.
//!
//! - [`system`] - the fixed system instruction (role, style, required sections)
//! - [`composer`] - initial and refinement payload builders
//!
//! ```
//! use campaign_forge::content::{GenerationRequest, TaskType};
//! use campaign_forge::prompts::compose_initial;
//!
//! let request = GenerationRequest::new(
//!     "Reusable water bottle",
//!     "Eco-conscious students",
//!     "Raise brand awareness",
//!     TaskType::CampaignIdea,
//! );
//! let payload = compose_initial(&request).expect("all fields present");
//! assert!(payload.contains("Product: Reusable water bottle"));
//! ```

pub mod composer;
pub mod system;

pub use composer::{compose_initial, compose_refinement, validate_request, PRIOR_RESULT_FENCE};
pub use system::SYSTEM_INSTRUCTION;
