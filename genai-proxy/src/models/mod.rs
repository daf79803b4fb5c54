//! Request-scoped domain models for the generation proxy.

pub mod dto;
pub mod generation;

pub use dto::{GenerateTextRequest, GenerationResponse, HealthResponse, StatusResponse};
pub use generation::{ContentPart, GenerationRequest, Upload};
