//! Protocol transformation and validation at the trust boundary.

pub mod card;
pub mod envelope;
pub mod transform;
pub mod validate;

pub use card::capability_card;
pub use envelope::{BoundaryRequest, BoundaryResponse, EnvelopeStatus};
pub use transform::{from_external, to_external, ExternalInputs, TranslationResult};
pub use validate::{
    validate_request, CAPABILITY_TRANSLATE, DEFAULT_CONFIDENCE, DEFAULT_DOCUMENT_TYPE,
    DOCUMENT_TYPES, MAX_TEXT_LENGTH, SUPPORTED_LANGUAGES,
};
