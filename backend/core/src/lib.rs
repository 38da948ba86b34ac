//! Urbanwatch Core
//!
//! Shared types, error taxonomy, suggestion lookup, and the trait seams to
//! the external collaborators (detector model, geocoding provider, PDF
//! engine).

pub mod error;
pub mod suggest;
pub mod traits;
pub mod types;

pub use error::UrbanError;
pub use traits::{GeocodeProvider, InferenceBackend, PdfEngine};
pub use types::{Detection, IssueLabel, Marker, NormalizedImage, ResolvedLocation};
