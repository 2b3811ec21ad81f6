pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;

pub use config::{ClassifierConfig, CornerConfig, FaceBinarization, RecognizerConfig};
pub use error::{CandidateError, RecognitionError};
pub use models::{BoundingBox, Card, Contour, CornerSet, Suit};
pub use pipeline::{recognize, CandidateFailure, CardRecognizer, Recognition};
