mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from cardsight for tests
pub use cardsight::{
    BoundingBox, CandidateError, Card, CardRecognizer, ClassifierConfig, CornerConfig, CornerSet,
    FaceBinarization, Recognition, RecognitionError, RecognizerConfig, Suit,
};
