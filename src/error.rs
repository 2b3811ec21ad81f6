use thiserror::Error;

/// Failures that abort a whole `recognize` call
#[derive(Debug, Error, PartialEq)]
pub enum RecognitionError {
    #[error("image {width}x{height} has no usable area")]
    EmptyImage { width: u32, height: u32 },
}

/// Reasons a single card candidate produced no card
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CandidateError {
    #[error("degenerate candidate: {points} boundary points, {width}x{height} extent")]
    DegenerateCandidate {
        points: usize,
        width: u32,
        height: u32,
    },

    #[error("corner detection did not converge after {attempts} rotations")]
    CornerDetectionDivergence { attempts: u32 },

    #[error("classification out of range: value {value} from {symbols} symbol contours")]
    ClassificationOutOfRange { value: i32, symbols: usize },
}
