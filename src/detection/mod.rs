//! Card detection stages, leaves first: preprocessing, contour extraction,
//! segmentation, corner location, rectification and classification.

pub mod preprocessing;
pub mod contours;
pub mod segmentation;
pub mod corners;
pub mod rectify;
pub mod classify;

pub use classify::Classification;
pub use corners::LocatedCorners;
pub use rectify::RectifiedCard;
pub use segmentation::CardCandidate;
