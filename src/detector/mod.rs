mod konami;
mod sequence;
mod session;
mod support;

pub use konami::SequenceDetector;
pub use sequence::{normalize_key, TargetSequence, CONFIRM_KEY, KONAMI_CODE_SEQUENCE};
pub use session::{Advance, InactivityTimer, Session};
pub use support::{add_support_for_the_konami_code, DetectionOptions, SupportRemover};
