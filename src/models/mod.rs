pub mod record;
pub mod response;
pub mod result;

pub use record::{NormalizedRecord, RawRecord, Side};
pub use response::{
    InvocationPayload, ReconcileRequest, ReconciliationResponse, ResponseMetadata, Summary,
    DEFAULT_LEFT_FILE_NAME, DEFAULT_RIGHT_FILE_NAME,
};
pub use result::{ConfidenceTier, MatchCandidate, ReconciliationResult};
