mod payload;
mod response;

pub use payload::SubmitPayload;
pub use response::{ParsedResponse, parse_response};
