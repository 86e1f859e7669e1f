//! Provider-facing vocabulary: environments, required fields, amounts, the
//! transport port and the response shapes it returns.

pub mod environment;
pub mod fields;
pub mod money;
pub mod ports;
pub mod response;
