//! Application layer: the transaction client driving one payment attempt
//! through authorize, redirect and capture.

pub mod client;
