pub mod access;

pub use access::{AuthOutcome, authenticate_header};
