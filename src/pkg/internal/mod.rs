pub mod email;
pub mod scratch;
