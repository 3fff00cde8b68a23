pub mod contact;
pub mod probes;
