/*
[INPUT]:  CLI configuration modules
[OUTPUT]: Public CLI crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod config;

pub use config::CliConfig;
