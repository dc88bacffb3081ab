// Analyzer module: aggregates submodules for different aspects of analysis.

pub mod aggregates;
pub mod forecast;
pub mod regression;
