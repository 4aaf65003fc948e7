pub mod cli;
pub mod delay;
pub mod engine;
pub mod phases;
pub mod report;
pub mod runner;
pub mod session;
pub mod tools;
