pub mod blueprint;
pub mod cli;
pub mod constants;
pub mod entity;
pub mod errors;
pub mod run;
pub mod utils;
