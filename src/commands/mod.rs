pub mod completions;
pub mod purge;
pub mod run;
