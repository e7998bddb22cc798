pub(crate) mod bootstrap;
mod kitchen;
pub(crate) mod loop_runner;
