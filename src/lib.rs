pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

#[cfg(test)]
pub(crate) mod test_support;
