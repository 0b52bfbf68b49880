// Library for the binary and the integration tests

pub mod aggregator;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod docker_repo;
pub mod enrich;
pub mod error;
pub mod git_repo;
pub mod models;
pub mod ports_repo;
pub mod process_repo;
pub mod routes;
pub mod version;
