// Library for tests to access modules

pub mod aggregator;
pub mod command;
pub mod config;
pub mod cpu_sampler;
pub mod disk_resolver;
pub mod docker_lister;
pub mod error;
pub mod gpu_sampler;
pub mod host_probe;
pub mod models;
pub mod network_sampler;
pub mod routes;
pub mod sampled;
pub mod worker;
