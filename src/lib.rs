pub mod bindings;
pub mod clock;
pub mod configuration;
pub mod controllers;
pub mod dom;
pub mod domain;
pub mod features;
pub mod rate_limit;
pub mod startup;
pub mod storage;
pub mod submission_client;
pub mod telemetry;
