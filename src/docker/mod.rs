// ABOUTME: Docker integration for building the ckl image and launching it against the host directory

pub mod build_context;
pub mod builder;
pub mod container_manager;

pub use builder::{BuildOptions, ImageBuilder};
pub use container_manager::{connect_to_docker, ContainerError, ContainerManager, RunOptions};
