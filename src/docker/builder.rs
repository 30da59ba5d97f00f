// ABOUTME: Image building through the Docker Engine API
// Sends the packed build context and streams the engine's build output back

use super::build_context::build_context_tar;
use super::container_manager::{connect_to_docker, ContainerError};
use bollard::image::BuildImageOptions;
use bollard::Docker;
use futures_util::stream::StreamExt;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub context_path: PathBuf,
    /// Relative to the context root
    pub dockerfile: String,
    pub no_cache: bool,
    pub pull: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            context_path: PathBuf::from("."),
            dockerfile: "Dockerfile".to_string(),
            no_cache: false,
            pull: false,
        }
    }
}

pub struct ImageBuilder {
    docker: Docker,
}

impl ImageBuilder {
    pub async fn new(host: Option<&str>) -> Result<Self, ContainerError> {
        let docker = connect_to_docker(host)?;
        docker.ping().await?;
        Ok(Self { docker })
    }

    /// Build `tag` from `options`. Build output lines go to `progress_tx` when given.
    pub async fn build_image(
        &self,
        tag: &str,
        options: &BuildOptions,
        progress_tx: Option<mpsc::Sender<String>>,
    ) -> Result<(), ContainerError> {
        let dockerfile = options.context_path.join(&options.dockerfile);
        if !dockerfile.exists() {
            return Err(ContainerError::InvalidConfig(format!(
                "Build manifest not found: {}",
                dockerfile.display()
            )));
        }

        info!("Building image {} from {}", tag, options.context_path.display());
        let context = build_context_tar(&options.context_path)?;
        debug!("Build context is {} bytes", context.len());

        let build_options = BuildImageOptions::<String> {
            dockerfile: options.dockerfile.clone(),
            t: tag.to_string(),
            nocache: options.no_cache,
            pull: options.pull,
            rm: true,
            ..Default::default()
        };

        let mut stream = self.docker.build_image(build_options, None, Some(context.into()));

        while let Some(result) = stream.next().await {
            match result {
                Ok(info) => {
                    if let Some(message) = info.error {
                        error!("Build of {} failed: {}", tag, message);
                        return Err(ContainerError::BuildFailed(message));
                    }
                    if let Some(line) = info.stream.or(info.status) {
                        let line = line.trim_end().to_string();
                        if line.is_empty() {
                            continue;
                        }
                        debug!("build: {}", line);
                        if let Some(ref tx) = progress_tx {
                            let _ = tx.send(line).await;
                        }
                    }
                }
                Err(bollard::errors::Error::DockerStreamError { error }) => {
                    error!("Build of {} failed: {}", tag, error);
                    return Err(ContainerError::BuildFailed(error));
                }
                Err(e) => return Err(ContainerError::Connection(e)),
            }
        }

        info!("Successfully built image {}", tag);
        Ok(())
    }
}
