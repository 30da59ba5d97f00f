// ABOUTME: Docker container management using Bollard for the ckl launch container
// Creates a named container with the host directory bind-mounted, attaches to it and cleans up

use bollard::container::{
    AttachContainerOptions, AttachContainerResults, Config, CreateContainerOptions, ListContainersOptions,
    LogOutput, RemoveContainerOptions, ResizeContainerTtyOptions, StartContainerOptions, WaitContainerOptions,
};
use bollard::image::ListImagesOptions;
use bollard::models::{HostConfig, Mount, MountTypeEnum};
use bollard::Docker;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use futures_util::stream::StreamExt;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, error, info, warn};

pub const MANAGED_LABEL: &str = "ckl-managed";

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("Docker connection error: {0}")]
    Connection(#[from] bollard::errors::Error),
    #[error("Container already exists: {0}")]
    AlreadyExists(String),
    #[error("Image not found: {0} (run `ckl image build` first)")]
    ImageNotFound(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Image build failed: {0}")]
    BuildFailed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Connect to the engine: explicit host, then DOCKER_HOST, then the usual sockets.
pub fn connect_to_docker(host: Option<&str>) -> Result<Docker, bollard::errors::Error> {
    if let Some(docker_host) = host {
        info!("Using Docker host from config: {}", docker_host);
        std::env::set_var("DOCKER_HOST", docker_host);
        return Docker::connect_with_local_defaults();
    }

    if let Ok(docker_host) = std::env::var("DOCKER_HOST") {
        info!("Using DOCKER_HOST: {}", docker_host);
        return Docker::connect_with_local_defaults();
    }

    for socket_path in docker_socket_paths() {
        if std::path::Path::new(&socket_path).exists() {
            info!("Found Docker socket at: {}", socket_path);
            std::env::set_var("DOCKER_HOST", format!("unix://{socket_path}"));
            match Docker::connect_with_local_defaults() {
                Ok(docker) => return Ok(docker),
                Err(e) => warn!("Failed to connect to Docker socket {}: {}", socket_path, e),
            }
        }
    }

    warn!("No Docker socket found, trying default connection");
    Docker::connect_with_local_defaults()
}

fn docker_socket_paths() -> Vec<String> {
    let mut paths = Vec::new();

    if cfg!(target_os = "macos") {
        if let Some(home) = dirs::home_dir() {
            // Docker Desktop, then Colima
            paths.push(home.join(".docker/run/docker.sock").to_string_lossy().to_string());
            paths.push(home.join(".colima/default/docker.sock").to_string_lossy().to_string());
        }
    }

    if cfg!(target_os = "linux") {
        paths.push("/var/run/docker.sock".to_string());
        // Rootless Docker
        if let Ok(xdg_runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
            paths.push(format!("{xdg_runtime_dir}/docker.sock"));
        }
    }

    paths
}

/// How to launch the container.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub image: String,
    pub name: String,
    pub host_dir: PathBuf,
    pub mount_path: String,
    /// `None` runs the image's default command
    pub command: Option<Vec<String>>,
    /// Attach a TTY and forward stdin
    pub interactive: bool,
}

pub struct ContainerManager {
    docker: Docker,
}

impl ContainerManager {
    pub async fn new(host: Option<&str>) -> Result<Self, ContainerError> {
        let docker = connect_to_docker(host)?;

        // Test the connection
        docker.ping().await?;

        info!("Successfully connected to Docker daemon");
        Ok(Self { docker })
    }

    pub fn container_config(options: &RunOptions) -> Config<String> {
        let host_config = HostConfig {
            mounts: Some(vec![Mount {
                target: Some(options.mount_path.clone()),
                source: Some(options.host_dir.to_string_lossy().to_string()),
                typ: Some(MountTypeEnum::BIND),
                read_only: Some(false),
                ..Default::default()
            }]),
            // Removal is done explicitly once the exit code has been read
            auto_remove: Some(false),
            ..Default::default()
        };

        Config {
            image: Some(options.image.clone()),
            cmd: options.command.clone(),
            working_dir: Some(options.mount_path.clone()),
            tty: Some(options.interactive),
            open_stdin: Some(options.interactive),
            stdin_once: Some(options.interactive),
            attach_stdin: Some(options.interactive),
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            host_config: Some(host_config),
            labels: Some(HashMap::from([(MANAGED_LABEL.to_string(), "true".to_string())])),
            ..Default::default()
        }
    }

    /// Create, attach, start, wait for and remove the container. Returns its exit code.
    pub async fn run(&self, options: &RunOptions) -> Result<i64, ContainerError> {
        if !self.image_exists(&options.image).await? {
            return Err(ContainerError::ImageNotFound(options.image.clone()));
        }
        if self.container_exists(&options.name).await? {
            return Err(ContainerError::AlreadyExists(options.name.clone()));
        }

        let create_options = CreateContainerOptions {
            name: options.name.clone(),
            platform: None,
        };
        let created = self
            .docker
            .create_container(Some(create_options), Self::container_config(options))
            .await?;
        let container_id = created.id;
        info!("Created container {} with ID {}", options.name, container_id);

        let result = self.attach_and_wait(&container_id, options.interactive).await;

        let remove_options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };
        match self.docker.remove_container(&container_id, Some(remove_options)).await {
            Ok(()) => info!("Removed container {}", container_id),
            Err(bollard::errors::Error::DockerResponseServerError { status_code: 404, .. }) => {
                debug!("Container {} was already removed", container_id);
            }
            Err(e) => warn!("Failed to remove container {}: {}", container_id, e),
        }

        result
    }

    async fn attach_and_wait(&self, container_id: &str, interactive: bool) -> Result<i64, ContainerError> {
        let attach_options = AttachContainerOptions::<String> {
            stdin: Some(interactive),
            stdout: Some(true),
            stderr: Some(true),
            stream: Some(true),
            logs: Some(true),
            detach_keys: None,
        };

        // Attach before starting so no output is lost
        let AttachContainerResults { mut output, mut input } = self
            .docker
            .attach_container(container_id, Some(attach_options))
            .await?;

        self.docker
            .start_container(container_id, None::<StartContainerOptions<String>>)
            .await?;
        info!("Started container {}", container_id);

        let _raw_mode = if interactive {
            self.sync_tty_size(container_id).await;
            Some(RawModeGuard::enable()?)
        } else {
            None
        };

        let stdin_task = interactive.then(|| {
            tokio::spawn(async move {
                let mut stdin = tokio::io::stdin();
                let mut buf = [0u8; 1024];
                loop {
                    match stdin.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            if input.write_all(&buf[..n]).await.is_err() || input.flush().await.is_err() {
                                break;
                            }
                        }
                    }
                }
            })
        });

        let mut stdout = tokio::io::stdout();
        while let Some(chunk) = output.next().await {
            match chunk {
                Ok(LogOutput::StdOut { message } | LogOutput::StdErr { message } | LogOutput::Console { message }) => {
                    stdout.write_all(&message).await?;
                    stdout.flush().await?;
                }
                Ok(LogOutput::StdIn { .. }) => {}
                Err(e) => {
                    error!("Error reading container output: {}", e);
                    break;
                }
            }
        }

        if let Some(task) = stdin_task {
            task.abort();
        }

        self.wait_for_exit(container_id).await
    }

    async fn wait_for_exit(&self, container_id: &str) -> Result<i64, ContainerError> {
        let mut wait = self.docker.wait_container(
            container_id,
            Some(WaitContainerOptions {
                condition: "not-running",
            }),
        );

        let mut exit_code = 0;
        while let Some(result) = wait.next().await {
            match result {
                Ok(response) => exit_code = response.status_code,
                Err(bollard::errors::Error::DockerContainerWaitError { code, .. }) => exit_code = code,
                Err(e) => return Err(ContainerError::Connection(e)),
            }
        }

        info!("Container {} exited with code {}", container_id, exit_code);
        Ok(exit_code)
    }

    async fn sync_tty_size(&self, container_id: &str) {
        let Ok((width, height)) = crossterm::terminal::size() else {
            return;
        };
        let resize_options = ResizeContainerTtyOptions { width, height };
        if let Err(e) = self.docker.resize_container_tty(container_id, resize_options).await {
            warn!("Failed to send resize signal to container {}: {}", container_id, e);
        }
    }

    pub async fn image_exists(&self, image: &str) -> Result<bool, ContainerError> {
        let images = self
            .docker
            .list_images(Some(ListImagesOptions::<String> {
                filters: HashMap::from([("reference".to_string(), vec![image.to_string()])]),
                ..Default::default()
            }))
            .await?;

        Ok(!images.is_empty())
    }

    async fn container_exists(&self, name: &str) -> Result<bool, ContainerError> {
        let containers = self
            .docker
            .list_containers(Some(ListContainersOptions::<String> {
                all: true,
                filters: HashMap::from([("name".to_string(), vec![format!("^/{name}$")])]),
                ..Default::default()
            }))
            .await?;

        Ok(!containers.is_empty())
    }
}

/// Puts the host terminal in raw mode for the lifetime of an interactive attach.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> std::io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}
