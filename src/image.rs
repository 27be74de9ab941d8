use std::path::{Path, PathBuf};

use crate::error::VmBatchError;

pub const QCOW2_EXTENSION: &str = ".qcow2";

/// List qcow2 image filenames in `dir`, in directory listing order.
pub async fn list_images(dir: &Path) -> Result<Vec<String>, VmBatchError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| VmBatchError::Io {
            context: format!("reading image directory {}", dir.display()),
            source: e,
        })?;

    let mut images = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| VmBatchError::Io {
        context: format!("reading image directory {}", dir.display()),
        source: e,
    })? {
        match entry.file_name().into_string() {
            Ok(name) if name.ends_with(QCOW2_EXTENSION) => images.push(name),
            Ok(_) => {}
            Err(raw) => {
                tracing::debug!(name = ?raw, dir = %dir.display(), "skipping non-UTF-8 file name");
            }
        }
    }

    tracing::debug!(dir = %dir.display(), count = images.len(), "listed disk images");
    Ok(images)
}

/// Destination of a freshly provisioned disk: `<dir>/<name>.qcow2`.
pub fn disk_path(dir: &Path, vm_name: &str) -> PathBuf {
    dir.join(format!("{vm_name}{QCOW2_EXTENSION}"))
}

/// Something that can allocate a new sparse qcow2 file.
#[allow(async_fn_in_trait)] // trait is internal-only
pub trait ImageTool {
    async fn create(&self, path: &Path, size_gb: u64) -> Result<(), VmBatchError>;
}

/// `qemu-img` on the host.
#[derive(Debug, Clone, Default)]
pub struct QemuImg;

impl QemuImg {
    pub fn args(path: &Path, size_gb: u64) -> Vec<String> {
        vec![
            "create".into(),
            "-f".into(),
            "qcow2".into(),
            path.display().to_string(),
            format!("{size_gb}G"),
        ]
    }
}

impl ImageTool for QemuImg {
    async fn create(&self, path: &Path, size_gb: u64) -> Result<(), VmBatchError> {
        let output = tokio::process::Command::new("qemu-img")
            .args(Self::args(path, size_gb))
            .output()
            .await
            .map_err(|e| VmBatchError::Io {
                context: "running qemu-img".into(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(VmBatchError::ExternalCommand {
                command: "qemu-img".into(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Allocate a new disk for `vm_name` in `dir` and return its path.
pub async fn provision_image(
    tool: &impl ImageTool,
    vm_name: &str,
    size_gb: u64,
    dir: &Path,
) -> Result<PathBuf, VmBatchError> {
    let path = disk_path(dir, vm_name);
    let exists = tokio::fs::try_exists(&path)
        .await
        .map_err(|e| VmBatchError::Io {
            context: format!("checking {}", path.display()),
            source: e,
        })?;
    if exists {
        return Err(VmBatchError::Validation {
            message: format!(
                "disk image {} already exists, refusing to overwrite",
                path.display()
            ),
        });
    }

    tool.create(&path, size_gb).await?;
    eprintln!("Disk image created: {}", path.display());
    tracing::info!(path = %path.display(), size_gb, "created qcow2 image");
    Ok(path)
}
