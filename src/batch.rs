//! Provision `count` VMs one after another on a single session.
//!
//! Disk provisioning and input failures abort the whole run. A VM that cannot
//! be defined or started is recorded in the report and the loop moves on;
//! VMs that already started are left running. A disk is handed to at most one
//! VM per run.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::backend::HypervisorSession;
use crate::config::Config;
use crate::domain_xml::{self, VmSpec};
use crate::error::VmBatchError;
use crate::image::ImageTool;
use crate::input::InputSource;
use crate::selector;

#[derive(Debug)]
pub struct VmFailure {
    pub name: String,
    pub error: VmBatchError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub started: Vec<VmSpec>,
    pub failed: Vec<VmFailure>,
}

impl BatchReport {
    pub fn attempted(&self) -> usize {
        self.started.len() + self.failed.len()
    }
}

pub async fn run_batch(
    config: &Config,
    session: &impl HypervisorSession,
    input: &mut impl InputSource,
    tool: &impl ImageTool,
) -> Result<BatchReport, VmBatchError> {
    let mut report = BatchReport::default();
    let mut assigned: HashSet<PathBuf> = HashSet::new();

    for index in 1..=config.count {
        let name = config.vm_name(index);
        eprintln!("[{index}/{}] {name}", config.count);

        if let Err(error) = ensure_name_free(session, &name) {
            record_failure(&mut report, name, error);
            continue;
        }

        let disk = selector::select_image(
            &name,
            config.image_dir(),
            config.disk.size_gb,
            &assigned,
            &mut *input,
            tool,
        )
        .await?;
        assigned.insert(disk.clone());

        let spec = VmSpec {
            name,
            memory_mb: config.resources.memory_mb,
            vcpus: config.resources.vcpus,
            disk,
        };
        let xml = domain_xml::generate_domain_xml(&spec);

        match session.define_and_start(&spec.name, &xml) {
            Ok(()) => {
                eprintln!(
                    "VM {} created and started successfully with disk image: {}",
                    spec.name,
                    spec.disk.display()
                );
                report.started.push(spec);
            }
            Err(error) => record_failure(&mut report, spec.name, error),
        }
    }

    tracing::info!(
        started = report.started.len(),
        failed = report.failed.len(),
        "batch finished"
    );
    Ok(report)
}

fn ensure_name_free(session: &impl HypervisorSession, name: &str) -> Result<(), VmBatchError> {
    if session.domain_exists(name)? {
        return Err(VmBatchError::DomainExists {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn record_failure(report: &mut BatchReport, name: String, error: VmBatchError) {
    eprintln!("Failed to create VM {name}: {error}");
    tracing::warn!(name = %name, error = %error, "VM failed, continuing with batch");
    report.failed.push(VmFailure { name, error });
}
