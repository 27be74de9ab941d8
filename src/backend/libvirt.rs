use virt::connect::Connect;
use virt::domain::Domain;
use virt::error::{self as virt_error, ErrorNumber};

use crate::error::VmBatchError;

struct ConnGuard(Connect);

impl std::ops::Deref for ConnGuard {
    type Target = Connect;
    fn deref(&self) -> &Connect {
        &self.0
    }
}

impl Drop for ConnGuard {
    fn drop(&mut self) {
        self.0.close().ok();
    }
}

/// libvirt connection, closed when dropped.
pub struct LibvirtSession {
    conn: ConnGuard,
    uri: String,
}

impl LibvirtSession {
    pub fn open(uri: &str) -> Result<Self, VmBatchError> {
        // Keep libvirt from printing errors to stderr; they surface through Result.
        virt_error::clear_error_callback();

        let conn = Connect::open(Some(uri)).map_err(|e| VmBatchError::Libvirt {
            message: format!("failed to connect to the hypervisor: {e}"),
            hint: format!("ensure libvirtd is running and you have access to {uri}"),
        })?;
        tracing::debug!(uri, "connected to libvirt");

        Ok(Self {
            conn: ConnGuard(conn),
            uri: uri.to_string(),
        })
    }

    /// Release the connection at the end of a batch.
    pub fn close(self) {
        tracing::debug!(uri = %self.uri, "closing libvirt connection");
        drop(self);
    }
}

impl super::HypervisorSession for LibvirtSession {
    fn domain_exists(&self, name: &str) -> Result<bool, VmBatchError> {
        match Domain::lookup_by_name(&self.conn, name) {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.code(), ErrorNumber::NoDomain) => Ok(false),
            Err(e) => Err(VmBatchError::Libvirt {
                message: format!("domain lookup for {name} failed: {e}"),
                hint: format!("check that {} is still reachable", self.uri),
            }),
        }
    }

    fn define_and_start(&self, name: &str, xml: &str) -> Result<(), VmBatchError> {
        let dom = Domain::define_xml(&self.conn, xml).map_err(|e| VmBatchError::Libvirt {
            message: format!("failed to define domain {name}: {e}"),
            hint: "check the generated domain XML with `vmbatch xml`".into(),
        })?;
        tracing::info!(name, "domain defined");

        dom.create().map_err(|e| VmBatchError::Libvirt {
            message: format!("failed to start domain {name}: {e}"),
            hint: format!("check `virsh -c {} start {name}` for details", self.uri),
        })?;
        tracing::info!(name, "VM started");
        Ok(())
    }
}
