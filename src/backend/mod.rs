pub mod libvirt;

use crate::error::VmBatchError;

/// A live session with the hypervisor daemon.
pub trait HypervisorSession {
    fn domain_exists(&self, name: &str) -> Result<bool, VmBatchError>;

    /// Define a domain from `xml` and boot it.
    fn define_and_start(&self, name: &str, xml: &str) -> Result<(), VmBatchError>;
}

pub fn connect(uri: &str) -> Result<libvirt::LibvirtSession, VmBatchError> {
    libvirt::LibvirtSession::open(uri)
}
