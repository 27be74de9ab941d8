use std::path::PathBuf;

/// Everything that varies between the VMs of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmSpec {
    pub name: String,
    pub memory_mb: u64,
    pub vcpus: u32,
    pub disk: PathBuf,
}

/// Generate libvirt domain XML for a VM.
///
/// Topology is fixed: one virtio qcow2 disk, one virtio NIC on the `default`
/// network, HVM boot from the disk.
pub fn generate_domain_xml(spec: &VmSpec) -> String {
    let name = escape(&spec.name);
    let memory_mb = spec.memory_mb;
    let vcpus = spec.vcpus;
    let disk = escape(&spec.disk.display().to_string());

    format!(
        r#"<domain type='kvm'>
  <name>{name}</name>
  <memory unit='MiB'>{memory_mb}</memory>
  <vcpu placement='static'>{vcpus}</vcpu>
  <os>
    <type arch='x86_64' machine='pc-q35-5.2'>hvm</type>
    <boot dev='hd'/>
  </os>
  <devices>
    <disk type='file' device='disk'>
      <driver name='qemu' type='qcow2'/>
      <source file='{disk}'/>
      <target dev='vda' bus='virtio'/>
    </disk>
    <interface type='network'>
      <source network='default'/>
      <model type='virtio'/>
    </interface>
  </devices>
</domain>
"#
    )
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_spec() -> VmSpec {
        VmSpec {
            name: "vm_1".into(),
            memory_mb: 512,
            vcpus: 1,
            disk: PathBuf::from("/var/lib/libvirt/images/vm_1.qcow2"),
        }
    }

    #[test]
    fn xml_contains_vm_name() {
        let xml = generate_domain_xml(&test_spec());
        assert!(xml.contains("<name>vm_1</name>"));
    }

    #[test]
    fn xml_contains_resources() {
        let spec = VmSpec {
            memory_mb: 2048,
            vcpus: 4,
            ..test_spec()
        };
        let xml = generate_domain_xml(&spec);
        assert!(xml.contains("<memory unit='MiB'>2048</memory>"));
        assert!(xml.contains("<vcpu placement='static'>4</vcpu>"));
    }

    #[test]
    fn xml_contains_devices() {
        let xml = generate_domain_xml(&test_spec());
        assert!(xml.contains("<source file='/var/lib/libvirt/images/vm_1.qcow2'/>"));
        assert!(xml.contains("<target dev='vda' bus='virtio'/>"));
        assert!(xml.contains("<source network='default'/>"));
        assert!(xml.contains("<model type='virtio'/>"));
        assert!(xml.contains("<boot dev='hd'/>"));
        assert!(xml.contains(">hvm</type>"));
    }

    #[test]
    fn xml_is_deterministic() {
        assert_eq!(
            generate_domain_xml(&test_spec()),
            generate_domain_xml(&test_spec())
        );
    }

    #[test]
    fn xml_escapes_path() {
        let spec = VmSpec {
            disk: PathBuf::from("/images/it's <odd> & odd.qcow2"),
            ..test_spec()
        };
        let xml = generate_domain_xml(&spec);
        assert!(xml.contains("<source file='/images/it&apos;s &lt;odd&gt; &amp; odd.qcow2'/>"));
    }
}
