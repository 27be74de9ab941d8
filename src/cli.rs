use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(name = "vmbatch", about = "Provision a batch of VMs on a libvirt host")]
pub struct Cli {
    /// Path to config file (defaults to ./vmbatch.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create and start the batch of VMs
    Up {
        #[command(flatten)]
        overrides: OverrideArgs,

        /// Answer prompts from this list instead of the terminal (repeatable)
        #[arg(long = "answer", value_name = "ANSWER")]
        answers: Vec<String>,

        /// Summary format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// List qcow2 images available for reuse
    Images {
        /// Image directory (overrides config)
        #[arg(long)]
        image_dir: Option<PathBuf>,
    },

    /// Print the domain XML for a single VM
    Xml {
        /// Domain name
        name: String,

        /// Disk image path
        #[arg(long)]
        disk: PathBuf,

        /// Memory in MiB (overrides config)
        #[arg(long)]
        memory_mb: Option<u64>,

        /// vCPU count (overrides config)
        #[arg(long)]
        vcpus: Option<u32>,
    },
}

#[derive(Args, Debug, Default)]
pub struct OverrideArgs {
    /// Number of VMs to create
    #[arg(long)]
    pub count: Option<u32>,

    /// Directory holding qcow2 images
    #[arg(long)]
    pub image_dir: Option<PathBuf>,

    /// Memory per VM in MiB
    #[arg(long)]
    pub memory_mb: Option<u64>,

    /// vCPUs per VM
    #[arg(long)]
    pub vcpus: Option<u32>,

    /// Size of newly created disks in GiB
    #[arg(long)]
    pub disk_size_gb: Option<u64>,

    /// libvirt connection URI
    #[arg(long)]
    pub uri: Option<String>,
}

impl From<OverrideArgs> for ConfigOverrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            count: args.count,
            image_dir: args.image_dir,
            memory_mb: args.memory_mb,
            vcpus: args.vcpus,
            disk_size_gb: args.disk_size_gb,
            libvirt_uri: args.uri,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
