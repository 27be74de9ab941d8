use clap::Parser;

use vmbatch::backend;
use vmbatch::batch::{self, BatchReport};
use vmbatch::cli::{Cli, Command, OutputFormat};
use vmbatch::config::{self, ConfigOverrides};
use vmbatch::domain_xml::{self, VmSpec};
use vmbatch::image::{self, QemuImg};
use vmbatch::input::{ConsoleInput, ScriptedInput};
use vmbatch::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = config::resolve_config(cli.config.as_deref())?;

    match cli.command {
        Command::Up {
            overrides,
            answers,
            output,
        } => {
            let config = ConfigOverrides::from(overrides).apply(config)?;
            let session = backend::connect(config.libvirt_uri())?;
            let tool = QemuImg;

            let report = if answers.is_empty() {
                batch::run_batch(&config, &session, &mut ConsoleInput, &tool).await?
            } else {
                let mut input = ScriptedInput::new(answers);
                batch::run_batch(&config, &session, &mut input, &tool).await?
            };

            session.close();
            print_report(&report, output);
        }
        Command::Images { image_dir } => {
            let config = ConfigOverrides {
                image_dir,
                ..Default::default()
            }
            .apply(config)?;
            let dir = config.image_dir();
            let images = image::list_images(dir).await?;
            if images.is_empty() {
                println!("No qcow2 images in {}", dir.display());
            }
            for (i, name) in images.iter().enumerate() {
                println!("{}. {name}", i + 1);
            }
        }
        Command::Xml {
            name,
            disk,
            memory_mb,
            vcpus,
        } => {
            let config = ConfigOverrides {
                memory_mb,
                vcpus,
                ..Default::default()
            }
            .apply(config)?;
            let spec = VmSpec {
                name,
                memory_mb: config.resources.memory_mb,
                vcpus: config.resources.vcpus,
                disk,
            };
            print!("{}", domain_xml::generate_domain_xml(&spec));
        }
    }

    Ok(())
}

fn print_report(report: &BatchReport, output: OutputFormat) {
    match output {
        OutputFormat::Json => {
            println!(
                "{}",
                facet_json::to_string(&BatchJson {
                    started: report
                        .started
                        .iter()
                        .map(|spec| StartedJson {
                            name: spec.name.clone(),
                            disk: spec.disk.display().to_string(),
                            memory_mb: spec.memory_mb,
                            vcpus: spec.vcpus,
                        })
                        .collect(),
                    failed: report
                        .failed
                        .iter()
                        .map(|f| FailedJson {
                            name: f.name.clone(),
                            error: f.error.to_string(),
                        })
                        .collect(),
                })
                .expect("JSON serialization"),
            );
        }
        OutputFormat::Text => {
            println!(
                "Batch complete: {} started, {} failed.",
                report.started.len(),
                report.failed.len()
            );
            for failure in &report.failed {
                println!("  {}: {}", failure.name, failure.error);
            }
        }
    }
}

// ── JSON output structs ─────────────────────────────────────────────

#[derive(facet::Facet)]
struct BatchJson {
    started: Vec<StartedJson>,
    failed: Vec<FailedJson>,
}

#[derive(facet::Facet)]
struct StartedJson {
    name: String,
    disk: String,
    memory_mb: u64,
    vcpus: u32,
}

#[derive(facet::Facet)]
struct FailedJson {
    name: String,
    error: String,
}
