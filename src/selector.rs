use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::VmBatchError;
use crate::image::{self, ImageTool};
use crate::input::InputSource;

pub const REUSE_PROMPT: &str = "Do you want to use an existing disk image? (yes/no):";
pub const SELECTION_PROMPT: &str = "Enter the number of the disk image you want to use:";

/// Why a menu answer was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    NotANumber,
    OutOfRange,
}

/// Parse a 1-based menu answer into a 0-based index into a list of `len` items.
pub fn parse_selection(answer: &str, len: usize) -> Result<usize, SelectionError> {
    let n: usize = answer
        .trim()
        .parse()
        .map_err(|_| SelectionError::NotANumber)?;
    if (1..=len).contains(&n) {
        Ok(n - 1)
    } else {
        Err(SelectionError::OutOfRange)
    }
}

/// Only an explicit "yes" reuses an existing image; anything else provisions.
fn wants_existing(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

/// Pick the disk for `vm_name`: reuse an image from `dir` or provision a new one.
///
/// Images in `taken` already belong to another VM and are never offered.
pub async fn select_image(
    vm_name: &str,
    dir: &Path,
    size_gb: u64,
    taken: &HashSet<PathBuf>,
    input: &mut impl InputSource,
    tool: &impl ImageTool,
) -> Result<PathBuf, VmBatchError> {
    let answer = input.read_line(REUSE_PROMPT)?;
    if !wants_existing(&answer) {
        return image::provision_image(tool, vm_name, size_gb, dir).await;
    }

    let mut images = image::list_images(dir).await?;
    images.retain(|name| !taken.contains(&dir.join(name)));
    if images.is_empty() {
        eprintln!("No unused disk images found. Creating a new one.");
        return image::provision_image(tool, vm_name, size_gb, dir).await;
    }

    eprintln!("Available disk images:");
    for (i, name) in images.iter().enumerate() {
        eprintln!("{}. {name}", i + 1);
    }

    loop {
        let answer = input.read_line(SELECTION_PROMPT)?;
        match parse_selection(&answer, images.len()) {
            Ok(index) => {
                let path = dir.join(&images[index]);
                tracing::info!(vm = vm_name, path = %path.display(), "reusing disk image");
                return Ok(path);
            }
            Err(SelectionError::NotANumber) => {
                eprintln!("Invalid input. Please enter a number.");
            }
            Err(SelectionError::OutOfRange) => {
                eprintln!("Invalid choice. Please enter a valid number.");
            }
        }
    }
}
