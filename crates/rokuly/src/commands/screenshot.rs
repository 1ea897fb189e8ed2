//! Screenshot command handler.

use std::path::PathBuf;

use rokuly_core::Device;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// `roku-20260102-150405.jpg` in the working directory.
fn default_path() -> PathBuf {
    PathBuf::from(format!(
        "roku-{}.jpg",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ))
}

pub async fn handle(
    path: Option<PathBuf>,
    device: &Device,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let path = path.unwrap_or_else(default_path);
    let written = device.save_screenshot(&path).await?;
    output::print_output(&written.display().to_string(), global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_name_is_timestamped_jpg() {
        let name = default_path().display().to_string();
        assert!(name.starts_with("roku-"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), "roku-YYYYmmdd-HHMMSS.jpg".len());
    }
}
