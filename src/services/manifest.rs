use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Name of the log written into every destination directory
pub const MANIFEST_FILE_NAME: &str = "fltrd_info.txt";

/// Text of the run log: timestamp, then one line per filter description
pub fn render_manifest(filtered_at: &DateTime<Local>, descriptions: &[String]) -> String {
    let mut text = format!("Filtered on {}\nFilters used:\n", filtered_at.format("%c"));
    for description in descriptions {
        text.push_str(" - ");
        text.push_str(description);
        text.push('\n');
    }
    text
}

/// Write the run log into `destination`, returning the file path
pub fn write_manifest(destination: &Path, descriptions: &[String]) -> io::Result<PathBuf> {
    let path = destination.join(MANIFEST_FILE_NAME);
    fs::write(&path, render_manifest(&Local::now(), descriptions))?;
    Ok(path)
}
