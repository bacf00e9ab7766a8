//! Archive stage: zip the output tree.

use std::fs::{self, File};
use std::io::{Read, Write};

use anyhow::{Context, Result};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::pipeline::{BuildContext, Stage};
use crate::utils::path::{copy_with_parents, relative_to, walk_files};

/// Package the entire output root into `<module>-<version>.zip`, written
/// into the output root itself and copied into the public downloads
/// location.
pub struct Archive;

impl Stage for Archive {
    fn name(&self) -> &'static str {
        "archive"
    }

    fn run(&self, ctx: &BuildContext) -> Result<()> {
        let root = &ctx.layout.output_root;
        // Snapshot the file list before the zip exists, so the archive
        // never includes itself
        let files = walk_files(root);

        let archive_path = root.join(ctx.archive_name());
        let file = File::create(&archive_path)
            .with_context(|| format!("Failed to create archive: {}", archive_path.display()))?;
        let mut writer = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let mut buffer = Vec::new();
        for path in &files {
            let rel = relative_to(path, root);
            // Zip entry names use forward slashes on every platform
            let entry_name = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            writer.start_file(entry_name.as_str(), options)?;
            buffer.clear();
            File::open(path)
                .with_context(|| format!("Failed to open: {}", path.display()))?
                .read_to_end(&mut buffer)?;
            writer.write_all(&buffer)?;
        }
        writer.finish()?;

        fs::create_dir_all(&ctx.layout.downloads_dir).with_context(|| {
            format!(
                "Failed to create downloads dir: {}",
                ctx.layout.downloads_dir.display()
            )
        })?;
        copy_with_parents(
            &archive_path,
            &ctx.layout.downloads_dir.join(ctx.archive_name()),
        )?;
        Ok(())
    }
}
