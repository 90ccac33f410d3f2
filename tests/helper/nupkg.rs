//! `.nupkg` fixture utilities

use std::io::{Cursor, Write};
use std::path::Path;

use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use nuget_feed::config::SearchConfig;
use nuget_feed::feed::local::LocalFeed;
use nuget_feed::feed::types::PackageSource;

/// Builds a minimal `.nuspec` manifest
pub fn nuspec(id: &str, version: &str, extra_metadata: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd">
  <metadata>
    <id>{id}</id>
    <version>{version}</version>
    {extra_metadata}
  </metadata>
</package>"#
    )
}

/// Writes a zip archive with the given entries into `dir/file_name`
pub fn write_archive(dir: &Path, file_name: &str, entries: &[(&str, &str)]) {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    let bytes = writer.finish().unwrap().into_inner();
    std::fs::write(dir.join(file_name), bytes).unwrap();
}

/// Writes a package archive whose manifest declares `id` and `version`
pub fn write_package(dir: &Path, file_name: &str, id: &str, version: &str) {
    let manifest_name = format!("{id}.nuspec");
    let manifest = nuspec(id, version, "");
    write_archive(
        dir,
        file_name,
        &[
            (manifest_name.as_str(), manifest.as_str()),
            ("lib/net8.0/placeholder.dll", "binary"),
        ],
    );
}

/// Creates an empty feed directory and a feed pointing at it
pub fn create_test_feed() -> (TempDir, LocalFeed) {
    let temp_dir = TempDir::new().unwrap();
    let source = PackageSource::new(
        "local",
        "Local",
        Some(temp_dir.path().to_str().unwrap()),
    );
    let feed = LocalFeed::new(source, SearchConfig::default());
    (temp_dir, feed)
}
