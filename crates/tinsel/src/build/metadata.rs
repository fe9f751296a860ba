use std::{path::PathBuf, process::Termination, time::Instant};

/// Metadata returned by [`generate()`](crate::generate) for a single page after a successful build.
#[derive(Debug)]
pub struct PageOutput {
    pub permalink: String,
    pub file_path: PathBuf,
    pub source_path: PathBuf,
}

/// Metadata returned by [`generate()`](crate::generate) for a single static asset after a successful build.
///
/// A static asset is a file that is copied to the output directory without any processing.
#[derive(Debug)]
pub struct StaticAssetOutput {
    pub file_path: PathBuf,
    pub original_path: PathBuf,
}

/// Metadata returned by [`generate()`](crate::generate) after a successful build.
#[derive(Debug)]
pub struct BuildOutput {
    pub start_time: Instant,
    pub pages: Vec<PageOutput>,
    pub static_files: Vec<StaticAssetOutput>,
}

impl BuildOutput {
    pub fn new(start_time: Instant) -> Self {
        Self {
            start_time,
            pages: Vec::new(),
            static_files: Vec::new(),
        }
    }

    pub(crate) fn add_page(&mut self, permalink: String, file_path: PathBuf, source_path: PathBuf) {
        self.pages.push(PageOutput {
            permalink,
            file_path,
            source_path,
        });
    }

    pub(crate) fn add_static_file(&mut self, file_path: PathBuf, original_path: PathBuf) {
        self.static_files.push(StaticAssetOutput {
            file_path,
            original_path,
        });
    }
}

impl Default for BuildOutput {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl Termination for BuildOutput {
    fn report(self) -> std::process::ExitCode {
        0.into()
    }
}
