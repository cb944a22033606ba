//! Per-image pipeline orchestration and batch processing.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};
use walkdir::WalkDir;

use crate::enhance;
use crate::error::{Error, Result};
use crate::mask;
use crate::overlay;
use crate::settings::Settings;

/// JPEG encode quality for saved outputs.
const JPEG_QUALITY: u8 = 88;

/// Options controlling batch directory processing.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Descend into subdirectories, mirroring the structure in the output.
    pub recursive: bool,
    /// Filename patterns to exclude (`*` wildcards, case-insensitive).
    pub exclude: Vec<String>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            exclude: vec!["logo.*".to_string()],
        }
    }
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Input path of the processed file.
    pub path: PathBuf,
    /// Output path the result was (or would have been) written to.
    pub output: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Whether the file was skipped (e.g. matched an exclusion pattern).
    pub skipped: bool,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    fn failure(path: &Path, output: &Path, message: String) -> Self {
        Self {
            path: path.to_path_buf(),
            output: output.to_path_buf(),
            success: false,
            skipped: false,
            message,
        }
    }

    fn skip(path: &Path, message: String) -> Self {
        Self {
            path: path.to_path_buf(),
            output: path.to_path_buf(),
            success: true,
            skipped: true,
            message,
        }
    }
}

/// The edit engine holding the run-wide settings and the pre-loaded logo.
///
/// Create once with [`EditEngine::new()`] and reuse for every image in the
/// run. Each image is a pure function of (source, logo, settings), so the
/// engine is freely shareable across threads.
pub struct EditEngine {
    settings: Settings,
    logo: Option<RgbaImage>,
}

impl EditEngine {
    /// Create an engine, validating settings and loading the logo once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for out-of-range settings, or
    /// [`Error::LogoLoad`] if a requested logo cannot be decoded — fatal,
    /// since every output would otherwise silently lack the overlay.
    pub fn new(settings: Settings, logo_path: Option<&Path>) -> Result<Self> {
        settings.validate()?;
        let logo = match logo_path {
            Some(path) => Some(
                image::open(path)
                    .map_err(|source| Error::LogoLoad {
                        path: path.to_path_buf(),
                        source,
                    })?
                    .to_rgba8(),
            ),
            None => None,
        };
        Ok(Self { settings, logo })
    }

    /// Whether a logo was loaded for this run.
    #[must_use]
    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }

    /// Run the full edit pipeline on an in-memory image.
    ///
    /// Order: center mask, background blur blend, contrast + unsharp boost,
    /// then the logo plate overlay (skipped when no logo was loaded).
    #[must_use]
    pub fn enhance_image(&self, image: &DynamicImage) -> RgbaImage {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let weight = mask::center_mask(width, height, &self.settings);
        let blended = enhance::blend_blur(&rgb, &weight, self.settings.blur_radius);
        let boosted = enhance::quality_boost(&blended, &self.settings);

        let mut out = DynamicImage::ImageRgb8(boosted).to_rgba8();
        if let Some(logo) = &self.logo {
            let scaled = overlay::scale_logo(logo, width, &self.settings);
            overlay::overlay_logo(&mut out, &scaled, &self.settings);
        }
        out
    }

    /// Process a single image file: load, enhance, save.
    ///
    /// Never writes to the input path; errors are captured in the returned
    /// [`ProcessResult`] rather than propagated, so batch runs can continue
    /// past a bad file.
    #[must_use]
    pub fn process_file(&self, input: &Path, output: &Path) -> ProcessResult {
        if refers_to_same_file(input, output) {
            return ProcessResult::failure(
                input,
                output,
                Error::SameOutputPath(output.to_path_buf()).to_string(),
            );
        }

        let image = match image::open(input) {
            Ok(img) => img,
            Err(e) => return ProcessResult::failure(input, output, format!("Failed to load: {e}")),
        };

        let edited = self.enhance_image(&image);

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    return ProcessResult::failure(
                        input,
                        output,
                        format!("Failed to create output directory: {e}"),
                    );
                }
            }
        }

        match save_image(&edited, output) {
            Ok(()) => ProcessResult {
                path: input.to_path_buf(),
                output: output.to_path_buf(),
                success: true,
                skipped: false,
                message: "Edited".to_string(),
            },
            Err(e) => ProcessResult::failure(input, output, format!("Failed to save: {e}")),
        }
    }

    /// Process all supported images in a directory, mirroring filenames
    /// (and, recursively, subpaths) into `output_dir`.
    ///
    /// Partial-failure tolerant: a bad file yields a failed
    /// [`ProcessResult`] and processing continues. Uses parallel iteration
    /// when the `cli` feature is enabled (via rayon).
    #[must_use]
    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        opts: &BatchOptions,
    ) -> Vec<ProcessResult> {
        let plan = match plan_batch(input_dir, output_dir, opts) {
            Ok(plan) => plan,
            Err(e) => {
                return vec![ProcessResult::failure(
                    input_dir,
                    output_dir,
                    e.to_string(),
                )];
            }
        };

        if let Err(e) = std::fs::create_dir_all(output_dir) {
            return vec![ProcessResult::failure(
                output_dir,
                output_dir,
                format!("Failed to create output directory: {e}"),
            )];
        }

        #[cfg(feature = "cli")]
        let mut results: Vec<ProcessResult> = {
            use rayon::prelude::*;
            plan.pairs
                .par_iter()
                .map(|(src, dst)| self.process_file(src, dst))
                .collect()
        };

        #[cfg(not(feature = "cli"))]
        let mut results: Vec<ProcessResult> = plan
            .pairs
            .iter()
            .map(|(src, dst)| self.process_file(src, dst))
            .collect();

        for src in &plan.excluded {
            results.push(ProcessResult::skip(
                src,
                "Matched exclusion pattern".to_string(),
            ));
        }
        results
    }
}

/// Planned work for a batch run: what to process and what to skip.
#[derive(Debug)]
pub struct BatchPlan {
    /// (input, output) path pairs to process, in deterministic order.
    pub pairs: Vec<(PathBuf, PathBuf)>,
    /// Enumerated image files that matched an exclusion pattern.
    pub excluded: Vec<PathBuf>,
}

/// Plan a batch run without writing anything.
///
/// Enumerates supported images under `input_dir` (honoring recursion),
/// splits off files matching an exclusion pattern, and mirrors the rest
/// into `output_dir`. Used both by [`EditEngine::process_directory`] and
/// by dry-run reporting.
///
/// # Errors
///
/// Returns [`Error::Config`] if the output directory resolves to the
/// input directory, or [`Error::Io`] if the input cannot be read.
pub fn plan_batch(input_dir: &Path, output_dir: &Path, opts: &BatchOptions) -> Result<BatchPlan> {
    if refers_to_same_file(input_dir, output_dir) {
        return Err(Error::Config(
            "output directory must differ from input directory".into(),
        ));
    }
    if !input_dir.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("not a directory: {}", input_dir.display()),
        )));
    }

    let images = discover_images(input_dir, opts.recursive);
    let mut pairs = Vec::with_capacity(images.len());
    let mut excluded = Vec::new();
    for src in images {
        if is_excluded(&src, &opts.exclude) {
            excluded.push(src);
            continue;
        }
        let rel = src.strip_prefix(input_dir).unwrap_or(&src);
        pairs.push((src.clone(), output_dir.join(rel)));
    }
    Ok(BatchPlan { pairs, excluded })
}

/// Best-effort check that two paths name the same underlying file.
///
/// Literal equality is checked first; beyond that both paths are resolved
/// through `fs::canonicalize`, so a symlink or relative alias of an
/// existing input cannot slip past the originals-are-preserved guard. A
/// not-yet-existing output is resolved through its parent directory.
fn refers_to_same_file(input: &Path, output: &Path) -> bool {
    if input == output {
        return true;
    }
    match (resolve_path(input), resolve_path(output)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn resolve_path(path: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = std::fs::canonicalize(path) {
        return Some(resolved);
    }
    // Not created yet: resolve the parent and re-attach the filename.
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::canonicalize(parent).ok().map(|p| p.join(name))
}

/// Discover supported image files under a path, sorted for deterministic
/// ordering. Non-recursive enumeration stops at the top level.
#[must_use]
pub fn discover_images(dir: &Path, recursive: bool) -> Vec<PathBuf> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(max_depth)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_supported_image(p))
        .collect();
    files.sort();
    files
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp"
        ),
        None => false,
    }
}

/// Match a filename against a pattern where `*` matches any run of
/// characters. Comparison is case-insensitive.
#[must_use]
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    fn step(p: &[char], t: &[char]) -> bool {
        match p.first() {
            None => t.is_empty(),
            Some('*') => step(&p[1..], t) || (!t.is_empty() && step(p, &t[1..])),
            Some(&c) => t.first() == Some(&c) && step(&p[1..], &t[1..]),
        }
    }
    let p: Vec<char> = pattern.to_lowercase().chars().collect();
    let t: Vec<char> = name.to_lowercase().chars().collect();
    step(&p, &t)
}

fn is_excluded(path: &Path, patterns: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    patterns.iter().any(|pat| matches_pattern(name, pat))
}

/// Save an image with format-specific quality settings.
///
/// JPEG is flattened to RGB and encoded at quality 88; PNG and WebP keep
/// the alpha channel; BMP is flattened to RGB.
///
/// # Errors
///
/// Returns an error if the target format is unsupported or writing fails.
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            let file = std::fs::File::create(path)?;
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(file, JPEG_QUALITY);
            encoder.encode_image(&rgb)?;
        }
        ImageFormat::Png | ImageFormat::WebP => {
            img.save(path)?;
        }
        ImageFormat::Bmp => {
            DynamicImage::ImageRgba8(img.clone()).to_rgb8().save(path)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_polished.jpg"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let ext = input.extension().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_polished.{ext}"))
}
