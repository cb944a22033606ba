use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use photo_polish::{
    default_output_path, plan_batch, BatchOptions, EditEngine, PlateStyle, ProcessResult, Settings,
};

#[derive(Parser)]
#[command(
    name = "photo-polish",
    about = "Batch cosmetic photo edits: background blur, center focus, logo plate overlay",
    version,
    after_help = "Single image: photo-polish --input photo.jpg --output out/photo.jpg\n\
                  Batch:        photo-polish --input-dir photos --output-dir photos_out --logo logo.png\n\n\
                  Originals are never overwritten: the output location must differ from the input."
)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Single input image path
    #[arg(long, conflicts_with = "input_dir")]
    input: Option<PathBuf>,

    /// Single output image path (default: {name}_polished.{ext})
    #[arg(long)]
    output: Option<PathBuf>,

    /// Folder of images to process
    #[arg(long, requires = "output_dir")]
    input_dir: Option<PathBuf>,

    /// Output folder (mirrors input filenames)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Logo image path (PNG with transparency recommended)
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Descend into subdirectories
    #[arg(long)]
    recursive: bool,

    /// Filename pattern to exclude, repeatable (batch default: logo.*)
    #[arg(long = "exclude")]
    exclude: Vec<String>,

    /// List planned operations without writing files
    #[arg(long)]
    dry_run: bool,

    /// How many dry-run items to print
    #[arg(long, default_value_t = 30)]
    dry_run_limit: usize,

    /// Background blur strength (gaussian sigma)
    #[arg(long, default_value_t = 18.0)]
    blur: f32,

    /// Sharp-center size as a fraction of each dimension (0-1)
    #[arg(long, default_value_t = 0.72)]
    center_scale: f32,

    /// Mask feather radius in pixels
    #[arg(long, default_value_t = 18)]
    feather: u32,

    /// Global contrast factor (1.0 = unchanged)
    #[arg(long, default_value_t = 1.06)]
    contrast: f32,

    /// Logo width as a fraction of image width (0-1)
    #[arg(long, default_value_t = 0.13)]
    logo_scale: f32,

    /// Plate style: frosted, dark, or light
    #[arg(long, default_value = "frosted")]
    plate_style: PlateStyle,

    /// Blur radius for the frosted plate
    #[arg(long, default_value_t = 10.0)]
    plate_blur: f32,

    /// Frosted plate darkening, 0-255 (higher = darker)
    #[arg(long, default_value_t = 110)]
    plate_tint_alpha: u8,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let settings = Settings {
        blur_radius: cli.blur,
        center_scale: cli.center_scale,
        feather: cli.feather,
        contrast: cli.contrast,
        logo_scale: cli.logo_scale,
        plate_style: cli.plate_style,
        plate_blur_radius: cli.plate_blur,
        plate_tint_alpha: cli.plate_tint_alpha,
        ..Settings::default()
    };

    let engine = match EditEngine::new(settings, cli.logo.as_deref()) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Fatal: {e}");
            process::exit(1);
        }
    };

    if let (Some(input_dir), Some(output_dir)) = (&cli.input_dir, &cli.output_dir) {
        run_batch(&cli, &engine, input_dir, output_dir);
    } else if let Some(input) = &cli.input {
        run_single(&cli, &engine, input);
    } else {
        eprintln!("Error: Provide either --input OR --input-dir/--output-dir");
        eprintln!("Run with --help for usage");
        process::exit(1);
    }
}

fn run_single(cli: &Cli, engine: &EditEngine, input: &Path) {
    if !input.exists() {
        eprintln!("Error: Input path does not exist: {}", input.display());
        process::exit(1);
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(input));

    if cli.dry_run {
        if !cli.quiet {
            eprintln!("DRY-RUN: {} -> {}", input.display(), output.display());
        }
        return;
    }

    let result = engine.process_file(input, &output);
    print_result(&result, cli);
    if !result.success {
        process::exit(1);
    }
    if !cli.quiet {
        eprintln!("Wrote: {}", output.display());
    }
}

fn run_batch(cli: &Cli, engine: &EditEngine, input_dir: &Path, output_dir: &Path) {
    let opts = BatchOptions {
        recursive: cli.recursive,
        exclude: if cli.exclude.is_empty() {
            BatchOptions::default().exclude
        } else {
            cli.exclude.clone()
        },
    };

    let plan = match plan_batch(input_dir, output_dir, &opts) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("Fatal: {e}");
            process::exit(1);
        }
    };

    if plan.pairs.is_empty() {
        eprintln!("No images found in: {}", input_dir.display());
        process::exit(1);
    }

    if cli.dry_run {
        print_dry_run(&plan.pairs, cli.dry_run_limit.max(1));
        if !plan.excluded.is_empty() {
            eprintln!("({} excluded)", plan.excluded.len());
        }
        return;
    }

    if !cli.quiet {
        eprintln!(
            "Processing {} images -> {}",
            plan.pairs.len(),
            output_dir.display()
        );
        if !engine.has_logo() {
            eprintln!("Note: no --logo supplied, skipping overlay");
        }
        eprintln!();
    }

    let results = engine.process_directory(input_dir, output_dir, &opts);

    let mut success_count = 0u32;
    let mut skip_count = 0u32;
    let mut fail_count = 0u32;
    for r in &results {
        print_result(r, cli);
        if r.skipped {
            skip_count += 1;
        } else if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if !cli.quiet {
        eprintln!();
        eprint!("[Summary] Processed: {success_count}");
        if skip_count > 0 {
            eprint!(", Skipped: {skip_count}");
        }
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    // 0 = all succeeded, 1 = nothing succeeded, 2 = partial success.
    if success_count == 0 && fail_count > 0 {
        process::exit(1);
    }
    if fail_count > 0 {
        process::exit(2);
    }
}

fn print_dry_run(pairs: &[(PathBuf, PathBuf)], limit: usize) {
    eprintln!("DRY-RUN: {} images", pairs.len());
    for (src, dst) in pairs.iter().take(limit) {
        eprintln!("[DRY] {} -> {}", src.display(), dst.display());
    }
    if pairs.len() > limit {
        eprintln!("... ({} more not shown)", pairs.len() - limit);
    }
}

fn print_result(result: &ProcessResult, cli: &Cli) {
    if cli.quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.skipped {
        if !cli.quiet {
            eprintln!("[SKIP] {filename}: {}", result.message);
        }
    } else if result.success {
        if !cli.quiet {
            eprintln!("[OK] {filename}");
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if cli.verbose && result.success && !result.skipped {
        eprintln!("  -> {}", result.output.display());
    }
}
