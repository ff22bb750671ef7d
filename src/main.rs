// Hide the console window on Windows in release builds.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use crop_select::image_ops::{open_image, save_image};
use crop_select::{CropTarget, SessionOutcome, config};
use tracing::info;
use tracing_subscriber::EnvFilter;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

const HELP: &str = "\
crop-select: drag a rectangle over an image and save the cropped area

USAGE:
  crop-select [OPTIONS] [INPUT]

ARGS:
  INPUT            Image to open (a file dialog is shown when omitted)

OPTIONS:
  --out PATH       Where to write the cropped image (save dialog when omitted)
  --config PATH    Settings file to use instead of the default location
  --write-config   Write the effective settings to the settings file and exit
  -h, --help       Print this help

CONTROLS:
  drag             Draw the selection
  Shift + drag     Move the selection (start inside it)
  Enter / Space / double-click   Crop and save
  Esc / right-click              Cancel
";

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("crop_select=info")),
        )
        .init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }
    let out: Option<PathBuf> = args.opt_value_from_str("--out")?;
    let config_path: Option<PathBuf> = args.opt_value_from_str("--config")?;
    let write_config = args.contains("--write-config");
    let input = args.finish().into_iter().next().map(PathBuf::from);

    let config = match &config_path {
        Some(path) if write_config && !path.exists() => config::Config::default(),
        Some(path) => config::load_from_path(path)
            .with_context(|| format!("failed to read settings {}", path.display()))?,
        None => config::load()?,
    };

    if write_config {
        let path = config_path
            .or_else(config::default_config_path)
            .context("no settings location on this platform, pass --config")?;
        config::save_to_path(&config, &path)
            .with_context(|| format!("failed to write settings {}", path.display()))?;
        info!(path = %path.display(), "settings written");
        return Ok(());
    }

    let Some(input) = input.or_else(pick_image) else {
        info!("no image selected");
        return Ok(());
    };
    let image =
        open_image(&input).with_context(|| format!("failed to open {}", input.display()))?;
    let image = Rc::new(image);
    info!(path = %input.display(), width = image.width(), height = image.height(), "image loaded");

    match app::run_selection(Rc::clone(&image), config)? {
        SessionOutcome::Cancelled => {
            info!("selection cancelled, nothing written");
        }
        SessionOutcome::Confirmed(crop) => {
            let cropped = image.apply_crop(crop);
            let Some(path) = out.or_else(|| pick_output(&input)) else {
                info!("save dialog dismissed, nothing written");
                return Ok(());
            };
            save_image(&cropped, &path)
                .with_context(|| format!("failed to save {}", path.display()))?;
            info!(path = %path.display(), ?crop, "cropped image saved");
        }
    }
    Ok(())
}

fn pick_image() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Image", IMAGE_EXTENSIONS)
        .pick_file()
}

fn pick_output(input: &Path) -> Option<PathBuf> {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let mut dialog = rfd::FileDialog::new()
        .add_filter("Image", IMAGE_EXTENSIONS)
        .set_file_name(format!("{stem}_cropped.png"));
    if let Some(dir) = input.parent().filter(|d| !d.as_os_str().is_empty()) {
        dialog = dialog.set_directory(dir);
    }
    dialog.save_file()
}
