use clap::{Parser, Subcommand};
use imgstage::config::{self, StageConfig};
use imgstage::{Anchor, ImageHandle, PngCompression, Quality, ResizeOptions, output};
use std::path::PathBuf;

/// Where a staged result goes and what it is called.
#[derive(clap::Args, Clone)]
struct PublishArgs {
    /// Destination directory for the result
    #[arg(long)]
    dest: PathBuf,

    /// File name for the result (extension added from the detected type)
    #[arg(long)]
    name: Option<String>,

    /// Delete the input once the result is published
    #[arg(long)]
    remove_origin: bool,
}

fn version_string() -> &'static str {
    let on_tag = env!("IMGSTAGE_RELEASE");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("IMGSTAGE_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "imgstage")]
#[command(about = "Inspect, stage and resize images")]
#[command(long_about = "\
Inspect, stage and resize images

The input is copied into a staging directory, resized there if requested,
and then published into the destination directory. The image type is
detected from the file contents, never from the extension.

Resizing (pick one mode):
  --width/--height   Target box; a missing edge follows the aspect ratio.
                     With --anchor the image fills the box and is cropped
                     at the anchor point.
  --ratio N          Shrink each oriented edge by 1/N (grow with --maximize).
                     Width is the oriented edge unless --height-oriented.

Run 'imgstage gen-config' to generate a documented imgstage.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (imgstage.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the detected type, dimensions and size of an image
    Inspect {
        input: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Copy an image into the destination without resizing
    Stage {
        input: PathBuf,
        #[command(flatten)]
        publish: PublishArgs,
    },
    /// Resize an image and publish the result
    Resize {
        input: PathBuf,
        #[command(flatten)]
        publish: PublishArgs,
        #[arg(long, default_value_t = 0)]
        width: u32,
        #[arg(long, default_value_t = 0)]
        height: u32,
        #[arg(long, default_value_t = 0)]
        ratio: u32,
        /// Scale the width by the ratio (default when no orientation is given)
        #[arg(long)]
        width_oriented: bool,
        /// Scale the height by the ratio
        #[arg(long)]
        height_oriented: bool,
        /// Grow by the ratio instead of shrinking
        #[arg(long)]
        maximize: bool,
        /// Fill the box and crop at this point (e.g. center, top-left)
        #[arg(long)]
        anchor: Option<Anchor>,
        /// JPEG quality (1-100)
        #[arg(long)]
        quality: Option<u8>,
        /// PNG compression: default, fast or best
        #[arg(long)]
        png_compression: Option<PngCompression>,
    },
    /// Print a stock imgstage.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let stage_config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => StageConfig::default(),
    };

    match cli.command {
        Command::Inspect { input, json } => {
            let finished = ImageHandle::from_path(&input)
                .with_config(stage_config)
                .remove_origin(false)
                .finish()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&finished.detail)?);
            } else {
                output::print_detail(&input.display().to_string(), &finished.detail);
            }
        }
        Command::Stage { input, publish } => {
            let finished = publish_handle(ImageHandle::from_path(&input), stage_config, &publish)
                .move_to_temp()
                .finish()?;
            output::print_finished(&input.display().to_string(), &finished);
        }
        Command::Resize {
            input,
            publish,
            width,
            height,
            ratio,
            width_oriented,
            height_oriented,
            maximize,
            anchor,
            quality,
            png_compression,
        } => {
            let options = ResizeOptions {
                anchor,
                ratio,
                width,
                height,
                width_oriented,
                height_oriented,
                maximize,
                minimize: false,
            };
            let mut handle = publish_handle(ImageHandle::from_path(&input), stage_config, &publish);
            if let Some(q) = quality {
                handle = handle.set_quality(Quality::new(q));
            }
            if let Some(level) = png_compression {
                handle = handle.set_quality(level);
            }
            let finished = handle.resize(options).finish()?;
            output::print_finished(&input.display().to_string(), &finished);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Apply config and the shared publish flags to a handle.
fn publish_handle(handle: ImageHandle, config: StageConfig, args: &PublishArgs) -> ImageHandle {
    let remove_origin = args.remove_origin || config.remove_origin;
    let mut handle = handle
        .with_config(config)
        .set_destination(&args.dest)
        .remove_origin(remove_origin);
    if let Some(name) = &args.name {
        handle = handle.set_name(name);
    }
    handle
}
