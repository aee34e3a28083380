mod logger;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use photobook_layout::constants::OPTIONS_FILE_NAME;
use photobook_layout::{AdjustmentPatch, BookOptions, LayoutTemplate, Schema, SlotType};
use photobook_render::RenderOptions;
use std::path::{Path, PathBuf};

use crate::logger::ConsoleLogger;

#[derive(Parser)]
#[command(name = "photobook", about = "Photobook layout and PDF generator", version)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RootArgs {
    /// Photobook root folder (one sub-folder per section)
    root: PathBuf,

    /// Options file; defaults to photobook.json in the root
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default options file to the root
    Init {
        #[command(flatten)]
        root: RootArgs,

        /// Replace an existing options file
        #[arg(long)]
        force: bool,
    },

    /// Load or create the page schema and show its statistics
    Plan {
        #[command(flatten)]
        root: RootArgs,

        /// Plan from scratch, discarding layout edits and adjustments
        #[arg(long)]
        regenerate: bool,
    },

    /// Render an existing schema to PDF
    Render {
        #[command(flatten)]
        root: RootArgs,

        /// Output PDF file (default: photobook.pdf in the root)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Resolution of embedded photos
        #[arg(long, default_value = "300")]
        dpi: f32,
    },

    /// Plan when needed, then render
    Generate {
        #[command(flatten)]
        root: RootArgs,

        /// Output PDF file
        output: PathBuf,

        /// Resolution of embedded photos
        #[arg(long, default_value = "300")]
        dpi: f32,
    },

    /// Change the layout of one content page
    SetLayout {
        #[command(flatten)]
        root: RootArgs,

        /// 1-based page number
        #[arg(short, long)]
        page: usize,

        #[arg(short, long, value_enum)]
        layout: LayoutArg,
    },

    /// Set pan, zoom or slot type of a photo
    Adjust {
        #[command(flatten)]
        root: RootArgs,

        /// Photo identifier (path relative to the root)
        #[arg(long)]
        photo: String,

        #[arg(long, value_parser = parse_finite)]
        pan_x: Option<f64>,

        #[arg(long, value_parser = parse_finite)]
        pan_y: Option<f64>,

        #[arg(long, value_parser = parse_finite)]
        zoom: Option<f64>,

        #[arg(long, value_enum)]
        slot_type: Option<SlotArg>,
    },

    /// Show statistics about the schema
    Stats {
        #[command(flatten)]
        root: RootArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    #[value(name = "L1", alias = "l1")]
    L1,
    #[value(name = "L2H", alias = "l2h")]
    L2h,
    #[value(name = "L2V", alias = "l2v")]
    L2v,
    #[value(name = "L3A", alias = "l3a")]
    L3a,
    #[value(name = "L3B", alias = "l3b")]
    L3b,
    #[value(name = "L3C", alias = "l3c")]
    L3c,
    #[value(name = "L3D", alias = "l3d")]
    L3d,
    #[value(name = "L4", alias = "l4")]
    L4,
}

#[derive(Clone, Copy, ValueEnum)]
enum SlotArg {
    Auto,
    Full,
    FvL,
    FvR,
    FhT,
    FhB,
    Square,
}

impl From<LayoutArg> for LayoutTemplate {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::L1 => Self::L1,
            LayoutArg::L2h => Self::L2H,
            LayoutArg::L2v => Self::L2V,
            LayoutArg::L3a => Self::L3A,
            LayoutArg::L3b => Self::L3B,
            LayoutArg::L3c => Self::L3C,
            LayoutArg::L3d => Self::L3D,
            LayoutArg::L4 => Self::L4,
        }
    }
}

impl From<SlotArg> for SlotType {
    fn from(arg: SlotArg) -> Self {
        match arg {
            SlotArg::Auto => Self::Auto,
            SlotArg::Full => Self::Full,
            SlotArg::FvL => Self::VerticalLeft,
            SlotArg::FvR => Self::VerticalRight,
            SlotArg::FhT => Self::HorizontalTop,
            SlotArg::FhB => Self::HorizontalBottom,
            SlotArg::Square => Self::Square,
        }
    }
}

impl RootArgs {
    fn path(&self) -> Result<&Path> {
        if !self.root.is_dir() {
            bail!("Photobook root {} is not a folder", self.root.display());
        }
        Ok(self.root.as_path())
    }

    async fn options(&self) -> Result<BookOptions> {
        BookOptions::resolve(&self.root, self.config.as_deref())
            .await
            .context("Failed to load photobook options")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logger = ConsoleLogger::new(cli.verbose);
    logger.clone().init().context("Failed to install logger")?;

    match cli.command {
        Commands::Init { root, force } => {
            let path = match &root.config {
                Some(path) => path.clone(),
                None => root.path()?.join(OPTIONS_FILE_NAME),
            };
            if path.exists() && !force {
                bail!("{} already exists (use --force to replace it)", path.display());
            }
            BookOptions::default().save(&path).await?;
            println!("Wrote default options → {}", path.display());
        }

        Commands::Plan { root, regenerate } => {
            let options = root.options().await?;
            let dir = root.path()?;
            let schema = if regenerate {
                let schema = Schema::plan(dir, &options).await?;
                schema.save(Schema::file_path(dir)).await?;
                schema
            } else {
                load_or_plan(dir, &options).await?
            };
            print_statistics(&schema);
            println!("Schema → {}", Schema::file_path(dir).display());
        }

        Commands::Render { root, output, dpi } => {
            let options = root.options().await?;
            let dir = root.path()?;
            let schema = load_schema(dir).await?;
            let output = output.unwrap_or_else(|| dir.join("photobook.pdf"));
            render(dir, &schema, &options, &output, dpi).await?;
        }

        Commands::Generate { root, output, dpi } => {
            let options = root.options().await?;
            let dir = root.path()?;
            let schema = load_or_plan(dir, &options).await?;
            let output = output.with_extension("pdf");
            render(dir, &schema, &options, &output, dpi).await?;
        }

        Commands::SetLayout { root, page, layout } => {
            let dir = root.path()?;
            let mut schema = load_schema(dir).await?;
            let index = page.checked_sub(1).context("Page numbers start at 1")?;
            let layout = LayoutTemplate::from(layout);
            let before = schema.pages.len();

            schema.set_page_layout(index, layout)?;
            schema.save(Schema::file_path(dir)).await?;
            println!("Page {} → {}", page, layout);
            if schema.pages.len() != before {
                println!("  Section repaginated: {} → {} pages", before, schema.pages.len());
            }
        }

        Commands::Adjust {
            root,
            photo,
            pan_x,
            pan_y,
            zoom,
            slot_type,
        } => {
            let patch = AdjustmentPatch {
                pan_x,
                pan_y,
                zoom,
                slot_type: slot_type.map(SlotType::from),
            };
            if patch.is_empty() {
                bail!("Nothing to adjust: pass --pan-x, --pan-y, --zoom or --slot-type");
            }
            let dir = root.path()?;
            let mut schema = load_schema(dir).await?;
            schema.update_photo(&photo, &patch)?;
            schema.save(Schema::file_path(dir)).await?;
            println!("Adjusted {}", photo);
        }

        Commands::Stats { root } => {
            let schema = load_schema(root.path()?).await?;
            print_statistics(&schema);
        }
    }

    let warnings = logger.warning_count();
    if warnings > 0 {
        println!("Completed with {} warnings", warnings);
    }
    Ok(())
}

fn parse_finite(value: &str) -> std::result::Result<f64, String> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(format!("{} is not a finite number", value)),
        Err(e) => Err(e.to_string()),
    }
}

/// The saved schema with the legacy adjustment file applied once
async fn load_schema(root: &Path) -> Result<Schema> {
    let mut schema = Schema::load_from_root(root)
        .await?
        .context("No schema yet; run `photobook plan` first")?;
    if schema.migrate_legacy(root).await? > 0 {
        schema.save(Schema::file_path(root)).await?;
    }
    Ok(schema)
}

async fn load_or_plan(root: &Path, options: &BookOptions) -> Result<Schema> {
    if Schema::file_path(root).exists() {
        return load_schema(root).await;
    }
    log::info!("No schema found, planning {}", root.display());
    let schema = Schema::plan(root, options).await?;
    schema.save(Schema::file_path(root)).await?;
    Ok(schema)
}

async fn render(root: &Path, schema: &Schema, options: &BookOptions, output: &Path, dpi: f32) -> Result<()> {
    let book = schema.to_book(root, options)?;
    let render_options = RenderOptions {
        image_dpi: dpi,
        document_title: options.title.clone(),
        ..Default::default()
    };

    let summary = photobook_render::render_book(&book, &render_options, output).await?;
    println!(
        "Rendered {} pages with {} photos → {}",
        summary.pages,
        summary.photos,
        output.display()
    );
    if summary.skipped_photos > 0 {
        println!("  Skipped photos: {}", summary.skipped_photos);
    }
    Ok(())
}

fn print_statistics(schema: &Schema) {
    let stats = photobook_layout::calculate_statistics(schema);
    println!("Photobook Statistics:");
    println!("  Photos: {}", stats.photos);
    println!("  Sections: {}", stats.sections);
    println!("  Content pages: {}", stats.content_pages);
    println!("  Total pages: {}", stats.total_pages);
    for (layout, count) in &stats.pages_per_layout {
        println!("    {}: {}", layout, count);
    }
    println!("  Photos with subjects: {}", stats.photos_with_subjects);
    println!("  Adjusted photos: {}", stats.adjusted_photos);
}
