//! wp2md - WordPress export to Markdown converter

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use wp2md::blog::{Blog, ConvertOptions, DEFAULT_MEDIA_DIR, save};
use wp2md::{IdentityRewriter, convert_html_to_markdown};

#[derive(Parser)]
#[command(name = "wp2md")]
#[command(version, about = "WordPress export to Markdown converter", long_about = None)]
#[command(after_help = "EXAMPLES:
    wp2md blog.wordpress.xml posts/     Convert every published post
    wp2md --convert post.html           Convert one post body to stdout")]
struct Cli {
    /// WordPress export (WXR) file
    #[arg(value_name = "INPUT", required_unless_present = "convert")]
    input: Option<PathBuf>,

    /// Directory the Markdown posts are written to
    #[arg(value_name = "OUTPUT_DIR", required_unless_present = "convert")]
    output: Option<PathBuf>,

    /// Convert a single HTML file to Markdown on stdout
    #[arg(long, value_name = "FILE", conflicts_with_all = ["input", "output"])]
    convert: Option<PathBuf>,

    /// Skip posts that fail to convert instead of stopping
    #[arg(short, long)]
    keep_going: bool,

    /// Also write drafts, pending and private posts
    #[arg(long)]
    drafts: bool,

    /// Media directory name inside OUTPUT_DIR
    #[arg(long, value_name = "DIR", default_value = DEFAULT_MEDIA_DIR)]
    media_dir: String,

    /// Write the attachment download list to OUTPUT_DIR/attachments.json
    #[arg(long)]
    manifest: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Serialize)]
struct ManifestEntry<'a> {
    url: &'a str,
    filename: &'a str,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match (&cli.convert, &cli.input, &cli.output) {
        (Some(file), _, _) => convert_file(file),
        (None, Some(input), Some(output)) => convert_export(&cli, input, output),
        _ => Err("missing INPUT or OUTPUT_DIR".to_string()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn convert_file(path: &Path) -> Result<(), String> {
    let html = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let markdown = convert_html_to_markdown(&html, &IdentityRewriter).map_err(|e| e.to_string())?;
    print!("{markdown}");
    Ok(())
}

fn convert_export(cli: &Cli, input: &Path, output: &Path) -> Result<(), String> {
    let options = ConvertOptions {
        media_dir: cli.media_dir.clone(),
        keep_going: cli.keep_going,
        include_drafts: cli.drafts,
    };

    let channel = wp2md::wxr::read_wxr(input).map_err(|e| format!("{}: {e}", input.display()))?;
    log::info!("read {:?} with {} items", channel.title, channel.items.len());

    let blog = Blog::from_channel(&channel, &options).map_err(|e| e.to_string())?;
    let written = save(&blog, output, &options).map_err(|e| e.to_string())?;

    if cli.manifest {
        write_manifest(&blog, &output.join("attachments.json"))?;
    }

    if !blog.failures.is_empty() {
        log::warn!("{} posts could not be converted", blog.failures.len());
    }
    log::info!("done: {written} posts");
    Ok(())
}

fn write_manifest(blog: &Blog, path: &Path) -> Result<(), String> {
    let entries: Vec<ManifestEntry<'_>> = blog
        .attachment_manifest()
        .into_iter()
        .map(|(url, filename)| ManifestEntry { url, filename })
        .collect();
    let json = serde_json::to_string_pretty(&entries).map_err(|e| e.to_string())?;
    fs::write(path, json).map_err(|e| format!("{}: {e}", path.display()))?;
    log::info!("wrote {} attachments to {}", entries.len(), path.display());
    Ok(())
}
