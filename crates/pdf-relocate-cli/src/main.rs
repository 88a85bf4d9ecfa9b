use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pdf_relocate::{
    BatchInput, CoordinateRole, CoordinateStore, EditableDocument, PageRasterizer,
    PdfiumRasterizer, PointMm, RectMm, RelocateOptions, constants::DEFAULT_PAGE_NUMBER,
    load_pdf_bytes, output_path_for, pt_to_mm, relocate_batch, save_pdf_bytes,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "pdfr", about = "Move an address block on PDF pages", version)]
struct Cli {
    /// Coordinate store file (defaults to the user config directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a region, white it out and paste it elsewhere on the page
    Move {
        /// Input PDF file(s), processed in order
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output directory (defaults to next to each input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Source rectangle in mm: x,y,width,height (top-left origin)
        #[arg(long, value_parser = parse_rect)]
        source: Option<RectMm>,

        /// Destination top-left corner in mm: x,y
        #[arg(long, value_parser = parse_point)]
        dest: Option<PointMm>,

        /// Extra rectangle to white out in mm: x,y,width,height
        #[arg(long, value_parser = parse_rect)]
        cover: Option<RectMm>,

        /// Page to edit (1-indexed)
        #[arg(long)]
        page: Option<usize>,

        /// Pause between documents in milliseconds
        #[arg(long, default_value = "0")]
        delay_ms: u64,

        /// JSON options file; command-line values take precedence
        #[arg(long)]
        config: Option<PathBuf>,

        /// Save the coordinates used to the store
        #[arg(long)]
        remember: bool,

        /// Directory containing the Pdfium library
        #[arg(long)]
        pdfium_dir: Option<PathBuf>,
    },

    /// Show or edit the saved coordinates
    Coords {
        #[command(subcommand)]
        action: CoordsAction,
    },

    /// Print page count and page sizes
    Info {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Subcommand)]
enum CoordsAction {
    Show,
    SetSource {
        #[arg(value_parser = parse_rect)]
        rect: RectMm,
    },
    SetDest {
        #[arg(value_parser = parse_point)]
        point: PointMm,
    },
    SetCover {
        #[arg(value_parser = parse_rect)]
        rect: RectMm,
    },
    ClearCover,
    Reset,
}

fn parse_numbers<const N: usize>(s: &str) -> std::result::Result<[f64; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {} comma-separated numbers, got '{}'", N, s));
    }
    let mut values = [0.0; N];
    for (value, part) in values.iter_mut().zip(parts) {
        *value = part
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{}': {}", part, e))?;
        if !value.is_finite() {
            return Err(format!("invalid number '{}'", part));
        }
    }
    Ok(values)
}

fn parse_rect(s: &str) -> std::result::Result<RectMm, String> {
    let [x, y, width, height] = parse_numbers::<4>(s)?;
    Ok(RectMm::new(x, y, width, height))
}

fn parse_point(s: &str) -> std::result::Result<PointMm, String> {
    let [x, y] = parse_numbers::<2>(s)?;
    Ok(PointMm::new(x, y))
}

fn open_store(path: Option<&Path>) -> Result<CoordinateStore> {
    let store = match path {
        Some(path) => CoordinateStore::open(path),
        None => CoordinateStore::open_default(),
    };
    store.context("Failed to open coordinate store")
}

fn format_rect(rect: Option<RectMm>) -> String {
    match rect {
        Some(r) => format!(
            "x {:.1} mm, y {:.1} mm, {:.1} x {:.1} mm",
            r.x, r.y, r.width, r.height
        ),
        None => "(unset)".to_string(),
    }
}

fn format_point(point: Option<PointMm>) -> String {
    match point {
        Some(p) => format!("x {:.1} mm, y {:.1} mm", p.x, p.y),
        None => "(unset)".to_string(),
    }
}

struct MoveArgs {
    source: Option<RectMm>,
    dest: Option<PointMm>,
    cover: Option<RectMm>,
    page: Option<usize>,
    config: Option<PathBuf>,
}

/// Merge command-line values over the config file over the store
async fn resolve_options(args: MoveArgs, store: &CoordinateStore) -> Result<RelocateOptions> {
    let base = match &args.config {
        Some(path) => Some(
            RelocateOptions::load(path)
                .await
                .with_context(|| format!("Failed to load {}", path.display()))?,
        ),
        None => None,
    };

    let source = args
        .source
        .or(base.as_ref().map(|b| b.source))
        .or(store.source())
        .context("No source rectangle: pass --source or run `pdfr coords set-source`")?;
    let destination = args
        .dest
        .or(base.as_ref().map(|b| b.destination))
        .or(store.destination())
        .context("No destination: pass --dest or run `pdfr coords set-dest`")?;

    let mut options = RelocateOptions::new(source, destination);
    options.cover = args
        .cover
        .or(base.as_ref().and_then(|b| b.cover))
        .or(store.cover());
    options.page_number = args
        .page
        .or(base.as_ref().map(|b| b.page_number))
        .unwrap_or(DEFAULT_PAGE_NUMBER);
    if let Some(base) = &base {
        options.source_padding_pt = base.source_padding_pt;
    }

    options.validate()?;
    Ok(options)
}

/// Relocate every input in order and write each result
///
/// Inputs are read one at a time, so an unreadable file stops the run only
/// after the files before it have been written.
async fn move_files(
    input: &[PathBuf],
    output: Option<&Path>,
    options: &RelocateOptions,
    rasterizer: Arc<dyn PageRasterizer>,
    delay: Duration,
) -> Result<Vec<PathBuf>> {
    if let Some(dir) = output {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let inputs = input.iter().map(BatchInput::from_path).collect();
    let report = relocate_batch(inputs, options, rasterizer, delay, |index, total, document| {
        log::info!("[{}/{}] {} done", index + 1, total, document.source_name);
    })
    .await;

    let mut written = Vec::with_capacity(report.completed.len());
    for document in &report.completed {
        let path = output_path_for(Path::new(&document.source_name), output);
        save_pdf_bytes(&document.bytes, &path).await?;
        println!("{} → {}", document.source_name, path.display());
        written.push(path);
    }

    if let Some(failure) = report.failure {
        bail!(
            "{} failed: {} ({} file(s) not processed)",
            failure.name,
            failure.error,
            report.skipped
        );
    }
    Ok(written)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Move {
            input,
            output,
            source,
            dest,
            cover,
            page,
            delay_ms,
            config,
            remember,
            pdfium_dir,
        } => {
            let mut store = open_store(cli.store.as_deref())?;
            let options = resolve_options(
                MoveArgs {
                    source,
                    dest,
                    cover,
                    page,
                    config,
                },
                &store,
            )
            .await?;

            if remember {
                store.set_source(Some(options.source))?;
                store.set_destination(Some(options.destination))?;
                store.set_cover(options.cover)?;
                println!("Saved coordinates → {}", store.path().display());
            }

            let rasterizer: Arc<dyn PageRasterizer> = Arc::new(match pdfium_dir {
                Some(dir) => PdfiumRasterizer::with_library_dir(dir),
                None => PdfiumRasterizer::new(),
            });

            move_files(
                &input,
                output.as_deref(),
                &options,
                rasterizer,
                Duration::from_millis(delay_ms),
            )
            .await?;
        }

        Commands::Coords { action } => {
            let mut store = open_store(cli.store.as_deref())?;
            match action {
                CoordsAction::Show => {
                    println!("Store: {}", store.path().display());
                    println!("  Source:      {}", format_rect(store.source()));
                    println!("  Destination: {}", format_point(store.destination()));
                    println!("  Cover:       {}", format_rect(store.cover()));
                }
                CoordsAction::SetSource { rect } => {
                    if !rect.has_area() {
                        bail!("Source rectangle must have a positive width and height");
                    }
                    store.set_source(Some(rect))?;
                    println!("Source: {}", format_rect(store.source()));
                }
                CoordsAction::SetDest { point } => {
                    store.set_destination(Some(point))?;
                    println!("Destination: {}", format_point(store.destination()));
                }
                CoordsAction::SetCover { rect } => {
                    if !rect.has_area() {
                        bail!("Cover rectangle must have a positive width and height");
                    }
                    store.set_cover(Some(rect))?;
                    println!("Cover: {}", format_rect(store.cover()));
                }
                CoordsAction::ClearCover => {
                    store.clear(CoordinateRole::Cover)?;
                    println!("Cover cleared");
                }
                CoordsAction::Reset => {
                    store.reset()?;
                    println!("Coordinates reset");
                }
            }
        }

        Commands::Info { input } => {
            let bytes = load_pdf_bytes(&input).await?;
            let document = EditableDocument::load(&bytes)?;
            let page_count = document.page_count();
            println!("{}: {} page(s)", input.display(), page_count);
            for page_number in 1..=page_count {
                let (width_pt, height_pt) = document.page_size(page_number)?;
                println!(
                    "  Page {}: {:.1} x {:.1} mm",
                    page_number,
                    pt_to_mm(width_pt),
                    pt_to_mm(height_pt)
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use lopdf::{Dictionary, Document, Object, Stream};
    use pdf_relocate::RenderedPage;

    /// Renders every page plain white, truncating to whole pixels
    struct WhiteRasterizer;

    impl PageRasterizer for WhiteRasterizer {
        fn page_count(&self, pdf_bytes: &[u8]) -> pdf_relocate::Result<usize> {
            Ok(EditableDocument::load(pdf_bytes)?.page_count())
        }

        fn render_page(
            &self,
            pdf_bytes: &[u8],
            page_index: usize,
            scale: f64,
        ) -> pdf_relocate::Result<RenderedPage> {
            let (width_pt, height_pt) = self.page_size(pdf_bytes, page_index)?;
            Ok(RenderedPage {
                image: RgbaImage::from_pixel(
                    (width_pt * scale) as u32,
                    (height_pt * scale) as u32,
                    Rgba([255, 255, 255, 255]),
                ),
                width_pt,
                height_pt,
            })
        }

        fn page_size(
            &self,
            pdf_bytes: &[u8],
            page_index: usize,
        ) -> pdf_relocate::Result<(f64, f64)> {
            EditableDocument::load(pdf_bytes)?.page_size(page_index + 1)
        }
    }

    fn one_page_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            b"0 0 1 rg 50 50 100 100 re f".to_vec(),
        ));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(595),
                    Object::Integer(842),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        doc.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Kids", Object::Array(vec![Object::Reference(page_id)])),
                ("Count", Object::Integer(1)),
            ])),
        );
        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn address_options() -> RelocateOptions {
        RelocateOptions::new(
            RectMm::new(10.0, 10.0, 40.0, 15.0),
            PointMm::new(10.0, 150.0),
        )
    }

    #[test]
    fn test_parse_rect() {
        assert_eq!(
            parse_rect("10, 20.5,40,15").unwrap(),
            RectMm::new(10.0, 20.5, 40.0, 15.0)
        );
        assert!(parse_rect("10,20,40").is_err());
        assert!(parse_rect("10,20,forty,15").is_err());
        assert!(parse_rect("10,20,inf,15").is_err());
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("12,150").unwrap(), PointMm::new(12.0, 150.0));
        assert!(parse_point("12").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_move_args() {
        let cli = Cli::try_parse_from([
            "pdfr", "move", "-i", "a.pdf", "b.pdf", "--source", "1,2,3,4", "--dest", "5,6",
        ])
        .unwrap();
        match cli.command {
            Commands::Move {
                input,
                source,
                dest,
                delay_ms,
                ..
            } => {
                assert_eq!(input.len(), 2);
                assert_eq!(source, Some(RectMm::new(1.0, 2.0, 3.0, 4.0)));
                assert_eq!(dest, Some(PointMm::new(5.0, 6.0)));
                assert_eq!(delay_ms, 0);
            }
            _ => panic!("Expected move command"),
        }
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = CoordinateStore::open(dir.path().join("coords.json")).unwrap();
        store
            .set_source(Some(RectMm::new(10.0, 10.0, 40.0, 15.0)))
            .unwrap();
        store.set_destination(Some(PointMm::new(10.0, 150.0))).unwrap();

        let options = resolve_options(
            MoveArgs {
                source: None,
                dest: Some(PointMm::new(20.0, 160.0)),
                cover: None,
                page: None,
                config: None,
            },
            &store,
        )
        .await
        .unwrap();
        assert_eq!(options.source, RectMm::new(10.0, 10.0, 40.0, 15.0));
        assert_eq!(options.destination, PointMm::new(20.0, 160.0));
        assert_eq!(options.page_number, 1);

        store.reset().unwrap();
        let missing = resolve_options(
            MoveArgs {
                source: None,
                dest: None,
                cover: None,
                page: None,
                config: None,
            },
            &store,
        )
        .await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn test_move_writes_each_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = dir.path().join("a.pdf");
        let b = dir.path().join("b.pdf");
        std::fs::write(&a, one_page_pdf()).unwrap();
        std::fs::write(&b, one_page_pdf()).unwrap();
        let out = dir.path().join("out");

        let written = move_files(
            &[a, b],
            Some(&out),
            &address_options(),
            Arc::new(WhiteRasterizer),
            Duration::ZERO,
        )
        .await
        .unwrap();

        assert_eq!(
            written,
            vec![out.join("a-moved_address.pdf"), out.join("b-moved_address.pdf")]
        );
        assert!(written.iter().all(|path| path.exists()));
    }

    #[tokio::test]
    async fn test_missing_middle_file_keeps_earlier_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let first = dir.path().join("first.pdf");
        let third = dir.path().join("third.pdf");
        std::fs::write(&first, one_page_pdf()).unwrap();
        std::fs::write(&third, one_page_pdf()).unwrap();
        let missing = dir.path().join("missing.pdf");

        let result = move_files(
            &[first, missing, third],
            None,
            &address_options(),
            Arc::new(WhiteRasterizer),
            Duration::ZERO,
        )
        .await;

        let message = result.unwrap_err().to_string();
        assert!(message.contains("missing.pdf"), "{message}");
        assert!(message.contains("1 file(s) not processed"), "{message}");
        assert!(dir.path().join("first-moved_address.pdf").exists());
        assert!(!dir.path().join("third-moved_address.pdf").exists());
    }
}
