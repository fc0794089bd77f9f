use statement_render::{RenderError, RenderReport, RendererBuilder, StatementRequest, sample};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use std::time::{Duration, Instant};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Spawns a background thread reporting resident memory once a second.
/// Reports go to stderr so stdout carries only the metrics JSON.
fn spawn_memory_monitor() {
    thread::spawn(|| {
        let mut max_usage = 0;
        let start = Instant::now();
        loop {
            if let Some(usage) = memory_stats::memory_stats() {
                let mb = usage.physical_mem / 1024 / 1024;
                max_usage = max_usage.max(mb);
                eprintln!(
                    "[Monitor] T+{:<3}s | RSS: {:<4} MB | Peak: {:<4} MB",
                    start.elapsed().as_secs(),
                    mb,
                    max_usage
                );
            }
            thread::sleep(Duration::from_secs(1));
        }
    });
}

enum Mode {
    Render { input: PathBuf, output: PathBuf },
    Sample { count: usize, output_dir: PathBuf },
}

struct Options {
    mode: Mode,
    fonts: Option<PathBuf>,
    language: Option<String>,
    deterministic: bool,
}

fn usage(program: &str) -> ! {
    eprintln!("Renders credit card statements to PDF.");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} [options] <input.json> <output.pdf>", program);
    eprintln!("  {} [options] --sample <count> <output_dir>", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --fonts <dir>      directory holding the Noto Sans typefaces");
    eprintln!("  --lang <code>      override the request language (en, ta, hi)");
    eprintln!("  --deterministic    omit the creation timestamp");
    process::exit(1);
}

fn parse_args(args: &[String]) -> Option<Options> {
    let mut positional = Vec::new();
    let mut fonts = None;
    let mut language = None;
    let mut deterministic = false;
    let mut sample = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--fonts" => fonts = Some(PathBuf::from(iter.next()?)),
            "--lang" => language = Some(iter.next()?.clone()),
            "--deterministic" => deterministic = true,
            "--sample" => sample = true,
            other if other.starts_with("--") => return None,
            other => positional.push(other.to_string()),
        }
    }

    let mode = match (sample, positional.as_slice()) {
        (false, [input, output]) => Mode::Render {
            input: input.into(),
            output: output.into(),
        },
        (true, [count, output_dir]) => Mode::Sample {
            count: count.parse().ok()?,
            output_dir: output_dir.into(),
        },
        _ => return None,
    };
    Some(Options {
        mode,
        fonts,
        language,
        deterministic,
    })
}

fn print_reports(reports: &BTreeMap<String, RenderReport>) -> Result<(), RenderError> {
    println!("{}", serde_json::to_string_pretty(reports)?);
    Ok(())
}

fn main() -> Result<(), RenderError> {
    env_logger::init();
    spawn_memory_monitor();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("statement-render");
    let Some(options) = parse_args(&args) else {
        usage(program);
    };

    let mut builder = RendererBuilder::new().with_deterministic(options.deterministic);
    builder = match &options.fonts {
        Some(dir) => builder.with_font_dir(dir),
        None => builder.with_system_fonts(true),
    };
    let renderer = builder.build()?;

    let mut reports = BTreeMap::new();
    match options.mode {
        Mode::Render { input, output } => {
            eprintln!("Loading statement from {}", input.display());
            let json = fs::read_to_string(&input).map_err(|e| RenderError::assembly("read_input", e))?;
            let mut request = StatementRequest::from_json(&json)?;
            if let Some(language) = options.language {
                request.language = language;
            }
            let report = renderer.render_to_path(&request, &output)?;
            eprintln!("Successfully generated {}", output.display());
            reports.insert(output.display().to_string(), report);
        }
        Mode::Sample { count, output_dir } => {
            let languages: Vec<String> = match options.language {
                Some(language) => vec![language],
                None => renderer
                    .packs()
                    .supported()
                    .into_iter()
                    .map(|(code, _)| code.to_string())
                    .collect(),
            };
            for language in languages {
                let request = sample::sample_request(&language, count, 42);
                let output = Path::new(&output_dir).join(format!("statement_{}.pdf", language));
                let report = renderer.render_to_path(&request, &output)?;
                eprintln!("Generated {}", output.display());
                reports.insert(output.display().to_string(), report);
            }
        }
    }

    renderer.monitor().log_summary();
    print_reports(&reports)
}
