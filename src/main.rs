use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vkdoc::{load_page, JsonPageDir, PageSource, RecordRenderer, RenderOptions, Style};

/// One page to render: its record name and where its tree lives.
struct Job {
    name: String,
    path: PathBuf,
}

fn parse_style(value: &str) -> Result<Style, String> {
    value.parse::<Style>().map_err(|e| e.to_string())
}

fn collect_jobs(inputs: &[PathBuf]) -> Result<Vec<Job>> {
    let mut jobs = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let dir = JsonPageDir::new(input);
            for name in dir.names()? {
                let path = dir.root().join(format!("{}.json", name));
                jobs.push(Job { name, path });
            }
        } else {
            let name = input
                .file_stem()
                .and_then(|s| s.to_str())
                .with_context(|| format!("cannot derive a record name from {}", input.display()))?
                .to_string();
            jobs.push(Job {
                name,
                path: input.clone(),
            });
        }
    }

    jobs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(jobs)
}

fn render_job(renderer: &RecordRenderer, job: &Job) -> Option<String> {
    match load_page(&job.path) {
        Ok(page) => renderer.render_page(&job.name, &page),
        Err(e) => {
            warn!("skipping {}: {:#}", job.name, e);
            None
        }
    }
}

fn write_output(dir: &Path, name: &str, text: &str) -> Result<()> {
    let path = dir.join(format!("{}.txt", name));
    fs::write(&path, text).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("vkdoc")
        .about("Render Vulkan man page records as documentation comments")
        .arg(
            Arg::new("inputs")
                .help("Page tree JSON files, or directories of them")
                .required(true)
                .num_args(1..)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("style")
                .short('S')
                .long("style")
                .help("Comment dialect: TXT, CL, RS or VSC")
                .default_value("TXT")
                .value_parser(parse_style),
        )
        .arg(
            Arg::new("namespace")
                .short('N')
                .long("namespace")
                .help("Indent comments for declarations inside a namespace")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Directory receiving one <name>.txt per record; stdout otherwise")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Worker threads, defaults to the available parallelism")
                .value_parser(clap::value_parser!(usize)),
        )
        .get_matches();

    let inputs: Vec<PathBuf> = matches
        .get_many::<PathBuf>("inputs")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let style = matches.get_one::<Style>("style").copied().unwrap_or_default();
    let options = RenderOptions::new(style, matches.get_flag("namespace"));
    let output = matches.get_one::<PathBuf>("output").cloned();

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = matches.get_one::<usize>("jobs") {
        pool = pool.num_threads(*threads);
    }
    let pool = pool.build().context("building worker pool")?;

    let jobs = collect_jobs(&inputs)?;
    info!("rendering {} pages as {}", jobs.len(), style);

    let renderer = RecordRenderer::new(options);
    let rendered: Vec<Option<String>> =
        pool.install(|| jobs.par_iter().map(|job| render_job(&renderer, job)).collect());

    if let Some(dir) = &output {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut documented = 0;
    for (job, text) in jobs.iter().zip(&rendered) {
        let Some(text) = text else { continue };
        documented += 1;
        match &output {
            Some(dir) => write_output(dir, &job.name, text)?,
            None => print!("{}", text),
        }
    }

    info!("documented {} of {} pages", documented, jobs.len());
    Ok(())
}
