//! Logging bootstrap: one console layer and one JSON file layer per configured section.
//!
//! A section named after a crate (`user_results`, `api_ingress`, `sqlx`, ...) owns every
//! record whose target is that crate or one of its modules. The `default` section owns
//! whatever no named section claims. Records from the `log` facade are bridged in first.

use crate::config::{LoggingConfig, Section};
use std::{
    io::IsTerminal,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{Level, Metadata};
use tracing_subscriber::{filter::FilterFn, fmt, layer::SubscriberExt, Layer, Registry};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_SECTION: &str = "default";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// `None` means the sink is switched off. Unknown names fall back to info.
fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "off" | "none" => None,
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => Some(Level::INFO),
    }
}

/// True if target == crate_name or target starts with "crate_name::"
fn matches_crate_prefix(target: &str, crate_name: &str) -> bool {
    target
        .strip_prefix(crate_name)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Whether the section `own` (None = default) is responsible for `target`.
fn claims(own: Option<&str>, named: &[String], target: &str) -> bool {
    match own {
        Some(prefix) => matches_crate_prefix(target, prefix),
        None => !named.iter().any(|n| matches_crate_prefix(target, n)),
    }
}

fn section_filter(
    name: &str,
    named: &[String],
    max: Level,
) -> FilterFn<impl Fn(&Metadata<'_>) -> bool> {
    let own = (name != DEFAULT_SECTION).then(|| name.to_owned());
    let named = named.to_vec();
    FilterFn::new(move |meta: &Metadata<'_>| {
        meta.level() <= &max && claims(own.as_deref(), &named, meta.target())
    })
}

/// Relative log paths live under `base_dir` (home_dir).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

/// Size-limited log file keeping at most `max_backups` rotated copies.
fn open_rotating_file(
    log_path: &Path,
    max_bytes: usize,
    max_backups: usize,
) -> std::io::Result<FileRotate<AppendTimestamp>> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    Ok(FileRotate::new(
        log_path,
        AppendTimestamp::default(FileLimit::MaxFiles(max_backups)),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    ))
}

fn console_layer(name: &str, section: &Section, named: &[String], ansi: bool) -> Option<BoxedLayer> {
    let level = parse_level(&section.console_level)?;
    Some(
        fmt::layer()
            .with_ansi(ansi)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(section_filter(name, named, level))
            .boxed(),
    )
}

fn file_layer(
    name: &str,
    section: &Section,
    named: &[String],
    base_dir: &Path,
) -> Option<BoxedLayer> {
    if section.file.trim().is_empty() {
        return None;
    }
    let level = parse_level(&section.file_level)?;

    let log_path = resolve_log_path(&section.file, base_dir);
    let max_bytes = section.max_size_mb.unwrap_or(100) * 1024 * 1024;
    let max_backups = section.max_backups.unwrap_or(3);

    let file = match open_rotating_file(&log_path, max_bytes as usize, max_backups) {
        Ok(file) => file,
        Err(e) => {
            // No subscriber yet, stderr is the only channel.
            eprintln!(
                "Failed to open log file for '{}': {} ({})",
                name,
                log_path.display(),
                e
            );
            return None;
        }
    };

    Some(
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(Mutex::new(file))
            .with_filter(section_filter(name, named, level))
            .boxed(),
    )
}

/// Install the global subscriber described by `cfg`.
/// An empty config installs a plain console subscriber at info.
/// Calling this twice keeps the first subscriber.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` records (sqlx, sea-orm) before the subscriber goes in
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let named: Vec<String> = cfg
        .keys()
        .filter(|k| k.as_str() != DEFAULT_SECTION)
        .cloned()
        .collect();
    let ansi = std::io::stdout().is_terminal();

    let layers: Vec<BoxedLayer> = cfg
        .iter()
        .flat_map(|(name, section)| {
            [
                console_layer(name, section, &named, ansi),
                file_layer(name, section, &named, base_dir),
            ]
        })
        .flatten()
        .collect();

    let _ = tracing::subscriber::set_global_default(Registry::default().with(layers));
}
