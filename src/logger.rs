use std::{
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Once,
    },
};

static INIT: Once = Once::new();
static IS_INITIALIZED: AtomicBool = AtomicBool::new(false);

pub fn is_active() -> bool {
    IS_INITIALIZED.load(Ordering::SeqCst)
}

/// Log everything to `file`, and echo warnings and errors to stderr.
pub fn start(id: &str, file: impl AsRef<Path>, verbose: bool) -> anyhow::Result<()> {
    let level = if verbose {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Debug
    };

    if is_active() {
        anyhow::bail!("attempted to setup logger more than once");
    }

    if let Some(dir) = file.as_ref().parent() {
        std::fs::create_dir_all(dir)?;
    }

    let id = format!("{}:{}", id.to_owned(), std::process::id());

    fern::Dispatch::new()
        .format(move |out, msg, record| {
            let time = humantime::format_rfc3339_seconds(std::time::SystemTime::now());

            if cfg!(debug_assertions) {
                out.finish(format_args!(
                    "[ {id} ] : [ {time} ] : [ {} {} ] : {msg}",
                    record.target(),
                    record.level(),
                ))
            } else {
                out.finish(format_args!("[ {id} ] : [ {time} ] : {msg}"))
            }
        })
        .level(level)
        .chain(fern::log_file(file.as_ref())?)
        .chain(
            fern::Dispatch::new()
                .level(log::LevelFilter::Warn)
                .chain(std::io::stderr()),
        )
        .apply()?;

    log::trace!("started");

    INIT.call_once(|| IS_INITIALIZED.store(true, Ordering::SeqCst));
    Ok(())
}
