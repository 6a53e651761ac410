use clap::{Args, CommandFactory, Parser, Subcommand};
use std::io::{BufRead, Write};
use vikey::{
    commands::{Command, Flow},
    logger, VirtualKeyboard,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    opts: CommonOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct CommonOptions {
    /// Log verbosity level
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open a virtual keyboard and play it from stdin
    Play(PlayOptions),
    /// `vikey completions --generate=zsh > vikey.zsh`
    Completions(Completions),
}

#[derive(Debug, clap::Parser)]
struct PlayOptions {
    /// MIDI channel between 0 and 15
    #[arg(long, default_value_t = 0)]
    channel: u8,

    /// Name of the virtual MIDI port
    #[arg(long, default_value = vikey::DEFAULT_PORT_NAME)]
    name: String,

    /// Path to log file to write to
    #[arg(long)]
    log: Option<std::path::PathBuf>,
}

#[derive(Debug, Parser)]
#[command(arg_required_else_help(true))]
struct Completions {
    /// shell to generate the completion script for
    #[arg(long = "generate", value_enum)]
    shell: Option<clap_complete::Shell>,
}

impl Completions {
    fn generate(&self) -> anyhow::Result<()> {
        let Some(shell) = self.shell else {
            anyhow::bail!("no shell specified for autocompletion generation");
        };

        let mut stdout = std::io::stdout();
        stdout.flush()?;

        let mut cli = Cli::command();
        clap_complete::generate(shell, &mut cli, "vikey", &mut stdout);

        Ok(())
    }
}

fn play(opts: PlayOptions, common: CommonOptions) -> anyhow::Result<()> {
    if let Some(log_file) = opts.log.or(vikey::locations::log_file()) {
        logger::start("vikey", log_file, common.verbose)?;
    }

    let mut keyboard = VirtualKeyboard::new(opts.channel);
    if keyboard.channel() != opts.channel {
        anyhow::bail!("invalid MIDI channel : {}", opts.channel);
    }

    if !keyboard.connect(&opts.name) {
        anyhow::bail!("failed to open virtual MIDI port {}", opts.name);
    }

    println!(
        "{} on channel {}, `?` for help",
        opts.name,
        keyboard.channel()
    );

    for line in std::io::stdin().lock().lines() {
        let command = match line?.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        log::debug!("{command:?}");

        match command.apply(&mut keyboard) {
            (Flow::Exit, _) => break,
            (Flow::Continue, false) => eprintln!("failed"),
            (Flow::Continue, true) => (),
        }
    }

    if !keyboard.disconnect() {
        anyhow::bail!("failed to close virtual MIDI port {}", opts.name);
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let app_result = match args.command {
        Commands::Completions(ref c) => c.generate(),
        Commands::Play(opts) => play(opts, args.opts),
    };

    if let Err(e) = app_result {
        if logger::is_active() {
            log::error!("{e}");
        } else {
            use colored::*;
            eprintln!("{} {}", "Error:".red().bold(), format!("{e}").bold());
        }
        std::process::exit(1);
    }

    Ok(())
}
