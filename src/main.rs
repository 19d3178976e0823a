use clap::Parser;
use miette::Result;
use sqlwire::cli::commands::{bom, build, completions, init, labels, yaml};
use sqlwire::cli::{Cli, Commands};

/// `sqlwire bom | head` must exit quietly when the reader goes away
#[cfg(unix)]
fn restore_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn restore_sigpipe() {}

/// Config syntax errors carry a source span; show two lines around it
fn install_report_handler() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;
    Ok(())
}

fn main() -> Result<()> {
    restore_sigpipe();
    install_report_handler()?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => init::run(args),
        Commands::Build(args) => build::run(args, &global),
        Commands::Yaml(args) => yaml::run(args, &global),
        Commands::Bom(args) => bom::run(args, &global),
        Commands::Labels(args) => labels::run(args, &global),
        Commands::Completions(args) => completions::run(args),
    }
}
