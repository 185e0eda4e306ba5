use clap::Parser;
use miette::Result;
use jobroute::cli::commands;
use jobroute::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    jobroute::core::logging::init(global.verbose);

    match cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Job(cmd) => commands::job::run(cmd, &global),
        Commands::Part(cmd) => commands::part::run(cmd, &global),
        Commands::Task(cmd) => commands::task::run(cmd, &global),
        Commands::Check(cmd) => commands::check::run(cmd, &global),
        Commands::Mat(cmd) => commands::mat::run(cmd, &global),
        Commands::Bulk(cmd) => commands::bulk::run(cmd, &global),
        Commands::Schedule(args) => commands::schedule::run(args, &global),
        Commands::Report(cmd) => commands::report::run(cmd, &global),
        Commands::Catalog(args) => commands::catalog::run(args, &global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
