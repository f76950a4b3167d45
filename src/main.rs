use clap::Parser;
use miette::Result;
use ym::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE so piping into `head` exits quietly instead of panicking
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

    match cli.command {
        Commands::Init(args) => ym::cli::commands::init::run(args, &global),
        Commands::Calc(args) => ym::cli::commands::calc::run(args, &global),
        Commands::Compare(args) => ym::cli::commands::compare::run(args, &global),
        Commands::Sweep(args) => ym::cli::commands::sweep::run(args, &global),
        Commands::Map(args) => ym::cli::commands::map::run(args, &global),
        Commands::Report(args) => ym::cli::commands::report::run(args, &global),
        Commands::Config(cmd) => ym::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => ym::cli::commands::completions::run(args),
    }
}
