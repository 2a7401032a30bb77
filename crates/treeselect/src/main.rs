use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = treeselect::cli::Cli::parse();
    treeselect::init(cli.verbose);
    treeselect::cli::run(cli)
}
