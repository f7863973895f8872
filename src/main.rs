use std::path::PathBuf;

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    let initial_layout = std::env::args_os().nth(1).map(PathBuf::from);
    layoutdesk::run(initial_layout).context("layoutdesk exited with an error")
}
