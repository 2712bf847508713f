mod command;
mod config;
mod stage;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
