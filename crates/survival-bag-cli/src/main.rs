mod command;
mod items;
mod logging;
mod plot;
mod report;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
