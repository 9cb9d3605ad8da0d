mod adapters;
mod command;
mod output;

fn main() -> anyhow::Result<()> {
    command::run()
}
