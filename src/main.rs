fn main() -> anyhow::Result<()> {
    filter_bar::run()
}
