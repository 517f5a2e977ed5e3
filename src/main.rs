fn main() -> anyhow::Result<()> {
    zonewatch_lib::run()
}
