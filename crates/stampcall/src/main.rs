fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    stampcall::run_with_args(std::env::args_os())
}
