fn main() -> std::process::ExitCode {
    hcpmirror_cli::commands::link::main()
}
