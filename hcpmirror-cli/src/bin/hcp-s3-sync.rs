fn main() -> std::process::ExitCode {
    hcpmirror_cli::commands::sync::main()
}
