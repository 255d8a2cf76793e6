fn main() -> std::process::ExitCode {
    server_launcher_lib::run()
}
