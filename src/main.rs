use std::process::ExitCode;

fn main() -> ExitCode {
    clipstash_lib::run()
}
