//! `randcopy` binary entrypoint.

fn main() {
    std::process::exit(randcopy_cli::run());
}
