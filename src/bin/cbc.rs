// The `cbc` front end driver.
// Usage: cargo run --bin cbc -- <tokens|ast|expr|parens> ...

fn main() {
    cowabunga::cli::run();
}
