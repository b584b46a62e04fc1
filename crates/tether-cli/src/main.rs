use std::env;

mod panels;
mod prefs;
mod records;
mod ui;

const DEFAULT_DAEMON_URL: &str = "http://127.0.0.1:7700";

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut daemon_url = env::var("TETHER_DAEMON_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DAEMON_URL.to_string());
    let mut panel = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" | "help" => {
                print_help();
                return Ok(());
            }
            "--version" | "-V" | "version" => {
                println!("tether {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--daemon" => {
                let Some(value) = args.get(i + 1) else {
                    return Err("--daemon requires a URL".into());
                };
                daemon_url = value.clone();
                i += 2;
            }
            "--panel" => {
                let Some(value) = args.get(i + 1) else {
                    return Err("--panel requires a name".into());
                };
                panel = Some(value.clone());
                i += 2;
            }
            other => {
                print_help();
                return Err(format!("unsupported argument: {other}").into());
            }
        }
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let _enter = runtime.enter();

    ui::run(ui::RunOptions { daemon_url, panel })
}

fn print_help() {
    println!("tether {}", env!("CARGO_PKG_VERSION"));
    println!("Usage:");
    println!("  tether [--daemon URL] [--panel NAME]");
    println!("  tether --help");
    println!("  tether --version");
    println!();
    println!("Panels: integrations, memory, documents, browser, persona");
    println!("The daemon URL defaults to $TETHER_DAEMON_URL or {DEFAULT_DAEMON_URL}.");
}
