use clap::Parser;
use crossterm::{
    cursor::MoveTo,
    execute,
    style::Stylize,
    terminal::{Clear, ClearType},
};
use npt_core::cli::CommonArgs;
use npt_core::config::Config;
use npt_core::core::engine::{Operation, Reply};
use npt_core::persistence::save_snapshot;
use npt_core::NptEngine;
use std::io::{stdin, stdout, Write};
use std::process::ExitCode;

/// Interactive menu over the name prefix tree
#[derive(Parser, Debug)]
#[command(name = "npt", version, about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

const MENU: [&str; 9] = [
    "Insert Name",
    "Lookup Name",
    "Delete Name",
    "Print NPT",
    "Print Access Probabilities",
    "Print Average Access Probability",
    "Save NPT to File",
    "Exit",
    "Save Snapshot",
];

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.common.init_tracing();

    let result = cli.common.load_config().and_then(|config| {
        let engine = NptEngine::open(&config)?;
        run(engine, &config)
    });
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(mut engine: NptEngine, config: &Config) -> npt_core::Result<()> {
    execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    println!("{}", "Name Prefix Tree (NPT)".bold());

    loop {
        print_menu()?;
        let Some(choice) = read_line()? else { break };
        let Ok(choice) = choice.parse::<i64>() else {
            println!("{}", "Invalid choice. Please try again.".red());
            continue;
        };

        if choice == 9 {
            match &config.storage.snapshot_path {
                Some(path) => match save_snapshot(&engine, path) {
                    Ok(()) => println!("Snapshot saved to '{}'", path.display()),
                    Err(e) => println!("{} {}", "[ERROR]".red(), e),
                },
                None => println!("{}", "No snapshot_path configured.".yellow()),
            }
            continue;
        }

        let name = if (1..=3).contains(&choice) {
            print!("Enter name: ");
            stdout().flush()?;
            match read_line()? {
                Some(name) => Some(name),
                None => break,
            }
        } else {
            None
        };

        let reply = Operation::from_choice(choice, name).and_then(|op| engine.execute(op));
        match reply {
            Ok(Reply::Dump(text)) => println!("\nName Prefix Tree (NPT):\n{}", text),
            Ok(Reply::Output(text)) => println!("\n{}", text),
            Ok(Reply::Shutdown(text)) => {
                println!("\n{}", text);
                break;
            }
            Err(e) => println!("{} {}", "[ERROR]".red(), e),
        }
    }
    Ok(())
}

fn print_menu() -> std::io::Result<()> {
    println!("\n{}", "Menu:".cyan());
    for (i, label) in MENU.iter().enumerate() {
        println!("{}. {}", i + 1, label);
    }
    print!("Enter your choice: ");
    stdout().flush()
}

/// `None` on end of input.
fn read_line() -> std::io::Result<Option<String>> {
    let mut input = String::new();
    if stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}
