// Entry point and high-level CLI flow.
//
// With --state and --district the console renders once and exits. Without
// them it runs a selection menu: pick a state, pick one of its districts,
// render, then choose whether to go back to the selection menu.
use aadhaar_pulse::config::Args;
use aadhaar_pulse::dashboard::{self, RenderOptions};
use aadhaar_pulse::privacy::NoiseInjector;
use aadhaar_pulse::{logging, output, util, DataStore, Result};
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{error, info};

/// Read one trimmed line after printing `prompt`. `None` on end of input.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Print a numbered list and return the chosen entry. `None` for an empty
/// list or end of input.
fn choose<'a>(title: &str, options: &[&'a str]) -> Option<&'a str> {
    if options.is_empty() {
        return None;
    }
    println!("\n{}", title);
    for (idx, opt) in options.iter().enumerate() {
        println!("[{}] {}", idx + 1, opt);
    }
    loop {
        let input = read_line("Enter choice: ")?;
        match input.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => return Some(options[n - 1]),
            _ => println!("Invalid choice. Please enter 1-{}.", options.len()),
        }
    }
}

/// Ask whether to go back to the location selection menu.
fn prompt_back_to_menu() -> bool {
    loop {
        let Some(resp) = read_line("Back to Location Selection (Y/N): ") else {
            return false;
        };
        match resp.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn render(store: &DataStore, args: &Args, opts: &RenderOptions, state: &str, district: &str) -> Result<()> {
    info!("rendering {}, {}", district, state);
    let view = if args.privacy_noise {
        let mut noise = NoiseInjector::from_seed(args.epsilon, args.seed)?;
        dashboard::build(store, state, district, opts, Some(&mut noise))?
    } else {
        dashboard::build::<rand::rngs::StdRng>(store, state, district, opts, None)?
    };
    output::print_dashboard(&view);
    if let Some(dir) = &args.export_dir {
        output::export(&view, &store.flagged_rows(), dir)?;
        println!("\n(Tables and summary exported to {})", dir.display());
    }
    Ok(())
}

fn run_interactive(store: &DataStore, args: &Args, opts: &RenderOptions) -> Result<()> {
    let states = store.state_options()?;
    loop {
        let Some(state) = choose("Select State:", &states) else {
            return Ok(());
        };
        let districts = store.districts(state)?;
        let Some(district) = choose("Select District:", &districts) else {
            return Ok(());
        };
        println!();
        if let Err(e) = render(store, args, opts, state, district) {
            eprintln!("Error: {}\n", e);
        }
        if !prompt_back_to_menu() {
            println!("Exiting the program.");
            return Ok(());
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let store = DataStore::load(&args.monthly, &args.forecast)?;
    let monthly = store.monthly_report();
    println!(
        "Processing dataset... ({} monthly rows loaded, {} forecast rows)",
        util::format_int(monthly.loaded_rows),
        util::format_int(store.forecast_report().loaded_rows)
    );
    let skipped = monthly.parse_errors + store.forecast_report().parse_errors;
    if skipped > 0 {
        println!("Note: {} rows skipped due to parse/validation errors.", util::format_int(skipped));
    }
    println!();

    let opts = args.render_options();
    match args.location() {
        Some((state, district)) => render(&store, args, &opts, state, district),
        None => run_interactive(&store, args, &opts),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.log_level.as_deref());

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
