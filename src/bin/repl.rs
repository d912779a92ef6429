use rod_dice::RollContext;
use std::io::{self, BufRead, Write};

const MACRO_COMMAND: &str = ":macro";
const LIST_COMMAND: &str = ":macros";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let mut ctx = RollContext::default();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    print!("> ");
    io::stdout().flush()?;
    while let Some(Ok(line)) = lines.next() {
        let line = line.trim();
        if line == LIST_COMMAND {
            for m in ctx.macros().iter() {
                println!("{} = {}", m.name, m.text);
            }
        } else if let Some(def) = line.strip_prefix(MACRO_COMMAND) {
            match def.trim().split_once(char::is_whitespace) {
                Some((name, text)) => {
                    ctx.macros_mut().insert(name, text.trim());
                    println!("saved `{}`", name);
                }
                None => eprintln!("usage: {} <name> <roll>", MACRO_COMMAND),
            }
        } else if !line.is_empty() {
            println!("{}", ctx.parse(line));
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}
