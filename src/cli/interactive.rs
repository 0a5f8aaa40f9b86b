//! Line-driven event loop: each line typed is one widget event.

use super::terminal::{self, TerminalSurface};
use super::ui;
use crate::core::surface::AlertHandle;
use crate::core::{Converter, RateProvider, Surface};
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// First select changed
    From(String),
    /// Second select changed
    To(String),
    /// Amount field changed; may be empty
    Amount(String),
    /// Close control of an alert
    Close(u64),
    List,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  from <CODE>     change the base currency (fetches new rates)
  to <CODE>       change the target currency
  amount [VALUE]  type an amount; an empty value keeps the last result
  <VALUE>         shorthand for `amount <VALUE>`
  list            show the available currencies and their rates
  close <N>       dismiss alert [N]
  help            show this help
  quit            leave";

/// Parses one input line into an event.
pub fn parse_event(line: &str) -> Result<Event, String> {
    let line = line.trim();
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    let require_code = |arg: &str| {
        if arg.is_empty() {
            Err(format!("`{command}` needs a currency code"))
        } else {
            Ok(arg.to_uppercase())
        }
    };

    match command.to_lowercase().as_str() {
        "from" => require_code(arg).map(Event::From),
        "to" => require_code(arg).map(Event::To),
        "amount" => Ok(Event::Amount(arg.to_string())),
        "close" => arg
            .parse()
            .map(Event::Close)
            .map_err(|_| format!("`close` needs an alert number, got `{arg}`")),
        "list" => Ok(Event::List),
        "help" | "?" => Ok(Event::Help),
        "quit" | "exit" => Ok(Event::Quit),
        _ if !line.is_empty() && arg.is_empty() && line.parse::<f64>().is_ok() => {
            Ok(Event::Amount(line.to_string()))
        }
        _ => Err(format!("Unknown command `{line}`, type `help`")),
    }
}

/// Applies one event. Returns false once the user asked to leave.
pub async fn dispatch<P: RateProvider>(
    converter: &mut Converter<P, TerminalSurface>,
    event: Event,
) -> bool {
    debug!(?event, "Dispatching event");
    match event {
        Event::From(code) => {
            let pb = ui::new_spinner(&format!("Buscando cotações para {code}..."));
            converter.select_base(&code).await;
            pb.finish_and_clear();
        }
        Event::To(code) => converter.select_target(&code),
        Event::Amount(value) => converter.input_amount(&value),
        Event::Close(id) => {
            let alert = converter
                .surface()
                .alerts()
                .into_iter()
                .map(|a| a.handle)
                .find(|h: &AlertHandle| h.id() == id);
            match alert {
                Some(handle) => {
                    converter.dismiss_alert(handle);
                }
                None => println!("No alert [{id}]"),
            }
        }
        Event::List => {
            println!(
                "{}",
                terminal::currencies_table(
                    converter.surface(),
                    converter.widget(),
                    converter.state().get()
                )
            );
        }
        Event::Help => println!("{HELP}"),
        Event::Quit => return false,
    }
    true
}

fn draw<P: RateProvider>(converter: &Converter<P, TerminalSurface>) {
    ui::print_separator();
    println!(
        "{}",
        terminal::render_frame(
            converter.surface(),
            converter.widget(),
            converter.state().get()
        )
    );
}

pub async fn run<P: RateProvider>(
    mut converter: Converter<P, TerminalSurface>,
    base: &str,
    target: &str,
) -> Result<()> {
    let pb = ui::new_spinner(&format!("Buscando cotações para {base}..."));
    converter.init(base, target).await;
    pb.finish_and_clear();
    draw(&converter);
    println!("{}", ui::style_text("Type `help` for commands.", ui::StyleType::Subtle));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let event = match parse_event(&line) {
            Ok(event) => event,
            Err(message) => {
                println!("{}", ui::style_text(&message, ui::StyleType::Alert));
                continue;
            }
        };

        let revision = converter.surface().revision();
        if !dispatch(&mut converter, event).await {
            break;
        }
        if converter.surface().revision() != revision {
            draw(&converter);
        }
    }
    Ok(())
}
