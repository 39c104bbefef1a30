use anyhow::{Result, bail};
use owo_colors::OwoColorize;

use crate::commands::{find_event, parse_date_arg};
use crate::context::{Context, pluralize};

pub fn run(ctx: &Context, id: &str, date: &str, until: Option<&str>) -> Result<()> {
    let event = find_event(&ctx.state, id)?;
    let date = parse_date_arg(Some(date), ctx.today)?;

    let Some(until) = until else {
        if event.occurs_on(date) {
            println!("{} {} occurs on {}", "yes".green(), event.title, date);
        } else {
            println!("{} {} does not occur on {}", "no".red(), event.title, date);
        }
        return Ok(());
    };

    let until = parse_date_arg(Some(until), ctx.today)?;
    if until < date {
        bail!("--until ({}) is before {}", until, date);
    }

    let dates = event.occurrences_between(date, until);
    println!(
        "{} {} from {} to {}",
        dates.len(),
        pluralize("occurrence", dates.len()),
        date,
        until
    );
    for d in dates {
        println!("  {}", d.format("%a %Y-%m-%d"));
    }

    Ok(())
}
