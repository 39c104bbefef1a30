use anyhow::Result;
use calview_core::draft::EventDraft;
use chrono::NaiveDateTime;
use dialoguer::Input;
use owo_colors::OwoColorize;

use crate::commands::{EventArgs, parse_datetime_arg, print_json};
use crate::context::Context;
use crate::render::{Render, render_event};

pub fn run(mut ctx: Context, mut fields: EventArgs) -> Result<()> {
    let interactive = fields.title.is_none() || fields.start.is_none();

    let title = match fields.title.take() {
        Some(t) => t,
        None => Input::<String>::new()
            .with_prompt("  Title")
            .interact_text()?,
    };

    let offset = ctx.offset;
    let start = match fields.start.take() {
        Some(s) => parse_datetime_arg(&s, offset)?,
        None => prompt_with_retry("  When? (YYYY-MM-DD HH:MM)", |s| {
            parse_datetime_arg(s, offset)
        })?,
    };

    let mut draft = EventDraft::for_date(start.date(), start.time(), ctx.config.default_duration());
    draft.title = title;
    fields.apply(&mut draft, offset)?;

    let event = draft.into_new_event()?;
    ctx.state.create(event.clone())?;

    if interactive {
        eprintln!();
    }
    eprintln!(
        "{}",
        format!("  Created {}: {}", event.kind.render(), event.title).green()
    );
    eprintln!("{}", render_event(&event, &ctx.config.offset_label()));
    print_json(&event)
}

/// Prompt the user with retry on parse errors.
fn prompt_with_retry<F>(prompt: &str, parse: F) -> Result<NaiveDateTime>
where
    F: Fn(&str) -> Result<NaiveDateTime>,
{
    loop {
        let input: String = Input::new().with_prompt(prompt).interact_text()?;
        match parse(&input) {
            Ok(result) => return Ok(result),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}
