use anyhow::Result;
use calview_core::month::DayAgenda;
use owo_colors::OwoColorize;

use crate::context::Context;
use crate::render::render_agenda;

pub fn run(mut ctx: Context, id: &str) -> Result<()> {
    let Some(removed) = ctx.state.delete(id) else {
        println!("{}", format!("No event with id {}", id).dimmed());
        return Ok(());
    };

    println!("{}", format!("Deleted: {}", removed.title).red());
    println!();

    let agenda = DayAgenda::for_date(&ctx.state, removed.start_date());
    println!("{}", render_agenda(&agenda, &ctx.config.offset_label()));

    Ok(())
}
