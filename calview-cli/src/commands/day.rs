use anyhow::Result;
use calview_core::month::DayAgenda;

use crate::commands::parse_date_arg;
use crate::context::Context;
use crate::render::render_agenda;

pub fn run(mut ctx: Context, date: Option<&str>) -> Result<()> {
    let date = parse_date_arg(date, ctx.today)?;
    ctx.state.select_date(date);

    println!(
        "{}",
        render_agenda(&DayAgenda::for_selected(&ctx.state), &ctx.config.offset_label())
    );
    Ok(())
}
