use anyhow::Result;
use calview_core::month::month_summaries;
use chrono::Datelike;

use crate::context::Context;
use crate::render::render_year;

pub fn run(ctx: &Context, year: Option<i32>) -> Result<()> {
    let year = year.unwrap_or_else(|| ctx.today.year());
    println!("{}", render_year(year, &month_summaries(&ctx.state, year)));
    Ok(())
}
