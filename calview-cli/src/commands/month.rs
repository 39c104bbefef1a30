use anyhow::Result;
use calview_core::month::{DayAgenda, MonthGrid};
use chrono::{NaiveDate, Weekday};

use crate::commands::{parse_date_arg, parse_month_arg};
use crate::context::Context;
use crate::render::{render_agenda, render_month};

/// `step` moves the shown month back (negative) or forward (positive).
pub fn run(mut ctx: Context, month: Option<&str>, select: Option<&str>, step: i32) -> Result<()> {
    let selected = parse_date_arg(select, ctx.today)?;
    ctx.state.select_date(selected);

    let grid = resolve_grid(month, selected, ctx.config.week_start.weekday(), step)?;

    println!("{}", render_month(&grid, &grid.cells(&ctx.state, ctx.today)));
    println!();
    println!(
        "{}",
        render_agenda(&DayAgenda::for_selected(&ctx.state), &ctx.config.offset_label())
    );

    Ok(())
}

fn resolve_grid(
    month: Option<&str>,
    selected: NaiveDate,
    week_start: Weekday,
    step: i32,
) -> Result<MonthGrid> {
    let mut grid = match month {
        Some(m) => {
            let (year, month) = parse_month_arg(m)?;
            MonthGrid::new(year, month, week_start)?
        }
        None => MonthGrid::containing(selected, week_start),
    };

    for _ in 0..step.unsigned_abs() {
        grid = if step < 0 { grid.previous() } else { grid.next() };
    }

    Ok(grid)
}
