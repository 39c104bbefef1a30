use anyhow::Result;
use calview_core::draft::EventDraft;
use owo_colors::OwoColorize;

use crate::commands::{EventArgs, find_event, print_json};
use crate::context::Context;
use crate::render::render_event;

pub fn run(mut ctx: Context, id: &str, fields: EventArgs) -> Result<()> {
    let existing = find_event(&ctx.state, id)?.clone();

    let mut draft = EventDraft::from_event(&existing);
    fields.apply(&mut draft, ctx.offset)?;

    let updated = draft.apply_to(&existing)?;
    ctx.state.update(updated.clone())?;

    eprintln!("{}", format!("Updated: {}", updated.title).green());
    eprintln!("{}", render_event(&updated, &ctx.config.offset_label()));
    print_json(&updated)
}
