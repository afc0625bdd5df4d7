/// Colored terminal summary of a captured snapshot
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::Write;
use voxcraft_core::Snapshot;

/// Print one line per non-empty collection, then the scene settings
pub fn print_summary<W: Write>(writer: &mut W, snapshot: &Snapshot) -> std::io::Result<()> {
    let title = if snapshot.name.is_empty() {
        "voxcraft snapshot".to_string()
    } else {
        format!("voxcraft snapshot '{}'", snapshot.name)
    };
    queue!(writer, SetForegroundColor(Color::Yellow), Print(title), Print('\n'), ResetColor)?;

    let counts = [
        ("boxes", snapshot.boxes.len()),
        ("frames", snapshot.frames.len()),
        ("frame transforms", snapshot.frame_transforms.len()),
        ("lights", snapshot.lights.len()),
        ("models", snapshot.models.len()),
        ("model moves", snapshot.model_moves.len()),
        ("commands", snapshot.commands.len()),
    ];
    for (label, count) in counts.iter().filter(|(_, count)| *count > 0) {
        queue!(
            writer,
            SetForegroundColor(Color::Cyan),
            Print(format!("  {label:<18}")),
            ResetColor,
            Print(format!("{count}\n"))
        )?;
    }

    let float_mode = if snapshot.is_allowed_float == 1 { "float" } else { "grid" };
    queue!(
        writer,
        SetForegroundColor(Color::DarkGrey),
        Print(format!(
            "  size {} | shape {:?} | interval {} | {} coordinates\n",
            snapshot.size, snapshot.shape, snapshot.interval, float_mode
        )),
        ResetColor
    )?;

    writer.flush()
}
