use std::io::{self, Write};

use colored::{Color, Colorize};
use shared::Task;

/// Writes one `"{n}: {text}"` line per task, numbered from 1, in the order
/// given.
pub fn print_tasks<W: Write>(out: &mut W, tasks: &[Task]) -> io::Result<()> {
    for (index, task) in tasks.iter().enumerate() {
        let line = format!("{}: {}", index + 1, task.text);
        writeln!(out, "{}", line.color(task_color(task)))?;
    }
    Ok(())
}

pub fn task_color(task: &Task) -> Color {
    if task.completed {
        Color::Green
    } else {
        Color::Yellow
    }
}
