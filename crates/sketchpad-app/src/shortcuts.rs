//! Keyboard shortcut listing, generated from the engine's bindings.

use sketchpad_core::Command;

/// One line per binding: chord and command name.
pub fn shortcut_lines() -> Vec<String> {
    Command::bindings()
        .iter()
        .map(|binding| format!("{:20} {}", binding.label(), binding.command.name()))
        .collect()
}

/// Print all shortcuts to the console.
pub fn print_shortcuts() {
    println!("\n=== Keyboard Shortcuts ===");
    for line in shortcut_lines() {
        println!("  {line}");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_follow_bindings() {
        let lines = shortcut_lines();
        assert_eq!(lines.len(), Command::bindings().len());
        assert!(lines[0].starts_with("Ctrl/Cmd+Z "));
        assert!(lines[0].ends_with("Undo"));
        assert!(lines[1].ends_with("Redo"));
    }
}
