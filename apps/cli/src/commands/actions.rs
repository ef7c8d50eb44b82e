use std::io::Write;

use anyhow::Result;
use courier_action::ActionRegistry;

/// Print every registered action name, one per line.
pub fn run(registry: &ActionRegistry, out: &mut impl Write) -> Result<()> {
    for name in registry.names() {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lists_builtin_names() {
        let mut out = Vec::new();
        run(&courier_action::builtin::default_registry(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "get_status\nget_supported_actions\nget_version\nget_version_info\ntest\n"
        );
    }
}
