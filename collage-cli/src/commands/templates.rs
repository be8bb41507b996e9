//! List built-in grid templates.

use collage_core::template::builtin_templates;

/// Templates command handler
pub fn cmd_templates() {
    for template in builtin_templates() {
        println!(
            "{template:<6} {} rows x {} columns",
            template.rows(),
            template.columns()
        );
    }
}
