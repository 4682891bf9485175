//! Kinds subcommand - show the resolved per-kind configuration

use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use graphline_kinds::Kind;

use crate::config::Config;

pub fn run(config: &Config) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(
            ["Kind", "Variable", "Index/Type", "List query", "Describe query", "Mapping"]
                .map(|h| Cell::new(h).fg(Color::Cyan)),
        );

    for &kind in Kind::all() {
        let c = config.kind_config(kind);
        table.add_row(vec![
            kind.name().to_string(),
            format!("?{}", c.variable),
            format!("{}/{}", c.index, c.type_name),
            c.list_query.display().to_string(),
            c.describe_query.display().to_string(),
            c.mapping.display().to_string(),
        ]);
    }
    eprintln!("\n{table}");
}
