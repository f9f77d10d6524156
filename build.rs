use std::fs;

// Keys every palette in the bundled config must define. Mirrors `Palette` in
// src/config.rs, which has no serde defaults.
const PALETTE_KEYS: &[&str] = &["text", "background", "muted", "quote_border", "code_background"];
const SECTIONS: &[&str] = &["links", "theme", "image", "page", "font"];

fn main() {
    // Validate default config at compile time
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={}", config_path);
    println!("cargo:rerun-if-changed=src/config.rs");

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");

    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {}", e),
    };

    for section in SECTIONS {
        if !table.get(*section).is_some_and(toml::Value::is_table) {
            panic!("default_config.toml is missing the [{}] section", section);
        }
    }

    for mode in ["light", "dark"] {
        let palette = table
            .get("theme")
            .and_then(|theme| theme.get(mode))
            .and_then(toml::Value::as_table)
            .unwrap_or_else(|| panic!("default_config.toml is missing [theme.{}]", mode));
        for key in PALETTE_KEYS {
            if !palette.get(*key).is_some_and(toml::Value::is_str) {
                panic!("[theme.{}] in default_config.toml needs a string `{}`", mode, key);
            }
        }
    }
}
