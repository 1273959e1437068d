const SECTIONS: [&str; 5] = ["lexical", "contextual", "decoder", "guesser", "tagger"];

fn main() {
    println!("cargo:rerun-if-changed=src/default_settings.toml");
    let path = "src/default_settings.toml";
    let value: toml::Value = include_str!("src/default_settings.toml")
        .parse()
        .unwrap_or_else(|e| panic!("{path} contains invalid TOML: {e}"));
    for section in SECTIONS {
        if !value.get(section).is_some_and(toml::Value::is_table) {
            panic!("{path} is missing the [{section}] table");
        }
    }
}
