// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    // Using a raw string literal for the multi-line banner
    let banner = r#"
                     _                       _ _
  __ _ _ __ __ _  __| | ___       _ __   ___ | | | ___ _ __
 / _` | '__/ _` |/ _` |/ _ \_____| '_ \ / _ \| | |/ _ \ '__|
| (_| | | | (_| | (_| |  __/_____| |_) | (_) | | |  __/ |
 \__, |_|  \__,_|\__,_|\___|     | .__/ \___/|_|_|\___|_|
 |___/                           |_|

    Live Challenge Grading Results
"#;
    println!("{}", banner);
}
