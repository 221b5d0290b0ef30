//! Embed a profile into a g-code file and read it back.
//!
//! Run with: `cargo run -p gcode_settings_core --example embed_and_read`

use std::fs;

use gcode_settings_container::InstanceContainer;
use gcode_settings_core::{GCodeProfileReader, ProfileReader, WriterConfig, embed_profile};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut profile = InstanceContainer::new("draft");
    profile.set_name("Draft");
    profile.definition = "fdmprinter".into();
    profile.set_value("layer_height", "0.2");
    profile.set_value("machine_start_gcode", "G28\nG1 Z15 F6000");

    let gcode = embed_profile("G28\nG1 X10 Y10\nM84\n", &profile, &WriterConfig::default());
    println!("{gcode}");

    let dir = std::env::temp_dir().join("gcode_settings_example");
    fs::create_dir_all(&dir)?;
    let path = dir.join("draft.gcode");
    fs::write(&path, &gcode)?;

    let reader = GCodeProfileReader::new();
    match reader.read(&path) {
        Some(read) => {
            println!("name:         {}", read.name);
            println!("type:         {:?}", read.metadata.get("type"));
            println!("layer_height: {:?}", read.value("layer_height"));
        }
        None => println!("no profile found in {}", path.display()),
    }
    Ok(())
}
