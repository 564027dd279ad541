use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io;
use crate::io::storage::Storage;

pub fn cmd_init(data_dir: &Path, args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_io::write_config_template(data_dir, args.force)?;
    let config = config_io::read_config(data_dir)?;

    // Leave an existing task file alone; only create an empty one
    let storage = Storage::new(data_dir, &config.storage);
    if !storage.path().exists() {
        storage.save(&[])?;
    }

    println!("Initialized taskline in {}", data_dir.display());
    println!("  config: {}", config_path.display());
    println!("  tasks:  {}", storage.path().display());
    Ok(())
}
