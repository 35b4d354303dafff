use {clap::Parser, std::path::PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Read settings from this file instead of the platform config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Append the camera uniform data of every frame to this file
    #[arg(long)]
    pub dump: Option<PathBuf>,

    /// Lock movement to the ground plane, as a first-person camera
    #[arg(long, default_value_t = false)]
    pub fps: bool,

    /// Allow the camera to pitch past straight up or down
    #[arg(long, default_value_t = false)]
    pub no_pitch_bound: bool,

    /// Read input events from this file instead of stdin
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Save the settings in use to the config file before starting
    #[arg(long, default_value_t = false)]
    pub write_config: bool,
}
