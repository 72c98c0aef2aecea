use clap::Parser;
use std::path::PathBuf;

use mscomposite::{BandTriplet, Enhancement, Window};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "mscomposite",
    version,
    about = "Display an RGB composite of a multispectral image, optionally next to or under a second image"
)]
pub struct CliArgs {
    /// Image file, or the left-hand image when -F is given (asked for if absent)
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Right-hand image file
    #[arg(short = 'F', long = "file2")]
    pub file2: Option<PathBuf>,

    /// Enhancement: 1=linear255 2=linear 3=linear2pc 4=equalization
    /// 5=logarithmic2pc (default) 6=logarithmic 7=sqrt, or a linear range [lo,hi]
    #[arg(short = 'e', long = "enhance", allow_hyphen_values = true)]
    pub enhance: Option<Enhancement>,

    /// Enhancement of the right-hand image
    #[arg(short = 'E', long = "enhance2", allow_hyphen_values = true)]
    pub enhance2: Option<Enhancement>,

    /// RGB band positions, e.g. [4,3,2]
    #[arg(short = 'p', long = "rgb")]
    pub rgb: Option<BandTriplet>,

    /// RGB band positions of the right-hand image (defaults to -p)
    #[arg(short = 'P', long = "rgb2")]
    pub rgb2: Option<BandTriplet>,

    /// Spatial subset [x,y,width,height]
    #[arg(short = 'd', long = "dims")]
    pub dims: Option<Window>,

    /// Spatial subset of the right-hand image
    #[arg(short = 'D', long = "dims2")]
    pub dims2: Option<Window>,

    /// Show the (left-hand) image as a classification map
    #[arg(short = 'c', long = "classes", default_value_t = false)]
    pub classes: bool,

    /// Show the right-hand image as a classification map
    #[arg(short = 'C', long = "classes2", default_value_t = false)]
    pub classes2: bool,

    /// Overlay the left-hand image onto the right-hand image with this opacity
    #[arg(short = 'o', long = "alpha")]
    pub alpha: Option<f64>,

    /// Class labels, e.g. "['water','forest','urban']" or water,forest,urban
    #[arg(short = 'r', long = "labels")]
    pub labels: Option<String>,

    /// Save the figure (.png, .jpg, .tif)
    #[arg(short = 's', long = "save")]
    pub save: Option<PathBuf>,

    /// Save only, do not open a window
    #[arg(short = 'n', long = "no-display", default_value_t = false)]
    pub no_display: bool,

    /// JSON preset with display parameters; flags override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
