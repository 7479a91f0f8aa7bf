//! Command-line options for the simulator.

use analog_face_common::FaceConfig;
use analog_face_common::assets::HandScaling;
use analog_face_common::compositor::HandStyle;
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(name = "analog-face-sim")]
#[command(about = "Desktop simulator for the analog watch face", long_about = None)]
pub struct Cli {
    /// Surface width and height in pixels
    #[arg(long, default_value_t = 390)]
    pub size: u32,

    /// Window pixel scale
    #[arg(long, default_value_t = 2)]
    pub scale: u32,

    /// How the hands are drawn
    #[arg(long, value_enum, default_value_t = HandsArg::Bitmap)]
    pub hands: HandsArg,

    /// What the hand scale factor is derived from
    #[arg(long, value_enum, default_value_t = HandScalingArg::ScaledBackground)]
    pub hand_scaling: HandScalingArg,

    /// Start in ambient (low-power) mode
    #[arg(long)]
    pub ambient: bool,

    /// Fixed UTC offset instead of the system zone
    #[arg(long, allow_negative_numbers = true)]
    pub utc_offset_minutes: Option<i32>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandsArg {
    Bitmap,
    Vector,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandScalingArg {
    ScaledBackground,
    NativeBackground,
}

impl Cli {
    pub const fn face_config(&self) -> FaceConfig {
        FaceConfig {
            hand_style: match self.hands {
                HandsArg::Bitmap => HandStyle::Bitmap,
                HandsArg::Vector => HandStyle::Vector,
            },
            hand_scaling: match self.hand_scaling {
                HandScalingArg::ScaledBackground => HandScaling::RelativeToScaledBackground,
                HandScalingArg::NativeBackground => HandScaling::RelativeToNativeBackground,
            },
        }
    }
}
