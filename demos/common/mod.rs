//! Shared code for examples.

use clap::{Parser, ValueEnum};
use ws281x_serial::{ChannelDescriptor, Color, FrameData, SerialConfig, DEFAULT_BAUD_RATE};

#[derive(Parser)]
#[command(about = "Drive WS281x LEDs behind an Arduino WS2812 controller")]
pub struct Args {
    /// Serial port the controller is attached to
    pub port: String,

    /// Baud rate of the serial link
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,

    /// Pattern to display
    #[arg(short, long, value_enum, default_value_t = Pattern::Chase)]
    pub pattern: Pattern,
}

impl Args {
    pub fn config(&self) -> SerialConfig {
        SerialConfig::new(self.port.clone()).baud_rate(self.baud)
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub enum Pattern {
    Chase,
    Rainbow,
    Solid,
}

impl Pattern {
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Chase => "chase",
            Pattern::Rainbow => "rainbow",
            Pattern::Solid => "solid",
        }
    }
}

pub fn create_frame(pattern: Pattern, channels: &[ChannelDescriptor], frame_count: usize) -> FrameData {
    let mut frame = FrameData::new();
    for channel in channels {
        let leds = channel.led_count as usize;
        for key in channel.led_keys() {
            let index = key.index as usize;
            let color = match pattern {
                Pattern::Chase => {
                    if index == frame_count % leds {
                        Color::WHITE
                    } else {
                        Color::BLACK
                    }
                }
                Pattern::Rainbow => hue(((index + frame_count) % leds) as f64 / leds as f64),
                Pattern::Solid => Color::from_rgb_bytes(255, 128, 0),
            };
            frame.insert(key, color);
        }
    }
    frame
}

/// Fully saturated color at `h` in [0, 1).
fn hue(h: f64) -> Color {
    let x = h * 6.0;
    let f = x.fract();
    match x as u32 {
        0 => Color::rgb(1.0, f, 0.0),
        1 => Color::rgb(1.0 - f, 1.0, 0.0),
        2 => Color::rgb(0.0, 1.0, f),
        3 => Color::rgb(0.0, 1.0 - f, 1.0),
        4 => Color::rgb(f, 0.0, 1.0),
        _ => Color::rgb(1.0, 0.0, 1.0 - f),
    }
}
